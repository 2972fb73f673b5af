use crate::search::SearchParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Validated offsets in the pose record schema.
    pub offsets_json: Option<PathBuf>,
    /// Full search report (offsets plus trace).
    pub report_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub enabled: bool,
    pub delay_ms: u64,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 100,
        }
    }
}

impl VisualizationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub model: PathBuf,
    pub space: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

impl RuntimeConfig {
    /// Resolve relative input/output paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.model);
        resolve(&mut self.space);
        if let Some(p) = self.output.offsets_json.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.output.report_json.as_mut() {
            resolve(p);
        }
    }
}

pub fn parse_config(contents: &str) -> Result<RuntimeConfig, String> {
    let config: RuntimeConfig =
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse config: {e}"))?;
    config
        .search
        .validate()
        .map_err(|e| format!("Invalid search parameters: {e}"))?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let mut config = parse_config(&contents).map_err(|e| format!("{}: {e}", path.display()))?;
    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::MembershipMode;
    use crate::search::StrategyKind;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{"model": "model.json", "space": "space.json"}"#).unwrap();
        assert_eq!(cfg.search, SearchParams::default());
        assert!(!cfg.visualization.enabled);
        assert_eq!(cfg.visualization.delay(), Duration::from_millis(100));
        assert!(cfg.output.offsets_json.is_none());
    }

    #[test]
    fn nested_search_overrides() {
        let cfg = parse_config(
            r#"{
                "model": "m.json",
                "space": "s.json",
                "search": {
                    "strategy": "composition",
                    "intersection": {"membership": "bucketed"},
                    "composition": {"element_tolerance": 0.01}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.search.strategy, StrategyKind::Composition);
        assert_eq!(cfg.search.intersection.membership, MembershipMode::Bucketed);
        assert_eq!(cfg.search.intersection.offset_tolerance, 0.1);
        assert_eq!(cfg.search.composition.element_tolerance, 0.01);
    }

    #[test]
    fn invalid_tolerance_is_reported() {
        let err = parse_config(
            r#"{"model": "m", "space": "s", "search": {"validation": {"position_tolerance": 0}}}"#,
        )
        .unwrap_err();
        assert!(err.contains("position_tolerance"), "{err}");
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut cfg = parse_config(
            r#"{"model": "m.json", "space": "/abs/s.json", "output": {"offsets_json": "out/o.json"}}"#,
        )
        .unwrap();
        cfg.resolve_paths(Path::new("/data"));
        assert_eq!(cfg.model, PathBuf::from("/data/m.json"));
        assert_eq!(cfg.space, PathBuf::from("/abs/s.json"));
        assert_eq!(cfg.output.offsets_json, Some(PathBuf::from("/data/out/o.json")));
    }
}
