//! Runtime configuration for the command-line tools.

pub mod offsets;

pub use offsets::{load_config, OutputConfig, RuntimeConfig, VisualizationConfig};
