use crossbeam_channel::unbounded;
use log::{debug, info};
use pose_offsets::config::offsets::{self, RuntimeConfig};
use pose_offsets::io::{load_pose_list, save_offsets, write_json_file};
use pose_offsets::{ChannelSink, Placement, SearchReport, SearchSession};
use std::env;
use std::path::Path;
use std::thread;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: find-offsets <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = offsets::load_config(Path::new(&config_path))?;

    let model = load_pose_list(&config.model)?;
    let space = load_pose_list(&config.space)?;
    info!(
        "Loaded {} model poses and {} space poses",
        model.len(),
        space.len()
    );

    let session = SearchSession::new(model, space, config.search.clone());
    let report = if config.visualization.enabled {
        run_visualized(&session, &config)?
    } else {
        session.find_offsets().wait().map_err(|e| e.to_string())?
    };

    print_summary(&report);

    if let Some(path) = &config.output.offsets_json {
        if save_offsets(path, &report.offsets)? {
            println!("Offsets written to {}", path.display());
        }
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn run_visualized(session: &SearchSession, config: &RuntimeConfig) -> Result<SearchReport, String> {
    let (sender, receiver) = unbounded::<Placement>();
    let observer = thread::Builder::new()
        .name("pose-offsets-observer".to_string())
        .spawn(move || {
            let mut placed = 0usize;
            for p in receiver.iter() {
                placed += 1;
                let pos = p.pose.position();
                debug!(
                    "slot {} -> ({:.3}, {:.3}, {:.3}) active={}",
                    p.slot, pos.x, pos.y, pos.z, p.active
                );
            }
            placed
        })
        .map_err(|e| format!("Failed to spawn observer: {e}"))?;

    let handle = session
        .find_offsets_with_visualization(ChannelSink::new(sender), config.visualization.delay());
    let result = handle.wait();
    // The sink is dropped with the worker, which closes the channel.
    let placed = observer
        .join()
        .map_err(|_| "Observer thread panicked".to_string())?;
    info!("Visualized {placed} placements");
    result.map_err(|e| e.to_string())
}

fn print_summary(report: &SearchReport) {
    let trace = &report.trace;
    println!("Search summary");
    println!("  strategy: {}", trace.strategy);
    println!(
        "  input: {} model poses, {} space poses",
        trace.input.model_poses, trace.input.space_poses
    );
    println!("  outcome: {:?}", trace.outcome);
    println!(
        "  candidates: {} tested={} accepted={} rejected={}",
        trace.generation.candidates,
        trace.validation.tested,
        trace.validation.accepted,
        trace.validation.rejected()
    );
    println!(
        "  timing_ms: generate={:.3} validate={:.3} total={:.3}",
        trace.timing.generate_ms, trace.timing.validate_ms, trace.timing.total_ms
    );
    for (i, offset) in report.offsets.iter().enumerate() {
        let m = offset.transform().to_row_major();
        println!("  offset[{i}] ({}):", offset.strategy);
        for row in m.chunks(4) {
            println!(
                "    [{:.4} {:.4} {:.4} {:.4}]",
                row[0], row[1], row[2], row[3]
            );
        }
    }
}
