//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tagnote_core` linkage and storage bootstrap from `TAGNOTE_*`
//!   environment variables.
//! - Print a deterministic one-line-per-fact summary.

use std::process::ExitCode;
use tagnote_core::{open_coordinator, CoreConfig};

fn main() -> ExitCode {
    println!("tagnote_core ping={}", tagnote_core::ping());
    println!("tagnote_core version={}", tagnote_core::core_version());

    let coordinator = match open_coordinator(CoreConfig::from_env()) {
        Ok(coordinator) => coordinator,
        Err(err) => {
            log::error!("event=cli_open module=cli status=error error={err}");
            eprintln!("tagnote: {err}");
            return ExitCode::FAILURE;
        }
    };

    let snapshot = coordinator.snapshot();
    println!("notes={}", coordinator.note_count());
    println!("tags={}", coordinator.tag_count());
    for tag in &snapshot.tags {
        println!("tag id={} count={} name={}", tag.id, tag.count, tag.name);
    }
    println!("consistent={}", snapshot.is_consistent());
    ExitCode::SUCCESS
}
