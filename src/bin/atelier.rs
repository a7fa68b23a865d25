//! The portfolio binary.
//!
//! Logs go to stderr so they never corrupt the alternate screen; set
//! `RUST_LOG` to adjust verbosity (e.g. `RUST_LOG=atelier_tui=debug`).

use std::process::ExitCode;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

use atelier_tui::app;
use atelier_tui::sections::LogTransport;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let handle = match app::mount(Rc::new(LogTransport)) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("mount failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = app::run(&handle);
    handle.unmount();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("event loop failed: {err}");
            ExitCode::FAILURE
        }
    }
}
