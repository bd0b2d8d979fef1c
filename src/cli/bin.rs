#![deny(warnings)]

use std::{
    error::Error,
    io::{self, Write},
};

use tracing_subscriber::EnvFilter;

mod app;
pub(crate) use app::App;

mod cmds;

pub(crate) type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[allow(unused_must_use)]
fn main() {
    // Keep this function small. Everything past argument parsing is
    // reachable through `App::run_with_args` in tests.

    let arg_matches = app::clap_app().get_matches();
    init_tracing(arg_matches.occurrences_of("verbose"));

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let mut app = App {
        arg_matches,
        stdout: &mut stdout,
    };

    let r = app.run();

    app.flush();
    // Intentionally ignoring the result of this flush.

    std::process::exit(match r {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            1
        }
    });
}

// Logs go to stderr. Stdout carries command output only.
fn init_tracing(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
