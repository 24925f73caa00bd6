//! Adjudicator -- resolves Diplomacy phases over a JSON-lines stream.
//!
//! Reads one request per line from stdin and writes one response per line
//! to stdout. Logs go to stderr, filtered by `RUST_LOG`. An optional first
//! argument names a TOML config file.

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::{error, info};

use adjudicator::protocol::handle_line;
use adjudicator::{Adjudicator, AdjudicatorConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => match AdjudicatorConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => AdjudicatorConfig::default(),
    };
    let adjudicator = match Adjudicator::from_config(config) {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "failed to load map");
            return ExitCode::FAILURE;
        }
    };

    match run(&adjudicator) {
        Ok(handled) => {
            info!(handled, "input closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "i/o failure");
            ExitCode::FAILURE
        }
    }
}

/// Serves requests until stdin closes. Returns the number of responses
/// written.
fn run(adjudicator: &Adjudicator) -> io::Result<usize> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut handled = 0;

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(response) = handle_line(adjudicator, &line) else {
            continue;
        };
        serde_json::to_writer(&mut out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;
        handled += 1;
    }

    Ok(handled)
}
