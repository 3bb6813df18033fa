//! Reads a saved result page from stdin and prints its offer records as JSON.
//!
//! Usage: `extract_stdin [options.json] < page.html`

use std::io::{self, Read};
use std::process::ExitCode;

use serp_offers::{Engine, Options};

fn load_options(path: Option<String>) -> Result<Options, String> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    Options::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

fn main() -> ExitCode {
    let options = match load_options(std::env::args().nth(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let engine = match Engine::new(options) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut page = Vec::new();
    if io::stdin().read_to_end(&mut page).is_err() {
        eprintln!("Failed to read from stdin");
        return ExitCode::FAILURE;
    }

    let html = serp_offers::encoding::transcode_to_utf8(&page);
    let records = engine.extract_html(&html);

    match serde_json::to_string_pretty(&records) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
