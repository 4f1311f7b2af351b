//! Evaluate positions from a JSON file and print the reports.
//!
//! The file holds one `EvaluationRequest` or an array of them.

use dotenvy::dotenv;
use posguard::config::Config;
use posguard::logging;
use posguard::signals::engine::{evaluate_portfolio, evaluate_position, EvaluationRequest};
use serde_json::Value;
use std::{env, fs, process};
use tracing::error;

fn main() {
    dotenv().ok();
    logging::init_logging();

    if let Err(e) = run() {
        error!(error = %e, "evaluation failed");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: posguard <requests.json>")?;
    let config = Config::from_env()?;
    let input: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

    let output = if input.is_array() {
        let requests: Vec<EvaluationRequest> = serde_json::from_value(input)?;
        serde_json::to_string_pretty(&evaluate_portfolio(&requests, &config.engine))?
    } else {
        let request: EvaluationRequest = serde_json::from_value(input)?;
        serde_json::to_string_pretty(&evaluate_position(&request, &config.engine)?)?
    };
    println!("{}", output);
    Ok(())
}
