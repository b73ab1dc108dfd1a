//! find_ss: solve the baseline steady state from the command line.
//!
//! Usage: `find_ss [PAR_JSON] [OUTPUT_JSON]`
//!
//! - `PAR_JSON`: optional JSON object of configuration overrides; missing
//!   fields take their baseline values.
//! - `OUTPUT_JSON`: optional path for the steady-state record; stdout when
//!   omitted.
//!
//! Logging goes to stderr through `env_logger` (default level `info`,
//! override with `RUST_LOG`).
use std::{env, error::Error, fs, process::ExitCode};

use log::{error, info};
use rust_hank::model::{hank::HankModel, params::Par};

fn load_par(path: Option<&str>) -> Result<Par, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            info!("configuration overrides read from {path}");
            Ok(Par::from_json_str(&text)?)
        }
        None => Ok(Par::default()),
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let par = load_par(args.get(1).map(String::as_str))?;
    let mut model = HankModel::new(par)?;
    model.prepare_hh_ss()?;
    let outcome = model.find_ss(true)?;
    info!(
        "root [Z_L, beta, Q] = [{:.8}, {:.8}, {:.8}], max |residual| = {:.3e}",
        outcome.unknowns.z_l,
        outcome.unknowns.beta,
        outcome.unknowns.q,
        outcome.max_abs_residual()
    );

    let json = serde_json::to_string_pretty(model.steady_state())?;
    match args.get(2) {
        Some(path) => {
            fs::write(path, json)?;
            info!("steady state written to {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
