use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use log::info;

use fm24_moneyball::leagues;
use fm24_moneyball::pipeline::{self, Options};

const USAGE: &str = "usage: fm24_moneyball <signed.html> <loans.html> <universal.html> \
[-o <report.xlsx>] [--league-power <overrides.json>]";

fn main() {
    fm24_moneyball::init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut output = PathBuf::from("moneyball_report.xlsx");
    let mut overrides_path: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let Some(path) = args.next() else {
                    bail!("{arg} needs a file path\n{USAGE}");
                };
                output = PathBuf::from(path);
            }
            "--league-power" => {
                let Some(path) = args.next() else {
                    bail!("{arg} needs a file path\n{USAGE}");
                };
                overrides_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => inputs.push(PathBuf::from(arg)),
        }
    }

    if inputs.len() != 3 {
        bail!(
            "expected exactly three input files, got {}\n{USAGE}",
            inputs.len()
        );
    }

    let mut options = Options::default();
    if let Some(path) = overrides_path {
        options.league_power_overrides = leagues::load_power_overrides(&path)?;
        info!(
            "loaded {} league power overrides",
            options.league_power_overrides.len()
        );
    }

    let signed = read_input(&inputs[0])?;
    let loans = read_input(&inputs[1])?;
    let universal = read_input(&inputs[2])?;

    let bytes = pipeline::generate_report(&signed, &loans, &universal, &options)?;
    fs::write(&output, &bytes)
        .with_context(|| format!("write report to {}", output.display()))?;
    info!("wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
