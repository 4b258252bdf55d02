use clap::Parser;
use jsm_core::check::{check_file, CheckOptions, Outcome};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "jsm",
    version,
    about = "Check that JSON files declare and satisfy a $schema reference"
)]
struct Cli {
    /// Treat a missing $schema reference as a failure
    #[arg(long)]
    strict: bool,

    /// JSON files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let opts = CheckOptions {
        strict: cli.strict,
        fallback_schema: std::env::var("JSON_SCHEMA_URL")
            .ok()
            .filter(|s| !s.is_empty()),
    };

    let mut all_ok = true;
    for path in &cli.files {
        if !path.exists() {
            eprintln!("Error: {} does not exist", path.display());
            all_ok = false;
            continue;
        }
        if !has_json_extension(path) {
            eprintln!("Warning: {} is not a JSON file, skipping", path.display());
            continue;
        }

        match check_file(path, &opts) {
            Outcome::Pass => println!("OK: {}", path.display()),
            Outcome::Skipped => println!("Skipped (no $schema): {}", path.display()),
            Outcome::ParseError(msg) => {
                eprintln!("Error: {} is not valid JSON: {msg}", path.display());
                all_ok = false;
            }
            Outcome::MissingSchema => {
                eprintln!("Error: {} does not contain a '$schema' key", path.display());
                all_ok = false;
            }
            Outcome::LoadError(msg) => {
                eprintln!("Error: {}: could not load schema: {msg}", path.display());
                all_ok = false;
            }
            Outcome::Violations(msgs) => {
                eprintln!("Error: {} failed schema validation:", path.display());
                for msg in &msgs {
                    eprintln!("  - {msg}");
                }
                all_ok = false;
            }
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
