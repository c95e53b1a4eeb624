use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parses Jack source into its structured XML parse tree.
#[derive(Parser)]
#[command(name = "jack-analyzer", version)]
struct Cli {
    /// Path to a .jack file, or a directory of .jack files.
    input: PathBuf,

    /// Increase log verbosity. Repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let jack_files = match collect_jack_files(&cli.input) {
        Ok(files) => files,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    for path in &jack_files {
        if let Err(err) = analyze_file(path) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn analyze_file(path: &Path) -> Result<(), String> {
    let source = fs::read_to_string(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;

    let xml = jack::analyze(&source).map_err(|err| err.to_string())?;

    let output_path = path.with_extension("comp.xml");
    fs::write(&output_path, xml).map_err(|err| format!("failed to write {}: {err}", output_path.display()))?;
    tracing::info!("wrote {}", output_path.display());
    Ok(())
}

fn collect_jack_files(input: &Path) -> Result<Vec<PathBuf>, String> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(input)
            .map_err(|err| format!("failed to read directory {}: {err}", input.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jack"))
            .collect();
        files.sort();
        Ok(files)
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
