use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Compiles Jack source into VM instructions.
#[derive(Parser)]
#[command(name = "jackc", version)]
struct Cli {
    /// Path to a .jack file, or a directory of .jack files.
    input: PathBuf,

    /// Output directory. Defaults to each input file's own directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

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

    // Sibling class names (spec §8 invariant 5, §4.5 supplement): every
    // file in the compilation unit is assumed to define one class named
    // after its stem (spec §9 Open Question (c) precondition), known up
    // front so `X.name(args)` can resolve `X` as a class before `X`'s own
    // file has been compiled.
    let known_classes: HashSet<String> = jack_files
        .iter()
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();

    for path in &jack_files {
        if let Err(err) = compile_file(path, &known_classes, cli.output.as_deref()) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn compile_file(path: &Path, known_classes: &HashSet<String>, out_dir: Option<&Path>) -> Result<(), String> {
    let source = fs::read_to_string(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;

    let vm_code = jack::compile(&source, known_classes).map_err(|err| err.to_string())?;

    let output_path = match out_dir {
        Some(dir) => {
            let name = path.file_name().map(PathBuf::from).unwrap_or_default();
            dir.join(name).with_extension("vm")
        }
        None => path.with_extension("vm"),
    };
    fs::write(&output_path, vm_code).map_err(|err| format!("failed to write {}: {err}", output_path.display()))?;
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
