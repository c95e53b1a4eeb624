use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vm_translator::codegen::{self, Scope};
use vm_translator::error::VmError;
use vm_translator::lexer;
use vm_translator::parser;

/// Translates Hack VM stack-machine code into Hack assembly.
#[derive(clap::Parser)]
#[command(name = "vm-translator", version)]
struct Cli {
    /// Path to a .vm file, or a directory of .vm files.
    input: PathBuf,

    /// Output path. Defaults to the input with its extension swapped to
    /// `.asm` (file input) or `<dir-name>.asm` inside the directory
    /// (directory input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress the bootstrap sequence even for a directory input.
    #[arg(long)]
    no_boot: bool,

    /// Increase log verbosity. Repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = if cli.input.is_dir() {
        translate_directory(&cli.input, !cli.no_boot)
    } else {
        translate_single_file(&cli.input)
    };

    match result {
        Ok(assembly) => {
            let output_path = cli.output.clone().unwrap_or_else(|| default_output_path(&cli.input));
            if let Err(err) = fs::write(&output_path, assembly) {
                tracing::error!("failed to write {}: {err}", output_path.display());
                return ExitCode::FAILURE;
            }
            tracing::info!("wrote {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for err in &errors {
                eprintln!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        input.join(format!("{name}.asm"))
    } else {
        input.with_extension("asm")
    }
}

fn translate_single_file(path: &Path) -> Result<String, Vec<VmError>> {
    let source = fs::read_to_string(path).map_err(|err| {
        vec![VmError::new(
            vm_translator::error::ErrorKind::UnexpectedToken,
            format!("failed to read {}: {err}", path.display()),
            vm_translator::error::Span::default(),
        )]
    })?;
    let file_stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let mut scope = Scope::new(file_stem);
    let lines = translate_source(&source, &mut scope)?;
    Ok(lines.join("\n") + "\n")
}

fn translate_directory(dir: &Path, include_boot: bool) -> Result<String, Vec<VmError>> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|err| {
            vec![VmError::new(
                vm_translator::error::ErrorKind::UnexpectedToken,
                format!("failed to read directory {}: {err}", dir.display()),
                vm_translator::error::Span::default(),
            )]
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("vm"))
        .collect();
    vm_files.sort();

    let mut all_lines = Vec::new();
    if include_boot {
        all_lines.extend(codegen::boot_sequence());
    }

    for path in &vm_files {
        let source = fs::read_to_string(path).map_err(|err| {
            vec![VmError::new(
                vm_translator::error::ErrorKind::UnexpectedToken,
                format!("failed to read {}: {err}", path.display()),
                vm_translator::error::Span::default(),
            )]
        })?;
        let file_stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let mut scope = Scope::new(file_stem);
        all_lines.extend(translate_source(&source, &mut scope)?);
    }

    Ok(all_lines.join("\n") + "\n")
}

fn translate_source(source: &str, scope: &mut Scope) -> Result<Vec<String>, Vec<VmError>> {
    let lexed = lexer::tokenize(source);
    if !lexed.errors.is_empty() {
        return Err(lexed.errors);
    }
    let parsed = parser::parse_lines(&lexed.tokens);
    if !parsed.errors.is_empty() {
        return Err(parsed.errors);
    }
    let result = codegen::translate_file(&parsed.lines, scope);
    if !result.errors.is_empty() {
        return Err(result.errors);
    }
    Ok(result.lines)
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
