use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hack_assembler::{encoder, error::AsmError, first_pass, lexer, parser};
use tracing_subscriber::EnvFilter;

/// Assembles Hack assembly (.asm) into Hack machine code (.hack).
#[derive(Parser)]
#[command(name = "hack-assembler", version)]
struct Cli {
    /// Path to the .asm source file.
    input: PathBuf,

    /// Output path. Defaults to the input path with its extension
    /// replaced by `.hack`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity. Repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_path = cli.output.clone().unwrap_or_else(|| cli.input.with_extension("hack"));

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!("failed to read {}: {err}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    match assemble(&source) {
        Ok(machine_code) => {
            let text: String = machine_code
                .iter()
                .map(|word| format!("{word:016b}\n"))
                .collect();
            if let Err(err) = fs::write(&output_path, text) {
                tracing::error!("failed to write {}: {err}", output_path.display());
                return ExitCode::FAILURE;
            }
            tracing::info!(
                "assembled {} into {} ({} words)",
                cli.input.display(),
                output_path.display(),
                machine_code.len()
            );
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

fn assemble(source: &str) -> Result<Vec<u16>, Vec<AsmError>> {
    let lexed = lexer::tokenize(source);
    if !lexed.errors.is_empty() {
        return Err(lexed.errors);
    }

    let parsed = parser::parse_lines(&lexed.tokens);
    if !parsed.errors.is_empty() {
        return Err(parsed.errors);
    }

    let mut label_result = first_pass::label_pass(&parsed.lines);
    if !label_result.errors.is_empty() {
        return Err(label_result.errors);
    }
    first_pass::variable_pass(&parsed.lines, &mut label_result.symbol_table);

    let encoded = encoder::encode(&parsed.lines, &label_result.symbol_table);
    if !encoded.errors.is_empty() {
        return Err(encoded.errors);
    }

    Ok(encoded.machine_code)
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
