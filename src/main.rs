use anyhow::{Context, Result};
use clap::Parser;
use metalens::app::{run_interactive, run_once};
use metalens::shell::ConsoleShell;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Archivo a inspeccionar; sin él se abre una sesión interactiva
    path: Option<PathBuf>,

    /// Guarda el texto mostrado en este archivo
    #[arg(short, long, requires = "path")]
    output: Option<PathBuf>,

    /// Nivel de registro en stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level)
                .with_context(|| format!("nivel de registro inválido: {}", cli.log_level))?,
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut shell = ConsoleShell::stdio();

    let Some(path) = cli.path else {
        run_interactive(&mut shell).context("Error al leer la entrada")?;
        return Ok(ExitCode::SUCCESS);
    };

    shell.preset_input(path);
    let save = match cli.output {
        Some(output) => {
            shell.preset_output(output);
            true
        }
        None => false,
    };

    // El fallo ya se notificó en la consola.
    match run_once(&mut shell, save) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
