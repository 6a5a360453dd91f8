use crate::error::SaveError;
use crate::extractors::extract;
use crate::metadata::{render, save_text};
use crate::shell::{ConsoleShell, HostShell, Notice};
use crate::sniffer::classify;
use crate::ui;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Texto mostrado actualmente; es lo que se guarda con "guardar".
#[derive(Debug, Default)]
pub struct Session {
    displayed: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Pide un archivo y muestra su metadata. Devuelve `false` si se canceló.
    pub fn choose_file<S: HostShell>(&mut self, shell: &mut S) -> bool {
        let Some(path) = shell.pick_input_file() else {
            return false;
        };

        self.displayed.clear();
        let category = classify(&path);
        debug!(path = %path.display(), %category, "archivo clasificado");

        let text = render(&extract(&path, category));
        shell.display(&text);
        self.displayed = text;
        true
    }

    /// Guarda el texto mostrado tal cual y avisa del resultado.
    pub fn save_as_text<S: HostShell>(
        &mut self,
        shell: &mut S,
    ) -> Result<Option<PathBuf>, SaveError> {
        let Some(path) = shell.pick_output_file() else {
            return Ok(None);
        };

        match save_text(&path, &self.displayed) {
            Ok(()) => {
                shell.notify(Notice::Success(
                    "Metadata guardada correctamente.".to_string(),
                ));
                Ok(Some(path))
            }
            Err(error) => {
                shell.notify(Notice::Warning(error.to_string()));
                Err(error)
            }
        }
    }
}

/// Modo no interactivo: un archivo y, opcionalmente, el destino donde guardar.
pub fn run_once<S: HostShell>(shell: &mut S, save: bool) -> Result<(), SaveError> {
    let mut session = Session::new();
    if session.choose_file(shell) && save {
        session.save_as_text(shell)?;
    }
    Ok(())
}

pub fn run_interactive<R: BufRead, W: Write>(shell: &mut ConsoleShell<R, W>) -> io::Result<()> {
    let mut session = Session::new();

    ui::render_header(shell.writer())?;
    ui::render_intro(shell.writer())?;

    loop {
        let line = match shell.prompt("Comando") {
            Ok(Some(line)) => line,
            Ok(None) => {
                writeln!(
                    shell.writer(),
                    "\n{}",
                    style("Fin de la entrada. ¡Hasta luego!").dim()
                )?;
                break;
            }
            Err(error) => {
                shell.notify(Notice::Warning(format!("Error al leer la entrada: {error}")));
                return Err(error);
            }
        };

        if line.is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Exit => {
                writeln!(shell.writer(), "{}", style("Hasta luego!").dim())?;
                break;
            }
            Command::Help => ui::render_help(shell.writer())?,
            Command::Formats => ui::render_formats(shell.writer())?,
            Command::Open(path) => {
                if let Some(path) = path {
                    shell.preset_input(path);
                }
                session.choose_file(shell);
            }
            Command::Save(path) => {
                if let Some(path) = path {
                    shell.preset_output(path);
                }
                // El aviso ya se mostró; la sesión sigue disponible.
                let _ = session.save_as_text(shell);
            }
        }
    }

    Ok(())
}

#[derive(Debug, Eq, PartialEq)]
enum Command {
    Exit,
    Help,
    Formats,
    Open(Option<String>),
    Save(Option<String>),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let (command, remainder) = match trimmed.split_once(char::is_whitespace) {
        Some((command, remainder)) => (command, remainder.trim()),
        None => (trimmed, ""),
    };
    let argument = (!remainder.is_empty()).then(|| remainder.to_string());

    match command.to_lowercase().as_str() {
        "salir" | "exit" if argument.is_none() => Command::Exit,
        "ayuda" | "help" if argument.is_none() => Command::Help,
        "formatos" | "formats" if argument.is_none() => Command::Formats,
        "abrir" | "open" => Command::Open(argument),
        "guardar" | "save" => Command::Save(argument),
        _ => Command::Open(Some(trimmed.to_string())),
    }
}
