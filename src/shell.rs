//! Interfaz con quien muestra resultados y pide archivos al usuario.

use crate::ui;
use console::style;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    Success(String),
    Warning(String),
}

/// Lo que la aplicación necesita de su entorno: selección de archivos y una superficie de texto.
pub trait HostShell {
    fn pick_input_file(&mut self) -> Option<PathBuf>;
    fn pick_output_file(&mut self) -> Option<PathBuf>;
    fn display(&mut self, text: &str);
    fn notify(&mut self, notice: Notice);
}

/// Implementación de terminal: las rutas se escriben en un prompt.
///
/// Una ruta precargada con [`ConsoleShell::preset_input`] o
/// [`ConsoleShell::preset_output`] se entrega sin preguntar.
pub struct ConsoleShell<R, W> {
    input: R,
    output: W,
    buffer: String,
    preset_input: Option<PathBuf>,
    preset_output: Option<PathBuf>,
}

impl ConsoleShell<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            buffer: String::new(),
            preset_input: None,
            preset_output: None,
        }
    }

    pub fn preset_input(&mut self, path: impl Into<PathBuf>) {
        self.preset_input = Some(path.into());
    }

    pub fn preset_output(&mut self, path: impl Into<PathBuf>) {
        self.preset_output = Some(path.into());
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Lee una línea tras mostrar el prompt; `None` al terminar la entrada.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(
            self.output,
            "{} {} ",
            style(label).bold().cyan(),
            style("›").cyan()
        )?;
        self.output.flush()?;

        self.buffer.clear();
        let bytes_read = self.input.read_line(&mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        Ok(Some(self.buffer.trim().to_string()))
    }

    fn prompt_path(&mut self, label: &str) -> Option<PathBuf> {
        match self.prompt(label) {
            Ok(Some(line)) if !line.is_empty() => Some(PathBuf::from(line)),
            Ok(_) => None,
            Err(error) => {
                self.notify(Notice::Warning(format!("Error al leer la entrada: {error}")));
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> HostShell for ConsoleShell<R, W> {
    fn pick_input_file(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.preset_input.take() {
            return Some(path);
        }
        if let Err(error) = ui::render_file_input_hint(&mut self.output) {
            warn!(%error, "no se pudo mostrar la ayuda de rutas");
        }
        self.prompt_path("Archivo")
    }

    fn pick_output_file(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.preset_output.take() {
            return Some(path);
        }
        self.prompt_path("Guardar como")
    }

    fn display(&mut self, text: &str) {
        if let Err(error) = writeln!(self.output, "\n{text}\n") {
            warn!(%error, "no se pudo mostrar la metadata");
        }
    }

    fn notify(&mut self, notice: Notice) {
        let line = match &notice {
            Notice::Success(message) => style(format!("✓ {message}")).green(),
            Notice::Warning(message) => style(format!("⚠  {message}")).yellow(),
        };
        if let Err(error) = writeln!(self.output, "{line}") {
            warn!(%error, "no se pudo mostrar el aviso");
        }
    }
}
