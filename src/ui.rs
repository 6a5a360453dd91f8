use crate::sniffer::picker_filters;
use console::style;
use std::io::{self, Write};

const HEADER_WIDTH: usize = 74;

pub fn render_header<W: Write>(out: &mut W) -> io::Result<()> {
    let border = "─".repeat(HEADER_WIDTH - 2);
    writeln!(out, "\n{}", style(format!("┌{}┐", border)).cyan())?;
    writeln!(
        out,
        "{}",
        style(format!(
            "│ {:^inner_width$} │",
            "▸ MetaLens · Extractor de Metadata ◂",
            inner_width = HEADER_WIDTH - 4
        ))
        .cyan()
        .bold()
    )?;
    writeln!(out, "{}\n", style(format!("└{}┘", border)).cyan())
}

pub fn render_intro<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        style("Escribe la ruta de un archivo para ver su metadata.").dim()
    )?;
    writeln!(
        out,
        "{}\n",
        style("Escribe 'ayuda' para ver los comandos o 'salir' para terminar.").dim()
    )
}

pub fn render_help<W: Write>(out: &mut W) -> io::Result<()> {
    let help_lines = [
        "┌─ Comandos:",
        "│   abrir [ruta]    Elige un archivo y muestra su metadata",
        "│   <ruta>          Igual que `abrir <ruta>`",
        "│   guardar [ruta]  Guarda el texto mostrado como .txt",
        "│   formatos        Lista los tipos de archivo soportados",
        "│   ayuda           Muestra esta ayuda",
        "│   salir           Termina la sesión",
        "└─",
    ];

    for line in help_lines.iter() {
        writeln!(out, "{}", style(line).cyan().dim())?;
    }
    writeln!(out)
}

pub fn render_formats<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", style("┌─ Tipos de archivo:").cyan().dim())?;
    for filter in picker_filters() {
        writeln!(out, "{}", style(format!("│   • {filter}")).cyan().dim())?;
    }
    writeln!(out, "{}\n", style("└─").cyan().dim())
}

pub fn render_file_input_hint<W: Write>(out: &mut W) -> io::Result<()> {
    let hint_lines = [
        "┌─ Puedes ingresar:",
        "│   • Un nombre con extensión (ej. foto.jpg)",
        "│   • Una ruta relativa (ej. ./docs/reporte.pdf)",
        "│   • Una ruta absoluta (ej. /Users/usuario/video.mp4)",
        "└─",
    ];

    for line in hint_lines.iter() {
        writeln!(out, "{}", style(line).cyan().dim())?;
    }
    Ok(())
}
