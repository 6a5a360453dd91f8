//! Convierte el resultado de una extracción en el texto que se muestra y se guarda.

use crate::error::ExtractError;

use super::report::{MetadataResult, MetadataSection};

pub const UNSUPPORTED_MESSAGE: &str = "Formato de archivo no soportado.";

pub fn render(result: &MetadataResult) -> String {
    match result {
        Ok(section) => render_section(section),
        Err(error) => render_failure(error),
    }
}

fn render_section(section: &MetadataSection) -> String {
    if section.is_empty() {
        return section.empty_notice().to_string();
    }

    section
        .entries
        .iter()
        .map(|entry| format!("{}: {}", entry.key, entry.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_failure(error: &ExtractError) -> String {
    match error {
        ExtractError::UnsupportedFormat => UNSUPPORTED_MESSAGE.to_string(),
        other => format!("Error al extraer metadata: {}", single_line(&other.to_string())),
    }
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
