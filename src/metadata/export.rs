//! Guardado del texto mostrado en un archivo plano.

use crate::error::SaveError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Escribe el texto tal cual, en UTF-8 y sin transformaciones.
pub fn save_text(path: &Path, text: &str) -> Result<(), SaveError> {
    fs::write(path, text.as_bytes())?;
    info!(path = %path.display(), bytes = text.len(), "metadata guardada");
    Ok(())
}
