//! Extractores de metadata, uno por categoría de formato.

mod image;
mod media;
mod office;
mod pdf;

pub use image::extract_image_metadata;
pub use media::extract_video_metadata;
pub use office::{extract_document_metadata, extract_spreadsheet_metadata};
pub use pdf::extract_pdf_metadata;

use crate::error::ExtractError;
use crate::metadata::report::MetadataResult;
use crate::sniffer::FormatCategory;
use std::any::Any;
use std::panic;
use std::path::Path;
use tracing::{debug, warn};

/// Ejecuta el extractor de la categoría y devuelve siempre un resultado, nunca un pánico.
pub fn extract(path: &Path, category: FormatCategory) -> MetadataResult {
    debug!(path = %path.display(), %category, "extrayendo metadata");

    let result = catch_panic(|| dispatch(path, category));

    match &result {
        Ok(section) => debug!(entries = section.entries.len(), "extracción completada"),
        Err(ExtractError::UnsupportedFormat) => debug!("formato no soportado"),
        Err(error) => warn!(path = %path.display(), %error, "no se pudo extraer la metadata"),
    }

    result
}

fn dispatch(path: &Path, category: FormatCategory) -> MetadataResult {
    match category {
        FormatCategory::Image => extract_image_metadata(path),
        FormatCategory::Pdf => extract_pdf_metadata(path),
        FormatCategory::Document => extract_document_metadata(path),
        FormatCategory::Spreadsheet => extract_spreadsheet_metadata(path),
        FormatCategory::Video => extract_video_metadata(path),
        FormatCategory::Unsupported => Err(ExtractError::UnsupportedFormat),
    }
}

/// Convierte un pánico del lector en `ExtractError::Panicked`.
fn catch_panic<F>(run: F) -> MetadataResult
where
    F: FnOnce() -> MetadataResult + panic::UnwindSafe,
{
    panic::catch_unwind(run)
        .unwrap_or_else(|payload| Err(ExtractError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "error desconocido".to_string()
    }
}

#[cfg(test)]
mod tests;
