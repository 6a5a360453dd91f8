//! Errores de extracción y guardado.

use std::io;
use thiserror::Error;

/// Motivo por el que no se pudo obtener la metadata de un archivo.
///
/// La metadata vacía no es un error: se representa como una sección sin entradas.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("formato de archivo no soportado")]
    UnsupportedFormat,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Exif(#[from] exif::Error),

    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Xml(#[from] xmltree::ParseError),

    /// Contenedor multimedia mal formado o sin la información esperada.
    #[error("{0}")]
    Container(String),

    #[error("el lector se interrumpió de forma inesperada: {0}")]
    Panicked(String),
}

impl ExtractError {
    pub fn container(message: impl Into<String>) -> Self {
        ExtractError::Container(message.into())
    }
}

#[derive(Debug, Error)]
#[error("No se pudo guardar el archivo: {0}")]
pub struct SaveError(#[from] pub io::Error);
