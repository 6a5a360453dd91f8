//! Extracción de metadata embebida (EXIF, propiedades de documentos, atributos de video)
//! y su presentación como texto plano.

pub mod app;
pub mod error;
pub mod extractors;
pub mod formatting;
pub mod metadata;
pub mod shell;
pub mod sniffer;
pub mod ui;

pub use error::{ExtractError, SaveError};
pub use extractors::extract;
pub use metadata::{MetadataEntry, MetadataResult, MetadataSection, render, save_text};
pub use sniffer::{FormatCategory, classify};
