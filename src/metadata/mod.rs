//! Modelo de resultados, presentación en texto y guardado.

pub mod export;
pub mod renderer;
pub mod report;

pub use export::save_text;
pub use renderer::render;
pub use report::{MetadataEntry, MetadataResult, MetadataSection};
