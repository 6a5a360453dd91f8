//! Modelos compartidos para reportar metadata de manera consistente.

use crate::error::ExtractError;
use crate::sniffer::FormatCategory;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Entradas obtenidas de un archivo, en el orden en que el extractor las leyó.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataSection {
    pub category: FormatCategory,
    pub entries: Vec<MetadataEntry>,
}

impl MetadataSection {
    pub fn new(category: FormatCategory) -> Self {
        Self {
            category,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(MetadataEntry::new(key, value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Mensaje que sustituye a la lista cuando no hay entradas.
    pub fn empty_notice(&self) -> &'static str {
        match self.category {
            FormatCategory::Image => "Sin datos EXIF.",
            FormatCategory::Pdf => "El PDF no contiene metadata.",
            _ => "No se encontró metadata.",
        }
    }
}

pub type MetadataResult = Result<MetadataSection, ExtractError>;
