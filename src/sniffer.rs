//! Clasificación de archivos por extensión.

use std::fmt;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "gif"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];
const DOCUMENT_EXTENSIONS: &[&str] = &["docx"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FormatCategory {
    Image,
    Pdf,
    Document,
    Spreadsheet,
    Video,
    Unsupported,
}

impl FormatCategory {
    /// Categorías con extractor, en el orden en que se ofrecen al elegir archivo.
    pub const SUPPORTED: [FormatCategory; 5] = [
        FormatCategory::Image,
        FormatCategory::Pdf,
        FormatCategory::Document,
        FormatCategory::Spreadsheet,
        FormatCategory::Video,
    ];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatCategory::Image => IMAGE_EXTENSIONS,
            FormatCategory::Pdf => PDF_EXTENSIONS,
            FormatCategory::Document => DOCUMENT_EXTENSIONS,
            FormatCategory::Spreadsheet => SPREADSHEET_EXTENSIONS,
            FormatCategory::Video => VIDEO_EXTENSIONS,
            FormatCategory::Unsupported => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormatCategory::Image => "Imágenes",
            FormatCategory::Pdf => "Archivos PDF",
            FormatCategory::Document => "Documentos Word",
            FormatCategory::Spreadsheet => "Libros Excel",
            FormatCategory::Video => "Videos",
            FormatCategory::Unsupported => "Todos los archivos",
        }
    }

    /// Filtro al estilo de los diálogos nativos, p. ej. `Videos (*.mp4 *.avi *.mov)`.
    pub fn picker_filter(self) -> String {
        let patterns = if self == FormatCategory::Unsupported {
            "*".to_string()
        } else {
            self.extensions()
                .iter()
                .map(|ext| format!("*.{ext}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{} ({patterns})", self.label())
    }
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatCategory::Image => "imagen",
            FormatCategory::Pdf => "pdf",
            FormatCategory::Document => "documento",
            FormatCategory::Spreadsheet => "hoja de cálculo",
            FormatCategory::Video => "video",
            FormatCategory::Unsupported => "no soportado",
        };
        f.write_str(name)
    }
}

pub fn classify(path: &Path) -> FormatCategory {
    let Some(extension) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    else {
        return FormatCategory::Unsupported;
    };

    FormatCategory::SUPPORTED
        .into_iter()
        .find(|category| category.extensions().contains(&extension.as_str()))
        .unwrap_or(FormatCategory::Unsupported)
}

/// Lista de filtros para el selector de archivos; el comodín va al final.
pub fn picker_filters() -> Vec<String> {
    FormatCategory::SUPPORTED
        .into_iter()
        .chain([FormatCategory::Unsupported])
        .map(FormatCategory::picker_filter)
        .collect()
}
