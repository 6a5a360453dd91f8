//! Extracción de metadata en PDFs mediante lectura del diccionario Info.

use crate::metadata::report::{MetadataResult, MetadataSection};
use crate::sniffer::FormatCategory;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

pub fn extract_pdf_metadata(path: &Path) -> MetadataResult {
    let mut section = MetadataSection::new(FormatCategory::Pdf);

    let doc = Document::load(path)?;

    let Ok(info_ref) = doc.trailer.get(b"Info") else {
        return Ok(section);
    };
    let Some(info_dict) = deref_dictionary(&doc, info_ref) else {
        return Ok(section);
    };

    for (key, value) in info_dict.iter() {
        if let Some(value) = object_to_string(&doc, value) {
            section.push(format!("/{}", String::from_utf8_lossy(key)), value);
        }
    }

    Ok(section)
}

fn deref_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(reference) => doc.get_dictionary(*reference).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn object_to_string(doc: &Document, obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).trim().to_string()),
        Object::Integer(value) => Some(value.to_string()),
        Object::Real(value) => Some(value.to_string()),
        Object::Boolean(value) => Some(value.to_string()),
        Object::Reference(reference) => doc
            .get_object(*reference)
            .ok()
            .and_then(|inner| object_to_string(doc, inner)),
        _ => None,
    }
}

/// Las cadenas de texto PDF vienen en UTF-16BE con BOM o en codificación de un byte.
fn decode_text_string(bytes: &[u8]) -> String {
    let text = match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units = rest
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect::<Vec<_>>();
            String::from_utf16_lossy(&units)
        }
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&byte| pdf_doc_char(byte)).collect(),
        },
    };
    text.trim().to_string()
}

/// PDFDocEncoding coincide con Latin-1 salvo en estos rangos.
fn pdf_doc_char(byte: u8) -> char {
    const LOW: [char; 8] = ['˘', 'ˇ', 'ˆ', '˙', '˝', '˛', '˚', '˜'];
    const HIGH: [char; 33] = [
        '•', '†', '‡', '…', '—', '–', 'ƒ', '⁄', '‹', '›', '−', '‰', '„', '“', '”', '‘', '’',
        '‚', '™', 'ﬁ', 'ﬂ', 'Ł', 'Œ', 'Š', 'Ÿ', 'Ž', 'ı', 'ł', 'œ', 'š', 'ž',
        char::REPLACEMENT_CHARACTER, '€',
    ];

    match byte {
        0x18..=0x1F => LOW[usize::from(byte - 0x18)],
        0x80..=0xA0 => HIGH[usize::from(byte - 0x80)],
        0xAD => char::REPLACEMENT_CHARACTER,
        _ => char::from(byte),
    }
}
