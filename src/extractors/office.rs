//! Lectura de las propiedades principales de documentos Office empaquetados en ZIP.

use crate::error::ExtractError;
use crate::formatting::format_timestamp;
use crate::metadata::report::{MetadataResult, MetadataSection};
use crate::sniffer::FormatCategory;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xmltree::{Element, XMLNode};
use zip::result::ZipError;

const CORE_PROPERTIES_PATH: &str = "docProps/core.xml";

const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

struct FieldSpec {
    label: &'static str,
    local_name: &'static str,
    namespace: &'static str,
    timestamp: bool,
}

/// Título, autor (`dc:creator`) y fecha de creación, presentes o no.
const CORE_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        label: "Título",
        local_name: "title",
        namespace: DC_NS,
        timestamp: false,
    },
    FieldSpec {
        label: "Autor",
        local_name: "creator",
        namespace: DC_NS,
        timestamp: false,
    },
    FieldSpec {
        label: "Creado",
        local_name: "created",
        namespace: DCTERMS_NS,
        timestamp: true,
    },
];

pub fn extract_document_metadata(path: &Path) -> MetadataResult {
    extract_core_properties(path, FormatCategory::Document)
}

pub fn extract_spreadsheet_metadata(path: &Path) -> MetadataResult {
    extract_core_properties(path, FormatCategory::Spreadsheet)
}

fn extract_core_properties(path: &Path, category: FormatCategory) -> MetadataResult {
    let mut section = MetadataSection::new(category);
    let root = read_core_xml(path)?;

    for field in &CORE_FIELDS {
        let value = root
            .as_ref()
            .and_then(|root| find_child_text(root, field.local_name, field.namespace))
            .map(|text| {
                if field.timestamp {
                    format_timestamp(&text)
                } else {
                    text
                }
            })
            .unwrap_or_default();
        section.push(field.label, value);
    }

    Ok(section)
}

/// `None` cuando el paquete es válido pero no trae `core.xml`.
fn read_core_xml(path: &Path) -> Result<Option<Element>, ExtractError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut core_file = match archive.by_name(CORE_PROPERTIES_PATH) {
        Ok(core_file) => core_file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let mut contents = String::new();
    core_file.read_to_string(&mut contents)?;
    Ok(Some(Element::parse(contents.as_bytes())?))
}

fn find_child_text(root: &Element, local_name: &str, namespace: &str) -> Option<String> {
    root.children.iter().find_map(|node| match node {
        XMLNode::Element(child)
            if child.name == local_name && child.namespace.as_deref() == Some(namespace) =>
        {
            Some(element_text_content(child))
        }
        _ => None,
    })
}

fn element_text_content(element: &Element) -> String {
    let mut content = String::new();
    for node in &element.children {
        if let XMLNode::Text(text) = node {
            content.push_str(text);
        }
    }
    content.trim().to_string()
}
