//! Extracción de etiquetas EXIF en imágenes.

use crate::error::ExtractError;
use crate::metadata::report::{MetadataResult, MetadataSection};
use crate::sniffer::FormatCategory;
use exif::{Exif, In};
use image::{ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub fn extract_image_metadata(path: &Path) -> MetadataResult {
    let mut section = MetadataSection::new(FormatCategory::Image);

    // Un contenedor corrupto debe fallar aunque no tenga bloque EXIF.
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let (width, height) = reader.into_dimensions()?;
    debug!(?format, width, height, "contenedor de imagen válido");

    // BMP y GIF no tienen dónde guardar EXIF.
    if matches!(format, Some(ImageFormat::Bmp | ImageFormat::Gif)) {
        return Ok(section);
    }

    let Some(exif) = read_exif(path)? else {
        return Ok(section);
    };

    for field in exif.fields().filter(|field| field.ifd_num == In::PRIMARY) {
        section.push(
            field.tag.to_string(),
            field.display_value().with_unit(&exif).to_string(),
        );
    }

    Ok(section)
}

fn read_exif(path: &Path) -> Result<Option<Exif>, ExtractError> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(&file);
    match exif::Reader::new().read_from_container(&mut bufreader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(error) => Err(error.into()),
    }
}
