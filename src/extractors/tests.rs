use super::{catch_panic, extract};
use crate::error::ExtractError;
use crate::metadata::render;
use crate::sniffer::{FormatCategory, classify};
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Document, Object, dictionary};
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::tempdir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const ERROR_PREFIX: &str = "Error al extraer metadata: ";

fn run_pipeline(path: &Path) -> String {
    render(&extract(path, classify(path)))
}

fn assert_diagnostic_failure(rendered: &str) {
    assert!(
        rendered.starts_with(ERROR_PREFIX),
        "se esperaba un mensaje de error, se obtuvo: {rendered}"
    );
    assert!(
        !rendered[ERROR_PREFIX.len()..].trim().is_empty(),
        "el mensaje de error debería incluir el diagnóstico"
    );
    assert_eq!(rendered.lines().count(), 1);
}

// === Imágenes ===

#[test]
fn image_tags_render_in_read_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("camara.jpg");
    write_jpeg_with_exif(&source)?;

    let result = extract(&source, FormatCategory::Image);
    let section = result.as_ref().map_err(|err| err.to_string())?;
    assert_eq!(section.entries.len(), 2);

    let rendered = render(&result);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Make: "));
    assert!(lines[0].contains("Acme"));
    assert!(lines[1].starts_with("Model: "));
    assert!(lines[1].contains("Cam 1"));

    Ok(())
}

#[test]
fn image_without_exif_reports_empty_marker() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let png = dir.path().join("plano.png");
    let bmp = dir.path().join("plano.bmp");
    sample_image().save_with_format(&png, ImageFormat::Png)?;
    sample_image().save_with_format(&bmp, ImageFormat::Bmp)?;

    for source in [png, bmp] {
        let result = extract(&source, FormatCategory::Image);
        assert!(
            matches!(&result, Ok(section) if section.is_empty()),
            "{} debería extraerse sin entradas",
            source.display()
        );
        assert_eq!(render(&result), "Sin datos EXIF.");
    }

    Ok(())
}

#[test]
fn corrupt_image_is_a_failure_with_diagnostic() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("roto.jpg");
    fs::write(&source, b"\xFF\xD8\xFF\xE0 esto no es un jpeg completo")?;

    assert_diagnostic_failure(&run_pipeline(&source));
    Ok(())
}

// === PDF ===

#[test]
fn pdf_info_entries_keep_dictionary_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("informe.pdf");
    write_pdf(
        &source,
        Some(dictionary! {
            "Title" => Object::string_literal("Informe anual"),
            "Author" => Object::string_literal("Ana Pérez"),
            "Producer" => Object::string_literal("metalens"),
        }),
    )?;

    assert_eq!(
        run_pipeline(&source),
        "/Title: Informe anual\n/Author: Ana Pérez\n/Producer: metalens"
    );
    Ok(())
}

#[test]
fn pdf_without_info_reports_empty_marker() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("vacio.pdf");
    write_pdf(&source, None)?;

    let result = extract(&source, FormatCategory::Pdf);
    assert!(matches!(&result, Ok(section) if section.is_empty()));
    assert_eq!(render(&result), "El PDF no contiene metadata.");
    Ok(())
}

#[test]
fn truncated_pdf_is_a_failure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("truncado.pdf");
    fs::write(&source, b"%PDF-1.5\n1 0 obj\n<< /Type /Catalog")?;

    assert_diagnostic_failure(&run_pipeline(&source));
    Ok(())
}

// === Office ===

#[test]
fn document_properties_always_emit_three_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("carta.docx");
    write_docx(
        &source,
        Some(&core_xml(&[
            "<dc:title>Carta de presentación</dc:title>",
            "<dc:creator>Autor Prueba</dc:creator>",
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">2024-01-01T00:00:00Z</dcterms:created>",
        ])),
    )?;

    assert_eq!(
        run_pipeline(&source),
        "Título: Carta de presentación\nAutor: Autor Prueba\nCreado: 2024-01-01 00:00:00+00:00"
    );
    Ok(())
}

#[test]
fn document_without_author_keeps_empty_line() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("anonimo.docx");
    write_docx(&source, Some(&core_xml(&["<dc:title>Sin firma</dc:title>"])))?;

    let result = extract(&source, FormatCategory::Document);
    let section = result.as_ref().map_err(|err| err.to_string())?;
    assert_eq!(section.entries.len(), 3);
    assert_eq!(section.get("Autor"), Some(""));
    assert_eq!(section.get("Creado"), Some(""));
    assert_eq!(render(&result), "Título: Sin firma\nAutor: \nCreado: ");
    Ok(())
}

#[test]
fn package_without_core_properties_emits_empty_values() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("minimo.docx");
    write_docx(&source, None)?;

    assert_eq!(run_pipeline(&source), "Título: \nAutor: \nCreado: ");
    Ok(())
}

#[test]
fn document_that_is_not_a_zip_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("falso.docx");
    fs::write(&source, "texto plano con extensión equivocada")?;

    assert_diagnostic_failure(&run_pipeline(&source));
    Ok(())
}

#[test]
fn malformed_core_xml_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("dañado.docx");
    write_docx(&source, Some("<cp:coreProperties><dc:title>sin cerrar"))?;

    assert_diagnostic_failure(&run_pipeline(&source));
    Ok(())
}

#[test]
fn spreadsheet_reports_title_creator_and_creation() -> Result<(), Box<dyn std::error::Error>> {
    use rust_xlsxwriter::{DocProperties, Workbook};

    let dir = tempdir()?;
    let source = dir.path().join("presupuesto.xlsx");

    let mut workbook = Workbook::new();
    let properties = DocProperties::new()
        .set_title("Presupuesto 2024")
        .set_author("Luis Gómez");
    workbook.set_properties(&properties);
    workbook.add_worksheet();
    workbook.save(&source)?;

    let result = extract(&source, FormatCategory::Spreadsheet);
    let section = result.as_ref().map_err(|err| err.to_string())?;
    assert_eq!(section.entries.len(), 3);
    assert_eq!(section.entries[0].key, "Título");
    assert_eq!(section.get("Título"), Some("Presupuesto 2024"));
    assert_eq!(section.get("Autor"), Some("Luis Gómez"));
    let created = section.get("Creado").unwrap_or_default();
    assert!(created.ends_with("+00:00"), "fecha inesperada: {created}");

    Ok(())
}

// === Video ===

#[test]
fn mp4_reports_duration_fps_and_resolution() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("clip.mp4");

    let mut data = mp4_box(b"ftyp", b"isom\0\0\x02\0isommp41");
    data.extend(mp4_box(b"mdat", &[0; 32]));
    data.extend(sample_moov());
    fs::write(&source, data)?;

    assert_eq!(
        run_pipeline(&source),
        "Duración: 2 segundos\nFPS: 30\nResolución: 640x360"
    );
    Ok(())
}

#[test]
fn mov_without_ftyp_is_detected_from_boxes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("clip.MOV");

    let mut data = mp4_box(b"wide", &[]);
    data.extend(sample_moov());
    fs::write(&source, data)?;

    let result = extract(&source, classify(&source));
    let section = result.as_ref().map_err(|err| err.to_string())?;
    assert_eq!(section.get("Resolución"), Some("640x360"));
    Ok(())
}

#[test]
fn mp4_without_video_track_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("solo-audio.mp4");

    let mut moov = mvhd(1000, 2000);
    moov.extend(trak(2, b"soun", 0, 0, 44100, 88200, &[(86, 1024)]));
    let mut data = mp4_box(b"ftyp", b"M4A \0\0\0\0");
    data.extend(mp4_box(b"moov", &moov));
    fs::write(&source, data)?;

    let rendered = run_pipeline(&source);
    assert_diagnostic_failure(&rendered);
    assert!(rendered.contains("pista de video"));
    Ok(())
}

#[test]
fn truncated_mp4_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("cortado.mp4");

    let mut data = mp4_box(b"ftyp", b"isom\0\0\x02\0");
    data.extend_from_slice(&500_u32.to_be_bytes());
    data.extend_from_slice(b"moov");
    data.extend_from_slice(&[0; 10]);
    fs::write(&source, data)?;

    let rendered = run_pipeline(&source);
    assert_diagnostic_failure(&rendered);
    assert!(rendered.contains("truncado"));
    Ok(())
}

#[test]
fn fragmented_mp4_reads_rate_from_fragments() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("stream.mp4");

    // mvhd sin duración y stts vacío: las muestras viven en los moof.
    let mut data = mp4_box(b"ftyp", b"iso6\0\0\x02\0iso6mp41");
    data.extend(fragmented_moov(Some(4000)));
    data.extend(fragment(1, 1, &trun_with_default(50)));
    data.extend(mp4_box(b"mdat", &[0; 16]));
    data.extend(fragment(2, 1, &trun_with_durations(&[512; 50])));
    data.extend(mp4_box(b"mdat", &[0; 16]));
    fs::write(&source, data)?;

    assert_eq!(
        run_pipeline(&source),
        "Duración: 4 segundos\nFPS: 25\nResolución: 1280x720"
    );
    Ok(())
}

#[test]
fn fragmented_mp4_without_mehd_sums_fragment_durations() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("sin-mehd.mp4");

    let mut data = mp4_box(b"ftyp", b"iso6\0\0\x02\0");
    data.extend(fragmented_moov(None));
    data.extend(fragment(1, 1, &trun_with_default(100)));
    // Fragmento de otra pista: no cuenta para la velocidad de fotogramas.
    data.extend(fragment(2, 2, &trun_with_durations(&[1024; 10])));
    fs::write(&source, data)?;

    assert_eq!(
        run_pipeline(&source),
        "Duración: 4 segundos\nFPS: 25\nResolución: 1280x720"
    );
    Ok(())
}

#[test]
fn overflowing_stts_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("hostil.mp4");

    let mut moov = mvhd(1000, 2000);
    moov.extend(trak(
        1,
        b"vide",
        640,
        360,
        15360,
        30720,
        &[(u32::MAX, u32::MAX), (u32::MAX, u32::MAX)],
    ));
    let mut data = mp4_box(b"ftyp", b"isom\0\0\x02\0");
    data.extend(mp4_box(b"moov", &moov));
    fs::write(&source, data)?;

    let rendered = run_pipeline(&source);
    assert_diagnostic_failure(&rendered);
    assert!(rendered.contains("tabla stts inválida"), "{rendered}");
    Ok(())
}

#[test]
fn avi_prefers_stream_rate() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("clip.avi");
    fs::write(&source, avi_file(40_000, 250, 320, 240, Some((1, 25, 250))))?;

    assert_eq!(
        run_pipeline(&source),
        "Duración: 10 segundos\nFPS: 25\nResolución: 320x240"
    );
    Ok(())
}

#[test]
fn avi_falls_back_to_main_header() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("viejo.avi");
    fs::write(&source, avi_file(33_333, 90, 640, 480, None))?;

    assert_eq!(
        run_pipeline(&source),
        "Duración: 3 segundos\nFPS: 30\nResolución: 640x480"
    );
    Ok(())
}

#[test]
fn video_with_unknown_container_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("falso.mp4");
    fs::write(&source, b"no hay cajas aqui, solo texto")?;

    assert_diagnostic_failure(&run_pipeline(&source));
    Ok(())
}

// === Despacho ===

#[test]
fn unsupported_files_render_fixed_message() {
    assert_eq!(
        run_pipeline(Path::new("notas.txt")),
        "Formato de archivo no soportado."
    );
}

#[test]
fn missing_file_is_a_failure_not_a_panic() {
    for name in ["no-existe.jpg", "no-existe.pdf", "no-existe.docx", "no-existe.avi"] {
        assert_diagnostic_failure(&run_pipeline(Path::new(name)));
    }
}

#[test]
fn panic_with_static_message_becomes_failure() {
    let result = catch_panic(|| panic!("cabecera imposible"));

    assert!(matches!(
        &result,
        Err(ExtractError::Panicked(message)) if message == "cabecera imposible"
    ));
    let rendered = render(&result);
    assert!(rendered.starts_with("Error al extraer metadata: el lector se interrumpió"));
    assert_eq!(rendered.lines().count(), 1);
}

#[test]
fn panic_with_formatted_message_keeps_the_text() {
    let result = catch_panic(|| panic!("caja {} rota\nen el byte {}", "stts", 42));

    assert!(matches!(
        &result,
        Err(ExtractError::Panicked(message)) if message == "caja stts rota\nen el byte 42"
    ));
    let rendered = render(&result);
    assert!(rendered.starts_with("Error al extraer metadata: el lector se interrumpió"));
    assert_eq!(rendered.lines().count(), 1);
}

#[test]
fn panic_with_opaque_payload_is_reported() {
    let result = catch_panic(|| std::panic::panic_any(7_u32));

    assert!(matches!(
        &result,
        Err(ExtractError::Panicked(message)) if message == "error desconocido"
    ));
}

// === Fixtures ===

fn sample_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 30, 30])))
}

fn write_jpeg_with_exif(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let make = Field {
        tag: Tag::Make,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"Acme".to_vec()]),
    };
    let model = Field {
        tag: Tag::Model,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"Cam 1".to_vec()]),
    };
    let mut writer = Writer::new();
    writer.push_field(&make);
    writer.push_field(&model);
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false)?;
    let tiff = tiff.into_inner();

    let mut jpeg = Vec::new();
    sample_image().write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

    // APP1 justo después de SOI.
    let segment_len = u16::try_from(2 + 6 + tiff.len())?;
    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&[0xFF, 0xE1]);
    bytes.extend_from_slice(&segment_len.to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&tiff);
    bytes.extend_from_slice(&jpeg[2..]);

    fs::write(path, bytes)?;
    Ok(())
}

fn write_pdf(path: &Path, info: Option<lopdf::Dictionary>) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(info) = info {
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    doc.save(path)?;
    Ok(())
}

fn core_xml(fields: &[&str]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/"
                   xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    {}
</cp:coreProperties>
"#,
        fields.join("\n    ")
    )
}

fn write_docx(path: &Path, core: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:body>
        <w:p><w:r><w:t>Documento de prueba</w:t></w:r></w:p>
    </w:body>
</w:document>
"#;

    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Stored);

    writer.start_file("word/document.xml", options)?;
    writer.write_all(DOCUMENT_XML.as_bytes())?;

    if let Some(core) = core {
        writer.start_file("docProps/core.xml", options)?;
        writer.write_all(core.as_bytes())?;
    }

    writer.finish()?;
    Ok(())
}

fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    data.extend_from_slice(kind);
    data.extend_from_slice(payload);
    data
}

fn full_box_payload(fields: &[(usize, u32)], len: usize) -> Vec<u8> {
    let mut payload = vec![0_u8; len];
    for &(offset, value) in fields {
        payload[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }
    payload
}

fn mvhd(timescale: u32, duration: u32) -> Vec<u8> {
    mp4_box(b"mvhd", &full_box_payload(&[(12, timescale), (16, duration)], 100))
}

fn trak(
    track_id: u32,
    handler: &[u8; 4],
    width: u32,
    height: u32,
    timescale: u32,
    duration: u32,
    stts: &[(u32, u32)],
) -> Vec<u8> {
    let tkhd = mp4_box(
        b"tkhd",
        &full_box_payload(&[(12, track_id), (76, width << 16), (80, height << 16)], 84),
    );

    let mdhd = mp4_box(
        b"mdhd",
        &full_box_payload(&[(12, timescale), (16, duration)], 24),
    );

    let mut hdlr = vec![0_u8; 8];
    hdlr.extend_from_slice(handler);
    hdlr.extend_from_slice(&[0; 13]);
    let hdlr = mp4_box(b"hdlr", &hdlr);

    let mut stts_payload = vec![0_u8; 4];
    stts_payload.extend_from_slice(&(stts.len() as u32).to_be_bytes());
    for &(count, delta) in stts {
        stts_payload.extend_from_slice(&count.to_be_bytes());
        stts_payload.extend_from_slice(&delta.to_be_bytes());
    }
    let stbl = mp4_box(b"stbl", &mp4_box(b"stts", &stts_payload));
    let minf = mp4_box(b"minf", &stbl);

    let mut mdia = mdhd;
    mdia.extend(hdlr);
    mdia.extend(minf);

    let mut trak = tkhd;
    trak.extend(mp4_box(b"mdia", &mdia));
    mp4_box(b"trak", &trak)
}

/// Pista de video 1280x720 (escala 12800) sin muestras en `stts`, con `trex` de 512 ticks.
fn fragmented_moov(fragment_duration: Option<u32>) -> Vec<u8> {
    let mut moov = mvhd(1000, 0);
    moov.extend(trak(1, b"vide", 1280, 720, 12800, 0, &[]));
    moov.extend(trak(2, b"soun", 0, 0, 48000, 0, &[]));

    let mut mvex = Vec::new();
    if let Some(duration) = fragment_duration {
        mvex.extend(mp4_box(b"mehd", &full_box_payload(&[(4, duration)], 8)));
    }
    mvex.extend(mp4_box(
        b"trex",
        &full_box_payload(&[(4, 1), (8, 1), (12, 512)], 24),
    ));
    mvex.extend(mp4_box(
        b"trex",
        &full_box_payload(&[(4, 2), (8, 1), (12, 1024)], 24),
    ));
    moov.extend(mp4_box(b"mvex", &mvex));
    mp4_box(b"moov", &moov)
}

fn fragment(sequence: u32, track_id: u32, trun: &[u8]) -> Vec<u8> {
    let mfhd = mp4_box(b"mfhd", &full_box_payload(&[(4, sequence)], 8));
    // default-base-is-moof, sin campos opcionales.
    let tfhd = mp4_box(
        b"tfhd",
        &full_box_payload(&[(0, 0x0002_0000), (4, track_id)], 8),
    );

    let mut traf = tfhd;
    traf.extend(mp4_box(b"trun", trun));
    let mut moof = mfhd;
    moof.extend(mp4_box(b"traf", &traf));
    mp4_box(b"moof", &moof)
}

/// `trun` con data_offset y sin duraciones: se usa la de `trex`.
fn trun_with_default(sample_count: u32) -> Vec<u8> {
    full_box_payload(&[(0, 0x0000_0001), (4, sample_count), (8, 0)], 12)
}

/// `trun` con duración y tamaño por muestra.
fn trun_with_durations(durations: &[u32]) -> Vec<u8> {
    let mut payload = full_box_payload(&[(0, 0x0000_0300), (4, durations.len() as u32)], 8);
    for &duration in durations {
        payload.extend_from_slice(&duration.to_be_bytes());
        payload.extend_from_slice(&64_u32.to_be_bytes());
    }
    payload
}

/// Dos segundos a 30 fps en 640x360, con una pista de audio delante.
fn sample_moov() -> Vec<u8> {
    let mut moov = mvhd(1000, 2000);
    moov.extend(trak(2, b"soun", 0, 0, 44100, 88200, &[(86, 1024)]));
    moov.extend(trak(1, b"vide", 640, 360, 15360, 30720, &[(60, 512)]));
    mp4_box(b"moov", &moov)
}

fn riff_chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = id.to_vec();
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        data.push(0);
    }
    data
}

fn riff_list(list_type: &[u8; 4], children: &[u8]) -> Vec<u8> {
    let mut payload = list_type.to_vec();
    payload.extend_from_slice(children);
    riff_chunk(b"LIST", &payload)
}

fn avi_file(
    micro_sec_per_frame: u32,
    total_frames: u32,
    width: u32,
    height: u32,
    stream: Option<(u32, u32, u32)>,
) -> Vec<u8> {
    let mut avih = vec![0_u8; 56];
    for (offset, value) in [
        (0, micro_sec_per_frame),
        (16, total_frames),
        (24, 1),
        (32, width),
        (36, height),
    ] {
        avih[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    let mut hdrl = riff_chunk(b"avih", &avih);
    if let Some((scale, rate, length)) = stream {
        let mut strh = vec![0_u8; 56];
        strh[0..4].copy_from_slice(b"vids");
        strh[4..8].copy_from_slice(b"MJPG");
        for (offset, value) in [(20, scale), (24, rate), (32, length)] {
            strh[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        hdrl.extend(riff_list(b"strl", &riff_chunk(b"strh", &strh)));
    }

    let mut body = b"AVI ".to_vec();
    body.extend(riff_list(b"hdrl", &hdrl));
    body.extend(riff_list(b"movi", &[]));
    riff_chunk(b"RIFF", &body)
}
