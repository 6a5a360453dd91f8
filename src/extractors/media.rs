//! Extracción de duración, velocidad de fotogramas y resolución de videos.

use crate::error::ExtractError;
use crate::formatting::{format_decimal, format_seconds};
use crate::metadata::report::{MetadataResult, MetadataSection};
use crate::sniffer::FormatCategory;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Tope para cargar en memoria cabeceras (`moov`, `hdrl`); los datos de medios nunca se leen.
const HEADER_SIZE_LIMIT: u64 = 64 * 1024 * 1024;

const ISO_BMFF_TOP_LEVEL: [&[u8; 4]; 8] = [
    b"ftyp", b"styp", b"moov", b"mdat", b"free", b"skip", b"wide", b"pnot",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ContainerKind {
    IsoBmff,
    Avi,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct VideoProperties {
    duration_seconds: f64,
    frame_rate: f64,
    width: u32,
    height: u32,
}

pub fn extract_video_metadata(path: &Path) -> MetadataResult {
    let mut reader = BufReader::new(File::open(path)?);

    let kind = detect_container(&mut reader)?;
    debug!(?kind, "contenedor de video detectado");

    let properties = match kind {
        ContainerKind::IsoBmff => read_mp4_properties(&mut reader)?,
        ContainerKind::Avi => read_avi_properties(&mut reader)?,
    };

    let mut section = MetadataSection::new(FormatCategory::Video);
    section.push("Duración", format_seconds(properties.duration_seconds));
    section.push("FPS", format_decimal(properties.frame_rate));
    section.push(
        "Resolución",
        format!("{}x{}", properties.width, properties.height),
    );
    Ok(section)
}

fn detect_container<R: Read + Seek>(reader: &mut R) -> Result<ContainerKind, ExtractError> {
    let mut header = [0_u8; 12];
    read_exact_or_truncated(reader, &mut header, "la cabecera del archivo")?;
    reader.seek(SeekFrom::Start(0))?;

    if &header[0..4] == b"RIFF" && &header[8..12] == b"AVI " {
        return Ok(ContainerKind::Avi);
    }
    if ISO_BMFF_TOP_LEVEL
        .iter()
        .any(|kind| &header[4..8] == kind.as_slice())
    {
        return Ok(ContainerKind::IsoBmff);
    }
    Err(ExtractError::container("contenedor de video no reconocido"))
}

// === MP4/MOV ===

#[derive(Default)]
struct TrackInfo {
    track_id: u32,
    handler: Option<[u8; 4]>,
    width: u32,
    height: u32,
    timescale: u32,
    duration: u64,
    sample_count: u64,
    sample_delta_total: u64,
}

impl TrackInfo {
    fn is_video(&self) -> bool {
        self.handler.as_ref() == Some(b"vide")
    }

    /// Con `stts` vacío (MP4 fragmentado) se usan los fragmentos y, si no hay, la duración por defecto de `trex`.
    fn frame_rate(&self, fragments: &FragmentTotals, default_sample_duration: u32) -> Option<f64> {
        if self.timescale == 0 {
            return None;
        }
        let timescale = self.timescale as f64;

        if self.sample_count > 0 {
            let ticks = if self.sample_delta_total > 0 {
                self.sample_delta_total
            } else {
                self.duration
            };
            return (ticks > 0).then(|| self.sample_count as f64 * timescale / ticks as f64);
        }
        if fragments.sample_count > 0 && fragments.ticks > 0 {
            return Some(fragments.sample_count as f64 * timescale / fragments.ticks as f64);
        }
        (default_sample_duration > 0).then(|| timescale / default_sample_duration as f64)
    }
}

#[derive(Clone, Copy)]
struct MovieHeader {
    timescale: u32,
    duration: u64,
}

/// Contenido de `mvex`: presente sólo en MP4 fragmentados.
#[derive(Default)]
struct MovieExtends {
    fragment_duration: u64,
    /// `default_sample_duration` de cada `trex`, por identificador de pista.
    default_durations: Vec<(u32, u32)>,
}

impl MovieExtends {
    fn default_duration(&self, track_id: u32) -> u32 {
        self.default_durations
            .iter()
            .find(|(id, _)| *id == track_id)
            .map_or(0, |(_, duration)| *duration)
    }
}

struct MovieInfo {
    header: Option<MovieHeader>,
    video: TrackInfo,
    extends: Option<MovieExtends>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct FragmentTotals {
    sample_count: u64,
    ticks: u64,
}

impl FragmentTotals {
    fn add(&mut self, run: FragmentTotals) -> Result<(), ExtractError> {
        self.sample_count = self
            .sample_count
            .checked_add(run.sample_count)
            .ok_or_else(invalid_trun)?;
        self.ticks = self.ticks.checked_add(run.ticks).ok_or_else(invalid_trun)?;
        Ok(())
    }
}

struct BoxHeader {
    kind: [u8; 4],
    /// `None` cuando la caja llega hasta el final del archivo.
    payload_size: Option<u64>,
}

fn read_mp4_properties<R: Read + Seek>(reader: &mut R) -> Result<VideoProperties, ExtractError> {
    let moov = loop {
        let Some(header) = read_box_header(reader)? else {
            return Err(ExtractError::container(
                "el archivo no contiene la caja moov",
            ));
        };
        if &header.kind == b"moov" {
            break read_box_payload(reader, &header)?;
        }
        match header.payload_size {
            Some(size) => {
                reader.seek(SeekFrom::Current(seek_offset(size)?))?;
            }
            None => {
                return Err(ExtractError::container(
                    "el archivo no contiene la caja moov",
                ));
            }
        }
    };

    let movie = parse_mp4_moov(&moov)?;
    let fragments = match &movie.extends {
        Some(extends) => {
            let default_duration = extends.default_duration(movie.video.track_id);
            read_fragment_totals(reader, movie.video.track_id, default_duration)?
        }
        None => FragmentTotals::default(),
    };
    debug!(?fragments, "fragmentos de video leídos");

    movie_properties(&movie, &fragments)
}

fn movie_properties(
    movie: &MovieInfo,
    fragments: &FragmentTotals,
) -> Result<VideoProperties, ExtractError> {
    let track = &movie.video;
    let default_duration = movie
        .extends
        .as_ref()
        .map_or(0, |extends| extends.default_duration(track.track_id));

    let duration_seconds = movie
        .header
        .and_then(|header| seconds(header.duration, header.timescale))
        .or_else(|| {
            let header = movie.header?;
            let extends = movie.extends.as_ref()?;
            seconds(extends.fragment_duration, header.timescale)
        })
        .or_else(|| seconds(track.duration, track.timescale))
        .or_else(|| seconds(fragments.ticks, track.timescale))
        .ok_or_else(|| ExtractError::container("no se pudo determinar la duración"))?;
    let frame_rate = track
        .frame_rate(fragments, default_duration)
        .ok_or_else(|| {
            ExtractError::container("no se pudo determinar la velocidad de fotogramas")
        })?;

    Ok(VideoProperties {
        duration_seconds,
        frame_rate,
        width: track.width,
        height: track.height,
    })
}

fn seconds(ticks: u64, timescale: u32) -> Option<f64> {
    (ticks > 0 && timescale > 0).then(|| ticks as f64 / timescale as f64)
}

fn parse_mp4_moov(data: &[u8]) -> Result<MovieInfo, ExtractError> {
    let mut header = None;
    let mut video_track = None;
    let mut extends = None;

    for (kind, payload) in child_boxes(data)? {
        match &kind {
            b"mvhd" => header = parse_mvhd(payload)?,
            b"trak" if video_track.is_none() => {
                let track = parse_mp4_trak(payload)?;
                if track.is_video() {
                    video_track = Some(track);
                }
            }
            b"mvex" => extends = Some(parse_mvex(payload)?),
            _ => {}
        }
    }

    let video = video_track
        .ok_or_else(|| ExtractError::container("el archivo no contiene una pista de video"))?;

    Ok(MovieInfo {
        header,
        video,
        extends,
    })
}

fn parse_mvhd(payload: &[u8]) -> Result<Option<MovieHeader>, ExtractError> {
    let (timescale, duration) = match payload.first() {
        Some(1) => (be_u32(payload, 20)?, be_u64(payload, 24)?),
        Some(_) => (be_u32(payload, 12)?, be_u32(payload, 16)? as u64),
        None => return Err(ExtractError::container("caja mvhd vacía")),
    };
    Ok((timescale > 0).then_some(MovieHeader {
        timescale,
        duration,
    }))
}

fn parse_mvex(data: &[u8]) -> Result<MovieExtends, ExtractError> {
    let mut extends = MovieExtends::default();
    for (kind, payload) in child_boxes(data)? {
        match &kind {
            b"mehd" => {
                extends.fragment_duration = match payload.first() {
                    Some(1) => be_u64(payload, 4)?,
                    _ => be_u32(payload, 4)? as u64,
                };
            }
            b"trex" => {
                let track_id = be_u32(payload, 4)?;
                let default_duration = be_u32(payload, 12)?;
                extends.default_durations.push((track_id, default_duration));
            }
            _ => {}
        }
    }
    Ok(extends)
}

fn parse_mp4_trak(data: &[u8]) -> Result<TrackInfo, ExtractError> {
    let mut track = TrackInfo::default();
    for (kind, payload) in child_boxes(data)? {
        match &kind {
            b"tkhd" => {
                // Ancho y alto son los últimos 8 bytes, en punto fijo 16.16.
                if payload.len() < 84 {
                    return Err(ExtractError::container("caja tkhd truncada"));
                }
                track.track_id = match payload.first() {
                    Some(1) => be_u32(payload, 20)?,
                    _ => be_u32(payload, 12)?,
                };
                let end = payload.len();
                track.width = be_u32(payload, end - 8)? >> 16;
                track.height = be_u32(payload, end - 4)? >> 16;
            }
            b"mdia" => parse_mp4_mdia(payload, &mut track)?,
            _ => {}
        }
    }
    Ok(track)
}

fn parse_mp4_mdia(data: &[u8], track: &mut TrackInfo) -> Result<(), ExtractError> {
    for (kind, payload) in child_boxes(data)? {
        match &kind {
            b"mdhd" => {
                let (timescale, duration) = match payload.first() {
                    Some(1) => (be_u32(payload, 20)?, be_u64(payload, 24)?),
                    _ => (be_u32(payload, 12)?, be_u32(payload, 16)? as u64),
                };
                track.timescale = timescale;
                track.duration = duration;
            }
            b"hdlr" => {
                let handler = payload
                    .get(8..12)
                    .ok_or_else(|| ExtractError::container("caja hdlr truncada"))?;
                track.handler = Some([handler[0], handler[1], handler[2], handler[3]]);
            }
            b"minf" => {
                for (kind, payload) in child_boxes(payload)? {
                    if &kind == b"stbl" {
                        parse_mp4_stbl(payload, track)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_mp4_stbl(data: &[u8], track: &mut TrackInfo) -> Result<(), ExtractError> {
    for (kind, payload) in child_boxes(data)? {
        if &kind != b"stts" {
            continue;
        }
        let entry_count = be_u32(payload, 4)? as usize;
        for index in 0..entry_count {
            let offset = 8 + index * 8;
            let count = be_u32(payload, offset)? as u64;
            let delta = be_u32(payload, offset + 4)? as u64;
            track.sample_count = track
                .sample_count
                .checked_add(count)
                .ok_or_else(invalid_stts)?;
            track.sample_delta_total = count
                .checked_mul(delta)
                .and_then(|ticks| track.sample_delta_total.checked_add(ticks))
                .ok_or_else(invalid_stts)?;
        }
    }
    Ok(())
}

fn invalid_stts() -> ExtractError {
    ExtractError::container("tabla stts inválida")
}

fn invalid_trun() -> ExtractError {
    ExtractError::container("tabla trun inválida")
}

/// Suma las muestras de la pista en todas las cajas `moof` que siguen a `moov`.
fn read_fragment_totals<R: Read + Seek>(
    reader: &mut R,
    track_id: u32,
    default_duration: u32,
) -> Result<FragmentTotals, ExtractError> {
    let mut totals = FragmentTotals::default();
    while let Some(header) = read_box_header(reader)? {
        let Some(size) = header.payload_size else {
            break;
        };
        if &header.kind == b"moof" {
            let moof = read_limited(reader, size, "la caja moof")?;
            parse_moof(&moof, track_id, default_duration, &mut totals)?;
        } else {
            reader.seek(SeekFrom::Current(seek_offset(size)?))?;
        }
    }
    Ok(totals)
}

fn parse_moof(
    data: &[u8],
    track_id: u32,
    default_duration: u32,
    totals: &mut FragmentTotals,
) -> Result<(), ExtractError> {
    for (kind, traf) in child_boxes(data)? {
        if &kind != b"traf" {
            continue;
        }
        let mut matches_track = false;
        let mut sample_duration = default_duration;
        for (kind, payload) in child_boxes(traf)? {
            match &kind {
                b"tfhd" => {
                    let flags = be_u32(payload, 0)? & 0x00FF_FFFF;
                    matches_track = be_u32(payload, 4)? == track_id;
                    let mut offset = 8;
                    if flags & 0x01 != 0 {
                        offset += 8; // base_data_offset
                    }
                    if flags & 0x02 != 0 {
                        offset += 4; // sample_description_index
                    }
                    if flags & 0x08 != 0 {
                        sample_duration = be_u32(payload, offset)?;
                    }
                }
                b"trun" if matches_track => totals.add(parse_trun(payload, sample_duration)?)?,
                _ => {}
            }
        }
    }
    Ok(())
}

fn parse_trun(payload: &[u8], default_duration: u32) -> Result<FragmentTotals, ExtractError> {
    let flags = be_u32(payload, 0)? & 0x00FF_FFFF;
    let sample_count = be_u32(payload, 4)? as u64;

    if flags & 0x100 == 0 {
        return Ok(FragmentTotals {
            sample_count,
            ticks: sample_count * default_duration as u64,
        });
    }

    let mut offset = 8;
    if flags & 0x001 != 0 {
        offset += 4; // data_offset
    }
    if flags & 0x004 != 0 {
        offset += 4; // first_sample_flags
    }
    let stride = [0x100, 0x200, 0x400, 0x800]
        .iter()
        .filter(|flag| flags & **flag != 0)
        .count()
        * 4;

    let mut ticks = 0_u64;
    for index in 0..sample_count as usize {
        let duration = be_u32(payload, offset + index * stride)? as u64;
        ticks = ticks.checked_add(duration).ok_or_else(invalid_trun)?;
    }
    Ok(FragmentTotals {
        sample_count,
        ticks,
    })
}

fn read_box_header<R: Read>(reader: &mut R) -> Result<Option<BoxHeader>, ExtractError> {
    let mut header = [0_u8; 8];
    match reader.read_exact(&mut header) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(error) => return Err(error.into()),
    }
    let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as u64;
    let kind = [header[4], header[5], header[6], header[7]];

    let payload_size = match size {
        0 => None,
        1 => {
            let mut large = [0_u8; 8];
            read_exact_or_truncated(reader, &mut large, "la cabecera de caja extendida")?;
            let large = u64::from_be_bytes(large);
            Some(large.checked_sub(16).ok_or_else(|| invalid_box_size(&kind))?)
        }
        _ => Some(size.checked_sub(8).ok_or_else(|| invalid_box_size(&kind))?),
    };

    Ok(Some(BoxHeader { kind, payload_size }))
}

fn read_box_payload<R: Read>(reader: &mut R, header: &BoxHeader) -> Result<Vec<u8>, ExtractError> {
    match header.payload_size {
        Some(size) => read_limited(reader, size, "la caja moov"),
        None => {
            let mut payload = Vec::new();
            reader
                .by_ref()
                .take(HEADER_SIZE_LIMIT + 1)
                .read_to_end(&mut payload)?;
            if payload.len() as u64 > HEADER_SIZE_LIMIT {
                return Err(ExtractError::container("la caja moov es demasiado grande"));
            }
            Ok(payload)
        }
    }
}

/// Divide el contenido de una caja contenedora en sus cajas hijas.
fn child_boxes(data: &[u8]) -> Result<Vec<([u8; 4], &[u8])>, ExtractError> {
    let mut boxes = Vec::new();
    let mut offset = 0_usize;
    while data.len() - offset >= 8 {
        let size = be_u32(data, offset)? as u64;
        let kind = [
            data[offset + 4],
            data[offset + 5],
            data[offset + 6],
            data[offset + 7],
        ];
        let (header_len, total) = match size {
            0 => (8, (data.len() - offset) as u64),
            1 => (16, be_u64(data, offset + 8)?),
            _ => (8, size),
        };
        if total < header_len as u64 || total > (data.len() - offset) as u64 {
            return Err(invalid_box_size(&kind));
        }
        let total = total as usize;
        boxes.push((kind, &data[offset + header_len..offset + total]));
        offset += total;
    }
    Ok(boxes)
}

fn invalid_box_size(kind: &[u8; 4]) -> ExtractError {
    ExtractError::container(format!(
        "tamaño inválido en la caja {}",
        String::from_utf8_lossy(kind)
    ))
}

// === AVI ===

#[derive(Default)]
struct AviMainHeader {
    micro_sec_per_frame: u32,
    total_frames: u32,
    width: u32,
    height: u32,
}

struct AviStreamHeader {
    scale: u32,
    rate: u32,
    length: u32,
}

fn read_avi_properties<R: Read + Seek>(reader: &mut R) -> Result<VideoProperties, ExtractError> {
    reader.seek(SeekFrom::Start(12))?;

    let hdrl = loop {
        let mut chunk = [0_u8; 8];
        match reader.read_exact(&mut chunk) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(ExtractError::container("el AVI no contiene la lista hdrl"));
            }
            Err(error) => return Err(error.into()),
        }
        let size = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]) as u64;

        if &chunk[0..4] == b"LIST" && size >= 4 {
            let mut list_type = [0_u8; 4];
            read_exact_or_truncated(reader, &mut list_type, "el tipo de lista RIFF")?;
            if &list_type == b"hdrl" {
                break read_limited(reader, size - 4, "la lista hdrl")?;
            }
            reader.seek(SeekFrom::Current(seek_offset(size - 4 + (size & 1))?))?;
        } else {
            reader.seek(SeekFrom::Current(seek_offset(size + (size & 1))?))?;
        }
    };

    parse_avi_hdrl(&hdrl)
}

fn parse_avi_hdrl(data: &[u8]) -> Result<VideoProperties, ExtractError> {
    let mut main_header = None;
    let mut video_stream = None;

    for (id, payload) in riff_chunks(data)? {
        match &id {
            b"avih" => {
                main_header = Some(AviMainHeader {
                    micro_sec_per_frame: le_u32(payload, 0)?,
                    total_frames: le_u32(payload, 16)?,
                    width: le_u32(payload, 32)?,
                    height: le_u32(payload, 36)?,
                });
            }
            b"LIST" if video_stream.is_none() && payload.starts_with(b"strl") => {
                video_stream = parse_avi_strl(&payload[4..])?;
            }
            _ => {}
        }
    }

    let main_header =
        main_header.ok_or_else(|| ExtractError::container("el AVI no contiene la cabecera avih"))?;

    let stream_rate = video_stream
        .as_ref()
        .filter(|stream| stream.scale > 0 && stream.rate > 0);

    let frame_rate = match stream_rate {
        Some(stream) => stream.rate as f64 / stream.scale as f64,
        None if main_header.micro_sec_per_frame > 0 => {
            1_000_000.0 / main_header.micro_sec_per_frame as f64
        }
        None => {
            return Err(ExtractError::container(
                "no se pudo determinar la velocidad de fotogramas",
            ));
        }
    };

    let duration_seconds = match stream_rate {
        Some(stream) if stream.length > 0 => {
            stream.length as f64 * stream.scale as f64 / stream.rate as f64
        }
        _ => {
            main_header.total_frames as f64 * main_header.micro_sec_per_frame as f64 / 1_000_000.0
        }
    };

    Ok(VideoProperties {
        duration_seconds,
        frame_rate,
        width: main_header.width,
        height: main_header.height,
    })
}

/// `None` si la lista `strl` describe un flujo que no es de video.
fn parse_avi_strl(data: &[u8]) -> Result<Option<AviStreamHeader>, ExtractError> {
    for (id, payload) in riff_chunks(data)? {
        if &id != b"strh" {
            continue;
        }
        if payload.get(0..4) != Some(b"vids".as_slice()) {
            return Ok(None);
        }
        return Ok(Some(AviStreamHeader {
            scale: le_u32(payload, 20)?,
            rate: le_u32(payload, 24)?,
            length: le_u32(payload, 32)?,
        }));
    }
    Ok(None)
}

fn riff_chunks(data: &[u8]) -> Result<Vec<([u8; 4], &[u8])>, ExtractError> {
    let mut chunks = Vec::new();
    let mut offset = 0_usize;
    while data.len() - offset >= 8 {
        let id = [
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ];
        let size = le_u32(data, offset + 4)? as usize;
        let start = offset + 8;
        let end = start
            .checked_add(size)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                ExtractError::container(format!(
                    "fragmento RIFF {} truncado",
                    String::from_utf8_lossy(&id)
                ))
            })?;
        chunks.push((id, &data[start..end]));
        offset = (end + (size & 1)).min(data.len());
    }
    Ok(chunks)
}

// === Helpers ===

fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
    what: &str,
) -> Result<(), ExtractError> {
    reader.read_exact(buffer).map_err(|error| {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            ExtractError::container(format!("archivo truncado al leer {what}"))
        } else {
            error.into()
        }
    })
}

fn read_limited<R: Read>(reader: &mut R, size: u64, what: &str) -> Result<Vec<u8>, ExtractError> {
    if size > HEADER_SIZE_LIMIT {
        return Err(ExtractError::container(format!("{what} es demasiado grande")));
    }
    let mut payload = vec![0_u8; size as usize];
    read_exact_or_truncated(reader, &mut payload, what)?;
    Ok(payload)
}

fn seek_offset(size: u64) -> Result<i64, ExtractError> {
    i64::try_from(size).map_err(|_| ExtractError::container("tamaño de bloque fuera de rango"))
}

fn be_u32(data: &[u8], offset: usize) -> Result<u32, ExtractError> {
    data.get(offset..offset + 4)
        .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .ok_or_else(truncated_header)
}

fn be_u64(data: &[u8], offset: usize) -> Result<u64, ExtractError> {
    data.get(offset..offset + 8)
        .map(|bytes| {
            let mut value = [0_u8; 8];
            value.copy_from_slice(bytes);
            u64::from_be_bytes(value)
        })
        .ok_or_else(truncated_header)
}

fn le_u32(data: &[u8], offset: usize) -> Result<u32, ExtractError> {
    data.get(offset..offset + 4)
        .map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .ok_or_else(truncated_header)
}

fn truncated_header() -> ExtractError {
    ExtractError::container("cabecera de video truncada")
}
