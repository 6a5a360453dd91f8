use chrono::DateTime;

/// Muestra una fecha W3CDTF de Office como `AAAA-MM-DD HH:MM:SS+HH:MM`.
///
/// Si el texto no es RFC 3339 se devuelve tal cual.
pub fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(datetime) => datetime.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Número con hasta dos decimales, sin ceros sobrantes (`30`, `29.97`, `12.5`).
pub fn format_decimal(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub fn format_seconds(seconds: f64) -> String {
    format!("{} segundos", format_decimal(seconds))
}
