//! Parámetros de consulta de la API.
//!
//! `start` y `end` aceptan los formatos de fecha habituales de los clientes:
//! RFC 3339 con zona, fecha y hora sin zona (hora local), solo fecha, o un
//! timestamp unix (entero o con decimales).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use serde::Deserialize;

use crate::error::StorchenError;
use crate::pictures::earliest_timestamp;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: String,
    pub end: String,
}

impl RangeParams {
    /// Límites del intervalo `[start, end)` como timestamps unix.
    pub fn bounds_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<(i64, i64), StorchenError> {
        Ok((
            parse_datetime_param("start", &self.start, tz)?,
            parse_datetime_param("end", &self.end, tz)?,
        ))
    }
}

/// Convierte un parámetro de fecha en timestamp unix.
///
/// Los segundos fraccionarios se redondean hacia arriba: las fotos tienen
/// resolución de segundo y `ts >= 10.5` equivale a `ts >= 11`.
pub fn parse_datetime_param<Tz: TimeZone>(
    name: &str,
    raw: &str,
    tz: &Tz,
) -> Result<i64, StorchenError> {
    let raw = raw.trim();
    let invalid = || StorchenError::BadRequest(format!("invalid datetime for '{}': {}", name, raw));

    if let Ok(secs) = raw.parse::<i64>() {
        return Ok(secs);
    }

    if let Ok(secs) = raw.parse::<f64>() {
        let ceiled = secs.ceil();
        if !ceiled.is_finite() || ceiled < i64::MIN as f64 || ceiled >= i64::MAX as f64 {
            return Err(invalid());
        }
        return Ok(ceiled as i64);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ceil_seconds(dt.timestamp(), dt.timestamp_subsec_nanos()));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    let secs = earliest_timestamp(tz.from_local_datetime(&naive)).ok_or_else(invalid)?;
    Ok(ceil_seconds(secs, naive.nanosecond()))
}

fn ceil_seconds(secs: i64, nanos: u32) -> i64 {
    if nanos > 0 {
        secs + 1
    } else {
        secs
    }
}
