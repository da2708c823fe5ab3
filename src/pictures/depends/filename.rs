//! Parser de nombres de archivo de la cámara.
//!
//! La cámara guarda cada captura como
//! `<ip>_<canal>_<YYYYMMDDHHMMSSmmm>_<evento>.jpg`, p.ej.
//! `192.168.1.2_1_20240115153045123_motion.jpg`. El instante de captura sale
//! del propio nombre; los milisegundos no se usan.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::StorchenError;

/// Formato de los 14 dígitos de fecha y hora dentro del nombre.
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

lazy_static! {
    static ref CAPTURE_FILENAME: Regex = Regex::new(
        r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+_[0-9]+_(?P<date>[0-9]{8})(?P<time>[0-9]{6})[0-9]{3}_\w+\.jpg$"
    )
    .expect("No se pudo compilar la expresión CAPTURE_FILENAME");
}

/// Extrae el timestamp unix (segundos) de un nombre de captura, interpretando
/// la fecha y hora en la zona `tz`.
///
/// Una hora local ambigua (cambio de horario en otoño) se resuelve al primer
/// instante; una hora inexistente (salto de primavera) es un nombre inválido.
pub fn parse_capture_timestamp_in<Tz: TimeZone>(
    filename: &str,
    tz: &Tz,
) -> Result<i64, StorchenError> {
    let invalid = || StorchenError::InvalidFilename(filename.to_string());

    let caps = CAPTURE_FILENAME.captures(filename).ok_or_else(invalid)?;
    let digits = format!("{}{}", &caps["date"], &caps["time"]);

    let naive =
        NaiveDateTime::parse_from_str(&digits, CAPTURE_TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    // chrono acepta el segundo 60 como segundo intercalar
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }

    earliest_timestamp(tz.from_local_datetime(&naive)).ok_or_else(invalid)
}

/// Timestamp de una hora local. `Local` en Unix devuelve `Ambiguous(posterior,
/// anterior)`, así que no se confía en el orden de las dos opciones.
pub fn earliest_timestamp<Tz: TimeZone>(local: LocalResult<DateTime<Tz>>) -> Option<i64> {
    match local {
        LocalResult::Single(dt) => Some(dt.timestamp()),
        LocalResult::Ambiguous(a, b) => Some(a.timestamp().min(b.timestamp())),
        LocalResult::None => None,
    }
}
