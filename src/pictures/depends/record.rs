//! Registro de una foto indexada y su resumen serializable.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use super::filename::parse_capture_timestamp_in;
use crate::error::StorchenError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Una captura de la webcam. Fecha y hora se derivan del timestamp al crearla
/// y no se modifican después.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureRecord {
    filename: String,
    capture_timestamp: i64,
    date: String,
    time: String,
    folder_path: PathBuf,
}

/// Metadatos de una foto tal como los devuelve la API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureSummary {
    pub file_date: String,
    pub file_time: String,
    pub file_unix: i64,
}

impl PictureRecord {
    /// Crea el registro a partir del nombre de archivo, o `InvalidFilename`
    /// si el nombre no sigue el formato de la cámara.
    pub fn parse_in<Tz>(filename: &str, folder_path: &Path, tz: &Tz) -> Result<Self, StorchenError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let capture_timestamp = parse_capture_timestamp_in(filename, tz)?;
        let local = tz
            .timestamp_opt(capture_timestamp, 0)
            .single()
            .ok_or_else(|| StorchenError::InvalidFilename(filename.to_string()))?;

        Ok(Self {
            filename: filename.to_string(),
            capture_timestamp,
            date: local.format(DATE_FORMAT).to_string(),
            time: local.format(TIME_FORMAT).to_string(),
            folder_path: folder_path.to_path_buf(),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn capture_timestamp(&self) -> i64 {
        self.capture_timestamp
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    pub fn full_path(&self) -> PathBuf {
        self.folder_path.join(&self.filename)
    }

    pub fn summary(&self) -> PictureSummary {
        PictureSummary {
            file_date: self.date.clone(),
            file_time: self.time.clone(),
            file_unix: self.capture_timestamp,
        }
    }
}
