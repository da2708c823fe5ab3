//! Tipos de error para Storchenkamera.
//!
//! Un único enum para el índice de fotos y la capa HTTP, con conversión
//! directa a respuestas de axum.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Error principal de la aplicación
#[derive(Debug)]
pub enum StorchenError {
    /// Errores de configuración (variables de entorno inválidas)
    Config(String),
    /// El nombre de archivo no sigue el formato de captura de la cámara
    InvalidFilename(String),
    /// El índice no contiene ninguna foto válida
    EmptyIndex,
    /// No existe ninguna foto para la consulta
    NotFound(String),
    /// Parámetros de la petición inválidos
    BadRequest(String),
    /// Ruta fuera de la carpeta de fotos
    Forbidden(String),
    /// Errores de I/O al leer la carpeta de fotos
    Io(std::io::Error),
    /// Errores internos (p.ej. mutex envenenado)
    Internal(String),
}

impl fmt::Display for StorchenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorchenError::Config(msg) => write!(f, "Config error: {}", msg),
            StorchenError::InvalidFilename(name) => {
                write!(f, "Could not parse filename: {}", name)
            }
            StorchenError::EmptyIndex => write!(f, "No Picture found"),
            StorchenError::NotFound(msg) => write!(f, "{}", msg),
            StorchenError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            StorchenError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            StorchenError::Io(err) => write!(f, "IO error: {}", err),
            StorchenError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for StorchenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorchenError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorchenError {
    fn from(err: std::io::Error) -> Self {
        StorchenError::Io(err)
    }
}

impl<T> From<std::sync::PoisonError<T>> for StorchenError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StorchenError::Internal(format!("picture index lock poisoned: {}", err))
    }
}

impl StorchenError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorchenError::EmptyIndex | StorchenError::NotFound(_) => StatusCode::NOT_FOUND,
            StorchenError::BadRequest(_) | StorchenError::InvalidFilename(_) => {
                StatusCode::BAD_REQUEST
            }
            StorchenError::Forbidden(_) => StatusCode::FORBIDDEN,
            StorchenError::Config(_) | StorchenError::Io(_) | StorchenError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for StorchenError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("❌ {}", self);
        }

        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Result type alias para simplificar el código
pub type Result<T> = std::result::Result<T, StorchenError>;
