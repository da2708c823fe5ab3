//! Respuesta con los bytes de una foto y sus metadatos en cabeceras.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::StorchenError;
use crate::pictures::{PathResolver, PictureRecord};

pub const FILE_DATE_HEADER: &str = "file_date";
pub const FILE_TIME_HEADER: &str = "file_time";
pub const FILE_UNIX_HEADER: &str = "file_unix";

fn header_value(value: &str) -> Result<HeaderValue, StorchenError> {
    HeaderValue::from_str(value)
        .map_err(|e| StorchenError::Internal(format!("invalid header value {:?}: {}", value, e)))
}

/// Cabeceras de metadatos de una foto (sin Content-Length).
pub fn picture_headers(record: &PictureRecord) -> Result<HeaderMap, StorchenError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("inline; filename=\"{}\"", record.filename()))?,
    );
    headers.insert(
        HeaderName::from_static(FILE_DATE_HEADER),
        header_value(record.date())?,
    );
    headers.insert(
        HeaderName::from_static(FILE_TIME_HEADER),
        header_value(record.time())?,
    );
    headers.insert(
        HeaderName::from_static(FILE_UNIX_HEADER),
        header_value(&record.capture_timestamp().to_string())?,
    );
    Ok(headers)
}

/// Sirve la foto desde disco como stream.
pub async fn picture_response(
    resolver: &PathResolver,
    record: &PictureRecord,
) -> Result<Response, StorchenError> {
    let full_path = resolver.resolve(record.filename())?;

    let file = File::open(&full_path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            StorchenError::NotFound(format!("Picture file not found: {}", record.filename()))
        }
        _ => StorchenError::Io(e),
    })?;
    let len = file.metadata().await?.len();

    let mut headers = picture_headers(record)?;
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((StatusCode::OK, headers, body).into_response())
}
