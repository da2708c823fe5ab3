use axum::http::header;
use axum::response::IntoResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Encoder, Histogram, IntCounter,
    IntGauge, TextEncoder,
};

use crate::error::StorchenError;

lazy_static! {
    // Histograma para la duración de las recargas del índice
    pub static ref DURACION_RECARGA_INDICE: Histogram = register_histogram!(
        "storchenkamera_duracion_recarga_indice_segundos",
        "Duración de las recargas completas del índice de fotos"
    ).expect("No se pudo crear el histograma DURACION_RECARGA_INDICE");

    pub static ref RECARGAS_INDICE: IntCounter = register_int_counter!(
        "storchenkamera_recargas_indice_total",
        "Número total de recargas completas del índice de fotos"
    ).expect("No se pudo crear el contador RECARGAS_INDICE");

    // Archivos .jpg descartados por no seguir el formato de la cámara
    pub static ref NOMBRES_DESCARTADOS: IntCounter = register_int_counter!(
        "storchenkamera_nombres_descartados_total",
        "Número total de archivos .jpg descartados por nombre inválido"
    ).expect("No se pudo crear el contador NOMBRES_DESCARTADOS");

    pub static ref FOTOS_INDEXADAS: IntGauge = register_int_gauge!(
        "storchenkamera_fotos_indexadas",
        "Número actual de fotos en el índice"
    ).expect("No se pudo crear el gauge FOTOS_INDEXADAS");
}

/// Recoge todas las métricas en formato de texto de Prometheus
pub fn gather_metrics() -> Result<String, StorchenError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| StorchenError::Internal(format!("metrics encoding failed: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| StorchenError::Internal(format!("metrics are not UTF-8: {}", e)))
}

// GET /metrics
pub async fn metrics_handler() -> Result<impl IntoResponse, StorchenError> {
    let body = gather_metrics()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
