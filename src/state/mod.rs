//! Configuración del servidor.
//!
//! Se lee de variables de entorno (y de `.env` vía dotenvy en `main`).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::StorchenError;
use crate::pictures::StalenessStrategy;

pub const DEFAULT_PICTURES_PATH: &str = "../../webcam";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Configuración del servidor de fotos
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub pictures_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub staleness: StalenessStrategy,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, StorchenError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la configuración con una función de búsqueda arbitraria,
    /// útil para tests sin tocar el entorno del proceso.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorchenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pictures_path = lookup("PICTURES_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PICTURES_PATH.to_string());

        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr.parse().map_err(|e| {
            StorchenError::Config(format!("LISTEN_ADDR inválido '{}': {}", listen_addr, e))
        })?;

        let staleness = match lookup("PICTURES_STALENESS") {
            Some(v) => v.parse()?,
            None => StalenessStrategy::default(),
        };

        let enable_cors = lookup("ENABLE_CORS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Self {
            pictures_path: PathBuf::from(pictures_path),
            listen_addr,
            staleness,
            enable_cors,
        })
    }
}
