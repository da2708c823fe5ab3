//! Detección de cambios en la carpeta de fotos.
//!
//! La huella guarda el número de archivos y un SHA-1 del listado ordenado, de
//! modo que añadir una foto y borrar otra entre dos consultas también se
//! detecta.

use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};

use crate::error::StorchenError;

/// Criterio para decidir si el índice está desactualizado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalenessStrategy {
    /// Compara el número de archivos con el número de fotos indexadas.
    /// No detecta un alta y una baja simultáneas.
    FileCount,
    /// Compara el hash del listado con el de la última recarga.
    #[default]
    Listing,
}

impl FromStr for StalenessStrategy {
    type Err = StorchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "file_count" => Ok(StalenessStrategy::FileCount),
            "listing" | "hash" => Ok(StalenessStrategy::Listing),
            other => Err(StorchenError::Config(format!(
                "estrategia de actualización desconocida: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for StalenessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalenessStrategy::FileCount => write!(f, "count"),
            StalenessStrategy::Listing => write!(f, "listing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderFingerprint {
    file_count: usize,
    listing_digest: [u8; 20],
}

impl FolderFingerprint {
    /// El orden de `names` no importa.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();

        let mut hasher = Sha1::new();
        for name in &sorted {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
        }

        let mut listing_digest = [0u8; 20];
        listing_digest.copy_from_slice(&hasher.finalize());

        Self {
            file_count: sorted.len(),
            listing_digest,
        }
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }
}
