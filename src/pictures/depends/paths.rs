//! Resolución y validación de rutas de fotos.
//!
//! Asegura que la foto a servir esté dentro de la carpeta de la webcam.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StorchenError;

#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Ruta canónica de `filename` dentro de la carpeta raíz.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, StorchenError> {
        let candidate = self.root.join(filename);
        let full_path = candidate.canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                StorchenError::NotFound(format!("Picture file not found: {}", filename))
            }
            _ => StorchenError::Io(e),
        })?;
        let root = self.root.canonicalize()?;

        if full_path.starts_with(&root) {
            Ok(full_path)
        } else {
            Err(StorchenError::Forbidden(format!(
                "{} está fuera de la carpeta de fotos",
                filename
            )))
        }
    }
}
