//! Operaciones de sistema de archivos.
//!
//! Listado plano (sin recursión) de la carpeta de fotos.

use std::fs;
use std::path::Path;

use crate::error::StorchenError;

pub struct FileManager;

impl FileManager {
    /// Nombres de los archivos regulares directamente dentro de `dir`.
    ///
    /// Los nombres que no son UTF-8 se incluyen con conversión con pérdida
    /// (`U+FFFD`): cuentan para la huella de la carpeta pero nunca cumplen el
    /// patrón de captura, así que no se indexan.
    pub fn list_files(dir: &Path) -> Result<Vec<String>, StorchenError> {
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name();
            match name.to_str() {
                Some(name) => files.push(name.to_string()),
                None => {
                    log::debug!(
                        "filesystem: nombre no UTF-8 en {}: {:?}",
                        dir.display(),
                        name
                    );
                    files.push(name.to_string_lossy().into_owned());
                }
            }
        }

        Ok(files)
    }
}
