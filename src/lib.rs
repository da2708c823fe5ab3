pub mod api;
pub mod error;
pub mod metrics;
pub mod pictures;
pub mod state;

use std::sync::{Arc, Mutex};

use error::StorchenError;
use pictures::{PathResolver, PictureIndex};
use state::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    // Toda operación sobre el índice (recarga incluida) pasa por este mutex
    pub index: Arc<Mutex<PictureIndex>>,
    pub resolver: PathResolver,
}

impl AppState {
    pub fn new(config: ServerConfig, index: PictureIndex) -> Self {
        let resolver = PathResolver::new(index.folder_path().to_path_buf());
        Self {
            config,
            index: Arc::new(Mutex::new(index)),
            resolver,
        }
    }

    /// Ejecuta `f` sobre el índice bloqueado en un hilo de `spawn_blocking`,
    /// ya que las consultas pueden leer el disco.
    pub async fn query_index<T, F>(&self, f: F) -> Result<T, StorchenError>
    where
        F: FnOnce(&mut PictureIndex) -> Result<T, StorchenError> + Send + 'static,
        T: Send + 'static,
    {
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || {
            let mut guard = index.lock()?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| StorchenError::Internal(format!("index task failed: {}", e)))?
    }
}
