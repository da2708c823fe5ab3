use std::sync::Arc;

use dotenvy::dotenv;
use storchenkamera::{api, pictures::PictureIndex, state::ServerConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;

    // Ruta absoluta para resolver los archivos al servirlos
    let pictures_path = std::path::absolute(&config.pictures_path)?;
    if !pictures_path.is_dir() {
        log::warn!(
            "⚠️ La carpeta de fotos {} no existe todavía; las consultas fallarán hasta que se cree",
            pictures_path.display()
        );
    }
    let index = PictureIndex::new(pictures_path).with_strategy(config.staleness);
    log::info!(
        "📂 Carpeta de fotos: {} (actualización por {})",
        index.folder_path().display(),
        index.strategy()
    );
    let listen_addr = config.listen_addr;
    let state = Arc::new(AppState::new(config, index));

    let app = api::router(state);

    log::info!("🚀 API escuchando en http://{}", listen_addr);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
