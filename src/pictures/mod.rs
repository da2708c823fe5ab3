//! Índice en memoria de las fotos de la webcam.
//!
//! Mantiene los registros de una carpeta sincronizados con el disco:
//! antes de cada consulta se compara la huella de la carpeta y, si cambió,
//! se reconstruye el índice completo. El trabajo pesado vive en `depends/`.

pub mod depends;

pub use depends::filename::{earliest_timestamp, parse_capture_timestamp_in};
pub use depends::filesystem::FileManager;
pub use depends::fingerprint::{FolderFingerprint, StalenessStrategy};
pub use depends::paths::PathResolver;
pub use depends::record::{PictureRecord, PictureSummary};

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};

use crate::error::StorchenError;
use crate::metrics;

/// Índice de fotos de una única carpeta.
///
/// No es thread-safe por sí mismo: `recargar` vacía y reconstruye los
/// registros, así que con varios hilos debe ir detrás de un `Mutex`.
pub struct PictureIndex<Tz: TimeZone = Local> {
    folder_path: PathBuf,
    timezone: Tz,
    strategy: StalenessStrategy,
    records: Vec<PictureRecord>,
    fingerprint: Option<FolderFingerprint>,
}

impl PictureIndex<Local> {
    pub fn new(folder_path: impl Into<PathBuf>) -> Self {
        Self::with_timezone(folder_path, Local)
    }
}

impl<Tz> PictureIndex<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn with_timezone(folder_path: impl Into<PathBuf>, timezone: Tz) -> Self {
        Self {
            folder_path: folder_path.into(),
            timezone,
            strategy: StalenessStrategy::default(),
            records: Vec::new(),
            fingerprint: None,
        }
    }

    pub fn with_strategy(mut self, strategy: StalenessStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    pub fn strategy(&self) -> StalenessStrategy {
        self.strategy
    }

    pub fn is_loaded(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registros en orden de inserción (el orden en que los devolvió el
    /// sistema de archivos en la última recarga).
    pub fn records(&self) -> &[PictureRecord] {
        &self.records
    }

    /// Descarta todos los registros y vuelve a leer la carpeta.
    pub fn reload(&mut self) -> Result<(), StorchenError> {
        let listing = FileManager::list_files(&self.folder_path)?;
        self.rebuild(listing);
        Ok(())
    }

    /// Recarga si la carpeta cambió desde la última recarga o si el índice
    /// está vacío. Devuelve `true` si hubo recarga.
    pub fn refresh_if_stale(&mut self) -> Result<bool, StorchenError> {
        let listing = FileManager::list_files(&self.folder_path)?;
        let current = FolderFingerprint::from_names(&listing);

        let stale = self.records.is_empty()
            || match self.strategy {
                StalenessStrategy::FileCount => current.file_count() != self.records.len(),
                StalenessStrategy::Listing => self.fingerprint.as_ref() != Some(&current),
            };

        if stale {
            log::debug!(
                "pictures: carpeta {} cambió ({} archivos, {} fotos indexadas), recargando",
                self.folder_path.display(),
                current.file_count(),
                self.records.len()
            );
            self.rebuild(listing);
        }

        Ok(stale)
    }

    /// La foto más reciente. Con timestamps repetidos gana la primera.
    pub fn newest(&mut self) -> Result<&PictureRecord, StorchenError> {
        self.refresh_if_stale()?;
        self.records
            .iter()
            .reduce(|best, record| {
                if record.capture_timestamp() > best.capture_timestamp() {
                    record
                } else {
                    best
                }
            })
            .ok_or(StorchenError::EmptyIndex)
    }

    /// La primera foto con exactamente ese timestamp, si existe.
    pub fn by_timestamp(&mut self, timestamp: i64) -> Result<Option<&PictureRecord>, StorchenError> {
        self.refresh_if_stale()?;
        Ok(self
            .records
            .iter()
            .find(|record| record.capture_timestamp() == timestamp))
    }

    /// Resumen de todas las fotos, o `EmptyIndex` si no hay ninguna.
    pub fn all_summaries(&mut self) -> Result<Vec<PictureSummary>, StorchenError> {
        self.refresh_if_stale()?;
        if self.records.is_empty() {
            return Err(StorchenError::EmptyIndex);
        }
        Ok(self.records.iter().map(PictureRecord::summary).collect())
    }

    /// Resumen de las fotos con `start <= timestamp < end`.
    ///
    /// Un rango sin coincidencias devuelve una lista vacía; `EmptyIndex` se
    /// reserva para cuando el índice no tiene ninguna foto.
    pub fn summaries_in_range(
        &mut self,
        start: i64,
        end: i64,
    ) -> Result<Vec<PictureSummary>, StorchenError> {
        self.refresh_if_stale()?;
        if self.records.is_empty() {
            return Err(StorchenError::EmptyIndex);
        }
        Ok(self
            .records
            .iter()
            .filter(|record| (start..end).contains(&record.capture_timestamp()))
            .map(PictureRecord::summary)
            .collect())
    }

    fn rebuild(&mut self, listing: Vec<String>) {
        let timer = metrics::DURACION_RECARGA_INDICE.start_timer();
        let fingerprint = FolderFingerprint::from_names(&listing);

        self.records.clear();
        let mut rejected = 0usize;
        for name in listing.iter().filter(|name| name.ends_with(".jpg")) {
            match PictureRecord::parse_in(name, &self.folder_path, &self.timezone) {
                Ok(record) => self.records.push(record),
                Err(e) => {
                    rejected += 1;
                    log::debug!("pictures: {}", e);
                }
            }
        }
        self.fingerprint = Some(fingerprint);

        metrics::RECARGAS_INDICE.inc();
        metrics::NOMBRES_DESCARTADOS.inc_by(rejected as u64);
        metrics::FOTOS_INDEXADAS.set(self.records.len() as i64);
        timer.observe_duration();

        log::info!(
            "📸 Índice recargado: {} fotos en {} ({} descartadas)",
            self.records.len(),
            self.folder_path.display(),
            rejected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs::{self, File};
    use tempfile::TempDir;

    /// Nombre de captura para un timestamp unix en UTC.
    fn capture_name(timestamp: i64, event: &str) -> String {
        let dt = Utc.timestamp_opt(timestamp, 0).unwrap();
        format!("192.168.1.2_1_{}000_{}.jpg", dt.format("%Y%m%d%H%M%S"), event)
    }

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    fn index_with(timestamps: &[i64]) -> (TempDir, PictureIndex<Utc>) {
        let tmp = TempDir::new().unwrap();
        for ts in timestamps {
            touch(tmp.path(), &capture_name(*ts, "motion"));
        }
        let index = PictureIndex::with_timezone(tmp.path(), Utc);
        (tmp, index)
    }

    fn timestamps(summaries: &[PictureSummary]) -> Vec<i64> {
        let mut out: Vec<i64> = summaries.iter().map(|s| s.file_unix).collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn newest_returns_max_timestamp() {
        let (_tmp, mut index) = index_with(&[100, 500, 300]);
        let newest = index.newest().unwrap();
        assert_eq!(newest.capture_timestamp(), 500);
        assert_eq!(newest.filename(), capture_name(500, "motion"));
    }

    #[test]
    fn newest_prefers_first_record_on_ties() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &capture_name(700, "motion"));
        touch(tmp.path(), &capture_name(700, "alarm"));
        let mut index = PictureIndex::with_timezone(tmp.path(), Utc);

        let first_with_700 = index.by_timestamp(700).unwrap().unwrap().filename().to_string();
        assert_eq!(index.newest().unwrap().filename(), first_with_700);
    }

    #[test]
    fn by_timestamp_finds_exact_match_only() {
        let (_tmp, mut index) = index_with(&[100, 500, 300]);

        let record = index.by_timestamp(300).unwrap().unwrap();
        assert_eq!(record.capture_timestamp(), 300);
        assert_eq!(record.date(), "1970-01-01");
        assert_eq!(record.time(), "00:05:00");

        assert!(index.by_timestamp(999).unwrap().is_none());
        assert!(index.by_timestamp(301).unwrap().is_none());
    }

    #[test]
    fn range_is_half_open() {
        let (_tmp, mut index) = index_with(&[100, 300, 500]);
        let summaries = index.summaries_in_range(100, 500).unwrap();
        assert_eq!(timestamps(&summaries), vec![100, 300]);
    }

    #[test]
    fn empty_range_on_loaded_index_is_empty_list() {
        let (_tmp, mut index) = index_with(&[100, 300, 500]);
        assert!(index.summaries_in_range(1000, 2000).unwrap().is_empty());
        assert!(index.summaries_in_range(500, 100).unwrap().is_empty());
    }

    #[test]
    fn summaries_follow_insertion_order() {
        let (_tmp, mut index) = index_with(&[100, 300, 500]);
        let all = index.all_summaries().unwrap();
        let order: Vec<i64> = index.records().iter().map(|r| r.capture_timestamp()).collect();
        assert_eq!(all.iter().map(|s| s.file_unix).collect::<Vec<_>>(), order);
    }

    #[test]
    fn empty_folder_reports_empty_index() {
        let tmp = TempDir::new().unwrap();
        let mut index = PictureIndex::with_timezone(tmp.path(), Utc);

        assert!(matches!(index.newest(), Err(StorchenError::EmptyIndex)));
        assert!(matches!(index.all_summaries(), Err(StorchenError::EmptyIndex)));
        assert!(matches!(
            index.summaries_in_range(0, i64::MAX),
            Err(StorchenError::EmptyIndex)
        ));
        assert!(index.by_timestamp(100).unwrap().is_none());
        assert!(!index.is_loaded());
    }

    #[test]
    fn reload_skips_malformed_names_without_aborting() {
        let (tmp, mut index) = index_with(&[100, 200]);
        touch(tmp.path(), "snapshot.jpg");
        touch(tmp.path(), "192.168.1.2_1_19700132000000000_motion.jpg");
        touch(tmp.path(), "192.168.1.2_1_197001010000000_motion.jpg");
        touch(tmp.path(), "readme.txt");

        index.reload().unwrap();
        assert_eq!(index.len(), 2);
        assert!(index
            .records()
            .iter()
            .all(|r| r.capture_timestamp() == 100 || r.capture_timestamp() == 200));
    }

    #[test]
    fn reload_twice_is_stable() {
        let (_tmp, mut index) = index_with(&[100, 300, 500, 42, 7]);
        index.reload().unwrap();
        let first = index.records().to_vec();
        index.reload().unwrap();
        assert_eq!(index.records(), first.as_slice());
    }

    #[test]
    fn refresh_picks_up_new_pictures() {
        let (tmp, mut index) = index_with(&[100]);
        assert_eq!(index.newest().unwrap().capture_timestamp(), 100);

        touch(tmp.path(), &capture_name(900, "motion"));
        assert_eq!(index.newest().unwrap().capture_timestamp(), 900);
        assert!(!index.refresh_if_stale().unwrap());
    }

    #[test]
    fn refresh_drops_removed_pictures() {
        let (tmp, mut index) = index_with(&[100, 900]);
        assert_eq!(index.newest().unwrap().capture_timestamp(), 900);

        fs::remove_file(tmp.path().join(capture_name(900, "motion"))).unwrap();
        assert_eq!(index.newest().unwrap().capture_timestamp(), 100);
        assert!(index.by_timestamp(900).unwrap().is_none());
    }

    #[test]
    fn listing_strategy_detects_swap_with_same_count() {
        let (tmp, mut index) = index_with(&[100, 200]);
        index.reload().unwrap();

        fs::remove_file(tmp.path().join(capture_name(200, "motion"))).unwrap();
        touch(tmp.path(), &capture_name(300, "motion"));

        assert!(index.refresh_if_stale().unwrap());
        assert!(index.by_timestamp(300).unwrap().is_some());
        assert!(index.by_timestamp(200).unwrap().is_none());
    }

    #[test]
    fn file_count_strategy_misses_swap_with_same_count() {
        let (tmp, index) = index_with(&[100, 200]);
        let mut index = index.with_strategy(StalenessStrategy::FileCount);
        assert_eq!(index.strategy(), StalenessStrategy::FileCount);
        index.reload().unwrap();

        fs::remove_file(tmp.path().join(capture_name(200, "motion"))).unwrap();
        touch(tmp.path(), &capture_name(300, "motion"));

        // Mismo número de archivos: el índice sigue desactualizado
        assert!(!index.refresh_if_stale().unwrap());
        assert!(index.by_timestamp(200).unwrap().is_some());
        assert!(index.by_timestamp(300).unwrap().is_none());
    }

    #[test]
    fn file_count_strategy_counts_non_jpg_files() {
        let (tmp, index) = index_with(&[100]);
        let mut index = index.with_strategy(StalenessStrategy::FileCount);
        touch(tmp.path(), "notes.txt");

        // 2 archivos frente a 1 foto: se recarga en cada consulta
        assert!(index.refresh_if_stale().unwrap());
        assert!(index.refresh_if_stale().unwrap());
        assert_eq!(index.len(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn file_count_strategy_counts_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (tmp, index) = index_with(&[100, 200]);
        let mut index = index.with_strategy(StalenessStrategy::FileCount);
        index.reload().unwrap();

        // Cambiar una foto por un nombre no UTF-8 deja 2 archivos y 1 foto
        fs::remove_file(tmp.path().join(capture_name(200, "motion"))).unwrap();
        File::create(tmp.path().join(OsStr::from_bytes(b"cam_\xfe.jpg"))).unwrap();

        assert!(index.refresh_if_stale().unwrap());
        assert_eq!(index.len(), 1);
        assert!(index.by_timestamp(200).unwrap().is_none());
    }

    #[test]
    fn unreadable_folder_propagates_io_error() {
        let tmp = TempDir::new().unwrap();
        let mut index = PictureIndex::with_timezone(tmp.path().join("missing"), Utc);
        assert!(matches!(index.newest(), Err(StorchenError::Io(_))));
        assert!(matches!(index.by_timestamp(1), Err(StorchenError::Io(_))));
    }

    #[test]
    fn records_resolve_inside_folder() {
        let (tmp, mut index) = index_with(&[100]);
        let record = index.newest().unwrap();
        assert_eq!(record.folder_path(), tmp.path());
        assert!(record.full_path().is_file());
    }
}
