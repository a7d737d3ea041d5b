use std::{
    error, fmt, io,
    path::{Path, PathBuf},
    result,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use model::catalog::Catalog;

#[derive(Debug, Clone)]
pub enum StoreError {
    Io(Arc<io::Error>),
    Json(Arc<serde_json::Error>),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(why) => write!(f, "journal storage failed: {why}"),
            StoreError::Json(why) => write!(f, "journal document is malformed: {why}"),
        }
    }
}

impl error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(why: io::Error) -> Self {
        StoreError::Io(Arc::new(why))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(why: serde_json::Error) -> Self {
        StoreError::Json(Arc::new(why))
    }
}

pub type Result<T> = result::Result<T, StoreError>;

/// Keeps the whole catalog as one document.
#[async_trait]
pub trait Store: Send + Sync {
    /// `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<Catalog>>;
    async fn save(&self, catalog: &Catalog) -> Result<()>;
}

/// Catalog as a JSON file. Saving writes a sibling file first and renames
/// it over the old document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn scratch_path(&self) -> PathBuf {
        let mut scratch = self.path.clone().into_os_string();
        scratch.push(".tmp");
        scratch.into()
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> Result<Option<Catalog>> {
        let document = match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => document,
            Err(why) if why.kind() == io::ErrorKind::NotFound => {
                log::info!("no journal at {}, starting empty", self.path.display());
                return Ok(None);
            }
            Err(why) => return Err(why.into()),
        };
        let catalog: Catalog = serde_json::from_str(&document)?;
        log::info!(
            "loaded {} pins and {} walks from {}",
            catalog.pins.len(),
            catalog.walks.len(),
            self.path.display()
        );
        Ok(Some(catalog))
    }

    async fn save(&self, catalog: &Catalog) -> Result<()> {
        let document = serde_json::to_vec(catalog)?;
        let scratch = self.scratch_path();
        tokio::fs::write(&scratch, document).await?;
        tokio::fs::rename(&scratch, &self.path).await?;
        log::debug!("saved journal to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the serialized document in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: &Catalog) -> Result<Self> {
        let store = Self::new();
        *store.lock() = Some(serde_json::to_string(catalog)?);
        Ok(store)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn document(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // the guarded document is always replaced whole
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<Option<Catalog>> {
        let document = self.lock().clone();
        match document {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, catalog: &Catalog) -> Result<()> {
        let document = serde_json::to_string(catalog)?;
        *self.lock() = Some(document);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use model::{path::Path as WalkPath, pin::Pin, settings::Theme, walk::Walk};
    use utility::{geo::Coordinate, id::Id};

    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("{name}-{}-{nanos}.json", std::process::id()))
    }

    fn catalog() -> Catalog {
        Catalog {
            pins: vec![Pin {
                id: Id::new(1_700_000_000_000),
                name: "Lookout".to_owned(),
                description: "windy".to_owned(),
                rating: 4,
                coordinate: Coordinate::new(54.3233, 10.1228),
                color: Default::default(),
                photo: Some("https://example.org/lookout.jpg".to_owned()),
            }],
            walks: vec![Walk {
                id: Id::new(1_700_000_000_001),
                name: "Harbour".to_owned(),
                description: String::new(),
                rating: 5,
                path: WalkPath::from(vec![
                    Coordinate::new(54.3233, 10.1228),
                    Coordinate::new(54.3301, 10.1399),
                ]),
                distance_km: 1.28,
                color: model::color::Color::Red,
                photo: None,
                elevation: Some(vec![3.25, 7.5, 12.125]),
                elevation_stale: true,
            }],
            theme: Theme::Dark,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let path = scratch_file("journal-round-trip");
        let store = JsonFileStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        assert!(store.load().await.unwrap().is_none());

        store.save(&catalog()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(catalog()));
        assert!(!store.scratch_path().exists());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let path = scratch_file("journal-malformed");
        tokio::fs::write(&path, "{\"pins\": 3}").await.unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load().await, Err(StoreError::Json(_))));
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn saving_into_missing_directory_fails() {
        let path = scratch_file("journal-missing-dir").join("journal.json");
        let store = JsonFileStore::new(path);
        assert!(matches!(store.save(&catalog()).await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn memory_store_counts_saves() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert_eq!(store.document(), None);
        store.save(&Catalog::default()).await.unwrap();
        store.save(&catalog()).await.unwrap();
        assert_eq!(store.saves(), 2);
        let document = store.document().unwrap();
        assert!(document.contains("\"elevationStale\":true"));
        assert_eq!(store.load().await.unwrap(), Some(catalog()));

        let seeded = MemoryStore::with_catalog(&catalog()).unwrap();
        assert_eq!(seeded.saves(), 0);
        assert_eq!(seeded.load().await.unwrap(), Some(catalog()));
    }
}
