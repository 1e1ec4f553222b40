// Background image decoding with an LRU cache, so the review loop never blocks on a large file

use crate::preview::{generate_image_preview, PreviewContent};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::debug;

/// Maximum number of cached previews
const CACHE_SIZE: usize = 10;

/// Represents a preview loading state
#[derive(Debug, Clone)]
pub enum PreviewState {
    /// Preview is loading
    Loading,
    /// Preview is ready with content
    Ready(PreviewContent),
    /// Preview failed with error
    Error(String),
}

/// Size and modification time of a file when its preview was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    pub fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// A preview is specific to the file contents and the zoom level it was rendered at.
///
/// The stamp keeps a preview from being served for a different file that
/// later took the same name (a rename onto a classified item's old name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub path: PathBuf,
    pub zoom_percent: u16,
    pub stamp: Option<FileStamp>,
}

impl PreviewKey {
    pub fn new(path: impl Into<PathBuf>, zoom_percent: u16) -> Self {
        Self {
            path: path.into(),
            zoom_percent,
            stamp: None,
        }
    }

    /// Key stamped with the current size and mtime of the file on disk
    pub fn for_file(path: &Path, zoom_percent: u16) -> Self {
        Self {
            path: path.to_path_buf(),
            zoom_percent,
            stamp: FileStamp::of(path),
        }
    }
}

/// Message types for the preview loader
enum PreviewRequest {
    Load {
        key: PreviewKey,
        response_tx: oneshot::Sender<PreviewState>,
    },
    Cancel {
        key: PreviewKey,
    },
    Shutdown,
}

/// LRU-like cache for previews
#[derive(Debug)]
struct PreviewCache {
    cache: HashMap<PreviewKey, PreviewContent>,
    /// Most recent at end
    access_order: Vec<PreviewKey>,
    max_size: usize,
}

impl PreviewCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    /// Get a cached preview, updating access order
    fn get(&mut self, key: &PreviewKey) -> Option<PreviewContent> {
        let preview = self.cache.get(key)?.clone();
        self.access_order.retain(|k| k != key);
        self.access_order.push(key.clone());
        Some(preview)
    }

    /// Insert a preview, evicting the least recently used if necessary
    fn insert(&mut self, key: PreviewKey, preview: PreviewContent) {
        if self.cache.contains_key(&key) {
            self.access_order.retain(|k| k != &key);
        } else if self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(key.clone(), preview);
        self.access_order.push(key);
    }

    #[cfg(test)]
    fn contains(&self, key: &PreviewKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Drops every zoom level cached for `path`
    fn forget(&mut self, path: &Path) {
        self.cache.retain(|k, _| k.path != path);
        self.access_order.retain(|k| k.path != path);
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Handle for sending requests to the preview loader
#[derive(Clone)]
pub struct PreviewLoader {
    request_tx: mpsc::Sender<PreviewRequest>,
    cache: Arc<Mutex<PreviewCache>>,
    /// Track current loading key to allow cancellation
    current_loading: Arc<Mutex<Option<PreviewKey>>>,
}

impl PreviewLoader {
    /// Create a new preview loader with a background task.
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (request_tx, request_rx) = mpsc::channel(32);
        let cache = Arc::new(Mutex::new(PreviewCache::new(CACHE_SIZE)));
        let current_loading = Arc::new(Mutex::new(None));

        let loader = Self {
            request_tx,
            cache: Arc::clone(&cache),
            current_loading: Arc::clone(&current_loading),
        };

        tokio::spawn(Self::worker(request_rx, cache, current_loading));

        loader
    }

    async fn worker(
        mut request_rx: mpsc::Receiver<PreviewRequest>,
        cache: Arc<Mutex<PreviewCache>>,
        current_loading: Arc<Mutex<Option<PreviewKey>>>,
    ) {
        while let Some(request) = request_rx.recv().await {
            match request {
                PreviewRequest::Load { key, response_tx } => {
                    {
                        let mut cache_guard = cache.lock().await;
                        if let Some(cached) = cache_guard.get(&key) {
                            let _ = response_tx.send(PreviewState::Ready(cached));
                            continue;
                        }
                    }

                    *current_loading.lock().await = Some(key.clone());

                    let path = key.path.clone();
                    let zoom_percent = key.zoom_percent;
                    let result = tokio::task::spawn_blocking(move || {
                        generate_image_preview(&path, zoom_percent)
                    })
                    .await;

                    {
                        let loading = current_loading.lock().await;
                        if loading.as_ref() != Some(&key) {
                            debug!(path = %key.path.display(), "preview cancelled");
                            continue;
                        }
                    }

                    let state = match result {
                        Ok(Ok(preview)) => {
                            cache.lock().await.insert(key.clone(), preview.clone());
                            PreviewState::Ready(preview)
                        }
                        Ok(Err(e)) => {
                            debug!(path = %key.path.display(), error = %e, "preview failed");
                            PreviewState::Error(e.to_string())
                        }
                        Err(e) => PreviewState::Error(format!("Task panicked: {}", e)),
                    };

                    {
                        let mut loading = current_loading.lock().await;
                        if loading.as_ref() == Some(&key) {
                            *loading = None;
                        }
                    }

                    let _ = response_tx.send(state);
                }
                PreviewRequest::Cancel { key } => {
                    let mut loading = current_loading.lock().await;
                    if loading.as_ref() == Some(&key) {
                        *loading = None;
                    }
                }
                PreviewRequest::Shutdown => break,
            }
        }
    }

    /// Queues a load and returns the receiver for its result
    async fn submit(&self, key: PreviewKey) -> Option<oneshot::Receiver<PreviewState>> {
        let (response_tx, response_rx) = oneshot::channel();
        let request = PreviewRequest::Load { key, response_tx };
        self.request_tx.send(request).await.ok()?;
        Some(response_rx)
    }

    /// Request a preview and wait for it (cached results return immediately)
    pub async fn request_preview(&self, key: &PreviewKey) -> PreviewState {
        if let Some(cached) = self.get_cached(key).await {
            return PreviewState::Ready(cached);
        }

        let Some(response_rx) = self.submit(key.clone()).await else {
            return PreviewState::Error("Preview loader shut down".to_string());
        };

        match tokio::time::timeout(std::time::Duration::from_secs(5), response_rx).await {
            Ok(Ok(state)) => state,
            Ok(Err(_)) => PreviewState::Error("Response channel closed".to_string()),
            Err(_) => PreviewState::Error("Preview timed out".to_string()),
        }
    }

    pub async fn get_cached(&self, key: &PreviewKey) -> Option<PreviewContent> {
        self.cache.lock().await.get(key)
    }

    /// Cancel the preview currently being decoded, if any
    pub async fn cancel_current(&self) {
        let key = self.current_loading.lock().await.clone();
        if let Some(key) = key {
            let _ = self.request_tx.send(PreviewRequest::Cancel { key }).await;
        }
    }

    /// Drops cached previews of a file whose contents may have changed
    pub async fn forget(&self, path: &Path) {
        self.cache.lock().await.forget(path);
    }

    pub async fn shutdown(&self) {
        let _ = self.request_tx.send(PreviewRequest::Shutdown).await;
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }
}

impl Default for PreviewLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Synchronous wrapper for preview loading in non-async contexts.
/// Uses a polling approach for integration with the synchronous TUI loop.
pub struct SyncPreviewManager {
    loader: PreviewLoader,
    runtime: tokio::runtime::Runtime,
    current_state: PreviewState,
    current_key: Option<PreviewKey>,
    receiver: Option<oneshot::Receiver<PreviewState>>,
}

impl SyncPreviewManager {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let loader = runtime.block_on(async { PreviewLoader::new() });

        Ok(Self {
            loader,
            runtime,
            current_state: PreviewState::Loading,
            current_key: None,
            receiver: None,
        })
    }

    /// Request a preview for `path` at `zoom_percent`; returns the current state without blocking
    pub fn request_preview(&mut self, path: &Path, zoom_percent: u16) -> &PreviewState {
        let key = PreviewKey::for_file(path, zoom_percent);

        if self.current_key.as_ref() != Some(&key) {
            if self.current_key.is_some() {
                self.runtime.block_on(self.loader.cancel_current());
            }

            self.current_key = Some(key.clone());
            self.receiver = None;

            if let Some(cached) = self.runtime.block_on(self.loader.get_cached(&key)) {
                self.current_state = PreviewState::Ready(cached);
                return &self.current_state;
            }

            self.current_state = PreviewState::Loading;
            self.receiver = self.runtime.block_on(self.loader.submit(key.clone()));
            if self.receiver.is_none() {
                self.current_state = PreviewState::Error("Preview loader shut down".to_string());
            }
        }

        if matches!(self.current_state, PreviewState::Loading) {
            if let Some(rx) = self.receiver.as_mut() {
                match rx.try_recv() {
                    Ok(state) => {
                        self.current_state = state;
                        self.receiver = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => {
                        // A cancelled duplicate may still have filled the cache
                        self.current_state =
                            match self.runtime.block_on(self.loader.get_cached(&key)) {
                                Some(cached) => PreviewState::Ready(cached),
                                None => PreviewState::Error("Preview channel closed".to_string()),
                            };
                        self.receiver = None;
                    }
                }
            }
        }

        &self.current_state
    }

    pub fn current_state(&self) -> &PreviewState {
        &self.current_state
    }

    /// Forget the active request (e.g., after the current file moved)
    pub fn reset(&mut self) {
        if self.current_key.is_some() {
            self.runtime.block_on(self.loader.cancel_current());
        }
        self.current_key = None;
        self.current_state = PreviewState::Loading;
        self.receiver = None;
    }

    /// Drops cached previews of `path` and resets if it is the one on screen
    pub fn invalidate(&mut self, path: &Path) {
        self.runtime.block_on(self.loader.forget(path));
        debug!(path = %path.display(), cached = self.cache_size(), "preview invalidated");
        if self.current_key.as_ref().is_some_and(|k| k.path == path) {
            self.reset();
        }
    }

    pub fn cache_size(&self) -> usize {
        self.runtime.block_on(self.loader.cache_size())
    }
}

impl Drop for SyncPreviewManager {
    fn drop(&mut self) {
        self.runtime.block_on(self.loader.shutdown());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Line;
    use tempfile::TempDir;

    fn content(label: &str) -> PreviewContent {
        PreviewContent {
            lines: vec![Line::from(label.to_string())],
            dimensions: (1, 1),
        }
    }

    fn first_line(preview: &PreviewContent) -> String {
        preview.lines[0]
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect()
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbImage::from_fn(8, 8, |x, y| image::Rgb([x as u8 * 30, y as u8 * 30, 0]));
        img.save(&path).unwrap();
        path
    }

    fn wait_ready(manager: &mut SyncPreviewManager, path: &Path, zoom: u16) -> bool {
        for _ in 0..40 {
            if matches!(manager.request_preview(path, zoom), PreviewState::Ready(_)) {
                return true;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        false
    }

    mod cache_tests {
        use super::*;

        #[test]
        fn test_cache_new() {
            let cache = PreviewCache::new(5);
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn test_cache_insert_and_get() {
            let mut cache = PreviewCache::new(5);
            let key = PreviewKey::new("/test/a.png", 40);

            cache.insert(key.clone(), content("a"));

            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&key));
            assert_eq!(first_line(&cache.get(&key).unwrap()), "a");
        }

        #[test]
        fn test_cache_zoom_levels_are_distinct() {
            let mut cache = PreviewCache::new(5);
            cache.insert(PreviewKey::new("/test/a.png", 40), content("small"));
            cache.insert(PreviewKey::new("/test/a.png", 80), content("large"));

            assert_eq!(cache.len(), 2);
            let large = cache.get(&PreviewKey::new("/test/a.png", 80)).unwrap();
            assert_eq!(first_line(&large), "large");
        }

        #[test]
        fn test_cache_lru_eviction() {
            let mut cache = PreviewCache::new(3);
            for i in 0..3 {
                cache.insert(PreviewKey::new(format!("/test/{}.png", i), 40), content("x"));
            }

            cache.insert(PreviewKey::new("/test/3.png", 40), content("x"));

            assert_eq!(cache.len(), 3);
            assert!(!cache.contains(&PreviewKey::new("/test/0.png", 40)));
            assert!(cache.contains(&PreviewKey::new("/test/3.png", 40)));
        }

        #[test]
        fn test_cache_access_updates_order() {
            let mut cache = PreviewCache::new(3);
            for i in 0..3 {
                cache.insert(PreviewKey::new(format!("/test/{}.png", i), 40), content("x"));
            }

            let _ = cache.get(&PreviewKey::new("/test/0.png", 40));
            cache.insert(PreviewKey::new("/test/3.png", 40), content("x"));

            assert!(cache.contains(&PreviewKey::new("/test/0.png", 40)));
            assert!(!cache.contains(&PreviewKey::new("/test/1.png", 40)));
        }

        #[test]
        fn test_cache_update_existing() {
            let mut cache = PreviewCache::new(5);
            let key = PreviewKey::new("/test/a.png", 40);

            cache.insert(key.clone(), content("old"));
            cache.insert(key.clone(), content("new"));

            assert_eq!(cache.len(), 1);
            assert_eq!(first_line(&cache.get(&key).unwrap()), "new");
        }

        #[test]
        fn test_cache_forget_path() {
            let mut cache = PreviewCache::new(5);
            cache.insert(PreviewKey::new("/test/a.png", 40), content("x"));
            cache.insert(PreviewKey::new("/test/a.png", 50), content("x"));
            cache.insert(PreviewKey::new("/test/b.png", 40), content("x"));

            cache.forget(Path::new("/test/a.png"));

            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&PreviewKey::new("/test/b.png", 40)));
        }
    }

    mod async_loader_tests {
        use super::*;

        #[tokio::test]
        async fn test_preview_loader_creation() {
            let loader = PreviewLoader::new();
            assert_eq!(loader.cache_size().await, 0);
        }

        #[tokio::test]
        async fn test_preview_loader_caches_result() {
            let temp_dir = TempDir::new().unwrap();
            let key = PreviewKey::new(write_png(temp_dir.path(), "a.png"), 40);

            let loader = PreviewLoader::new();

            let state = loader.request_preview(&key).await;
            assert!(matches!(state, PreviewState::Ready(_)));
            assert_eq!(loader.cache_size().await, 1);

            let state = loader.request_preview(&key).await;
            assert!(matches!(state, PreviewState::Ready(_)));
        }

        #[tokio::test]
        async fn test_preview_loader_handles_nonexistent_file() {
            let loader = PreviewLoader::new();
            let state = loader
                .request_preview(&PreviewKey::new("/nonexistent/a.png", 40))
                .await;
            assert!(matches!(state, PreviewState::Error(_)));
        }

        #[tokio::test]
        async fn test_preview_loader_shutdown() {
            let loader = PreviewLoader::new();
            loader.shutdown().await;
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let state = loader
                .request_preview(&PreviewKey::new("/test/a.png", 40))
                .await;
            assert!(matches!(state, PreviewState::Error(_)));
        }
    }

    mod sync_manager_tests {
        use super::*;

        #[test]
        fn test_sync_manager_creation() {
            let manager = SyncPreviewManager::new().unwrap();
            assert_eq!(manager.cache_size(), 0);
            assert!(matches!(manager.current_state(), PreviewState::Loading));
        }

        #[test]
        fn test_sync_manager_request_preview() {
            let temp_dir = TempDir::new().unwrap();
            let path = write_png(temp_dir.path(), "a.png");

            let mut manager = SyncPreviewManager::new().unwrap();
            assert!(wait_ready(&mut manager, &path, 40));
        }

        #[test]
        fn test_sync_manager_zoom_change_loads_again() {
            let temp_dir = TempDir::new().unwrap();
            let path = write_png(temp_dir.path(), "a.png");

            let mut manager = SyncPreviewManager::new().unwrap();
            assert!(wait_ready(&mut manager, &path, 40));
            assert!(wait_ready(&mut manager, &path, 50));

            assert_eq!(manager.cache_size(), 2);
            // Back to a cached zoom level is immediate
            assert!(matches!(
                manager.request_preview(&path, 40),
                PreviewState::Ready(_)
            ));
        }

        #[test]
        fn test_sync_manager_error_for_non_image() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("bad.png");
            std::fs::write(&path, b"not an image").unwrap();

            let mut manager = SyncPreviewManager::new().unwrap();
            let mut errored = false;
            for _ in 0..40 {
                if matches!(manager.request_preview(&path, 40), PreviewState::Error(_)) {
                    errored = true;
                    break;
                }
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            assert!(errored);
        }

        #[test]
        fn test_sync_manager_invalidate() {
            let temp_dir = TempDir::new().unwrap();
            let path = write_png(temp_dir.path(), "a.png");

            let mut manager = SyncPreviewManager::new().unwrap();
            assert!(wait_ready(&mut manager, &path, 40));

            manager.invalidate(&path);

            assert_eq!(manager.cache_size(), 0);
            assert!(matches!(manager.current_state(), PreviewState::Loading));
        }

        fn ready_dimensions(manager: &mut SyncPreviewManager, path: &Path) -> Option<(u32, u32)> {
            if !wait_ready(manager, path, 40) {
                return None;
            }
            match manager.current_state() {
                PreviewState::Ready(preview) => Some(preview.dimensions),
                _ => None,
            }
        }

        #[test]
        fn test_sync_manager_rename_onto_classified_name_reloads() {
            use crate::domain::{open_session, DiscoveryOptions, Intent, Label};

            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path();
            image::RgbImage::from_pixel(64, 64, image::Rgb([200, 0, 0]))
                .save(root.join("a.png"))
                .unwrap();
            image::RgbImage::from_pixel(20, 6, image::Rgb([0, 0, 200]))
                .save(root.join("b.png"))
                .unwrap();

            let mut session = open_session(root, &DiscoveryOptions::default(), 10).unwrap();
            let mut manager = SyncPreviewManager::new().unwrap();
            assert_eq!(ready_dimensions(&mut manager, &root.join("a.png")), Some((64, 64)));

            // a.png leaves the folder but its preview stays cached
            assert!(session.apply(Intent::Classify(Label::Approved)).is_ok());
            assert!(session.apply(Intent::Rename("a".to_string())).is_ok());
            assert_eq!(session.current(), Some("a.png"));

            assert_eq!(ready_dimensions(&mut manager, &root.join("a.png")), Some((20, 6)));
        }

        #[test]
        fn test_sync_manager_rewritten_file_reloads() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("a.png");
            image::RgbImage::from_pixel(8, 8, image::Rgb([0, 200, 0]))
                .save(&path)
                .unwrap();

            let mut manager = SyncPreviewManager::new().unwrap();
            assert_eq!(ready_dimensions(&mut manager, &path), Some((8, 8)));

            image::RgbImage::from_pixel(30, 12, image::Rgb([0, 200, 0]))
                .save(&path)
                .unwrap();

            assert_eq!(ready_dimensions(&mut manager, &path), Some((30, 12)));
        }

        #[test]
        fn test_sync_manager_reset() {
            let temp_dir = TempDir::new().unwrap();
            let path = write_png(temp_dir.path(), "a.png");

            let mut manager = SyncPreviewManager::new().unwrap();
            let _ = manager.request_preview(&path, 40);

            manager.reset();
            assert!(matches!(manager.current_state(), PreviewState::Loading));
        }
    }
}
