//! Type-erased asset cache
//!
//! Assets are stored as `Arc<dyn Any + Send + Sync>` and addressed by
//! [`AssetHandle`]. A handle can also be registered under a short name
//! ("book", "character") so scene code can look assets up by key.
//!
//! # Example
//!
//! ```ignore
//! let mut cache = AssetCache::new();
//! let handle = cache.load::<ModelAsset>("assets/glb/book.glb")?;
//! cache.alias("book", &handle);
//! let book: Arc<ModelAsset> = cache.get_named::<ModelAsset>("book").unwrap();
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_error::AssetError;

/// Unique identifier for an asset in the cache.
///
/// IDs are assigned sequentially starting from 1; 0 is never a valid asset.
pub type AssetId = u64;

/// A lightweight handle to a cached asset.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// The file path this asset was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trait for types that can be loaded from files and cached.
///
/// The type must be `Send + Sync + 'static` so it can be decoded on a worker
/// thread and shared afterwards.
pub trait Asset: Sized + Send + Sync + 'static {
    /// Load this asset from the given file path.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the file cannot be read or decoded.
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

struct CachedEntry {
    data: Arc<dyn Any + Send + Sync>,
    path: PathBuf,
}

/// Path-deduplicated store of decoded assets
pub struct AssetCache {
    assets: HashMap<AssetId, CachedEntry>,
    /// Reverse index from file path to asset ID
    path_index: HashMap<PathBuf, AssetId>,
    /// Short names registered for handles
    names: HashMap<String, AssetId>,
    next_id: u64,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            path_index: HashMap::new(),
            names: HashMap::new(),
            next_id: 1, // 0 is reserved as "no asset"
        }
    }

    /// Load an asset synchronously, or return the cached handle if the path
    /// was loaded before.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the file cannot be loaded.
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref().to_path_buf();
        if let Some(&id) = self.path_index.get(&path) {
            return Ok(AssetHandle { id, path });
        }
        let data = T::load_from_file(&path)?;
        Ok(self.insert(path, data))
    }

    /// Store an asset decoded elsewhere (e.g. by the background loader)
    ///
    /// If the path is already cached, the stored data is replaced and the
    /// existing handle returned.
    pub fn insert<T: Asset>(&mut self, path: impl AsRef<Path>, asset: T) -> AssetHandle {
        let path = path.as_ref().to_path_buf();
        let data: Arc<dyn Any + Send + Sync> = Arc::new(asset);

        if let Some(&id) = self.path_index.get(&path) {
            if let Some(entry) = self.assets.get_mut(&id) {
                entry.data = data;
            }
            return AssetHandle { id, path };
        }

        let id = self.next_id;
        self.next_id += 1;
        self.assets.insert(
            id,
            CachedEntry {
                data,
                path: path.clone(),
            },
        );
        self.path_index.insert(path.clone(), id);
        log::debug!("Cached asset {} as #{}", path.display(), id);

        AssetHandle { id, path }
    }

    /// Retrieve a cached asset, downcasting to the requested type.
    ///
    /// Returns `None` if the handle is stale or the stored type differs.
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let entry = self.assets.get(&handle.id)?;
        entry.data.clone().downcast::<T>().ok()
    }

    /// Register a short name for a handle, replacing any previous one
    pub fn alias(&mut self, name: &str, handle: &AssetHandle) {
        self.names.insert(name.to_string(), handle.id);
    }

    /// Handle registered under `name`
    pub fn handle_named(&self, name: &str) -> Option<AssetHandle> {
        let id = *self.names.get(name)?;
        let entry = self.assets.get(&id)?;
        Some(AssetHandle {
            id,
            path: entry.path.clone(),
        })
    }

    /// Asset registered under `name`
    pub fn get_named<T: Asset>(&self, name: &str) -> Result<Arc<T>, AssetError> {
        self.handle_named(name)
            .and_then(|h| self.get::<T>(&h))
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Drop an asset and any names pointing at it
    pub fn remove(&mut self, handle: &AssetHandle) -> bool {
        let Some(entry) = self.assets.remove(&handle.id) else {
            return false;
        };
        self.path_index.remove(&entry.path);
        self.names.retain(|_, id| *id != handle.id);
        true
    }

    pub fn contains(&self, handle: &AssetHandle) -> bool {
        self.assets.contains_key(&handle.id)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}
