//! Background asset loading
//!
//! Each request decodes on its own worker thread. Results come back over a
//! channel and are collected with [`AssetLoader::poll`] on the thread that
//! owns the scene, so scene state is never touched off that thread.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::asset_cache::Asset;
use crate::asset_error::AssetError;

/// Which scene slot a load fills
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Book,
    Character,
}

impl AssetKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKey::Book => "book",
            AssetKey::Character => "character",
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one background load
#[derive(Debug)]
pub struct AssetEvent<T> {
    pub key: AssetKey,
    pub path: PathBuf,
    pub result: Result<T, AssetError>,
}

/// Spawns loads and hands back their results
pub struct AssetLoader<T: Asset> {
    sender: Sender<AssetEvent<T>>,
    receiver: Receiver<AssetEvent<T>>,
    in_flight: usize,
}

impl<T: Asset> Default for AssetLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Asset> AssetLoader<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start decoding `path` in the background
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Io`] if the worker thread cannot be spawned.
    /// Decode failures arrive later through [`poll`](Self::poll).
    pub fn request(&mut self, key: AssetKey, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref().to_path_buf();
        let sender = self.sender.clone();
        log::debug!("Loading {} from {}", key, path.display());

        thread::Builder::new()
            .name(format!("asset-{}", key))
            .spawn(move || {
                let result = T::load_from_file(&path);
                // The receiver is gone once the scene is torn down
                let _ = sender.send(AssetEvent { key, path, result });
            })?;

        self.in_flight += 1;
        Ok(())
    }

    /// Collect every finished load without blocking
    pub fn poll(&mut self) -> Vec<AssetEvent<T>> {
        let events: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(events.len());
        events
    }

    /// Block until one load finishes or `timeout` passes
    pub fn wait(&mut self, timeout: Duration) -> Option<AssetEvent<T>> {
        if self.in_flight == 0 {
            return None;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.in_flight -= 1;
                Some(event)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests whose results have not been collected yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
