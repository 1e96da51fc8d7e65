//! # Song Data Sources
//!
//! Songs live in an external key-value store that pushes a full snapshot of a
//! collection to its subscribers whenever anything changes. This module
//! models that contract:
//!
//! - [`SongSource::subscribe`] registers a listener for one collection and
//!   returns a [`Subscription`] handle
//! - the listener receives [`SnapshotEvent::Data`] for every snapshot (a
//!   missing collection arrives as `Data(None)`) or a single
//!   [`SnapshotEvent::Failed`]
//! - dropping the handle, or calling [`Subscription::unsubscribe`], stops
//!   delivery; release happens exactly once
//!
//! [`MemorySource`] keeps snapshots in process and is what tests and the
//! browser bindings feed. [`FileSource`] reads a JSON export of the database.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use serde_json::Value;

use crate::error::SelahError;
use crate::song::{Snapshot, Song};

/// What a subscriber is told about its collection.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEvent {
    /// The current contents of the collection; `None` when it does not exist
    Data(Option<Snapshot>),
    /// The source could not deliver the collection
    Failed(String),
}

pub type Listener = Box<dyn FnMut(SnapshotEvent) + Send>;

/// Handle for an active subscription. Released on drop.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release, for sources that deliver once.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Anything that can stream snapshots of a named collection.
pub trait SongSource {
    fn subscribe(&self, collection: &str, listener: Listener) -> Subscription;
}

/// Split a database path like `cifras` or `app/cifras` into its segments.
fn path_segments(collection: &str) -> impl Iterator<Item = &str> {
    collection.split('/').filter(|segment| !segment.is_empty())
}

/// Extract the collection at `collection` from a database export.
///
/// A missing node or a `null` value is an absent snapshot, not an error.
pub fn parse_snapshot(json: &str, collection: &str) -> Result<Option<Snapshot>, SelahError> {
    let root: Value = serde_json::from_str(json)?;
    let mut node = &root;
    for segment in path_segments(collection) {
        match node.get(segment) {
            Some(child) => node = child,
            None => return Ok(None),
        }
    }
    if node.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(node.clone())?))
}

struct Registered {
    id: u64,
    collection: String,
    listener: Listener,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    listeners: Vec<Registered>,
    latest: HashMap<String, SnapshotEvent>,
}

/// In-process source. Listeners are called synchronously and must not call
/// back into the same source.
#[derive(Clone, Default)]
pub struct MemorySource {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, collection: &str, event: SnapshotEvent) {
        let mut state = self.lock();
        state.latest.insert(collection.to_string(), event.clone());
        for registered in state
            .listeners
            .iter_mut()
            .filter(|registered| registered.collection == collection)
        {
            (registered.listener)(event.clone());
        }
    }

    /// Replace the whole collection and notify its subscribers.
    pub fn publish(&self, collection: &str, snapshot: Option<Snapshot>) {
        debug!(
            "publishing {} records to '{}'",
            snapshot.as_ref().map_or(0, |s| s.len()),
            collection
        );
        self.emit(collection, SnapshotEvent::Data(snapshot));
    }

    /// Report a failure to the collection's subscribers.
    pub fn fail(&self, collection: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("collection '{}' failed: {}", collection, message);
        self.emit(collection, SnapshotEvent::Failed(message));
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

impl SongSource for MemorySource {
    fn subscribe(&self, collection: &str, mut listener: Listener) -> Subscription {
        let mut state = self.lock();
        if let Some(event) = state.latest.get(collection) {
            listener(event.clone());
        }
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(Registered {
            id,
            collection: collection.to_string(),
            listener,
        });
        drop(state);

        let shared = Arc::clone(&self.state);
        Subscription::new(move || {
            let mut state = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            state.listeners.retain(|registered| registered.id != id);
        })
    }
}

/// A JSON export of the database on disk.
///
/// Subscribing reads the file once; there are no live updates.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection once.
    pub fn load(&self, collection: &str) -> Result<Option<Snapshot>, SelahError> {
        let json = fs::read_to_string(&self.path)?;
        parse_snapshot(&json, collection)
    }

    /// Write `song` under `collection/id`, replacing any existing record.
    ///
    /// The file is created when missing; other nodes are preserved.
    pub fn store(&self, collection: &str, id: &str, song: &Song) -> Result<(), SelahError> {
        let mut root: Value = if self.path.exists() {
            let json = fs::read_to_string(&self.path)?;
            if json.trim().is_empty() {
                Value::Object(Default::default())
            } else {
                serde_json::from_str(&json)?
            }
        } else {
            Value::Object(Default::default())
        };

        let mut node = &mut root;
        for segment in path_segments(collection).chain(std::iter::once(id)) {
            if !node.is_object() {
                *node = Value::Object(Default::default());
            }
            node = node
                .as_object_mut()
                .map(|object| object.entry(segment).or_insert(Value::Null))
                .ok_or_else(|| SelahError::LoadError(format!("cannot write '{}'", segment)))?;
        }
        *node = serde_json::to_value(song)?;

        fs::write(&self.path, serde_json::to_string_pretty(&root)?)?;
        debug!("stored '{}/{}' in {}", collection, id, self.path.display());
        Ok(())
    }
}

impl SongSource for FileSource {
    fn subscribe(&self, collection: &str, mut listener: Listener) -> Subscription {
        match self.load(collection) {
            Ok(snapshot) => listener(SnapshotEvent::Data(snapshot)),
            Err(e) => {
                warn!("failed to load {}: {}", self.path.display(), e);
                listener(SnapshotEvent::Failed(e.to_string()));
            }
        }
        Subscription::detached()
    }
}
