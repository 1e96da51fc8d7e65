//! # Viewer State
//!
//! Everything the display layer needs between two renders: whether songs have
//! loaded, the search query, which song is open, and the key it is shown in.
//! Rendering itself is left to the caller.
//!
//! ```text
//! Loading --Data--> Ready --Failed--> Failed (terminal)
//!    \------------Failed-------------/
//! ```

use std::borrow::Cow;

use log::{info, warn};

use crate::config::Config;
use crate::pitch::PitchClass;
use crate::song::{Catalog, Song};
use crate::source::SnapshotEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Load error shown to the user; never retried
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Viewer {
    state: LoadState,
    catalog: Catalog,
    query: String,
    selected: Option<Song>,
    key: PitchClass,
    default_key: PitchClass,
    placeholder: String,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(PitchClass::C, crate::config::DEFAULT_PLACEHOLDER)
    }
}

impl Viewer {
    pub fn new(default_key: PitchClass, placeholder: impl Into<String>) -> Self {
        Self {
            state: LoadState::Loading,
            catalog: Catalog::default(),
            query: String::new(),
            selected: None,
            key: default_key,
            default_key,
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let default_key = config.default_key().unwrap_or(PitchClass::C);
        Self::new(default_key, config.placeholder.clone())
    }

    /// Apply an event from the song source.
    pub fn handle(&mut self, event: SnapshotEvent) {
        if matches!(self.state, LoadState::Failed(_)) {
            return;
        }
        match event {
            SnapshotEvent::Data(snapshot) => {
                self.catalog = Catalog::from_snapshot(snapshot);
                self.state = LoadState::Ready;
                info!("loaded {} songs", self.catalog.len());
            }
            SnapshotEvent::Failed(message) => {
                warn!("song collection failed to load: {}", message);
                self.state = LoadState::Failed(message);
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Songs matching the current query.
    pub fn results(&self) -> Vec<&Song> {
        self.catalog.search(&self.query)
    }

    /// Open a song in its original key, or the default key when it has none.
    pub fn select(&mut self, song: Song) {
        self.key = song.original_key().unwrap_or(self.default_key);
        self.selected = Some(song);
    }

    /// Open a song by record id or title. Returns false when not found.
    pub fn select_by_id(&mut self, id_or_title: &str) -> bool {
        match self.catalog.find(id_or_title).cloned() {
            Some(song) => {
                self.select(song);
                true
            }
            None => false,
        }
    }

    pub fn back_to_list(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Song> {
        self.selected.as_ref()
    }

    pub fn key(&self) -> PitchClass {
        self.key
    }

    pub fn set_key(&mut self, key: PitchClass) {
        self.key = key;
    }

    /// Keys offered to the user.
    pub fn key_choices(&self) -> [PitchClass; 12] {
        PitchClass::ALL
    }

    /// Go back to the selected song's original key, if it has one.
    pub fn reset_to_original(&mut self) {
        if let Some(original) = self.selected.as_ref().and_then(Song::original_key) {
            self.key = original;
        }
    }

    /// True when a song is open in a key other than its original.
    pub fn is_transposed(&self) -> bool {
        self.selected
            .as_ref()
            .and_then(Song::original_key)
            .is_some_and(|original| original != self.key)
    }

    /// The open sheet in the current key, or the placeholder when there is
    /// nothing to show. Empty when no song is open.
    pub fn rendered_sheet(&self) -> Cow<'_, str> {
        let Some(song) = &self.selected else {
            return Cow::Borrowed("");
        };
        let sheet = song.transposed(Some(self.key));
        if sheet.is_empty() {
            Cow::Borrowed(self.placeholder.as_str())
        } else {
            sheet
        }
    }
}
