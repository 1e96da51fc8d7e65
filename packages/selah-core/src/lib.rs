//! # Selah
//!
//! Chord sheets ("cifras") from a realtime song database, searched by title or
//! artist and shown in any of the twelve keys.
//!
//! The only real algorithm is the transposition engine: a grammar-driven scan
//! of free text that rewrites every chord symbol and leaves lyrics alone.
//!
//! ```rust
//! use selah::{normalize_root, transpose_text, PitchClass};
//!
//! assert_eq!(transpose_text("C G Am F", Some("C"), Some("D")), "D A Bm G");
//! assert_eq!(normalize_root("Bb"), Some(PitchClass::ASharp));
//! ```

pub mod chord;
pub mod config;
pub mod detect;
pub mod error;
pub mod lexer;
pub mod pitch;
pub mod sheet;
pub mod song;
pub mod source;
pub mod transpose;
pub mod viewer;

pub use chord::ChordToken;
pub use config::Config;
pub use detect::{detect_key, detect_key_within, key_root};
pub use error::*;
pub use lexer::{chords, tokenize, Segment};
pub use pitch::{normalize_root, parse_key, PitchClass, TONES};
pub use sheet::{parse_sheet, Sheet};
pub use song::{slugify, Catalog, Snapshot, Song};
pub use source::{FileSource, MemorySource, SnapshotEvent, SongSource, Subscription};
pub use transpose::{semitone_offset, transpose_chord, transpose_text, transpose_text_by};
pub use viewer::{LoadState, Viewer};
