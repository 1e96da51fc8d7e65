//! Local chord-sheet files.
//!
//! A sheet file is plain chord-annotated text, optionally preceded by a YAML
//! frontmatter block:
//!
//! ```text
//! ---
//! title: Ousado Amor
//! artist: Isaías Saad
//! key: G
//! ---
//! G        D/F#
//! Ousado amor ...
//! ```

use serde::Deserialize;

use crate::detect::{detect_key_within, key_root};
use crate::error::SelahError;
use crate::song::Song;

const FRONTMATTER_MARKER: &str = "---";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMetadata {
    title: Option<String>,
    artist: Option<String>,
    key: Option<String>,
    source: Option<String>,
}

/// A parsed sheet file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub source: Option<String>,
    pub body: String,
}

impl Sheet {
    /// Convert to a database record.
    ///
    /// A declared key is stored as the canonical name of its tonic. The key
    /// is detected from the body when none was declared or it has no root.
    pub fn into_song(self, fallback_title: &str, key_scan_limit: usize) -> Song {
        let key = self
            .key
            .as_deref()
            .and_then(key_root)
            .unwrap_or_else(|| detect_key_within(&self.body, key_scan_limit));
        Song {
            title: self.title.unwrap_or_else(|| fallback_title.to_string()),
            artist: self.artist,
            original_key: Some(key.name().to_string()),
            sheet: Some(self.body),
            source_url: self.source,
            processed_at: None,
        }
    }
}

/// Parse a sheet file.
///
/// # Errors
/// - `ParseError` when a frontmatter block is opened but never closed
/// - `MetadataError` when the frontmatter is not valid YAML for a sheet
pub fn parse_sheet(input: &str) -> Result<Sheet, SelahError> {
    let mut lines = input.split_inclusive('\n');
    let opens = input
        .lines()
        .next()
        .is_some_and(|first| first.trim_end() == FRONTMATTER_MARKER);
    if !opens {
        return Ok(Sheet {
            body: input.to_string(),
            ..Sheet::default()
        });
    }

    let mut consumed = lines.next().map_or(0, str::len);
    let metadata_start = consumed;
    let mut closed = None;
    for line in lines {
        if line.trim_end() == FRONTMATTER_MARKER {
            closed = Some((consumed, consumed + line.len()));
            break;
        }
        consumed += line.len();
    }

    let Some((metadata_end, body_start)) = closed else {
        return Err(SelahError::ParseError {
            line: 1,
            column: 1,
            message: "Frontmatter opened with '---' is never closed".to_string(),
        });
    };

    let content = &input[metadata_start..metadata_end];
    let raw: RawMetadata = if content.trim().is_empty() {
        RawMetadata::default()
    } else {
        serde_yaml::from_str(content).map_err(|e| SelahError::MetadataError(e.to_string()))?
    };

    Ok(Sheet {
        title: raw.title,
        artist: raw.artist,
        key: raw.key,
        source: raw.source,
        body: input[body_start..].to_string(),
    })
}
