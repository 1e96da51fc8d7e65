//! # Song Records
//!
//! The record shape stored in the realtime database, and the in-memory
//! catalog built from each snapshot of the collection.
//!
//! ```text
//! cifras/
//!   ousado-amor-isaias-saad/
//!     titulo:          "Ousado Amor"
//!     artista:         "Isaías Saad"
//!     tom_original:    "G"
//!     cifra_original:  "G  D/F#  Em ..."
//!     url_original:    "https://..."
//!     processado_em:   "42"
//! ```
//!
//! Records are replaced wholesale on every snapshot; the catalog is rebuilt
//! from scratch rather than patched.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::pitch::{parse_key, PitchClass};
use crate::transpose::transpose_text;

/// Slug used when a title and artist leave nothing usable.
pub const EMPTY_SLUG: &str = "sem-titulo";

/// One song as stored in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "titulo", default)]
    pub title: String,

    #[serde(rename = "artista", default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Key the sheet is written in, as stored (may be empty or unparseable)
    #[serde(rename = "tom_original", default, skip_serializing_if = "Option::is_none")]
    pub original_key: Option<String>,

    /// Chord-annotated lyrics
    #[serde(rename = "cifra_original", default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    #[serde(rename = "url_original", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(rename = "processado_em", default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Artist, treating an empty string as absent.
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref().filter(|artist| !artist.trim().is_empty())
    }

    /// Original key as a pitch class, if it is one.
    pub fn original_key(&self) -> Option<PitchClass> {
        self.original_key.as_deref().and_then(parse_key)
    }

    /// Sheet text, empty when the record has none.
    pub fn sheet(&self) -> &str {
        self.sheet.as_deref().unwrap_or("")
    }

    /// Case-insensitive substring match on title or artist.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self
                .artist
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&query)
    }

    /// The sheet shown in `target` key; unchanged when the original key is unknown.
    pub fn transposed(&self, target: Option<PitchClass>) -> Cow<'_, str> {
        let target = target.map(PitchClass::name);
        transpose_text(self.sheet(), self.original_key.as_deref(), target)
    }

    pub fn slug(&self) -> String {
        slugify(&self.title, self.artist.as_deref().unwrap_or(""))
    }
}

/// One snapshot of the collection: record id -> record.
pub type Snapshot = BTreeMap<String, Song>;

/// Strip accents and lowercase, for comparisons and slugs.
fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Build the record id for a song from its title and artist.
///
/// ```
/// use selah::slugify;
/// assert_eq!(slugify("Ousado Amor", "Isaías Saad"), "ousado-amor-isaias-saad");
/// assert_eq!(slugify("  ", ""), "sem-titulo");
/// ```
pub fn slugify(title: &str, artist: &str) -> String {
    let folded = fold(&format!("{} {}", title, artist));
    let cleaned: String = folded
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    let slug = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Title order for song lists: accents and case are ignored first.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Songs of one snapshot, sorted by title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<(String, Song)>,
}

impl Catalog {
    /// A missing snapshot is an empty collection.
    pub fn from_snapshot(snapshot: Option<Snapshot>) -> Self {
        let mut entries: Vec<(String, Song)> = snapshot.unwrap_or_default().into_iter().collect();
        entries.sort_by(|(id_a, a), (id_b, b)| {
            compare_titles(&a.title, &b.title).then_with(|| id_a.cmp(id_b))
        });
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.entries.iter().map(|(_, song)| song)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Song)> {
        self.entries.iter().map(|(id, song)| (id.as_str(), song))
    }

    /// Songs whose title or artist contains `query`, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Song> {
        self.songs().filter(|song| song.matches(query)).collect()
    }

    /// Look up by record id, then by exact (case-insensitive) title.
    pub fn find(&self, id_or_title: &str) -> Option<&Song> {
        self.entries
            .iter()
            .find(|(id, _)| id == id_or_title)
            .or_else(|| {
                let wanted = fold(id_or_title);
                self.entries.iter().find(|(_, song)| fold(&song.title) == wanted)
            })
            .map(|(_, song)| song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, artist: &str, key: &str) -> Song {
        Song {
            title: title.to_string(),
            artist: Some(artist.to_string()),
            original_key: Some(key.to_string()),
            sheet: Some("G D Em C".to_string()),
            ..Song::default()
        }
    }

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert("b".into(), song("Ousado Amor", "Isaías Saad", "G"));
        snapshot.insert("a".into(), song("Águas Purificadoras", "Diante do Trono", "A"));
        snapshot.insert("c".into(), song("Bondade de Deus", "Isaías Saad", "C"));
        snapshot
    }

    #[test]
    fn test_record_field_names() {
        let json = r#"{
            "titulo": "Lugar Secreto",
            "artista": "Gabriela Rocha",
            "tom_original": "D",
            "cifra_original": "D  A  Bm  G",
            "url_original": "https://i.postimg.cc/x.png",
            "processado_em": "17",
            "extra": true
        }"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.title, "Lugar Secreto");
        assert_eq!(song.artist(), Some("Gabriela Rocha"));
        assert_eq!(song.original_key(), Some(PitchClass::D));
        assert_eq!(song.sheet(), "D  A  Bm  G");
        assert_eq!(song.processed_at.as_deref(), Some("17"));
    }

    #[test]
    fn test_sparse_record() {
        let song: Song = serde_json::from_str(r#"{"titulo": "Só Título"}"#).unwrap();
        assert_eq!(song.artist(), None);
        assert_eq!(song.original_key(), None);
        assert_eq!(song.sheet(), "");
        let json = serde_json::to_string(&song).unwrap();
        assert_eq!(json, r#"{"titulo":"Só Título"}"#);
    }

    #[test]
    fn test_catalog_sorted_ignoring_accents() {
        let catalog = Catalog::from_snapshot(Some(snapshot()));
        let titles: Vec<_> = catalog.songs().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Águas Purificadoras", "Bondade de Deus", "Ousado Amor"]);
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let catalog = Catalog::from_snapshot(None);
        assert!(catalog.is_empty());
        assert!(catalog.search("").is_empty());
    }

    #[test]
    fn test_search_title_or_artist() {
        let catalog = Catalog::from_snapshot(Some(snapshot()));
        assert_eq!(catalog.search("").len(), 3);
        assert_eq!(catalog.search("ISAÍAS").len(), 2);
        let found = catalog.search("amor");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Ousado Amor");
        assert!(catalog.search("hillsong").is_empty());
    }

    #[test]
    fn test_find_by_id_or_title() {
        let catalog = Catalog::from_snapshot(Some(snapshot()));
        assert_eq!(catalog.find("c").unwrap().title, "Bondade de Deus");
        assert_eq!(catalog.find("aguas purificadoras").unwrap().title, "Águas Purificadoras");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Águas Purificadoras", "Diante do Trono"),
            "aguas-purificadoras-diante-do-trono"
        );
        assert_eq!(slugify("Deus é Fiel!", ""), "deus-e-fiel");
        assert_eq!(
            slugify("Coração  Igual ao Teu", "Diante do Trono"),
            "coracao-igual-ao-teu-diante-do-trono"
        );
        assert_eq!(slugify("???", "!!!"), EMPTY_SLUG);
    }

    #[test]
    fn test_song_transposed() {
        let song = song("Ousado Amor", "Isaías Saad", "G");
        assert_eq!(song.transposed(Some(PitchClass::A)), "A E F#m D");
        assert_eq!(song.transposed(None), "G D Em C");

        let mut unknown = song.clone();
        unknown.original_key = Some(String::new());
        assert_eq!(unknown.transposed(Some(PitchClass::A)), "G D Em C");
    }
}
