//! Original-key detection for imported chord sheets.
//!
//! Sheets usually announce their key in a header line such as `Tom: G` or
//! `Tonalidade = Eb`. When they don't, the first chord of the song is a good
//! guess, and C is the last resort.

use log::debug;

use crate::chord::{at_word_start, root_lengths};
use crate::lexer::chords;
use crate::pitch::{normalize_root, PitchClass};

/// How many characters from the top of the sheet are searched for a first chord.
pub const KEY_SCAN_LIMIT: usize = 500;

/// Words that introduce a declared key, matched case-insensitively.
const KEY_MARKERS: [&str; 3] = ["tonalidade", "tom", "key"];

/// Detect the original key of a sheet, scanning up to [`KEY_SCAN_LIMIT`]
/// characters for a first chord.
///
/// ```
/// use selah::{detect_key, PitchClass};
/// assert_eq!(detect_key("Tom: Eb\nEb  Bb  Cm"), PitchClass::DSharp);
/// assert_eq!(detect_key("Intro: G D Em C"), PitchClass::G);
/// assert_eq!(detect_key("no chords here"), PitchClass::C);
/// ```
pub fn detect_key(text: &str) -> PitchClass {
    detect_key_within(text, KEY_SCAN_LIMIT)
}

/// Like [`detect_key`] with an explicit scan limit, in characters.
pub fn detect_key_within(text: &str, scan_limit: usize) -> PitchClass {
    if let Some(key) = declared_key(text) {
        debug!("declared key {}", key);
        return key;
    }
    if let Some(key) = first_chord_key(text, scan_limit) {
        debug!("key {} taken from first chord", key);
        return key;
    }
    debug!("no key found, defaulting to C");
    PitchClass::C
}

/// Key announced by a `tom:`, `tonalidade:` or `key:` marker (`=` also accepted).
pub fn declared_key(text: &str) -> Option<PitchClass> {
    let bytes = text.as_bytes();
    (0..bytes.len())
        .filter(|&i| text.is_char_boundary(i) && at_word_start(text, i))
        .find_map(|i| {
            KEY_MARKERS.iter().find_map(|marker| {
                let end = i + marker.len();
                let matched = bytes
                    .get(i..end)
                    .is_some_and(|word| word.eq_ignore_ascii_case(marker.as_bytes()));
                if matched {
                    key_after_marker(&text[end..])
                } else {
                    None
                }
            })
        })
}

/// Parse `\s*[:=]\s*root` following a marker word.
fn key_after_marker(rest: &str) -> Option<PitchClass> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('='))?;
    key_root(rest)
}

/// Tonic of a written key such as `G`, `Am` or `F#m`.
///
/// Only the root is kept; the mode does not affect transposition.
///
/// ```
/// use selah::{key_root, PitchClass};
/// assert_eq!(key_root(" F#m"), Some(PitchClass::FSharp));
/// assert_eq!(key_root("Bb major"), Some(PitchClass::ASharp));
/// assert_eq!(key_root("?"), None);
/// ```
pub fn key_root(key: &str) -> Option<PitchClass> {
    let key = key.trim_start();
    root_lengths(key)
        .into_iter()
        .find_map(|len| normalize_root(&key[..len]))
}

/// Root of the first chord within the first `scan_limit` characters.
pub fn first_chord_key(text: &str, scan_limit: usize) -> Option<PitchClass> {
    let head = match text.char_indices().nth(scan_limit) {
        Some((end, _)) => &text[..end],
        None => text,
    };
    chords(head).find_map(|chord| chord.root_pitch())
}
