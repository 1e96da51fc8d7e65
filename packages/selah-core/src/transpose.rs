use std::borrow::Cow;

use log::debug;

use crate::chord::ChordToken;
use crate::lexer::{Lexer, Segment};
use crate::pitch::{parse_key, PitchClass};

/// Semitones to move up to get from `from` to `to`, in [0, 12).
pub fn semitone_offset(from: PitchClass, to: PitchClass) -> u8 {
    from.semitones_to(to)
}

/// Transpose a single chord symbol by `semitones`.
///
/// The token is read with the same grammar the text scanner uses. Root and
/// bass are rewritten and the rest is kept verbatim. A string that is not
/// exactly one chord token is returned unchanged.
///
/// ```
/// use selah::transpose_chord;
/// assert_eq!(transpose_chord("Am7", 3), "Cm7");
/// assert_eq!(transpose_chord("G/B", 2), "A/C#");
/// assert_eq!(transpose_chord("Bb", -1), "A");
/// assert_eq!(transpose_chord("N.C.", 5), "N.C.");
/// ```
pub fn transpose_chord(token: &str, semitones: i32) -> String {
    match ChordToken::parse(token) {
        Some(chord) => chord.transposed(semitones),
        None => token.to_string(),
    }
}

/// Transpose every chord in `text` by `semitones`.
///
/// A shift that is a multiple of 12 returns the input untouched, so flat
/// spellings in the source survive an identity transposition.
pub fn transpose_text_by(text: &str, semitones: i32) -> Cow<'_, str> {
    if semitones.rem_euclid(12) == 0 || text.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut count = 0usize;
    for segment in Lexer::new(text) {
        match segment {
            Segment::Text(plain) => out.push_str(plain),
            Segment::Chord(chord) => {
                out.push_str(&chord.transposed(semitones));
                count += 1;
            }
        }
    }
    debug!("transposed {} chords by {} semitones", count, semitones);
    Cow::Owned(out)
}

/// Transpose a chord sheet from its original key to a target key.
///
/// The text comes back unchanged when either key is absent or not a pitch
/// class, or when both keys name the same pitch class.
///
/// ```
/// use selah::transpose_text;
/// assert_eq!(transpose_text("C G Am F", Some("C"), Some("D")), "D A Bm G");
/// assert_eq!(transpose_text("C G", None, Some("D")), "C G");
/// ```
pub fn transpose_text<'a>(
    text: &'a str,
    original_key: Option<&str>,
    target_key: Option<&str>,
) -> Cow<'a, str> {
    let (Some(original), Some(target)) = (
        original_key.and_then(parse_key),
        target_key.and_then(parse_key),
    ) else {
        debug!(
            "transposition disabled: original key {:?}, target key {:?}",
            original_key, target_key
        );
        return Cow::Borrowed(text);
    };

    transpose_text_by(text, i32::from(semitone_offset(original, target)))
}
