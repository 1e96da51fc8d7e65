//! # Chord-Token Grammar
//!
//! A chord token is `root [quality] [extension] [/bass]`:
//!
//! ```text
//! root       = letter A-G (any case), optional '#' or 'b'
//! quality    = one of QUALITIES (ASCII case-insensitive)
//! extension  = 0-2 ASCII digits
//! bass       = '/' root
//! ```
//!
//! A token must start and end on a word boundary, so letters inside lyric
//! words are never taken for chords. When several parses fit at a position,
//! the longest one that ends on a boundary wins (`Cmaj7` rather than `C`).
//! A token ending in a non-word character such as `#` is always delimited, so
//! `F#7M` yields the chord `F#` followed by the text `7M`.

use crate::pitch::{normalize_root, PitchClass};

/// Recognized chord-quality suffixes.
pub const QUALITIES: [&str; 9] = ["°", "º", "m", "min", "maj", "aug", "dim", "sus", "add"];

const MAX_EXTENSION_DIGITS: usize = 2;

/// A chord symbol located in a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordToken<'a> {
    /// The whole matched token
    pub text: &'a str,
    /// Byte offset of the token in the scanned text
    pub start: usize,
    pub root: &'a str,
    pub quality: Option<&'a str>,
    /// Extension digits, possibly empty
    pub extension: &'a str,
    /// Bass-note spelling of a slash chord, without the slash
    pub bass: Option<&'a str>,
}

impl<'a> ChordToken<'a> {
    /// Parse `text` as a single chord token. The whole string must match.
    ///
    /// ```
    /// use selah::ChordToken;
    /// let chord = ChordToken::parse("F#m7/C#").unwrap();
    /// assert_eq!(chord.root, "F#");
    /// assert_eq!(chord.quality, Some("m"));
    /// assert_eq!(chord.extension, "7");
    /// assert_eq!(chord.bass, Some("C#"));
    /// assert!(ChordToken::parse("Cat").is_none());
    /// ```
    pub fn parse(text: &'a str) -> Option<Self> {
        match_chord_at(text, 0).filter(|token| token.text.len() == text.len())
    }

    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn root_pitch(&self) -> Option<PitchClass> {
        normalize_root(self.root)
    }

    pub fn bass_pitch(&self) -> Option<PitchClass> {
        self.bass.and_then(normalize_root)
    }

    /// Rewrite the token shifted by `semitones`.
    ///
    /// Root and bass are emitted with canonical sharp spellings; quality and
    /// extension are copied verbatim.
    pub fn transposed(&self, semitones: i32) -> String {
        let mut out = String::with_capacity(self.text.len() + 2);
        push_shifted(&mut out, self.root, semitones);
        if let Some(quality) = self.quality {
            out.push_str(quality);
        }
        out.push_str(self.extension);
        if let Some(bass) = self.bass {
            out.push('/');
            push_shifted(&mut out, bass, semitones);
        }
        out
    }
}

fn push_shifted(out: &mut String, root: &str, semitones: i32) {
    match normalize_root(root) {
        Some(pitch) => out.push_str(pitch.shift(semitones).name()),
        None => out.push_str(root),
    }
}

/// Letters, digits and underscore of any script.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn at_word_end(token: &str, rest: &str) -> bool {
    let last_is_word = token.chars().next_back().is_some_and(is_word_char);
    !last_is_word || rest.chars().next().map_or(true, |c| !is_word_char(c))
}

pub(crate) fn at_word_start(text: &str, position: usize) -> bool {
    text[..position]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c))
}

/// Possible root lengths at the start of `s`, longest first.
///
/// A `#` always belongs to the root; a `b` may instead start the next word.
pub(crate) fn root_lengths(s: &str) -> Vec<usize> {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b'A'..=b'G' | b'a'..=b'g') => match bytes.get(1) {
            Some(b'#') => vec![2],
            Some(b'b') => vec![2, 1],
            _ => vec![1],
        },
        _ => Vec::new(),
    }
}

/// Byte lengths of every quality that prefixes `s`, plus 0 for "no quality".
fn quality_lengths(s: &str) -> Vec<usize> {
    let bytes = s.as_bytes();
    let mut lengths: Vec<usize> = QUALITIES
        .iter()
        .filter(|quality| {
            bytes.len() >= quality.len()
                && bytes[..quality.len()].eq_ignore_ascii_case(quality.as_bytes())
        })
        .map(|quality| quality.len())
        .collect();
    lengths.push(0);
    lengths
}

fn extension_digits(s: &str) -> usize {
    s.bytes()
        .take(MAX_EXTENSION_DIGITS)
        .take_while(u8::is_ascii_digit)
        .count()
}

/// Byte lengths of a `/bass` suffix at the start of `s`, plus 0 for none.
fn bass_lengths(s: &str) -> Vec<usize> {
    let mut lengths = Vec::new();
    if let Some(rest) = s.strip_prefix('/') {
        lengths.extend(root_lengths(rest).into_iter().map(|len| len + 1));
    }
    lengths.push(0);
    lengths
}

/// Match the longest chord token starting exactly at byte `start` of `text`.
///
/// Returns `None` when `start` is not at a word start or no parse of the
/// grammar ends on a word boundary.
pub fn match_chord_at(text: &str, start: usize) -> Option<ChordToken<'_>> {
    if !text.is_char_boundary(start) || !at_word_start(text, start) {
        return None;
    }
    let s = &text[start..];

    // (root, quality, extension, bass) byte lengths of the best parse so far
    let mut best: Option<(usize, usize, usize, usize)> = None;
    let mut best_end = 0;

    for root in root_lengths(s) {
        let after_root = &s[root..];
        for quality in quality_lengths(after_root) {
            let after_quality = &after_root[quality..];
            for digits in (0..=extension_digits(after_quality)).rev() {
                let after_digits = &after_quality[digits..];
                for bass in bass_lengths(after_digits) {
                    let end = root + quality + digits + bass;
                    if end > best_end && at_word_end(&s[..end], &s[end..]) {
                        best = Some((root, quality, digits, bass));
                        best_end = end;
                    }
                }
            }
        }
    }

    let (root, quality, digits, bass) = best?;
    let quality_start = root;
    let digits_start = quality_start + quality;
    let bass_start = digits_start + digits;

    Some(ChordToken {
        text: &s[..best_end],
        start,
        root: &s[..root],
        quality: (quality > 0).then(|| &s[quality_start..digits_start]),
        extension: &s[digits_start..bass_start],
        bass: (bass > 0).then(|| &s[bass_start + 1..best_end]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(text: &str) -> Option<(&str, Option<&str>, &str, Option<&str>)> {
        ChordToken::parse(text).map(|t| (t.root, t.quality, t.extension, t.bass))
    }

    #[test]
    fn test_plain_roots() {
        assert_eq!(parts("C"), Some(("C", None, "", None)));
        assert_eq!(parts("F#"), Some(("F#", None, "", None)));
        assert_eq!(parts("Bb"), Some(("Bb", None, "", None)));
        assert_eq!(parts("a"), Some(("a", None, "", None)));
    }

    #[test]
    fn test_qualities() {
        assert_eq!(parts("Am"), Some(("A", Some("m"), "", None)));
        assert_eq!(parts("Cmin"), Some(("C", Some("min"), "", None)));
        assert_eq!(parts("Cmaj7"), Some(("C", Some("maj"), "7", None)));
        assert_eq!(parts("Gsus4"), Some(("G", Some("sus"), "4", None)));
        assert_eq!(parts("Dadd9"), Some(("D", Some("add"), "9", None)));
        assert_eq!(parts("Bdim"), Some(("B", Some("dim"), "", None)));
        assert_eq!(parts("Eaug"), Some(("E", Some("aug"), "", None)));
        assert_eq!(parts("B°"), Some(("B", Some("°"), "", None)));
        assert_eq!(parts("Cº7"), Some(("C", Some("º"), "7", None)));
        assert_eq!(parts("CMAJ7"), Some(("C", Some("MAJ"), "7", None)));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(parts("G7"), Some(("G", None, "7", None)));
        assert_eq!(parts("A13"), Some(("A", None, "13", None)));
        assert_eq!(parts("Em11"), Some(("E", Some("m"), "11", None)));
        assert!(parts("C777").is_none());
    }

    #[test]
    fn test_slash_chords() {
        assert_eq!(parts("G/B"), Some(("G", None, "", Some("B"))));
        assert_eq!(parts("D/F#"), Some(("D", None, "", Some("F#"))));
        assert_eq!(parts("Am7/G"), Some(("A", Some("m"), "7", Some("G"))));
        assert_eq!(parts("Bb/Ab"), Some(("Bb", None, "", Some("Ab"))));
    }

    #[test]
    fn test_words_are_not_chords() {
        for word in ["Cat", "Go", "Dance", "Bem", "Deus", "Adoramos", "Ebenezer", "Dá"] {
            assert!(ChordToken::parse(word).is_none(), "{word} parsed as a chord");
        }
    }

    #[test]
    fn test_match_requires_word_start() {
        let text = "xC C";
        assert!(match_chord_at(text, 1).is_none());
        let chord = match_chord_at(text, 3).unwrap();
        assert_eq!(chord.text, "C");
        assert_eq!(chord.start, 3);
        assert_eq!(chord.end(), 4);
    }

    #[test]
    fn test_match_stops_before_punctuation() {
        let text = "C7+ D7(9) E|";
        assert_eq!(match_chord_at(text, 0).unwrap().text, "C7");
        assert_eq!(match_chord_at(text, 4).unwrap().text, "D7");
        assert_eq!(match_chord_at(text, 10).unwrap().text, "E");
    }

    #[test]
    fn test_sharp_followed_by_space_keeps_accidental() {
        let chord = match_chord_at("C# D", 0).unwrap();
        assert_eq!(chord.root, "C#");
    }

    #[test]
    fn test_sharp_root_before_brazilian_suffix() {
        let chord = match_chord_at("F#7M", 0).unwrap();
        assert_eq!(chord.text, "F#");
        assert_eq!(chord.root, "F#");

        let chord = match_chord_at("C#m7b5 x", 0).unwrap();
        assert_eq!(chord.text, "C#");
        assert_eq!(chord.quality, None);

        // The whole word is not a single token
        assert!(ChordToken::parse("F#7M").is_none());
    }

    #[test]
    fn test_sharp_always_belongs_to_root() {
        assert_eq!(root_lengths("F#7"), vec![2]);
        assert_eq!(root_lengths("Bb7"), vec![2, 1]);
        assert_eq!(root_lengths("x"), Vec::<usize>::new());
    }

    #[test]
    fn test_trailing_slash_without_bass() {
        let chord = match_chord_at("C/ D", 0).unwrap();
        assert_eq!(chord.text, "C");
        assert_eq!(chord.bass, None);
    }

    #[test]
    fn test_pitches() {
        let chord = ChordToken::parse("Ebm/Gb").unwrap();
        assert_eq!(chord.root_pitch(), Some(PitchClass::DSharp));
        assert_eq!(chord.bass_pitch(), Some(PitchClass::FSharp));
    }

    #[test]
    fn test_transposed_keeps_suffix_verbatim() {
        let chord = ChordToken::parse("Am7/G").unwrap();
        assert_eq!(chord.transposed(2), "Bm7/A");
        let chord = ChordToken::parse("bbMAJ7").unwrap();
        assert_eq!(chord.transposed(1), "BMAJ7");
        let chord = ChordToken::parse("G/B").unwrap();
        assert_eq!(chord.transposed(2), "A/C#");
    }
}
