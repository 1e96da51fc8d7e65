//! # Pitch Classes
//!
//! The twelve pitch classes of equal temperament and the normalizer that maps
//! any root spelling found in a chord sheet onto them.
//!
//! Every spelling resolves to one canonical, sharp-based name:
//! `Db` is `C#`, `Bb` is `A#`, a bare `B` is `B`. Output of the engine always
//! uses these canonical names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 12 pitch classes, in cyclic order starting at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Canonical names, indexed by pitch class.
pub const TONES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Every accepted root spelling (letter uppercased) and its pitch class.
const SPELLINGS: [(&str, PitchClass); 21] = [
    ("C", PitchClass::C),
    ("C#", PitchClass::CSharp),
    ("Cb", PitchClass::B),
    ("D", PitchClass::D),
    ("D#", PitchClass::DSharp),
    ("Db", PitchClass::CSharp),
    ("E", PitchClass::E),
    ("E#", PitchClass::F),
    ("Eb", PitchClass::DSharp),
    ("F", PitchClass::F),
    ("F#", PitchClass::FSharp),
    ("Fb", PitchClass::E),
    ("G", PitchClass::G),
    ("G#", PitchClass::GSharp),
    ("Gb", PitchClass::FSharp),
    ("A", PitchClass::A),
    ("A#", PitchClass::ASharp),
    ("Ab", PitchClass::GSharp),
    ("B", PitchClass::B),
    ("B#", PitchClass::C),
    ("Bb", PitchClass::ASharp),
];

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Position in the cycle, 0 (C) to 11 (B).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class at `index`, wrapping modulo 12.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Canonical sharp spelling.
    pub fn name(self) -> &'static str {
        TONES[self.index() as usize]
    }

    /// Move by a signed number of semitones.
    ///
    /// ```
    /// use selah::PitchClass;
    /// assert_eq!(PitchClass::A.shift(2), PitchClass::B);
    /// assert_eq!(PitchClass::C.shift(-1), PitchClass::B);
    /// assert_eq!(PitchClass::G.shift(24), PitchClass::G);
    /// ```
    pub fn shift(self, semitones: i32) -> Self {
        let offset = semitones.rem_euclid(12) as usize;
        Self::from_index(self.index() as usize + offset)
    }

    /// Upward distance to `other`, in [0, 12).
    pub fn semitones_to(self, other: PitchClass) -> u8 {
        (other.index() + 12 - self.index()) % 12
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A root spelling that is not one of the known pitch-class spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedRoot(pub String);

impl fmt::Display for UnrecognizedRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized root '{}'", self.0)
    }
}

impl std::error::Error for UnrecognizedRoot {}

impl FromStr for PitchClass {
    type Err = UnrecognizedRoot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_root(s).ok_or_else(|| UnrecognizedRoot(s.to_string()))
    }
}

impl TryFrom<String> for PitchClass {
    type Error = UnrecognizedRoot;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(pitch: PitchClass) -> Self {
        pitch.name().to_string()
    }
}

/// Map a root spelling onto its pitch class.
///
/// The letter is case-insensitive; the accidental must be `#` or a lowercase
/// `b`. Returns `None` for anything that is not exactly a letter A-G plus an
/// optional accidental.
///
/// ```
/// use selah::{normalize_root, PitchClass};
/// assert_eq!(normalize_root("Bb"), Some(PitchClass::ASharp));
/// assert_eq!(normalize_root("bb"), Some(PitchClass::ASharp));
/// assert_eq!(normalize_root("B"), Some(PitchClass::B));
/// assert_eq!(normalize_root("H"), None);
/// ```
pub fn normalize_root(spelling: &str) -> Option<PitchClass> {
    let mut chars = spelling.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !('A'..='G').contains(&letter) {
        return None;
    }

    let mut canonical = String::with_capacity(2);
    canonical.push(letter);
    match chars.next() {
        None => {}
        Some(accidental @ ('#' | 'b')) => canonical.push(accidental),
        Some(_) => return None,
    }
    if chars.next().is_some() {
        return None;
    }

    SPELLINGS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|&(_, pitch)| pitch)
}

/// Parse a key name as stored on a song record or chosen by the user.
///
/// Surrounding whitespace is ignored and an empty value means "no key".
pub fn parse_key(key: &str) -> Option<PitchClass> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    normalize_root(key)
}
