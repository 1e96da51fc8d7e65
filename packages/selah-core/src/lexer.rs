use crate::chord::{match_chord_at, root_lengths, ChordToken};

/// A piece of a chord sheet: either plain text or a chord symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Chord(ChordToken<'a>),
}

impl<'a> Segment<'a> {
    /// The source text this segment covers.
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(text) => text,
            Segment::Chord(chord) => chord.text,
        }
    }
}

/// Single left-to-right scanner splitting a sheet into text and chord segments.
///
/// Chords never overlap, and concatenating every segment reproduces the input
/// exactly.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    pending: Option<ChordToken<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            pending: None,
        }
    }

    /// Find the next chord at or after `from`.
    fn next_chord(&self, from: usize) -> Option<ChordToken<'a>> {
        self.input[from..]
            .char_indices()
            .map(|(offset, _)| from + offset)
            .filter(|&index| !root_lengths(&self.input[index..]).is_empty())
            .find_map(|index| match_chord_at(self.input, index))
    }

    pub fn tokenize(&mut self) -> Vec<Segment<'a>> {
        self.by_ref().collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(chord) = self.pending.take() {
            self.position = chord.end();
            return Some(Segment::Chord(chord));
        }
        if self.position >= self.input.len() {
            return None;
        }

        match self.next_chord(self.position) {
            Some(chord) if chord.start == self.position => {
                self.position = chord.end();
                Some(Segment::Chord(chord))
            }
            Some(chord) => {
                let text = &self.input[self.position..chord.start];
                self.position = chord.start;
                self.pending = Some(chord);
                Some(Segment::Text(text))
            }
            None => {
                let text = &self.input[self.position..];
                self.position = self.input.len();
                Some(Segment::Text(text))
            }
        }
    }
}

/// Split `input` into text and chord segments.
pub fn tokenize(input: &str) -> Vec<Segment<'_>> {
    Lexer::new(input).tokenize()
}

/// Iterate over the chord tokens of `input`, in order.
pub fn chords(input: &str) -> impl Iterator<Item = ChordToken<'_>> {
    Lexer::new(input).filter_map(|segment| match segment {
        Segment::Chord(chord) => Some(chord),
        Segment::Text(_) => None,
    })
}
