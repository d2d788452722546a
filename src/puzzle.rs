//! Puzzle state types: colors, tubes, and full configurations.
//!
//! A configuration is the complete set of tubes at one point in the search.
//! Tube order carries no puzzle meaning; order-independence is handled by
//! the canonical key in [`crate::canonical`].

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// Smallest allowed color alphabet.
pub const MIN_COLORS: usize = 2;
/// Largest allowed color alphabet; the on-disk format spends one lowercase
/// letter per color.
pub const MAX_COLORS: usize = 26;

/// Ball color - a bounded integer id, 0-based.
///
/// The single-letter form (`'a'` for id 0) exists only on the serialization
/// boundary; the search works on raw ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(u8);

impl Color {
    pub fn new(id: u8) -> Self {
        debug_assert!((id as usize) < MAX_COLORS);
        Self(id)
    }

    /// Single-letter code used in level files.
    pub fn letter(self) -> char {
        (b'a' + self.0) as char
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        if ch.is_ascii_lowercase() {
            Some(Self(ch as u8 - b'a'))
        } else {
            None
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.letter())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Color::from_letter(ch)
                .ok_or_else(|| de::Error::custom(format!("invalid color code {code:?}"))),
            _ => Err(de::Error::custom(format!("invalid color code {code:?}"))),
        }
    }
}

/// One tube: an ordered stack of balls, last element on top.
///
/// Inline storage covers every practical tube height without touching the
/// heap; the solver clones tubes on every expanded move.
pub type Tube = SmallVec<[Color; 8]>;

/// Transfer of the top ball of `source` onto `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub source: usize,
    pub dest: usize,
}

/// A settled tube is full and monochrome. Settled tubes count as finished in
/// the goal test and are never used as a move source.
pub fn is_settled(tube: &Tube, height: usize) -> bool {
    tube.len() == height && tube.iter().all(|&c| c == tube[0])
}

/// The complete puzzle state: a fixed-size collection of tubes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    tubes: Vec<Tube>,
}

impl Configuration {
    pub fn from_tubes(tubes: Vec<Tube>) -> Self {
        Self { tubes }
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Solved iff every tube is empty or settled.
    pub fn is_solved(&self, height: usize) -> bool {
        self.tubes
            .iter()
            .all(|tube| tube.is_empty() || is_settled(tube, height))
    }

    /// Enumerate every legal single-ball move from this configuration.
    ///
    /// Settled tubes are skipped as sources. A destination accepts the ball
    /// iff it has room and is empty or shows the same color on top.
    pub fn legal_moves(&self, height: usize) -> Vec<Move> {
        let mut moves = Vec::new();
        for (source, from_tube) in self.tubes.iter().enumerate() {
            let Some(&top) = from_tube.last() else {
                continue;
            };
            if is_settled(from_tube, height) {
                continue;
            }
            for (dest, to_tube) in self.tubes.iter().enumerate() {
                if source == dest {
                    continue;
                }
                if to_tube.len() < height && to_tube.last().map_or(true, |&c| c == top) {
                    moves.push(Move { source, dest });
                }
            }
        }
        moves
    }

    /// Apply one move, producing an independently owned successor state.
    /// The receiver is never mutated; search branches share nothing.
    pub fn apply(&self, mv: Move) -> Configuration {
        let mut tubes = self.tubes.clone();
        let ball = tubes[mv.source].pop().expect("move source is empty");
        tubes[mv.dest].push(ball);
        Configuration { tubes }
    }
}

#[cfg(test)]
impl Configuration {
    /// Build a configuration from letter strings, e.g. `["ab", "ba", ""]`.
    /// First letter is the bottom of the tube.
    pub fn from_letters(tubes: &[&str]) -> Self {
        Self {
            tubes: tubes
                .iter()
                .map(|s| {
                    s.chars()
                        .map(|ch| Color::from_letter(ch).expect("test tube letter"))
                        .collect()
                })
                .collect(),
        }
    }
}
