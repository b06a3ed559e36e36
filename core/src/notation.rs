use std::fmt;
use std::str::FromStr;

use crate::geometry::{Axis, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

pub const FACES: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

impl Face {
    pub fn letter(self) -> char {
        match self {
            Face::R => 'R',
            Face::L => 'L',
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        FACES.iter().copied().find(|face| face.letter() == ch)
    }

    pub fn axis(self) -> Axis {
        match self {
            Face::R | Face::L => Axis::X,
            Face::U | Face::D => Axis::Y,
            Face::F | Face::B => Axis::Z,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Face::R | Face::U | Face::F => Side::Positive,
            Face::L | Face::D | Face::B => Side::Negative,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Double,
}

pub const TURNS: [Turn; 3] = [Turn::Clockwise, Turn::CounterClockwise, Turn::Double];

impl Turn {
    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Double => "2",
        }
    }

    fn from_suffix(ch: char) -> Option<Self> {
        match ch {
            '\'' => Some(Turn::CounterClockwise),
            '2' => Some(Turn::Double),
            _ => None,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
            Turn::Double => Turn::Double,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Turn::Double => 2,
            Turn::Clockwise | Turn::CounterClockwise => 1,
        }
    }
}

/// One face turn, written `R`, `R'` or `R2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub const fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    /// Double turns are their own inverse; a prime is added or dropped otherwise.
    pub fn inverse(self) -> Self {
        Self {
            face: self.face,
            turn: self.turn.inverse(),
        }
    }
}

/// Every legal token, grouped per face in button order.
pub const ALL_MOVES: [Move; 18] = [
    Move::new(Face::R, Turn::Clockwise),
    Move::new(Face::R, Turn::CounterClockwise),
    Move::new(Face::R, Turn::Double),
    Move::new(Face::L, Turn::Clockwise),
    Move::new(Face::L, Turn::CounterClockwise),
    Move::new(Face::L, Turn::Double),
    Move::new(Face::U, Turn::Clockwise),
    Move::new(Face::U, Turn::CounterClockwise),
    Move::new(Face::U, Turn::Double),
    Move::new(Face::D, Turn::Clockwise),
    Move::new(Face::D, Turn::CounterClockwise),
    Move::new(Face::D, Turn::Double),
    Move::new(Face::F, Turn::Clockwise),
    Move::new(Face::F, Turn::CounterClockwise),
    Move::new(Face::F, Turn::Double),
    Move::new(Face::B, Turn::Clockwise),
    Move::new(Face::B, Turn::CounterClockwise),
    Move::new(Face::B, Turn::Double),
];

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let Some(first) = chars.next() else {
            return Err(MoveParseError::Empty);
        };
        let face = Face::from_letter(first).ok_or(MoveParseError::UnknownFace { found: first })?;
        let turn = match chars.next() {
            None => Turn::Clockwise,
            Some(ch) => Turn::from_suffix(ch).ok_or(MoveParseError::InvalidModifier { found: ch })?,
        };
        if chars.next().is_some() {
            return Err(MoveParseError::TrailingInput {
                token: token.to_string(),
            });
        }
        Ok(Self { face, turn })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    Empty,
    UnknownFace { found: char },
    InvalidModifier { found: char },
    TrailingInput { token: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::Empty => write!(f, "empty move"),
            MoveParseError::UnknownFace { found } => {
                write!(f, "unknown face '{found}', expected one of R L U D F B")
            }
            MoveParseError::InvalidModifier { found } => {
                write!(f, "invalid modifier '{found}', expected ' or 2")
            }
            MoveParseError::TrailingInput { token } => {
                write!(f, "'{token}' has more than one modifier")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// First rejected token of an algorithm; the whole batch is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmError {
    pub index: usize,
    pub token: String,
    pub source: MoveParseError,
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid move '{}' at position {}: {}",
            self.token,
            self.index + 1,
            self.source
        )
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Parses whitespace separated tokens. Blank input yields an empty sequence.
pub fn parse_algorithm(text: &str) -> Result<Vec<Move>, AlgorithmError> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<Move>().map_err(|source| AlgorithmError {
                index,
                token: token.to_string(),
                source,
            })
        })
        .collect()
}

/// Inverse of every move, last move first.
pub fn inverse_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

pub fn format_sequence(moves: &[Move]) -> String {
    let mut out = String::with_capacity(moves.len() * 3);
    for (idx, mv) in moves.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(&mv.to_string());
    }
    out
}
