//! This module contains the error and result definitions used when parsing
//! puzzles.

/// An enumeration of the errors that may occur when parsing a
/// [Puzzle](crate::Puzzle).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PuzzleParseError {

    /// Indicates that the input ended before 81 non-whitespace characters
    /// were read.
    UnexpectedEnd,

    /// Indicates that a tenth distinct non-`-` character appeared before the
    /// grid was complete. A 9x9 puzzle admits at most nine distinct symbols.
    TooManySymbols,

    /// Indicates that the revealed cells admit no completion of the grid, so
    /// the unknown cells could not be filled in by brute force.
    Unsolvable
}

/// Syntactic sugar for `Result<V, PuzzleParseError>`.
pub type PuzzleParseResult<V> = Result<V, PuzzleParseError>;
