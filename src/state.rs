//! This module contains the partial-solution state of a puzzle and the move
//! algebra operating on it.
//!
//! A [SolveState] stores, for each of the 81 cells, the digit that is known
//! to be in it (if any) and a 9-bit mask of the digits that are still
//! candidates. Deduction rules inspect a state and emit lists of [Move]s,
//! which are applied back through [SolveState::apply_all]. A depth-first
//! backtracking solver ([SolveState::force_solve]) rides on top of the same
//! representation.

use crate::geometry::{ALL_OPTIONS, LINKS, NUM_CELLS};

/// One atomic change to a [SolveState]: either a digit is entered into a
/// cell, or a candidate is struck from a cell's option mask. Digits are the
/// internal ids `0..9`; the symbol alphabet of the owning puzzle maps them
/// to characters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Move {

    /// Enter `digit` into `cell` and remove it as a candidate from all of
    /// the cell's peers.
    Assign {

        /// The index of the changed cell, in the range `[0, 81[`.
        cell: usize,

        /// The entered digit, in the range `[0, 9[`.
        digit: u8
    },

    /// Strike `digit` from the candidates of `cell`.
    Eliminate {

        /// The index of the changed cell, in the range `[0, 81[`.
        cell: usize,

        /// The struck digit, in the range `[0, 9[`.
        digit: u8
    }
}

/// A partially solved Sudoku grid: the known digit of each cell together
/// with the candidate mask of each cell.
///
/// The two arrays are coupled by the invariant that a cell which holds a
/// digit has an empty candidate mask. A cell whose mask collapses to a
/// single candidate is *not* assigned automatically; assignment only happens
/// through [SolveState::assign] or by applying a move, so that the number of
/// times a deduction rule fires remains observable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolveState {
    value: [Option<u8>; NUM_CELLS],
    options: [u16; NUM_CELLS]
}

impl SolveState {

    /// Creates a fresh state in which every cell is unknown and every digit
    /// is a candidate everywhere.
    pub fn new() -> SolveState {
        SolveState {
            value: [None; NUM_CELLS],
            options: [ALL_OPTIONS; NUM_CELLS]
        }
    }

    /// Resets this state as if it had been freshly constructed.
    pub fn clear(&mut self) {
        self.value = [None; NUM_CELLS];
        self.options = [ALL_OPTIONS; NUM_CELLS];
    }

    /// Gets the digit entered into the given cell, or `None` if the cell is
    /// still unknown.
    pub fn value_of(&self, cell: usize) -> Option<u8> {
        self.value[cell]
    }

    /// Gets the raw 9-bit candidate mask of the given cell. Bit `d` is set
    /// if and only if digit `d` is still a candidate.
    pub fn options_of(&self, cell: usize) -> u16 {
        self.options[cell]
    }

    /// Gets the number of candidates remaining for the given cell.
    pub fn count_options(&self, cell: usize) -> u32 {
        self.options[cell].count_ones()
    }

    /// Indicates whether the given digit is still a candidate for the given
    /// cell.
    pub fn has_option(&self, cell: usize, digit: u8) -> bool {
        self.options[cell] & (1 << digit) != 0
    }

    /// Gets the lowest remaining candidate of the given cell, or `None` if
    /// the cell has no candidates left.
    pub fn first_option(&self, cell: usize) -> Option<u8> {
        if self.options[cell] == 0 {
            None
        }
        else {
            Some(self.options[cell].trailing_zeros() as u8)
        }
    }

    /// Indicates whether a digit has been entered into the given cell.
    pub fn is_set(&self, cell: usize) -> bool {
        self.value[cell].is_some()
    }

    /// Indicates whether every cell holds a digit. Equivalently, every
    /// candidate mask is empty.
    pub fn is_solved(&self) -> bool {
        self.options.iter().all(|&o| o == 0) &&
            self.value.iter().all(|v| v.is_some())
    }

    /// Enters `digit` into `cell` and strikes it from the candidates of all
    /// 20 peers. If the cell already holds that digit, nothing happens.
    ///
    /// The digit must still be a candidate for the cell; violating this is a
    /// programming error which aborts in debug builds. Deduction rules only
    /// emit moves consistent with the masks they observed, so this holds by
    /// construction for rule output.
    pub fn assign(&mut self, cell: usize, digit: u8) {
        debug_assert!(cell < NUM_CELLS);
        debug_assert!(digit < 9);

        if self.value[cell] == Some(digit) {
            return;
        }

        debug_assert!(self.has_option(cell, digit),
            "Digit {} is not a candidate for cell {}.", digit, cell);

        self.value[cell] = Some(digit);
        self.options[cell] = 0;

        for &peer in &LINKS[cell] {
            self.eliminate(peer, digit);
        }
    }

    /// Strikes `digit` from the candidates of `cell`. Striking a digit that
    /// is no candidate anyway is permitted and does nothing. A mask that
    /// collapses to a single candidate is *not* assigned automatically.
    pub fn eliminate(&mut self, cell: usize, digit: u8) {
        self.options[cell] &= !(1 << digit);
    }

    /// Applies a single [Move] by dispatching to [SolveState::assign] or
    /// [SolveState::eliminate].
    pub fn apply(&mut self, mv: Move) {
        match mv {
            Move::Assign { cell, digit } => self.assign(cell, digit),
            Move::Eliminate { cell, digit } => self.eliminate(cell, digit)
        }
    }

    /// Applies a list of moves in order. Later moves observe the effects of
    /// earlier ones; moves may overlap.
    pub fn apply_all(&mut self, moves: &[Move]) {
        for &mv in moves {
            self.apply(mv);
        }
    }

    /// Checks the internal consistency of this state: entered cells carry
    /// no candidates, and no peer of an entered cell still has its digit as
    /// a candidate or holds the same digit. Intended for use in
    /// `debug_assert!`; always returns `true` in release builds.
    pub fn ok(&self) -> bool {
        for cell in 0..NUM_CELLS {
            if let Some(digit) = self.value[cell] {
                debug_assert!(self.options[cell] == 0,
                    "Cell {} is set but still has candidates.", cell);

                for &peer in &LINKS[cell] {
                    debug_assert!(!self.has_option(peer, digit),
                        "Peer {} of cell {} still offers its digit.", peer,
                        cell);
                    debug_assert!(self.value[peer] != Some(digit),
                        "Cells {} and {} hold the same digit.", cell, peer);
                }
            }
        }

        true
    }

    /// Completes this state by depth-first search, entering digits into all
    /// unknown cells. Returns `true` if a full solution was found and
    /// `false` if the state admits none. The state is mutated either way;
    /// callers that need it unchanged must clone first.
    pub fn force_solve(&mut self) -> bool {
        self.force_solve_from(0)
    }

    fn force_solve_from(&mut self, mut start: usize) -> bool {
        // Advance past cells with no choice to be made.
        while start < NUM_CELLS {
            let count = self.count_options(start);

            if count == 0 && !self.is_set(start) {
                return false;
            }
            else if count == 1 {
                let digit = self.first_option(start).unwrap();
                self.assign(start, digit);
            }
            else if count > 1 {
                break;
            }

            start += 1;
        }

        if start == NUM_CELLS {
            return true;
        }

        // Try every candidate of the first branching cell in ascending
        // order.
        for digit in 0..9 {
            if !self.has_option(start, digit) {
                continue;
            }

            let backup = self.clone();
            self.assign(start, digit);

            if self.force_solve_from(start + 1) {
                return true;
            }

            *self = backup;
        }

        false
    }

    /// Renders this state as the fixed-width candidate diagram: every
    /// unknown cell is shown as a 3x3 mini-grid of its remaining candidate
    /// symbols (struck candidates become `.`), every entered cell as its
    /// centred symbol. Box borders are drawn with `+`, `-` and `|`.
    ///
    /// The digits are mapped through the given symbol alphabet, which the
    /// owning [Puzzle](crate::Puzzle) provides.
    pub fn diagram(&self, symbols: &[char; 9]) -> String {
        let box_line = "-".repeat(23);
        let border = format!(" +{0}+{0}+{0}+\n", box_line);
        let box_gap = " ".repeat(23);
        let spacer = format!(" |{0}|{0}|{0}|\n", box_gap);
        let mut out = String::new();
        out.push_str(&border);

        for row in 0..9 {
            for sub in [0u8, 3, 6] {
                for col in 0..9 {
                    let cell = row * 9 + col;

                    if col % 3 == 0 {
                        out.push_str(" |");
                    }
                    else {
                        out.push_str("  ");
                    }

                    match self.value[cell] {
                        None => {
                            for digit in sub..sub + 3 {
                                out.push(' ');

                                if self.has_option(cell, digit) {
                                    out.push(symbols[digit as usize]);
                                }
                                else {
                                    out.push('.');
                                }
                            }
                        },
                        Some(digit) => {
                            if sub == 3 {
                                out.push_str("   ");
                                out.push(symbols[digit as usize]);
                                out.push_str("  ");
                            }
                            else {
                                out.push_str("      ");
                            }
                        }
                    }
                }

                out.push_str(" |\n");
            }

            if row % 3 == 2 {
                out.push_str(&border);
            }
            else {
                out.push_str(&spacer);
            }
        }

        out
    }
}

impl Default for SolveState {
    fn default() -> SolveState {
        SolveState::new()
    }
}
