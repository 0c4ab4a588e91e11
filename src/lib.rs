// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

//! This crate implements an engine that measures how hard a 9x9 Sudoku is
//! for a human and searches for puzzles with a desired difficulty. It
//! supports the following key features:
//!
//! * Parsing and printing puzzles with an arbitrary symbol alphabet
//! * Simulating a human solver with a family of deduction rules of
//! increasing sophistication, recording a difficulty [Profile] of the
//! attempt
//! * Brute-force completion of partial grids by backtracking
//! * Evolving the set of initially revealed cells towards a target
//! difficulty with an elite/tournament genetic loop
//!
//! # Parsing and printing puzzles
//!
//! A puzzle code is a stream of characters in which whitespace is ignored.
//! The first 81 other characters fill the grid in row-major order; `-`
//! marks a concealed cell and any other printable character is a digit
//! symbol. The first nine distinct symbols define the puzzle's alphabet in
//! order of appearance, so ordinary digits and letters both work. Concealed
//! cells are completed by the backtracking solver on load.
//!
//! ```
//! use sudoku_evolve::Puzzle;
//!
//! let puzzle = Puzzle::parse("
//!     53- -7- ---
//!     6-- 195 ---
//!     -98 --- -6-
//!
//!     8-- -6- --3
//!     4-- 8-3 --1
//!     7-- -2- --6
//!
//!     -6- --- 28-
//!     --- 419 --5
//!     --- -8- -79").unwrap();
//!
//! assert_eq!(30, puzzle.count_revealed());
//! println!("{}", puzzle);
//! ```
//!
//! # Profiling difficulty
//!
//! [Puzzle::calc_profile] simulates a human solver: the deduction rules
//! from [rules::standard_rules] are tried strictly in ascending difficulty
//! order, the first non-empty move list is applied, and the search restarts
//! from the easiest rule. Every application is logged as a
//! `(level, count)` entry in the returned [Profile]. The scalar
//! [Puzzle::fitness] derives from the profile and is minimised by the
//! evolutionary search.
//!
//! ```
//! use sudoku_evolve::Puzzle;
//!
//! let mut puzzle = Puzzle::parse("
//!     53- -7- ---
//!     6-- 195 ---
//!     -98 --- -6-
//!
//!     8-- -6- --3
//!     4-- 8-3 --1
//!     7-- -2- --6
//!
//!     -6- --- 28-
//!     --- 419 --5
//!     --- -8- -79").unwrap();
//! let profile = puzzle.calc_profile();
//!
//! assert!(profile.is_solved());
//! assert_eq!(51, profile.total_moves());
//! ```
//!
//! # Evolving puzzles
//!
//! An [Evolver](evolve::Evolver) maintains a [Population](evolve::Population)
//! of puzzles that share a solution grid but differ in which cells are
//! revealed. Each generation mutates the reveal masks, carries the best
//! individuals forward unchanged and fills the remainder by tournament
//! selection on [Puzzle::fitness].
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sudoku_evolve::Puzzle;
//! use sudoku_evolve::evolve::{Evolver, EvolverConfig};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut seed = Puzzle::random(&mut rng, 0.5);
//! let config = EvolverConfig {
//!     pop_size: 10,
//!     generations: 5,
//!     ..EvolverConfig::default()
//! };
//! let mut evolver = Evolver::new(config, rng);
//! let mut population = evolver.run(&seed);
//!
//! assert!(population[0].fitness() <= seed.fitness());
//! ```

pub mod error;
pub mod evolve;
pub mod geometry;
pub mod profile;
pub mod rules;
pub mod state;

#[cfg(test)]
mod fix_tests;

use error::{PuzzleParseError, PuzzleParseResult};
use geometry::NUM_CELLS;
use profile::Profile;
use rules::standard_rules;
use state::SolveState;

use rand::Rng;
use rand::seq::SliceRandom;

use std::fmt::{self, Display, Formatter};

use tracing::debug;

/// The built-in solution grid of [Puzzle::new].
const DEFAULT_CELLS: [u8; NUM_CELLS] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8,
    5, 7, 4, 6, 0, 8, 1, 2, 3,
    3, 8, 6, 1, 7, 2, 0, 5, 4,
    8, 2, 0, 7, 3, 6, 4, 1, 5,
    1, 5, 3, 8, 2, 4, 7, 6, 0,
    6, 4, 7, 0, 5, 1, 3, 8, 2,
    7, 0, 1, 5, 8, 3, 2, 4, 6,
    4, 6, 5, 2, 1, 0, 8, 3, 7,
    2, 3, 8, 4, 6, 7, 5, 0, 1
];

const DEFAULT_SYMBOLS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8',
    '9'];

/// Draws a uniformly random permutation of `0..n` using the given random
/// number generator.
fn permutation(rng: &mut impl Rng, n: usize) -> Vec<usize> {
    let mut values: Vec<usize> = (0..n).collect();
    values.shuffle(rng);
    values
}

/// Composes a permutation of the nine rows (or columns) that keeps the grid
/// a valid Sudoku: the three bands are permuted, and the three lines within
/// each band are permuted independently.
fn line_map(rng: &mut impl Rng) -> [usize; 9] {
    let band_map = permutation(rng, 3);
    let mut map = [0; 9];

    for band in 0..3 {
        let inner_map = permutation(rng, 3);

        for i in 0..3 {
            map[band * 3 + i] = band_map[band] * 3 + inner_map[i];
        }
    }

    map
}

/// A single Sudoku puzzle instance: a full solution grid, a mask of the
/// cells revealed to the solver at the start, and the symbol alphabet in
/// which the digits are written.
///
/// The initial [SolveState] derived from the revealed cells is cached and
/// lazily rebuilt after mutations; the difficulty [Profile] of the last
/// [Puzzle::calc_profile] call is stored alongside.
///
/// Digits are internal ids `0..9` assigned in order of first appearance
/// when parsing; they carry no numeric meaning of their own and only map
/// to characters through the alphabet.
#[derive(Clone, Debug, PartialEq)]
pub struct Puzzle {
    cells: [u8; NUM_CELLS],
    start_cells: [bool; NUM_CELLS],
    symbols: [char; 9],
    start_state: SolveState,
    dirty: bool,
    profile: Profile
}

impl Puzzle {

    /// Creates a puzzle over a fixed built-in solution grid with symbols
    /// `'1'` to `'9'` and no revealed cells.
    pub fn new() -> Puzzle {
        Puzzle {
            cells: DEFAULT_CELLS,
            start_cells: [false; NUM_CELLS],
            symbols: DEFAULT_SYMBOLS,
            start_state: SolveState::new(),
            dirty: true,
            profile: Profile::new()
        }
    }

    /// Creates a puzzle with a randomized solution grid in which every cell
    /// is revealed independently with probability `reveal_p`.
    pub fn random(rng: &mut impl Rng, reveal_p: f64) -> Puzzle {
        let mut puzzle = Puzzle::new();
        puzzle.randomize_cells(rng);
        puzzle.randomize_reveal(rng, reveal_p);
        puzzle
    }

    /// Parses a puzzle code. Whitespace is skipped; the first 81 remaining
    /// characters fill the grid in row-major order. The character `-`
    /// denotes a concealed cell, every other character is a digit symbol
    /// and is assigned the next free digit id on its first appearance.
    /// Unused alphabet slots are then filled with `'1'` to `'9'`, skipping
    /// characters the code already claimed. Concealed cells are completed
    /// by brute force, without being marked as revealed.
    ///
    /// # Errors
    ///
    /// * `PuzzleParseError::UnexpectedEnd` if the code holds fewer than 81
    /// non-whitespace characters.
    /// * `PuzzleParseError::TooManySymbols` if a tenth distinct symbol
    /// appears.
    /// * `PuzzleParseError::Unsolvable` if the revealed cells contradict
    /// each other or admit no completion of the grid.
    pub fn parse(code: &str) -> PuzzleParseResult<Puzzle> {
        let mut given = [None; NUM_CELLS];
        let mut symbols = Vec::new();
        let mut loaded = 0;

        for ch in code.chars() {
            if ch.is_whitespace() {
                continue;
            }

            if ch != '-' {
                let id = match symbols.iter().position(|&s| s == ch) {
                    Some(id) => id,
                    None => {
                        if symbols.len() == 9 {
                            return Err(PuzzleParseError::TooManySymbols);
                        }

                        symbols.push(ch);
                        symbols.len() - 1
                    }
                };

                given[loaded] = Some(id as u8);
            }

            loaded += 1;

            if loaded == NUM_CELLS {
                break;
            }
        }

        if loaded < NUM_CELLS {
            return Err(PuzzleParseError::UnexpectedEnd);
        }

        // Pad the alphabet with unclaimed characters from '1' to '9'.
        for digit in '1'..='9' {
            if symbols.len() == 9 {
                break;
            }

            if !symbols.contains(&digit) {
                symbols.push(digit);
            }
        }

        debug!(symbols = ?symbols, "parsed puzzle alphabet");

        // Complete the concealed cells by brute force. They stay
        // concealed: only explicitly given cells are revealed.
        let mut state = SolveState::new();

        for (cell, digit) in given.iter().enumerate() {
            if let Some(digit) = *digit {
                if !state.has_option(cell, digit) {
                    return Err(PuzzleParseError::Unsolvable);
                }

                state.assign(cell, digit);
            }
        }

        if !state.force_solve() {
            return Err(PuzzleParseError::Unsolvable);
        }

        let mut cells = [0; NUM_CELLS];
        let mut start_cells = [false; NUM_CELLS];

        for cell in 0..NUM_CELLS {
            cells[cell] = state.value_of(cell).unwrap();
            start_cells[cell] = given[cell].is_some();
        }

        let mut symbol_array = ['\0'; 9];
        symbol_array.copy_from_slice(&symbols);

        Ok(Puzzle {
            cells,
            start_cells,
            symbols: symbol_array,
            start_state: SolveState::new(),
            dirty: true,
            profile: Profile::new()
        })
    }

    /// Gets the solution digit of the given cell.
    pub fn cell(&self, cell: usize) -> u8 {
        self.cells[cell]
    }

    /// Indicates whether the given cell is revealed at the start.
    pub fn is_revealed(&self, cell: usize) -> bool {
        self.start_cells[cell]
    }

    /// Gets the symbol shown for the given cell in the masked rendering:
    /// its digit's symbol if it is revealed, `'-'` otherwise.
    pub fn cell_symbol(&self, cell: usize) -> char {
        if self.start_cells[cell] {
            self.symbols[self.cells[cell] as usize]
        }
        else {
            '-'
        }
    }

    /// Gets the full solution grid.
    pub fn cells(&self) -> &[u8; NUM_CELLS] {
        &self.cells
    }

    /// Gets the reveal mask.
    pub fn start_cells(&self) -> &[bool; NUM_CELLS] {
        &self.start_cells
    }

    /// Gets the symbol alphabet.
    pub fn symbols(&self) -> &[char; 9] {
        &self.symbols
    }

    /// Counts the revealed cells. While on average puzzles with fewer
    /// revealed cells are harder, this is *not* a reliable measure of
    /// difficulty; use [Puzzle::calc_profile] for that.
    pub fn count_revealed(&self) -> usize {
        self.start_cells.iter().filter(|&&s| s).count()
    }

    /// Gets the profile recorded by the last [Puzzle::calc_profile] call.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Reveals or conceals the given cell.
    pub fn set_reveal(&mut self, cell: usize, revealed: bool) {
        self.dirty = true;
        self.start_cells[cell] = revealed;
    }

    /// Flips the reveal bit of every cell independently with probability
    /// `toggle_p`. This is the mutation operator of the evolutionary
    /// search.
    pub fn mutate_reveal(&mut self, rng: &mut impl Rng, toggle_p: f64) {
        self.dirty = true;

        for revealed in self.start_cells.iter_mut() {
            if rng.gen_bool(toggle_p) {
                *revealed = !*revealed;
            }
        }
    }

    /// Redraws the entire reveal mask: every cell is revealed independently
    /// with probability `reveal_p`.
    pub fn randomize_reveal(&mut self, rng: &mut impl Rng, reveal_p: f64) {
        self.dirty = true;

        for revealed in self.start_cells.iter_mut() {
            *revealed = rng.gen_bool(reveal_p);
        }
    }

    /// Replaces the solution grid with a uniformly drawn random one by
    /// running the backtracking solver over an empty grid with randomized
    /// branching order. The reveal mask is left untouched.
    pub fn randomize_cells(&mut self, rng: &mut impl Rng) {
        self.dirty = true;
        let mut state = SolveState::new();
        let solved = randomize_cells_rec(&mut state, rng, 0);
        debug_assert!(solved, "An empty grid must admit a solution.");

        for cell in 0..NUM_CELLS {
            self.cells[cell] = state.value_of(cell).unwrap();
        }
    }

    /// Applies a random semantics-preserving relabeling to this puzzle: the
    /// digits are permuted, the three row bands and the rows within each
    /// band are shuffled, and likewise for columns. The reveal mask moves
    /// along with the cells, so the difficulty profile of the puzzle is
    /// unchanged.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.dirty = true;

        // Remap all digits.
        let digit_map = permutation(rng, 9);

        for cell in self.cells.iter_mut() {
            *cell = digit_map[*cell as usize] as u8;
        }

        // Shuffle rows.
        let row_map = line_map(rng);
        let mut row_cells = [0; NUM_CELLS];
        let mut row_start = [false; NUM_CELLS];

        for row in 0..9 {
            for col in 0..9 {
                row_cells[row * 9 + col] = self.cells[row_map[row] * 9 + col];
                row_start[row * 9 + col] =
                    self.start_cells[row_map[row] * 9 + col];
            }
        }

        // Shuffle columns of the row-shuffled grid.
        let col_map = line_map(rng);

        for row in 0..9 {
            for col in 0..9 {
                self.cells[row * 9 + col] = row_cells[row * 9 + col_map[col]];
                self.start_cells[row * 9 + col] =
                    row_start[row * 9 + col_map[col]];
            }
        }
    }

    /// Gets the starting state of this puzzle, in which exactly the
    /// revealed cells are entered. The state is cached and only rebuilt
    /// after a mutation.
    pub fn start_state(&mut self) -> &SolveState {
        if self.dirty {
            self.start_state.clear();

            for cell in 0..NUM_CELLS {
                if self.start_cells[cell] {
                    self.start_state.assign(cell, self.cells[cell]);
                }
            }

            self.dirty = false;
        }

        &self.start_state
    }

    /// Simulates a human solve of this puzzle and records its difficulty
    /// fingerprint, which is also stored in [Puzzle::profile].
    ///
    /// Starting from the puzzle's starting state, the rules of
    /// [standard_rules] are tried strictly in ascending difficulty order.
    /// The move list of the first rule that finds anything is applied, a
    /// `(level, count)` entry is recorded, and the sweep restarts with the
    /// easiest rule. Once no rule finds a move, whether the state got
    /// solved is recorded and the profile returned.
    pub fn calc_profile(&mut self) -> &Profile {
        let mut state = self.start_state().clone();
        let rules = standard_rules();
        self.profile.clear();

        'sweep: loop {
            for (level, rule) in rules.iter().enumerate() {
                let moves = rule.find_moves(&state);

                if !moves.is_empty() {
                    state.apply_all(&moves);
                    self.profile.add(level, moves.len());
                    continue 'sweep;
                }
            }

            break;
        }

        debug_assert!(state.ok());
        self.profile.set_solved(state.is_solved());
        &self.profile
    }

    /// Computes the fitness of this puzzle for the evolutionary search:
    /// the length of its difficulty profile, plus a penalty of 100 if the
    /// deduction rules cannot solve it. Lower is better, so unsolvable
    /// reveal masks always lose against any solvable one. Change this
    /// function to steer the search towards other difficulty shapes.
    pub fn fitness(&mut self) -> f64 {
        self.calc_profile();
        self.profile.len() as f64 +
            if self.profile.is_solved() { 0.0 } else { 100.0 }
    }

    /// Renders the grid as text: one line per row with space-separated
    /// symbols, an extra space before each box and a blank line between
    /// box bands. If `full` is set, every cell shows its solution digit;
    /// otherwise concealed cells show `-`.
    ///
    /// The output parses back through [Puzzle::parse]; a full rendering
    /// reproduces the same solution grid and alphabet, a masked rendering
    /// the same reveal mask.
    pub fn render(&self, full: bool) -> String {
        let mut out = String::new();

        for cell in 0..NUM_CELLS {
            if cell % 3 == 0 {
                out.push(' ');
            }

            if full || self.start_cells[cell] {
                out.push(' ');
                out.push(self.symbols[self.cells[cell] as usize]);
            }
            else {
                out.push_str(" -");
            }

            if cell % 9 == 8 {
                out.push('\n');
            }

            if cell == 26 || cell == 53 {
                out.push('\n');
            }
        }

        out
    }
}

fn randomize_cells_rec(state: &mut SolveState, rng: &mut impl Rng,
        cell: usize) -> bool {
    if cell == NUM_CELLS {
        return true;
    }

    for digit in permutation(rng, 9) {
        let digit = digit as u8;

        if !state.has_option(cell, digit) {
            continue;
        }

        let backup = state.clone();
        state.assign(cell, digit);

        if randomize_cells_rec(state, rng, cell + 1) {
            return true;
        }

        *state = backup;
    }

    false
}

impl Default for Puzzle {
    fn default() -> Puzzle {
        Puzzle::new()
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(false).as_str())
    }
}
