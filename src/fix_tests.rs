use crate::Puzzle;
use crate::rules::{Deduction, NakedSingle};
use crate::state::Move;

/// The well-known example puzzle from the Wikipedia article on Sudoku,
/// which has 30 givens, a unique solution, and is solvable with singles
/// alone.
const WIKIPEDIA: &str = "
    53- -7- ---
    6-- 195 ---
    -98 --- -6-

    8-- -6- --3
    4-- 8-3 --1
    7-- -2- --6

    -6- --- 28-
    --- 419 --5
    --- -8- -79";

#[test]
fn loaded_naked_single_has_one_option() {
    // Row 4 reveals every digit except the one of the center cell, so
    // cell 40 is determined by its row alone.
    let code = format!("{}1234-6789{}", "-".repeat(36), "-".repeat(36));
    let mut puzzle = Puzzle::parse(&code).unwrap();
    let state = puzzle.start_state().clone();

    // The ninth symbol is padded in as '5' and gets the last digit id.
    assert_eq!('5', puzzle.symbols()[8]);
    assert_eq!(1, state.count_options(40));
    assert_eq!(0b1_0000_0000, state.options_of(40));
    assert_eq!(
        vec![Move::Assign { cell: 40, digit: 8 }],
        NakedSingle.find_moves(&state));

    // The profile starts with exactly that one naked single.
    let profile = puzzle.calc_profile();
    assert_eq!(0, profile.level(0));
    assert_eq!(1, profile.count(0));
}

#[test]
fn wikipedia_puzzle_solves_with_singles() {
    let mut puzzle = Puzzle::parse(WIKIPEDIA).unwrap();

    assert_eq!(30, puzzle.count_revealed());

    let profile = puzzle.calc_profile().clone();

    assert!(profile.is_solved());

    // 51 concealed cells, each entered exactly once.
    assert_eq!(51, profile.total_moves());
    assert!(profile.entries().iter().all(|e| e.level <= 1));
    assert_eq!(profile.len() as f64, puzzle.fitness());
}

#[test]
fn wikipedia_puzzle_force_solves_to_the_same_grid() {
    let mut puzzle = Puzzle::parse(WIKIPEDIA).unwrap();
    let mut state = puzzle.start_state().clone();

    assert!(state.force_solve());
    assert!(state.is_solved());

    for cell in 0..81 {
        assert_eq!(Some(puzzle.cell(cell)), state.value_of(cell));
    }
}

#[test]
fn wikipedia_full_print_round_trips() {
    let puzzle = Puzzle::parse(WIKIPEDIA).unwrap();
    let reparsed = Puzzle::parse(&puzzle.render(true)).unwrap();

    assert_eq!(puzzle.cells(), reparsed.cells());
    assert_eq!(puzzle.symbols(), reparsed.symbols());
}

#[test]
fn letters_puzzle_alphabet_in_order_of_appearance() {
    let code: String = crate::DEFAULT_CELLS.iter()
        .map(|&digit| char::from(b'A' + digit))
        .collect();
    let puzzle = Puzzle::parse(&code).unwrap();

    assert_eq!(
        &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'],
        puzzle.symbols());
    assert_eq!(&crate::DEFAULT_CELLS, puzzle.cells());
    assert_eq!(81, puzzle.count_revealed());
}

#[test]
fn letters_puzzle_masked_print_round_trips() {
    let mut code: Vec<char> = crate::DEFAULT_CELLS.iter()
        .map(|&digit| char::from(b'A' + digit))
        .collect();

    for cell in [0, 5, 13, 40, 77] {
        code[cell] = '-';
    }

    let code: String = code.into_iter().collect();
    let puzzle = Puzzle::parse(&code).unwrap();

    assert_eq!(76, puzzle.count_revealed());

    // The digit ids differ from the unmasked variant (the concealed 'A' in
    // the corner no longer appears first), but enough givens remain to
    // force the original grid back in symbol space.
    for cell in 0..81 {
        assert_eq!(
            char::from(b'A' + crate::DEFAULT_CELLS[cell]),
            puzzle.symbols()[puzzle.cell(cell) as usize]);
    }

    let reparsed = Puzzle::parse(&puzzle.render(false)).unwrap();

    assert_eq!(puzzle.start_cells(), reparsed.start_cells());
    assert_eq!(puzzle.cells(), reparsed.cells());
}
