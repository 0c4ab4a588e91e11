//! This module contains the family of human-style deduction rules.
//!
//! Every rule is a pure inspection of a [SolveState] which emits a list of
//! safe [Move]s and never mutates the state. Rules are ranked by the
//! sophistication a human solver needs for them; [standard_rules] returns
//! them as a table in ascending difficulty order, so the profile loop in
//! [Puzzle::calc_profile](crate::Puzzle::calc_profile) can be a generic
//! driver over the table and future rules plug in without touching it.
//!
//! The emission order of every rule is fixed to keep tests deterministic:
//! structures (regions, overlap triples, line combinations) are visited in
//! ascending index order, target cells in ascending cell order and digits in
//! ascending bit order.

use crate::geometry::{
    BOX_OVERLAPS,
    MEMBERS,
    NUM_CELLS,
    NUM_OVERLAPS,
    OVERLAPS,
    OVERLAP_REGIONS
};
use crate::state::{Move, SolveState};

/// The subset and fish sizes considered by the higher rules.
const SET_SIZES: std::ops::RangeInclusive<u32> = 2..=4;

/// A trait for deduction rules, which use logical reasoning to find safe
/// moves in a partial solution.
///
/// Implementations must be pure: two calls on the same state return the same
/// moves, and the state is never modified. Every emitted move must be
/// consistent with the candidate masks of the inspected state, so that
/// applying the full list (in order) to a clone of the state preserves its
/// invariants.
pub trait Deduction {

    /// Returns a human-readable name of this rule.
    fn name(&self) -> &'static str;

    /// Inspects the given state and returns all moves this rule can justify,
    /// in the fixed emission order. The list is empty if the rule finds
    /// nothing.
    fn find_moves(&self, state: &SolveState) -> Vec<Move>;
}

/// Returns the standard rule table in ascending difficulty order. The index
/// of a rule in this table is its difficulty level, which is also what the
/// profile records.
pub fn standard_rules() -> Vec<Box<dyn Deduction>> {
    vec![
        Box::new(NakedSingle),
        Box::new(HiddenSingle),
        Box::new(RegionOverlap),
        Box::new(NakedSet),
        Box::new(HiddenSet),
        Box::new(Fish)
    ]
}

/// Pushes one eliminate move per set bit of `digits`, ascending, provided
/// the cell still has the candidate.
fn eliminate_digits(state: &SolveState, cell: usize, digits: u16,
        moves: &mut Vec<Move>) {
    let mut remaining = digits;

    while remaining != 0 {
        let digit = remaining.trailing_zeros() as u8;
        remaining &= remaining - 1;

        if state.has_option(cell, digit) {
            moves.push(Move::Eliminate { cell, digit });
        }
    }
}

/// Level 0: if a cell has exactly one candidate left, it must be that digit.
///
/// The simplest rule and the workhorse of easy puzzles: whenever
/// [SolveState::assign] strikes candidates from the peers of an entered
/// digit, cells collapse to a single option and are picked up here on the
/// next sweep.
#[derive(Clone, Copy)]
pub struct NakedSingle;

impl Deduction for NakedSingle {

    fn name(&self) -> &'static str {
        "naked single"
    }

    fn find_moves(&self, state: &SolveState) -> Vec<Move> {
        let mut moves = Vec::new();

        for cell in 0..NUM_CELLS {
            if state.count_options(cell) == 1 {
                let digit = state.first_option(cell).unwrap();
                moves.push(Move::Assign { cell, digit });
            }
        }

        moves
    }
}

/// Level 1: if a digit has only one possible cell left within a region, it
/// must go there, even when that cell still has other candidates.
///
/// The digits present in exactly one cell of a region are found with a
/// bit-parallel fold over the region's candidate masks: `opt_any`
/// accumulates every seen digit, `opt_multi` every digit seen a second
/// time, so `opt_any & !opt_multi` is the sought set.
#[derive(Clone, Copy)]
pub struct HiddenSingle;

impl Deduction for HiddenSingle {

    fn name(&self) -> &'static str {
        "hidden single"
    }

    fn find_moves(&self, state: &SolveState) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut emitted = [false; NUM_CELLS];

        for region in MEMBERS.iter() {
            let mut opt_any = 0u16;
            let mut opt_multi = 0u16;

            for &cell in region {
                opt_multi |= state.options_of(cell) & opt_any;
                opt_any |= state.options_of(cell);
            }

            let opt_once = opt_any & !opt_multi;

            if opt_once == 0 {
                continue;
            }

            for &cell in region {
                let unique = state.options_of(cell) & opt_once;

                // A cell that is the unique holder in several of its
                // regions is still entered only once per sweep, so the
                // move count equals the number of placements.
                if unique != 0 && !emitted[cell] {
                    emitted[cell] = true;
                    moves.push(Move::Assign {
                        cell,
                        digit: unique.trailing_zeros() as u8
                    });
                }
            }
        }

        moves
    }
}

/// Level 2: pointing and claiming over the 3-cell overlaps of lines and
/// boxes.
///
/// If all candidates for a digit within a box lie in a single overlap, the
/// digit is pinned to that overlap and disappears from the rest of the
/// overlap's line (pointing). If all candidates within a line lie in a
/// single overlap, the digit disappears from the rest of the overlap's box
/// (claiming). Both directions reduce to the same test on the candidate
/// unions of an overlap triple.
#[derive(Clone, Copy)]
pub struct RegionOverlap;

impl RegionOverlap {

    /// Emits the eliminations for one triple of overlaps that partitions a
    /// box or a line. `confined_digits` of an overlap are those appearing
    /// in it and in neither sibling; `parent` selects which of the
    /// overlap's two parent regions is cleaned (0 = line, 1 = box).
    fn emit_confined(state: &SolveState, triple: [usize; 3], parent: usize,
            overlap_options: &[u16; NUM_OVERLAPS], moves: &mut Vec<Move>) {
        let [m0, m1, m2] = triple.map(|o| overlap_options[o]);
        let single = (m0 ^ m1 ^ m2) & !(m0 & m1 & m2);

        if single == 0 {
            return;
        }

        for &overlap in &triple {
            let confined = overlap_options[overlap] & single;

            if confined == 0 {
                continue;
            }

            let region = OVERLAP_REGIONS[overlap][parent];
            let mut remaining = confined;

            while remaining != 0 {
                let digit = remaining.trailing_zeros() as u8;
                remaining &= remaining - 1;

                for &cell in &MEMBERS[region] {
                    if !OVERLAPS[overlap].contains(&cell) &&
                            state.has_option(cell, digit) {
                        moves.push(Move::Eliminate { cell, digit });
                    }
                }
            }
        }
    }
}

impl Deduction for RegionOverlap {

    fn name(&self) -> &'static str {
        "region overlap"
    }

    fn find_moves(&self, state: &SolveState) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut overlap_options = [0u16; NUM_OVERLAPS];

        for (i, overlap) in OVERLAPS.iter().enumerate() {
            overlap_options[i] = overlap.iter()
                .fold(0, |mask, &cell| mask | state.options_of(cell));
        }

        // Pointing: confined within a box, eliminated from the line.
        for &triple in BOX_OVERLAPS.iter() {
            RegionOverlap::emit_confined(state, triple, 0, &overlap_options,
                &mut moves);
        }

        // Claiming: confined within a line, eliminated from the box.
        for first in (0..NUM_OVERLAPS).step_by(3) {
            let triple = [first, first + 1, first + 2];
            RegionOverlap::emit_confined(state, triple, 1, &overlap_options,
                &mut moves);
        }

        moves
    }
}

/// Level 3: naked pairs, triples and quads.
///
/// If `k` cells of a region carry the identical candidate mask of popcount
/// `k`, those `k` digits are spoken for and disappear from every other cell
/// of the region.
#[derive(Clone, Copy)]
pub struct NakedSet;

impl Deduction for NakedSet {

    fn name(&self) -> &'static str {
        "naked set"
    }

    fn find_moves(&self, state: &SolveState) -> Vec<Move> {
        let mut moves = Vec::new();

        for region in MEMBERS.iter() {
            for k in SET_SIZES {
                for &leader in region.iter() {
                    let mask = state.options_of(leader);

                    if mask.count_ones() != k {
                        continue;
                    }

                    let group: Vec<usize> = region.iter()
                        .copied()
                        .filter(|&cell| state.options_of(cell) == mask)
                        .collect();

                    // Process each distinct mask once, at its first holder.
                    if group[0] != leader || group.len() != k as usize {
                        continue;
                    }

                    for &cell in region.iter() {
                        if !group.contains(&cell) {
                            eliminate_digits(state, cell, mask, &mut moves);
                        }
                    }
                }
            }
        }

        moves
    }
}

/// Appends all `k`-element combinations of `items` (in lexicographic order)
/// to `result`.
fn combinations(items: &[usize], k: usize, first: usize,
        current: &mut Vec<usize>, result: &mut Vec<Vec<usize>>) {
    if current.len() == k {
        result.push(current.clone());
        return;
    }

    for i in first..items.len() {
        current.push(items[i]);
        combinations(items, k, i + 1, current, result);
        current.pop();
    }
}

fn all_combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    combinations(items, k, 0, &mut Vec::new(), &mut result);
    result
}

/// Level 4: hidden pairs, triples and quads.
///
/// If the cells that can hold any of `k` digits within a region are exactly
/// the same `k` cells, those cells are spoken for and every *other*
/// candidate disappears from them.
#[derive(Clone, Copy)]
pub struct HiddenSet;

impl Deduction for HiddenSet {

    fn name(&self) -> &'static str {
        "hidden set"
    }

    fn find_moves(&self, state: &SolveState) -> Vec<Move> {
        let mut moves = Vec::new();

        for region in MEMBERS.iter() {
            // Positions within the region at which each digit remains a
            // candidate.
            let mut positions = [0u16; 9];

            for (i, &cell) in region.iter().enumerate() {
                let mut mask = state.options_of(cell);

                while mask != 0 {
                    positions[mask.trailing_zeros() as usize] |= 1 << i;
                    mask &= mask - 1;
                }
            }

            for k in SET_SIZES {
                let digits: Vec<usize> = (0..9)
                    .filter(|&d| {
                        let count = positions[d].count_ones();
                        count >= 2 && count <= k
                    })
                    .collect();

                for combo in all_combinations(&digits, k as usize) {
                    let union = combo.iter()
                        .fold(0u16, |mask, &d| mask | positions[d]);

                    if union.count_ones() != k {
                        continue;
                    }

                    let keep = combo.iter()
                        .fold(0u16, |mask, &d| mask | 1 << d);
                    let mut cells = union;

                    while cells != 0 {
                        let pos = cells.trailing_zeros() as usize;
                        cells &= cells - 1;
                        let cell = region[pos];
                        let extra = state.options_of(cell) & !keep;
                        eliminate_digits(state, cell, extra, &mut moves);
                    }
                }
            }
        }

        moves
    }
}

/// Level 5: generalized fish of size 2 to 4 (X-Wing, Swordfish, Jellyfish).
///
/// If there are `k` rows in which a digit's candidate columns all lie
/// within the same `k` columns, the digit is pinned to the crossings and
/// disappears from those columns in every other row; symmetrically with the
/// roles of rows and columns exchanged.
#[derive(Clone, Copy)]
pub struct Fish;

impl Fish {

    /// Candidate masks of `digit` along both axes: element `r` of the first
    /// array holds the columns in which the digit remains possible in row
    /// `r`, element `c` of the second the rows for column `c`.
    fn line_masks(state: &SolveState, digit: u8) -> ([u16; 9], [u16; 9]) {
        let mut row_masks = [0u16; 9];
        let mut col_masks = [0u16; 9];

        for cell in 0..NUM_CELLS {
            if state.has_option(cell, digit) {
                row_masks[cell / 9] |= 1 << (cell % 9);
                col_masks[cell % 9] |= 1 << (cell / 9);
            }
        }

        (row_masks, col_masks)
    }

    fn emit_fish(state: &SolveState, digit: u8, masks: &[u16; 9], k: u32,
            rows_are_base: bool, moves: &mut Vec<Move>) {
        let valid: Vec<usize> = (0..9)
            .filter(|&line| {
                let count = masks[line].count_ones();
                count >= 2 && count <= k
            })
            .collect();

        if valid.len() < k as usize {
            return;
        }

        for combo in all_combinations(&valid, k as usize) {
            let cover = combo.iter()
                .fold(0u16, |mask, &line| mask | masks[line]);

            if cover.count_ones() > k {
                continue;
            }

            for other in 0..9 {
                if combo.contains(&other) {
                    continue;
                }

                let mut cover_lines = cover;

                while cover_lines != 0 {
                    let line = cover_lines.trailing_zeros() as usize;
                    cover_lines &= cover_lines - 1;
                    let cell = if rows_are_base {
                        other * 9 + line
                    }
                    else {
                        line * 9 + other
                    };

                    if state.has_option(cell, digit) {
                        moves.push(Move::Eliminate { cell, digit });
                    }
                }
            }
        }
    }
}

impl Deduction for Fish {

    fn name(&self) -> &'static str {
        "fish"
    }

    fn find_moves(&self, state: &SolveState) -> Vec<Move> {
        let mut moves = Vec::new();

        for digit in 0..9 {
            let (row_masks, col_masks) = Fish::line_masks(state, digit);

            for k in SET_SIZES {
                Fish::emit_fish(state, digit, &row_masks, k, true,
                    &mut moves);
                Fish::emit_fish(state, digit, &col_masks, k, false,
                    &mut moves);
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    /// Applying a rule's own output must drive it to a fixed point.
    fn assert_fixpoint(rule: &dyn Deduction, state: &SolveState) {
        let mut state = state.clone();
        let moves = rule.find_moves(&state);
        state.apply_all(&moves);
        assert!(state.ok());
        assert!(rule.find_moves(&state).is_empty(),
            "Rule {} is not at a fixed point after applying its output.",
            rule.name());
    }

    #[test]
    fn rule_table_is_ordered() {
        let names: Vec<&str> = standard_rules().iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(
            vec!["naked single", "hidden single", "region overlap",
                "naked set", "hidden set", "fish"],
            names);
    }

    #[test]
    fn naked_single_finds_last_candidate() {
        let mut state = SolveState::new();

        // Strike everything from the center cell except digit 3.
        for digit in 0..9 {
            if digit != 3 {
                state.eliminate(40, digit);
            }
        }

        assert_eq!(0b0000_1000, state.options_of(40));
        assert_eq!(1, state.count_options(40));

        let moves = NakedSingle.find_moves(&state);

        assert_eq!(vec![Move::Assign { cell: 40, digit: 3 }], moves);
        assert_fixpoint(&NakedSingle, &state);
    }

    #[test]
    fn naked_single_silent_on_fresh_state() {
        assert!(NakedSingle.find_moves(&SolveState::new()).is_empty());
    }

    #[test]
    fn hidden_single_finds_unique_cell() {
        let mut state = SolveState::new();

        // Digit 6 may only go in cell 5 of row 0, though cell 5 itself
        // keeps all of its other candidates.
        for &cell in &MEMBERS[0] {
            if cell != 5 {
                state.eliminate(cell, 6);
            }
        }

        assert!(NakedSingle.find_moves(&state).is_empty());

        let moves = HiddenSingle.find_moves(&state);

        assert_eq!(vec![Move::Assign { cell: 5, digit: 6 }], moves);
        assert_fixpoint(&HiddenSingle, &state);
    }

    #[test]
    fn hidden_single_emits_each_cell_once() {
        let mut state = SolveState::new();

        // Digit 2 is unique to cell 0 in its row, its column, and its box.
        for cell in 1..27 {
            state.eliminate(cell, 2);
        }

        for &cell in &MEMBERS[9] {
            if cell != 0 {
                state.eliminate(cell, 2);
            }
        }

        let moves = HiddenSingle.find_moves(&state);

        assert_eq!(vec![Move::Assign { cell: 0, digit: 2 }], moves);
    }

    #[test]
    fn region_overlap_points_into_the_line() {
        let mut state = SolveState::new();

        // Digit 0 is confined to cells { 0, 1, 2 } within box 0.
        for &cell in &[9, 10, 11, 18, 19, 20] {
            state.eliminate(cell, 0);
        }

        let moves = RegionOverlap.find_moves(&state);
        let expected: Vec<Move> = (3..9)
            .map(|cell| Move::Eliminate { cell, digit: 0 })
            .collect();

        assert_eq!(expected, moves);
        assert_fixpoint(&RegionOverlap, &state);
    }

    #[test]
    fn region_overlap_claims_into_the_box() {
        let mut state = SolveState::new();

        // Digit 4 is confined to cells { 0, 1, 2 } within row 0, but stays
        // possible everywhere in box 0.
        for cell in 3..9 {
            state.eliminate(cell, 4);
        }

        let moves = RegionOverlap.find_moves(&state);
        let expected: Vec<Move> = [9, 10, 11, 18, 19, 20].iter()
            .map(|&cell| Move::Eliminate { cell, digit: 4 })
            .collect();

        assert_eq!(expected, moves);
        assert_fixpoint(&RegionOverlap, &state);
    }

    #[test]
    fn naked_set_strips_pair_from_region() {
        let mut state = SolveState::new();

        // Cells 0 and 1 hold exactly { 0, 1 }.
        for cell in [0, 1] {
            for digit in 2..9 {
                state.eliminate(cell, digit);
            }
        }

        let moves = NakedSet.find_moves(&state);

        // Row 0 is cleaned first, then box 0. The rule observes the state
        // as of the start of the sweep, so cell 2 is struck a second time
        // by the box pass; eliminations are idempotent.
        let mut expected = Vec::new();

        for cell in 2..9 {
            expected.push(Move::Eliminate { cell, digit: 0 });
            expected.push(Move::Eliminate { cell, digit: 1 });
        }

        for cell in [2, 9, 10, 11, 18, 19, 20] {
            expected.push(Move::Eliminate { cell, digit: 0 });
            expected.push(Move::Eliminate { cell, digit: 1 });
        }

        assert_eq!(expected, moves);
        assert_fixpoint(&NakedSet, &state);
    }

    #[test]
    fn hidden_set_strips_other_candidates() {
        let mut state = SolveState::new();

        // Digits 0 and 1 fit only in cells 0 and 1 of row 0.
        for cell in 2..9 {
            state.eliminate(cell, 0);
            state.eliminate(cell, 1);
        }

        let moves = HiddenSet.find_moves(&state);
        let mut expected = Vec::new();

        for cell in [0, 1] {
            for digit in 2..9 {
                expected.push(Move::Eliminate { cell, digit });
            }
        }

        assert_eq!(expected, moves);
        assert_fixpoint(&HiddenSet, &state);
    }

    #[test]
    fn fish_finds_x_wing_on_rows() {
        let mut state = SolveState::new();

        // Digit 0 is restricted to columns 0 and 8 in rows 0 and 8.
        for cell in 1..8 {
            state.eliminate(cell, 0);
            state.eliminate(72 + cell, 0);
        }

        let moves = Fish.find_moves(&state);
        let mut expected = Vec::new();

        for row in 1..8 {
            expected.push(Move::Eliminate { cell: row * 9, digit: 0 });
            expected.push(Move::Eliminate { cell: row * 9 + 8, digit: 0 });
        }

        assert_eq!(expected, moves);
        assert_fixpoint(&Fish, &state);
    }

    #[test]
    fn rules_are_pure() {
        let mut state = SolveState::new();
        state.assign(0, 0);
        state.assign(40, 4);
        let snapshot = state.clone();

        for rule in standard_rules() {
            rule.find_moves(&state);
            assert_eq!(snapshot, state,
                "Rule {} mutated the state.", rule.name());
        }
    }
}
