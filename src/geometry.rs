//! This module contains the precomputed geometry tables of a standard 9x9
//! Sudoku grid: region membership, per-cell peer lists, and the row-in-box /
//! column-in-box overlap structure used by the
//! [RegionOverlap](crate::rules::RegionOverlap) deduction.
//!
//! All tables are `const` items evaluated at compile time. Cells are indexed
//! `0..81` in row-major order, regions `0..27` (rows `0..9`, columns `9..18`,
//! boxes `18..27`) and overlaps `0..54` (the 27 row-in-box overlaps in
//! row-major order, then the 27 column-in-box overlaps in column-major
//! order).

/// The number of cells of the grid.
pub const NUM_CELLS: usize = 81;

/// The number of regions (9 rows + 9 columns + 9 boxes).
pub const NUM_REGIONS: usize = 27;

/// The number of 3-cell overlaps between a line and a box.
pub const NUM_OVERLAPS: usize = 54;

/// The number of peers each cell has, that is, distinct other cells sharing
/// at least one region with it.
pub const NUM_LINKS: usize = 20;

/// A candidate mask with all nine digits available.
pub const ALL_OPTIONS: u16 = 0b1_1111_1111;

const fn build_members() -> [[usize; 9]; NUM_REGIONS] {
    let mut members = [[0; 9]; NUM_REGIONS];
    let mut r = 0;

    while r < 9 {
        let mut i = 0;

        while i < 9 {
            members[r][i] = r * 9 + i;
            members[9 + r][i] = i * 9 + r;
            i += 1;
        }

        r += 1;
    }

    let mut b = 0;

    while b < 9 {
        let top_left = (b / 3) * 27 + (b % 3) * 3;
        let mut i = 0;

        while i < 9 {
            members[18 + b][i] = top_left + (i / 3) * 9 + i % 3;
            i += 1;
        }

        b += 1;
    }

    members
}

const fn build_regions() -> [[usize; 3]; NUM_CELLS] {
    let mut regions = [[0; 3]; NUM_CELLS];
    let mut c = 0;

    while c < NUM_CELLS {
        let row = c / 9;
        let col = c % 9;
        regions[c] = [row, 9 + col, 18 + (row / 3) * 3 + col / 3];
        c += 1;
    }

    regions
}

const fn build_links() -> [[usize; NUM_LINKS]; NUM_CELLS] {
    let mut links = [[0; NUM_LINKS]; NUM_CELLS];
    let mut c = 0;

    while c < NUM_CELLS {
        let row = c / 9;
        let col = c % 9;
        let mut count = 0;
        let mut o = 0;

        while o < NUM_CELLS {
            if o != c {
                let o_row = o / 9;
                let o_col = o % 9;
                let same_box =
                    o_row / 3 == row / 3 && o_col / 3 == col / 3;

                if o_row == row || o_col == col || same_box {
                    links[c][count] = o;
                    count += 1;
                }
            }

            o += 1;
        }

        c += 1;
    }

    links
}

const fn build_overlaps() -> [[usize; 3]; NUM_OVERLAPS] {
    let mut overlaps = [[0; 3]; NUM_OVERLAPS];
    let mut i = 0;

    while i < 27 {
        let line = i / 3;
        let segment = i % 3;
        let mut k = 0;

        while k < 3 {
            overlaps[i][k] = line * 9 + segment * 3 + k;
            overlaps[27 + i][k] = (segment * 3 + k) * 9 + line;
            k += 1;
        }

        i += 1;
    }

    overlaps
}

const fn build_box_overlaps() -> [[usize; 3]; 18] {
    let mut box_overlaps = [[0; 3]; 18];
    let mut b = 0;

    while b < 9 {
        let mut k = 0;

        while k < 3 {
            box_overlaps[b][k] = ((b / 3) * 3 + k) * 3 + b % 3;
            box_overlaps[9 + b][k] = 27 + ((b % 3) * 3 + k) * 3 + b / 3;
            k += 1;
        }

        b += 1;
    }

    box_overlaps
}

const fn build_overlap_regions() -> [[usize; 2]; NUM_OVERLAPS] {
    let mut overlap_regions = [[0; 2]; NUM_OVERLAPS];
    let mut i = 0;

    while i < 27 {
        let line = i / 3;
        let segment = i % 3;
        overlap_regions[i] = [line, 18 + (line / 3) * 3 + segment];
        overlap_regions[27 + i] = [9 + line, 18 + segment * 3 + line / 3];
        i += 1;
    }

    overlap_regions
}

/// The cell indices of each region, in ascending order.
pub const MEMBERS: [[usize; 9]; NUM_REGIONS] = build_members();

/// The `{row, column, box}` region indices of each cell.
pub const REGIONS: [[usize; 3]; NUM_CELLS] = build_regions();

/// The sorted peers of each cell.
pub const LINKS: [[usize; NUM_LINKS]; NUM_CELLS] = build_links();

/// The cell indices of each overlap, in ascending order.
pub const OVERLAPS: [[usize; 3]; NUM_OVERLAPS] = build_overlaps();

/// The overlaps contained in each box. Entry `b` of the first nine holds the
/// three row-overlaps of box `b`, entry `9 + b` its three column-overlaps,
/// so each box appears twice, once per partition direction.
pub const BOX_OVERLAPS: [[usize; 3]; 18] = build_box_overlaps();

/// The `{line_region, box_region}` each overlap belongs to.
pub const OVERLAP_REGIONS: [[usize; 2]; NUM_OVERLAPS] = build_overlap_regions();

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn members_partition_the_grid() {
        for kind in 0..3 {
            let mut seen = [false; NUM_CELLS];

            for region in 0..9 {
                for &cell in &MEMBERS[kind * 9 + region] {
                    assert!(!seen[cell],
                        "Cell {} appears twice in region kind {}.", cell,
                        kind);
                    seen[cell] = true;
                }
            }

            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn members_are_sorted() {
        for region in MEMBERS.iter() {
            for window in region.windows(2) {
                assert!(window[0] < window[1]);
            }
        }
    }

    #[test]
    fn regions_consistent_with_members() {
        for cell in 0..NUM_CELLS {
            for &region in &REGIONS[cell] {
                assert!(MEMBERS[region].contains(&cell),
                    "Cell {} missing from region {}.", cell, region);
            }
        }
    }

    #[test]
    fn links_are_sorted_and_distinct() {
        for cell in 0..NUM_CELLS {
            for window in LINKS[cell].windows(2) {
                assert!(window[0] < window[1]);
            }

            assert!(!LINKS[cell].contains(&cell));
        }
    }

    #[test]
    fn links_share_a_region() {
        for cell in 0..NUM_CELLS {
            for &peer in &LINKS[cell] {
                let shared = REGIONS[cell].iter()
                    .any(|r| REGIONS[peer].contains(r));
                assert!(shared, "Cells {} and {} share no region.", cell,
                    peer);
            }
        }
    }

    #[test]
    fn first_links_row_matches_known_values() {
        // Peers of the top-left cell: its row, column, and box.
        assert_eq!(
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 18, 19, 20, 27, 36, 45, 54,
                63, 72],
            LINKS[0]);
    }

    #[test]
    fn overlaps_lie_in_their_parents() {
        for overlap in 0..NUM_OVERLAPS {
            let [line, box_region] = OVERLAP_REGIONS[overlap];
            assert!(line < 18);
            assert!(box_region >= 18);

            for &cell in &OVERLAPS[overlap] {
                assert!(MEMBERS[line].contains(&cell));
                assert!(MEMBERS[box_region].contains(&cell));
            }
        }
    }

    #[test]
    fn box_overlaps_partition_each_box() {
        for entry in 0..18 {
            let box_region = 18 + entry % 9;
            let mut cells: Vec<usize> = BOX_OVERLAPS[entry].iter()
                .flat_map(|&o| OVERLAPS[o].iter().copied())
                .collect();
            cells.sort_unstable();
            assert_eq!(MEMBERS[box_region].to_vec(), cells);
        }
    }

    #[test]
    fn box_overlaps_agree_on_parent_box() {
        for entry in 0..18 {
            let box_region = 18 + entry % 9;

            for &overlap in &BOX_OVERLAPS[entry] {
                assert_eq!(box_region, OVERLAP_REGIONS[overlap][1]);
            }
        }
    }

    #[test]
    fn line_triples_agree_on_parent_line() {
        // Overlaps come in consecutive triples that share their line.
        for first in (0..NUM_OVERLAPS).step_by(3) {
            let line = OVERLAP_REGIONS[first][0];
            assert_eq!(line, OVERLAP_REGIONS[first + 1][0]);
            assert_eq!(line, OVERLAP_REGIONS[first + 2][0]);
        }
    }
}
