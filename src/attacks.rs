//! Precomputed attack and move tables: pseudo-attacks, rays, distances, and
//! the rotated-bitboard sliding-attack lookup (rank, file, and both
//! diagonals), all built once at process start behind [`once_cell::sync::Lazy`].
//!
//! The rotation maps and diagonal length/shift tables mirror the classic
//! rotated-bitboard technique: a square's rank attacks are read directly off
//! the normal occupancy; its file/diagonal attacks are read off an occupancy
//! bitboard that has been rotated so that file or diagonal lines become
//! contiguous bytes.

use crate::bitboard::Bitboard;
use crate::types::{Color, PieceType, Square};
use once_cell::sync::Lazy;

pub const DIR_N: usize = 0;
pub const DIR_S: usize = 1;
pub const DIR_E: usize = 2;
pub const DIR_W: usize = 3;
pub const DIR_NE: usize = 4;
pub const DIR_NW: usize = 5;
pub const DIR_SE: usize = 6;
pub const DIR_SW: usize = 7;

// --- Rotation index maps -----------------------------------------------
//
// `ROTATE_*[sq]` gives, for target position `sq` in the rotated board, the
// square in the *normal* board whose bit should be sampled there.

#[rustfmt::skip]
const ROTATE_R90: [u8; 64] = [
    7, 15, 23, 31, 39, 47, 55, 63,
    6, 14, 22, 30, 38, 46, 54, 62,
    5, 13, 21, 29, 37, 45, 53, 61,
    4, 12, 20, 28, 36, 44, 52, 60,
    3, 11, 19, 27, 35, 43, 51, 59,
    2, 10, 18, 26, 34, 42, 50, 58,
    1,  9, 17, 25, 33, 41, 49, 57,
    0,  8, 16, 24, 32, 40, 48, 56,
];

#[rustfmt::skip]
const ROTATE_L90: [u8; 64] = [
    56, 48, 40, 32, 24, 16, 8, 0,
    57, 49, 41, 33, 25, 17, 9, 1,
    58, 50, 42, 34, 26, 18, 10, 2,
    59, 51, 43, 35, 27, 19, 11, 3,
    60, 52, 44, 36, 28, 20, 12, 4,
    61, 53, 45, 37, 29, 21, 13, 5,
    62, 54, 46, 38, 30, 22, 14, 6,
    63, 55, 47, 39, 31, 23, 15, 7,
];

#[rustfmt::skip]
const ROTATE_R45: [u8; 64] = [
     7,
     6, 15,
     5, 14, 23,
     4, 13, 22, 31,
     3, 12, 21, 30, 39,
     2, 11, 20, 29, 38, 47,
     1, 10, 19, 28, 37, 46, 55,
     0,  9, 18, 27, 36, 45, 54, 63,
     8, 17, 26, 35, 44, 53, 62,
    16, 25, 34, 43, 52, 61,
    24, 33, 42, 51, 60,
    32, 41, 50, 59,
    40, 49, 58,
    48, 57,
    56,
];

#[rustfmt::skip]
const ROTATE_L45: [u8; 64] = [
     0,
     8,  1,
    16,  9,  2,
    24, 17, 10,  3,
    32, 25, 18, 11,  4,
    40, 33, 26, 19, 12,  5,
    48, 41, 34, 27, 20, 13,  6,
    56, 49, 42, 35, 28, 21, 14, 7,
    57, 50, 43, 36, 29, 22, 15,
    58, 51, 44, 37, 30, 23,
    59, 52, 45, 38, 31,
    60, 53, 46, 39,
    61, 54, 47,
    62, 55,
    63,
];

#[rustfmt::skip]
const LENGTH_DIAG_UP: [u32; 64] = [
    8, 7, 6, 5, 4, 3, 2, 1,
    7, 8, 7, 6, 5, 4, 3, 2,
    6, 7, 8, 7, 6, 5, 4, 3,
    5, 6, 7, 8, 7, 6, 5, 4,
    4, 5, 6, 7, 8, 7, 6, 5,
    3, 4, 5, 6, 7, 8, 7, 6,
    2, 3, 4, 5, 6, 7, 8, 7,
    1, 2, 3, 4, 5, 6, 7, 8,
];

#[rustfmt::skip]
const LENGTH_DIAG_DOWN: [u32; 64] = [
    1, 2, 3, 4, 5, 6, 7, 8,
    2, 3, 4, 5, 6, 7, 8, 7,
    3, 4, 5, 6, 7, 8, 7, 6,
    4, 5, 6, 7, 8, 7, 6, 5,
    5, 6, 7, 8, 7, 6, 5, 4,
    6, 7, 8, 7, 6, 5, 4, 3,
    7, 8, 7, 6, 5, 4, 3, 2,
    8, 7, 6, 5, 4, 3, 2, 1,
];

#[rustfmt::skip]
const SHIFTS_DIAG_UP: [u32; 64] = [
    28, 21, 15, 10,  6,  3,  1,  0,
    36, 28, 21, 15, 10,  6,  3,  1,
    43, 36, 28, 21, 15, 10,  6,  3,
    49, 43, 36, 28, 21, 15, 10,  6,
    54, 49, 43, 36, 28, 21, 15, 10,
    58, 54, 49, 43, 36, 28, 21, 15,
    61, 58, 54, 49, 43, 36, 28, 21,
    63, 61, 58, 54, 49, 43, 36, 28,
];

#[rustfmt::skip]
const SHIFTS_DIAG_DOWN: [u32; 64] = [
     0,  1,  3,  6, 10, 15, 21, 28,
     1,  3,  6, 10, 15, 21, 28, 36,
     3,  6, 10, 15, 21, 28, 36, 43,
     6, 10, 15, 21, 28, 36, 43, 49,
    10, 15, 21, 28, 36, 43, 49, 54,
    15, 21, 28, 36, 43, 49, 54, 58,
    21, 28, 36, 43, 49, 54, 58, 61,
    28, 36, 43, 49, 54, 58, 61, 63,
];

fn rotate(b: Bitboard, rot_map: &[u8; 64]) -> Bitboard {
    let mut rotated = Bitboard(0);
    for sq in 0..64u8 {
        if b.contains(Square(rot_map[sq as usize])) {
            rotated.set(Square(sq));
        }
    }
    rotated
}

pub fn rotate_r90(b: Bitboard) -> Bitboard {
    rotate(b, &ROTATE_R90)
}
pub fn rotate_l90(b: Bitboard) -> Bitboard {
    rotate(b, &ROTATE_L90)
}
pub fn rotate_r45(b: Bitboard) -> Bitboard {
    rotate(b, &ROTATE_R45)
}
pub fn rotate_l45(b: Bitboard) -> Bitboard {
    rotate(b, &ROTATE_L45)
}

fn inverse_rotation_map(rot_map: &[u8; 64]) -> [u8; 64] {
    let mut inverse = [0u8; 64];
    for (rotated_index, &normal_square) in rot_map.iter().enumerate() {
        inverse[normal_square as usize] = rotated_index as u8;
    }
    inverse
}

static INV_ROTATE_L90: Lazy<[u8; 64]> = Lazy::new(|| inverse_rotation_map(&ROTATE_L90));
static INV_ROTATE_R45: Lazy<[u8; 64]> = Lazy::new(|| inverse_rotation_map(&ROTATE_R45));
static INV_ROTATE_L45: Lazy<[u8; 64]> = Lazy::new(|| inverse_rotation_map(&ROTATE_L45));

/// Sets or clears `sq`'s bit directly within an already L90-rotated
/// occupancy bitboard, without re-rotating the whole board. Used to derive
/// a hypothetical rotated occupancy (a square vacated or filled) from a
/// position's maintained rotated state.
pub fn toggle_l90(rotated: Bitboard, sq: Square, present: bool) -> Bitboard {
    toggle_rotated_bit(rotated, INV_ROTATE_L90[sq.index()], present)
}

/// Same as [`toggle_l90`] but for an R45-rotated occupancy.
pub fn toggle_r45(rotated: Bitboard, sq: Square, present: bool) -> Bitboard {
    toggle_rotated_bit(rotated, INV_ROTATE_R45[sq.index()], present)
}

/// Same as [`toggle_l90`] but for an L45-rotated occupancy.
pub fn toggle_l45(rotated: Bitboard, sq: Square, present: bool) -> Bitboard {
    toggle_rotated_bit(rotated, INV_ROTATE_L45[sq.index()], present)
}

fn toggle_rotated_bit(mut rotated: Bitboard, rotated_index: u8, present: bool) -> Bitboard {
    if present {
        rotated.set(Square(rotated_index));
    } else {
        rotated.clear(Square(rotated_index));
    }
    rotated
}

fn length_diag_up_mask(sq: Square) -> u64 {
    (1u64 << LENGTH_DIAG_UP[sq.index()]) - 1
}
fn length_diag_down_mask(sq: Square) -> u64 {
    (1u64 << LENGTH_DIAG_DOWN[sq.index()]) - 1
}

/// Sliding-attack lookup tables indexed by `[square][occupancy byte]`.
struct SlidingTables {
    rank: Vec<[Bitboard; 256]>,
    file: Vec<[Bitboard; 256]>,
    diag_up: Vec<[Bitboard; 256]>,
    diag_down: Vec<[Bitboard; 256]>,
}

static SLIDING: Lazy<SlidingTables> = Lazy::new(build_sliding_tables);

fn build_sliding_tables() -> SlidingTables {
    let mut rank = vec![[Bitboard(0); 256]; 64];
    let mut file = vec![[Bitboard(0); 256]; 64];
    let mut diag_up = vec![[Bitboard(0); 256]; 64];
    let mut diag_down = vec![[Bitboard(0); 256]; 64];

    // Horizontal (rank) slider attacks, per file of the rook and 8-bit rank occupancy.
    for f in 0u32..8 {
        for j in 0u32..256 {
            let mut mask: u64 = 0;
            let mut x = f as i32 - 1;
            while x >= 0 {
                mask |= 1u64 << x;
                if j & (1 << x) != 0 {
                    break;
                }
                x -= 1;
            }
            let mut x = f + 1;
            while x < 8 {
                mask |= 1u64 << x;
                if j & (1 << x) != 0 {
                    break;
                }
                x += 1;
            }
            for r in 0u32..8 {
                rank[(r * 8 + f) as usize][j as usize] = Bitboard(mask << (r * 8));
            }
        }
    }

    // Vertical (file) slider attacks, per rank of the rook and 8-bit (L90-rotated) file occupancy.
    for r in 0i32..8 {
        for j in 0u32..256 {
            let mut mask: u64 = 0;
            let mut x = 6 - r;
            while x >= 0 {
                mask |= 1u64 << (8 * (7 - x));
                if j & (1 << x) != 0 {
                    break;
                }
                x -= 1;
            }
            let mut x = 8 - r;
            while x < 8 {
                mask |= 1u64 << (8 * (7 - x));
                if j & (1 << x) != 0 {
                    break;
                }
                x += 1;
            }
            for f in 0u32..8 {
                file[(r * 8 + f as i32) as usize][j as usize] = Bitboard(mask << f);
            }
        }
    }

    // Up-diagonal slider attacks (R45-rotated occupancy).
    for sq in 0u32..64 {
        let file = (sq % 8) as i32;
        let rank_ = (sq / 8) as i32;
        let diag_start = sq as i32 - 9 * file.min(rank_);
        let ds_file = diag_start % 8;
        let dl = LENGTH_DIAG_UP[sq as usize];
        for occ in 0u32..(1 << dl) {
            let mut mask: u64 = 0;
            let mut mask2: u64 = 0;
            let center = file - ds_file;
            let mut b1 = center - 1;
            while b1 >= 0 {
                mask |= 1u64 << b1;
                if occ & (1 << b1) != 0 {
                    break;
                }
                b1 -= 1;
            }
            let mut b2 = center + 1;
            while b2 < dl as i32 {
                mask |= 1u64 << b2;
                if occ & (1 << b2) != 0 {
                    break;
                }
                b2 += 1;
            }
            for x in 0..dl as i32 {
                if (mask >> x) & 1 != 0 {
                    mask2 |= 1u64 << (diag_start + 9 * x);
                }
            }
            diag_up[sq as usize][occ as usize] = Bitboard(mask2);
        }
    }

    // Down-diagonal slider attacks (L45-rotated occupancy).
    for sq in 0u32..64 {
        let file = (sq % 8) as i32;
        let rank_ = (sq / 8) as i32;
        let diag_start = 7 * file.min(7 - rank_) + sq as i32;
        let ds_file = diag_start % 8;
        let dl = LENGTH_DIAG_DOWN[sq as usize];
        for occ in 0u32..(1 << dl) {
            let mut mask: u64 = 0;
            let mut mask2: u64 = 0;
            let center = file - ds_file;
            let mut x = center - 1;
            while x >= 0 {
                mask |= 1u64 << x;
                if occ & (1 << x) != 0 {
                    break;
                }
                x -= 1;
            }
            let mut x = center + 1;
            while x < dl as i32 {
                mask |= 1u64 << x;
                if occ & (1 << x) != 0 {
                    break;
                }
                x += 1;
            }
            for x in 0..dl as i32 {
                if (mask >> x) & 1 != 0 {
                    mask2 |= 1u64 << (diag_start - 7 * x);
                }
            }
            diag_down[sq as usize][occ as usize] = Bitboard(mask2);
        }
    }

    SlidingTables {
        rank,
        file,
        diag_up,
        diag_down,
    }
}

/// Rank (rook/queen horizontal) attacks given the plain occupancy bitboard.
pub fn moves_rank(sq: Square, occupied: Bitboard) -> Bitboard {
    let idx = (occupied.0 >> (8 * sq.rank() as u32)) & 255;
    SLIDING.rank[sq.index()][idx as usize]
}

/// File (rook/queen vertical) attacks given the L90-rotated occupancy bitboard.
pub fn moves_file_rotated(sq: Square, occupied_l90: Bitboard) -> Bitboard {
    let idx = (occupied_l90.0 >> (sq.file() as u32 * 8)) & 255;
    SLIDING.file[sq.index()][idx as usize]
}

pub fn moves_file(sq: Square, occupied: Bitboard) -> Bitboard {
    moves_file_rotated(sq, rotate_l90(occupied))
}

/// Up-diagonal (bishop/queen) attacks given the R45-rotated occupancy bitboard.
pub fn moves_diag_up_rotated(sq: Square, occupied_r45: Bitboard) -> Bitboard {
    let shifted = occupied_r45.0 >> SHIFTS_DIAG_UP[sq.index()];
    let idx = shifted & length_diag_up_mask(sq);
    SLIDING.diag_up[sq.index()][idx as usize]
}

pub fn moves_diag_up(sq: Square, occupied: Bitboard) -> Bitboard {
    moves_diag_up_rotated(sq, rotate_r45(occupied))
}

/// Down-diagonal (bishop/queen) attacks given the L45-rotated occupancy bitboard.
pub fn moves_diag_down_rotated(sq: Square, occupied_l45: Bitboard) -> Bitboard {
    let shifted = occupied_l45.0 >> SHIFTS_DIAG_DOWN[sq.index()];
    let idx = shifted & length_diag_down_mask(sq);
    SLIDING.diag_down[sq.index()][idx as usize]
}

pub fn moves_diag_down(sq: Square, occupied: Bitboard) -> Bitboard {
    moves_diag_down_rotated(sq, rotate_l45(occupied))
}

/// Combined bishop attack (both diagonals) from plain occupancy.
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    moves_diag_up(sq, occupied) | moves_diag_down(sq, occupied)
}

/// Combined rook attack (rank + file) from plain occupancy.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    moves_rank(sq, occupied) | moves_file(sq, occupied)
}

/// Combined queen attack from plain occupancy.
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

// --- Non-sliding pseudo-attacks and masks -------------------------------

struct Tables {
    king: [Bitboard; 64],
    knight: [Bitboard; 64],
    pawn_attacks: [[Bitboard; 64]; 2],
    pawn_moves: [[Bitboard; 64]; 2],
    rays: [[Bitboard; 64]; 8],
    intermediate: [[Bitboard; 64]; 64],
    square_distance: [[u8; 64]; 64],
    center_distance: [u8; 64],
    files_west: [Bitboard; 64],
    files_east: [Bitboard; 64],
    ranks_north: [Bitboard; 64],
    ranks_south: [Bitboard; 64],
    passed_pawn_mask: [[Bitboard; 64]; 2],
    white_squares: Bitboard,
    black_squares: Bitboard,
}

static TABLES: Lazy<Tables> = Lazy::new(build_tables);

fn build_tables() -> Tables {
    let mut king = [Bitboard(0); 64];
    let mut knight = [Bitboard(0); 64];
    let mut pawn_attacks = [[Bitboard(0); 64]; 2];
    let mut pawn_moves = [[Bitboard(0); 64]; 2];

    let king_deltas: [(i8, i8); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    let knight_deltas: [(i8, i8); 8] = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];

    for i in 0u8..64 {
        let sq = Square(i);
        for &(dr, df) in &king_deltas {
            if let Some(to) = sq.offset(dr, df) {
                king[i as usize].set(to);
            }
        }
        for &(dr, df) in &knight_deltas {
            if let Some(to) = sq.offset(dr, df) {
                knight[i as usize].set(to);
            }
        }
        if let Some(to) = sq.offset(1, 1) {
            pawn_attacks[Color::White.index()][i as usize].set(to);
        }
        if let Some(to) = sq.offset(1, -1) {
            pawn_attacks[Color::White.index()][i as usize].set(to);
        }
        if let Some(to) = sq.offset(-1, 1) {
            pawn_attacks[Color::Black.index()][i as usize].set(to);
        }
        if let Some(to) = sq.offset(-1, -1) {
            pawn_attacks[Color::Black.index()][i as usize].set(to);
        }
        if let Some(to) = sq.offset(1, 0) {
            pawn_moves[Color::White.index()][i as usize].set(to);
        }
        if sq.rank() == 1 {
            pawn_moves[Color::White.index()][i as usize].set(Square::new(3, sq.file()));
        }
        if let Some(to) = sq.offset(-1, 0) {
            pawn_moves[Color::Black.index()][i as usize].set(to);
        }
        if sq.rank() == 6 {
            pawn_moves[Color::Black.index()][i as usize].set(Square::new(4, sq.file()));
        }
    }

    let mut files_west = [Bitboard(0); 64];
    let mut files_east = [Bitboard(0); 64];
    let mut ranks_north = [Bitboard(0); 64];
    let mut ranks_south = [Bitboard(0); 64];
    for i in 0u8..64 {
        let sq = Square(i);
        let f = sq.file() as i32;
        let r = sq.rank() as i32;
        for j in 0..8 {
            if j < f {
                files_west[i as usize] |= Bitboard::file(j as u8);
            }
            if 7 - j > f {
                files_east[i as usize] |= Bitboard::file((7 - j) as u8);
            }
            if 7 - j > r {
                ranks_north[i as usize] |= Bitboard::rank((7 - j) as u8);
            }
            if j < r {
                ranks_south[i as usize] |= Bitboard::rank(j as u8);
            }
        }
    }

    let empty_rook = |sq: Square| rook_attacks(sq, Bitboard(0));
    let empty_bishop = |sq: Square| bishop_attacks(sq, Bitboard(0));

    let mut rays = [[Bitboard(0); 64]; 8];
    for i in 0u8..64 {
        let sq = Square(i);
        let r = empty_rook(sq);
        let b = empty_bishop(sq);
        rays[DIR_N][i as usize] = r & ranks_north[i as usize];
        rays[DIR_E][i as usize] = r & files_east[i as usize];
        rays[DIR_S][i as usize] = r & ranks_south[i as usize];
        rays[DIR_W][i as usize] = r & files_west[i as usize];
        rays[DIR_NW][i as usize] = b & files_west[i as usize] & ranks_north[i as usize];
        rays[DIR_NE][i as usize] = b & files_east[i as usize] & ranks_north[i as usize];
        rays[DIR_SE][i as usize] = b & files_east[i as usize] & ranks_south[i as usize];
        rays[DIR_SW][i as usize] = b & files_west[i as usize] & ranks_south[i as usize];
    }

    let mut intermediate = [[Bitboard(0); 64]; 64];
    for from in 0u8..64 {
        for to in 0u8..64 {
            let to_bb = Bitboard::from_square(Square(to));
            for d in 0..8 {
                if !(rays[d][from as usize] & to_bb).is_empty() {
                    intermediate[from as usize][to as usize] |=
                        rays[d][from as usize] & !rays[d][to as usize] & !to_bb;
                }
            }
        }
    }

    let mut square_distance = [[0u8; 64]; 64];
    for a in 0u8..64 {
        for b in 0u8..64 {
            if a != b {
                let sa = Square(a);
                let sb = Square(b);
                let fd = (sa.file() as i32 - sb.file() as i32).unsigned_abs() as u8;
                let rd = (sa.rank() as i32 - sb.rank() as i32).unsigned_abs() as u8;
                square_distance[a as usize][b as usize] = fd.max(rd);
            }
        }
    }

    let mut center_distance = [0u8; 64];
    for i in 0u8..64 {
        let targets = [
            (Square::new(4, 3), 27u8), // d5
            (Square::new(4, 4), 28u8), // e5
            (Square::new(3, 3), 35u8), // d4
            (Square::new(3, 4), 36u8), // e4
        ];
        // pick whichever quadrant center square is closest for this square.
        let mut best = 8u8;
        for (center, _) in targets {
            best = best.min(square_distance[i as usize][center.index()]);
        }
        center_distance[i as usize] = best;
    }

    let mut passed_pawn_mask = [[Bitboard(0); 64]; 2];
    for i in 0u8..64 {
        let sq = Square(i);
        let f = sq.file() as i32;
        let r = sq.rank() as i32;
        let mut white = rays[DIR_N][i as usize];
        if f > 0 && r < 7 {
            white |= rays[DIR_N][(i as i32 + DIR_DELTA_W) as usize];
        }
        if f < 7 && r < 7 {
            white |= rays[DIR_N][(i as i32 + DIR_DELTA_E) as usize];
        }
        let mut black = rays[DIR_S][i as usize];
        if f > 0 && r > 0 {
            black |= rays[DIR_S][(i as i32 + DIR_DELTA_W) as usize];
        }
        if f < 7 && r > 0 {
            black |= rays[DIR_S][(i as i32 + DIR_DELTA_E) as usize];
        }
        passed_pawn_mask[Color::White.index()][i as usize] = white;
        passed_pawn_mask[Color::Black.index()][i as usize] = black;
    }

    let mut white_squares = Bitboard(0);
    let mut black_squares = Bitboard(0);
    for i in 0u8..64 {
        let sq = Square(i);
        if (sq.file() as i32 + sq.rank() as i32) % 2 == 0 {
            black_squares.set(sq);
        } else {
            white_squares.set(sq);
        }
    }

    Tables {
        king,
        knight,
        pawn_attacks,
        pawn_moves,
        rays,
        intermediate,
        square_distance,
        center_distance,
        files_west,
        files_east,
        ranks_north,
        ranks_south,
        passed_pawn_mask,
        white_squares,
        black_squares,
    }
}

const DIR_DELTA_W: i32 = -1;
const DIR_DELTA_E: i32 = 1;

pub fn pseudo_attacks(pt: PieceType, sq: Square) -> Bitboard {
    match pt {
        PieceType::King => TABLES.king[sq.index()],
        PieceType::Knight => TABLES.knight[sq.index()],
        PieceType::Bishop => empty_bishop_cached(sq),
        PieceType::Rook => empty_rook_cached(sq),
        PieceType::Queen => empty_bishop_cached(sq) | empty_rook_cached(sq),
        PieceType::Pawn => Bitboard(0),
    }
}

fn empty_rook_cached(sq: Square) -> Bitboard {
    TABLES.rays[DIR_N][sq.index()]
        | TABLES.rays[DIR_S][sq.index()]
        | TABLES.rays[DIR_E][sq.index()]
        | TABLES.rays[DIR_W][sq.index()]
}

fn empty_bishop_cached(sq: Square) -> Bitboard {
    TABLES.rays[DIR_NE][sq.index()]
        | TABLES.rays[DIR_NW][sq.index()]
        | TABLES.rays[DIR_SE][sq.index()]
        | TABLES.rays[DIR_SW][sq.index()]
}

pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn_attacks[color.index()][sq.index()]
}

pub fn pawn_moves(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn_moves[color.index()][sq.index()]
}

pub fn ray(dir: usize, sq: Square) -> Bitboard {
    TABLES.rays[dir][sq.index()]
}

pub fn intermediate(from: Square, to: Square) -> Bitboard {
    TABLES.intermediate[from.index()][to.index()]
}

pub fn square_distance(a: Square, b: Square) -> u8 {
    TABLES.square_distance[a.index()][b.index()]
}

pub fn center_distance(sq: Square) -> u8 {
    TABLES.center_distance[sq.index()]
}

pub fn passed_pawn_mask(color: Color, sq: Square) -> Bitboard {
    TABLES.passed_pawn_mask[color.index()][sq.index()]
}

pub fn files_west(sq: Square) -> Bitboard {
    TABLES.files_west[sq.index()]
}
pub fn files_east(sq: Square) -> Bitboard {
    TABLES.files_east[sq.index()]
}
pub fn ranks_north(sq: Square) -> Bitboard {
    TABLES.ranks_north[sq.index()]
}
pub fn ranks_south(sq: Square) -> Bitboard {
    TABLES.ranks_south[sq.index()]
}

pub fn white_squares() -> Bitboard {
    TABLES.white_squares
}
pub fn black_squares() -> Bitboard {
    TABLES.black_squares
}

/// Forces every lazily-initialized table to build. Call once at process
/// start (see the init ordering documented in SPEC_FULL.md §9): Bitboards
/// before Zobrist, Position statics, and Values.
pub fn init() {
    Lazy::force(&SLIDING);
    Lazy::force(&TABLES);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_on_empty_board_covers_full_rank_and_file() {
        let sq = Square::from_algebraic("d4").unwrap();
        let attacks = rook_attacks(sq, Bitboard(0));
        assert_eq!(attacks.popcount(), 14);
    }

    #[test]
    fn bishop_attacks_blocked_by_occupancy() {
        let sq = Square::from_algebraic("d4").unwrap();
        let blocker = Bitboard::from_square(Square::from_algebraic("f6").unwrap());
        let attacks = bishop_attacks(sq, blocker);
        assert!(attacks.contains(Square::from_algebraic("f6").unwrap()));
        assert!(!attacks.contains(Square::from_algebraic("g7").unwrap()));
    }

    #[test]
    fn rook_attacks_stop_at_first_blocker_in_each_direction() {
        let sq = Square::from_algebraic("a1").unwrap();
        let blocker = Bitboard::from_square(Square::from_algebraic("a4").unwrap())
            | Bitboard::from_square(Square::from_algebraic("d1").unwrap());
        let attacks = rook_attacks(sq, blocker);
        assert!(attacks.contains(Square::from_algebraic("a4").unwrap()));
        assert!(!attacks.contains(Square::from_algebraic("a5").unwrap()));
        assert!(attacks.contains(Square::from_algebraic("d1").unwrap()));
        assert!(!attacks.contains(Square::from_algebraic("e1").unwrap()));
    }

    #[test]
    fn knight_attacks_from_corner() {
        let sq = Square::from_algebraic("a1").unwrap();
        let attacks = TABLES.knight[sq.index()];
        assert_eq!(attacks.popcount(), 2);
    }

    #[test]
    fn square_colors_partition_the_board() {
        assert_eq!((white_squares() | black_squares()).popcount(), 64);
        assert!((white_squares() & black_squares()).is_empty());
    }

    #[test]
    fn intermediate_is_empty_for_unaligned_squares() {
        let a = Square::from_algebraic("a1").unwrap();
        let b = Square::from_algebraic("b3").unwrap();
        assert!(intermediate(a, b).is_empty());
    }

    #[test]
    fn intermediate_has_squares_strictly_between_aligned_squares() {
        let a = Square::from_algebraic("a1").unwrap();
        let h = Square::from_algebraic("h8").unwrap();
        let between = intermediate(a, h);
        assert_eq!(between.popcount(), 6);
        assert!(between.contains(Square::from_algebraic("d4").unwrap()));
        assert!(!between.contains(a));
        assert!(!between.contains(h));
    }
}
