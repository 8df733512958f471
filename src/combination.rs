use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::action::DICE_COUNT;

pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;

/// Points awarded for any triple missing from [`SPECIAL_COMBINATIONS`].
pub const BASE_POINTS: u8 = 1;
/// Tie-break rank of a triple missing from [`SPECIAL_COMBINATIONS`].
pub const NO_RANK: i8 = -1;

/// Scoring table as `(digit code, points, rank)`.
///
/// Within a points tier the lower rank wins. 421 is alone in its tier.
pub const SPECIAL_COMBINATIONS: [(u16, u8, i8); 16] = [
    (421, 8, 0),
    (111, 7, 1),
    (611, 6, 2),
    (666, 6, 3),
    (511, 5, 4),
    (555, 5, 5),
    (411, 4, 6),
    (444, 4, 7),
    (311, 3, 8),
    (333, 3, 9),
    (211, 2, 10),
    (222, 2, 11),
    (654, 2, 12),
    (543, 2, 13),
    (432, 2, 14),
    (321, 2, 15),
];

/// Scored snapshot of three dice, faces held highest to lowest.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Combination {
    values: [u8; DICE_COUNT],
    digit_code: u16,
    points: u8,
    rank_order: i8,
}

impl Combination {
    /// Builds a combination from three faces. The faces are sorted descending first.
    pub fn new(mut values: [u8; DICE_COUNT]) -> Self {
        values.sort_unstable_by(|a, b| b.cmp(a));
        let digit_code = values
            .iter()
            .fold(0u16, |acc, face| acc * 10 + u16::from(*face));
        let (points, rank_order) = lookup(digit_code);
        Self {
            values,
            digit_code,
            points,
            rank_order,
        }
    }

    pub fn values(&self) -> [u8; DICE_COUNT] {
        self.values
    }

    /// The faces read as a three-digit number, e.g. `[4, 2, 1]` gives 421.
    pub fn digit_code(&self) -> u16 {
        self.digit_code
    }

    pub fn points(&self) -> u8 {
        self.points
    }

    pub fn rank_order(&self) -> i8 {
        self.rank_order
    }

    pub fn is_special(&self) -> bool {
        self.points > BASE_POINTS
    }
}

fn lookup(digit_code: u16) -> (u8, i8) {
    SPECIAL_COMBINATIONS
        .iter()
        .find(|(code, _, _)| *code == digit_code)
        .map(|(_, points, rank)| (*points, *rank))
        .unwrap_or((BASE_POINTS, NO_RANK))
}

/// Every distinct combination, one per sorted triple of faces.
pub fn all_combinations() -> Vec<Combination> {
    let mut out = Vec::with_capacity(56);
    for high in MIN_FACE..=MAX_FACE {
        for mid in MIN_FACE..=high {
            for low in MIN_FACE..=mid {
                out.push(Combination::new([high, mid, low]));
            }
        }
    }
    out
}

impl PartialEq for Combination {
    fn eq(&self, other: &Self) -> bool {
        self.digit_code == other.digit_code
    }
}

impl Eq for Combination {}

impl std::hash::Hash for Combination {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digit_code.hash(state);
    }
}

impl Ord for Combination {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.digit_code == other.digit_code {
            return Ordering::Equal;
        }
        if self.points != other.points {
            return self.points.cmp(&other.points);
        }
        if self.points == BASE_POINTS {
            self.digit_code.cmp(&other.digit_code)
        } else {
            // Lower rank is stronger inside a tier.
            other.rank_order.cmp(&self.rank_order)
        }
    }
}

impl PartialOrd for Combination {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} pts)", self.digit_code, self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_code(code: u16) -> Combination {
        let faces = [
            (code / 100) as u8,
            ((code / 10) % 10) as u8,
            (code % 10) as u8,
        ];
        Combination::new(faces)
    }

    #[test]
    fn table_entries_score_as_listed() {
        for (code, points, rank) in SPECIAL_COMBINATIONS {
            let combination = from_code(code);
            assert_eq!(combination.digit_code(), code);
            assert_eq!(combination.points(), points, "points for {code}");
            assert_eq!(combination.rank_order(), rank, "rank for {code}");
        }
    }

    #[test]
    fn other_triples_score_one_point() {
        let special: Vec<u16> = SPECIAL_COMBINATIONS.iter().map(|(c, _, _)| *c).collect();
        let all = all_combinations();
        assert_eq!(all.len(), 56);
        for combination in all {
            if !special.contains(&combination.digit_code()) {
                assert_eq!(combination.points(), BASE_POINTS);
                assert_eq!(combination.rank_order(), NO_RANK);
                assert!(!combination.is_special());
            }
        }
    }

    #[test]
    fn unsorted_input_is_normalized() {
        let combination = Combination::new([1, 4, 2]);
        assert_eq!(combination.values(), [4, 2, 1]);
        assert_eq!(combination.digit_code(), 421);
        assert_eq!(combination.points(), 8);
    }

    #[test]
    fn ordering_examples() {
        assert!(from_code(421) > from_code(111));
        assert!(from_code(421) > from_code(666));
        assert!(from_code(611) > from_code(666));
        assert!(from_code(654) > from_code(321));
        assert!(from_code(432) > from_code(321));
        assert!(from_code(222) > from_code(654));
        assert!(from_code(211) > from_code(222));
        assert!(from_code(665) > from_code(653));
        assert!(from_code(321) > from_code(665));
        assert_eq!(from_code(542), Combination::new([2, 5, 4]));
    }

    #[test]
    fn ordering_is_a_strict_total_order() {
        let all = all_combinations();
        for a in &all {
            assert_eq!(a.cmp(a), Ordering::Equal);
            for b in &all {
                let ab = a.cmp(b);
                assert_eq!(ab, b.cmp(a).reverse(), "antisymmetry {a} vs {b}");
                assert_eq!(ab == Ordering::Equal, a == b, "equality {a} vs {b}");
                for c in &all {
                    if a < b && b < c {
                        assert!(a < c, "transitivity {a} < {b} < {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn ranking_of_specials_follows_table_order() {
        let mut specials: Vec<Combination> = SPECIAL_COMBINATIONS
            .iter()
            .map(|(code, _, _)| from_code(*code))
            .collect();
        let expected: Vec<u16> = specials.iter().map(Combination::digit_code).collect();
        specials.sort_by(|a, b| b.cmp(a));
        let sorted: Vec<u16> = specials.iter().map(Combination::digit_code).collect();
        assert_eq!(sorted, expected);
    }
}
