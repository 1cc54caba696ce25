use crate::decompose::is_standard;
use crate::special::{is_seven_pairs, is_thirteen_orphans};
use crate::tile::Tile;
use crate::yaku::{bonus_patterns, Pattern};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub is_win: bool,
    /// Base shape first, then bonus patterns in scan order.
    pub patterns: Vec<Pattern>,
    pub score: u32,
}

impl Evaluation {
    pub fn base(&self) -> Pattern {
        self.patterns[0]
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name()).collect()
    }
}

/// Full hand (locked tiles included) against its current capacity.
///
/// `None` unless the hand is exactly at capacity and one of the three
/// winning shapes matches.
pub fn evaluate_hand(tiles: &[Tile], capacity: usize) -> Option<Evaluation> {
    if tiles.len() != capacity {
        return None;
    }

    let base = base_shape(tiles)?;

    let mut patterns = vec![base];
    let mut score = base.points();
    for p in bonus_patterns(tiles) {
        if !patterns.contains(&p) {
            score += p.points();
            patterns.push(p);
        }
    }

    Some(Evaluation {
        is_win: true,
        patterns,
        score,
    })
}

fn base_shape(tiles: &[Tile]) -> Option<Pattern> {
    if is_thirteen_orphans(tiles) {
        Some(Pattern::ThirteenOrphans)
    } else if is_seven_pairs(tiles) {
        Some(Pattern::SevenPairs)
    } else if is_standard(tiles) {
        Some(Pattern::Standard)
    } else {
        None
    }
}
