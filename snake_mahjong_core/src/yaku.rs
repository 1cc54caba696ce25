use crate::decompose::has_runless_reading;
use crate::order::kind_counts;
use crate::tile::{Suit, Tile, TileKey};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Winning shapes and the bonus patterns layered on top of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pattern {
    #[serde(rename = "Thirteen-Orphans")]
    ThirteenOrphans,
    #[serde(rename = "Seven-Pairs")]
    SevenPairs,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "All-Simples")]
    AllSimples,
    #[serde(rename = "Half-Flush")]
    HalfFlush,
    #[serde(rename = "Full-Flush")]
    FullFlush,
    #[serde(rename = "All-Honors")]
    AllHonors,
    #[serde(rename = "All-Triplets")]
    AllTriplets,
    #[serde(rename = "All-Terminals-and-Honors")]
    TerminalsAndHonors,
    #[serde(rename = "Pure-Terminals")]
    PureTerminals,
    #[serde(rename = "Big-Three-Dragons")]
    BigThreeDragons,
    #[serde(rename = "Small-Three-Dragons")]
    SmallThreeDragons,
    #[serde(rename = "Big-Four-Winds")]
    BigFourWinds,
    #[serde(rename = "Small-Four-Winds")]
    SmallFourWinds,
}

impl Pattern {
    pub fn name(self) -> &'static str {
        match self {
            Pattern::ThirteenOrphans => "Thirteen-Orphans",
            Pattern::SevenPairs => "Seven-Pairs",
            Pattern::Standard => "Standard",
            Pattern::AllSimples => "All-Simples",
            Pattern::HalfFlush => "Half-Flush",
            Pattern::FullFlush => "Full-Flush",
            Pattern::AllHonors => "All-Honors",
            Pattern::AllTriplets => "All-Triplets",
            Pattern::TerminalsAndHonors => "All-Terminals-and-Honors",
            Pattern::PureTerminals => "Pure-Terminals",
            Pattern::BigThreeDragons => "Big-Three-Dragons",
            Pattern::SmallThreeDragons => "Small-Three-Dragons",
            Pattern::BigFourWinds => "Big-Four-Winds",
            Pattern::SmallFourWinds => "Small-Four-Winds",
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Pattern::ThirteenOrphans => 13,
            Pattern::SevenPairs => 2,
            Pattern::Standard => 1,
            Pattern::AllSimples => 1,
            Pattern::HalfFlush => 3,
            Pattern::FullFlush => 6,
            Pattern::AllHonors => 13,
            Pattern::AllTriplets => 2,
            Pattern::TerminalsAndHonors => 2,
            Pattern::PureTerminals => 13,
            Pattern::BigThreeDragons => 13,
            Pattern::SmallThreeDragons => 4,
            Pattern::BigFourWinds => 13,
            Pattern::SmallFourWinds => 13,
        }
    }
}

/// Suit and rank-class flags of a hand, gathered in one pass.
#[derive(Debug, Default)]
struct Profile {
    numeral_suits: BTreeSet<Suit>,
    has_honors: bool,
    has_terminals: bool,
    has_simples: bool,
}

impl Profile {
    fn of(tiles: &[Tile]) -> Self {
        let mut p = Profile::default();
        for t in tiles {
            let k = t.key();
            if k.is_honor() {
                p.has_honors = true;
                continue;
            }
            p.numeral_suits.insert(k.suit);
            if k.is_terminal() {
                p.has_terminals = true;
            } else {
                p.has_simples = true;
            }
        }
        p
    }
}

/// Bonus patterns of a hand already known to win.
///
/// Flat scan over counts and flags; every pattern is tested on its own.
pub fn bonus_patterns(tiles: &[Tile]) -> Vec<Pattern> {
    let mut found = vec![];
    let profile = Profile::of(tiles);
    let counts = kind_counts(tiles);

    if !profile.has_terminals && !profile.has_honors {
        found.push(Pattern::AllSimples);
    }

    if let Some(p) = flush(&profile) {
        found.push(p);
    }

    if has_runless_reading(tiles) {
        found.push(Pattern::AllTriplets);
    }

    if let Some(p) = terminals(&profile) {
        found.push(p);
    }

    if let Some(p) = dragons(&counts) {
        found.push(p);
    }

    if let Some(p) = winds(&counts) {
        found.push(p);
    }

    found
}

fn flush(p: &Profile) -> Option<Pattern> {
    match (p.numeral_suits.len(), p.has_honors) {
        (1, false) => Some(Pattern::FullFlush),
        (1, true) => Some(Pattern::HalfFlush),
        (0, true) => Some(Pattern::AllHonors),
        _ => None,
    }
}

fn terminals(p: &Profile) -> Option<Pattern> {
    if p.has_simples || !p.has_terminals {
        return None;
    }
    if p.has_honors {
        Some(Pattern::TerminalsAndHonors)
    } else {
        Some(Pattern::PureTerminals)
    }
}

/// (triplet-or-better, exact pairs) among the kinds of one honor suit.
fn honor_sets(counts: &BTreeMap<TileKey, u8>, suit: Suit) -> (usize, usize) {
    let mut triplets = 0;
    let mut pairs = 0;
    for (k, &c) in counts {
        if k.suit != suit {
            continue;
        }
        if c >= 3 {
            triplets += 1;
        } else if c == 2 {
            pairs += 1;
        }
    }
    (triplets, pairs)
}

fn dragons(counts: &BTreeMap<TileKey, u8>) -> Option<Pattern> {
    match honor_sets(counts, Suit::Dragon) {
        (3, _) => Some(Pattern::BigThreeDragons),
        (2, 1) => Some(Pattern::SmallThreeDragons),
        _ => None,
    }
}

fn winds(counts: &BTreeMap<TileKey, u8>) -> Option<Pattern> {
    match honor_sets(counts, Suit::Wind) {
        (4, _) => Some(Pattern::BigFourWinds),
        (3, 1) => Some(Pattern::SmallFourWinds),
        _ => None,
    }
}
