use crate::order::kind_counts;
use crate::tile::{GroupId, Tile, TileKey};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Block {
    /// Lowest tile of a three-tile run.
    Run(TileKey),
    Triplet(TileKey),
    Quad(TileKey),
}

impl Block {
    pub fn is_run(&self) -> bool {
        matches!(self, Block::Run(_))
    }
}

/// One way of reading a hand as pair + sets. Exposed melds appear first in
/// `blocks`, followed by the sets found among the loose tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandPattern {
    pub pair: TileKey,
    pub blocks: Vec<Block>,
}

/// Locked melds pulled out of a hand, plus everything else.
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub fixed: Vec<Block>,
    pub free: Vec<TileKey>,
}

impl Split {
    pub fn quads(&self) -> usize {
        self.fixed
            .iter()
            .filter(|b| matches!(b, Block::Quad(_)))
            .count()
    }
}

/// Separates locked groups that form a legal meld from the loose tiles.
/// A group that is not a meld (partial or mixed) is returned to the loose
/// pool and takes part in the search like any other tile.
pub fn split_locked(tiles: &[Tile]) -> Split {
    let mut groups: BTreeMap<GroupId, Vec<TileKey>> = BTreeMap::new();
    let mut split = Split::default();

    for t in tiles {
        match t.group() {
            Some(g) => groups.entry(g).or_default().push(t.key()),
            None => split.free.push(t.key()),
        }
    }

    for (_, mut keys) in groups {
        keys.sort();
        match meld_of(&keys) {
            Some(b) => split.fixed.push(b),
            None => split.free.extend(keys),
        }
    }

    split
}

fn meld_of(sorted: &[TileKey]) -> Option<Block> {
    let first = *sorted.first()?;
    let same = sorted.iter().all(|&k| k == first);
    match sorted.len() {
        4 if same => Some(Block::Quad(first)),
        3 if same => Some(Block::Triplet(first)),
        3 if first.next() == Some(sorted[1]) && first.next2() == Some(sorted[2]) => {
            Some(Block::Run(first))
        }
        _ => None,
    }
}

/// Number of completed melds-of-four among the locked groups.
pub fn completed_quads(tiles: &[Tile]) -> usize {
    split_locked(tiles).quads()
}

/// `3n + 2` after each completed quad is counted as three tiles.
pub fn has_standard_count(tiles: &[Tile]) -> bool {
    (tiles.len() - completed_quads(tiles)) % 3 == 2
}

/// Whether any pair + sets reading exists. Stops at the first one found.
pub fn is_standard(tiles: &[Tile]) -> bool {
    if !has_standard_count(tiles) {
        return false;
    }

    let counts = kind_counts_of(&split_locked(tiles).free);
    counts
        .iter()
        .filter(|(_, &c)| c >= 2)
        .any(|(&key, _)| has_sets(take(&counts, key, 2)))
}

/// Whether some reading is the pair plus triplets and quads only.
pub fn has_runless_reading(tiles: &[Tile]) -> bool {
    if !has_standard_count(tiles) {
        return false;
    }

    let split = split_locked(tiles);
    if split.fixed.iter().any(Block::is_run) {
        return false;
    }
    let counts = kind_counts_of(&split.free);
    counts
        .iter()
        .filter(|(_, &c)| c >= 2)
        .any(|(&key, _)| take(&counts, key, 2).values().all(|&c| c % 3 == 0))
}

/// Every pair + sets reading of `tiles`. Empty when the hand is not a
/// Standard shape. The count of readings grows quickly with hand size; use
/// [`is_standard`] when only a yes/no is needed.
pub fn decompose_standard(tiles: &[Tile]) -> Vec<HandPattern> {
    if !has_standard_count(tiles) {
        return vec![];
    }

    let split = split_locked(tiles);
    let counts = kind_counts_of(&split.free);
    let mut results = vec![];

    for (&pair_key, &c) in &counts {
        if c < 2 {
            continue;
        }
        let rest = take(&counts, pair_key, 2);
        for sets in find_sets(rest) {
            let mut blocks = split.fixed.clone();
            blocks.extend(sets);
            results.push(HandPattern {
                pair: pair_key,
                blocks,
            });
        }
    }

    results
}

fn kind_counts_of(keys: &[TileKey]) -> BTreeMap<TileKey, u8> {
    let tiles: Vec<Tile> = keys.iter().map(|&k| Tile::new(k)).collect();
    kind_counts(&tiles)
}

/// Copy of `counts` with `n` tiles of `key` removed; empty buckets vanish.
fn take(counts: &BTreeMap<TileKey, u8>, key: TileKey, n: u8) -> BTreeMap<TileKey, u8> {
    let mut next = counts.clone();
    if let Some(c) = next.get_mut(&key) {
        *c -= n;
        if *c == 0 {
            next.remove(&key);
        }
    }
    next
}

/// Same walk as [`find_sets`], returning on the first full split.
fn has_sets(counts: BTreeMap<TileKey, u8>) -> bool {
    let Some((&key, &c)) = counts.iter().next() else {
        return true;
    };

    if c >= 3 && has_sets(take(&counts, key, 3)) {
        return true;
    }

    match (key.next(), key.next2()) {
        (Some(k2), Some(k3)) if counts.contains_key(&k2) && counts.contains_key(&k3) => {
            has_sets(take(&take(&take(&counts, key, 1), k2, 1), k3, 1))
        }
        _ => false,
    }
}

/// All ways to split `counts` into triplets and runs. Each branch works on
/// its own copy of the map, so a failed branch needs no undo.
fn find_sets(counts: BTreeMap<TileKey, u8>) -> Vec<Vec<Block>> {
    // always expand the lowest remaining kind: it can only start a set
    let Some((&key, &c)) = counts.iter().next() else {
        return vec![vec![]];
    };

    let mut out = vec![];

    if c >= 3 {
        for mut rest in find_sets(take(&counts, key, 3)) {
            rest.insert(0, Block::Triplet(key));
            out.push(rest);
        }
    }

    if let (Some(k2), Some(k3)) = (key.next(), key.next2()) {
        if counts.contains_key(&k2) && counts.contains_key(&k3) {
            let next = take(&take(&take(&counts, key, 1), k2, 1), k3, 1);
            for mut rest in find_sets(next) {
                rest.insert(0, Block::Run(key));
                out.push(rest);
            }
        }
    }

    out
}
