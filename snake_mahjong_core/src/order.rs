use crate::tile::{GroupId, Tile, TileKey};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub fn sort_weight(tile: &Tile) -> u16 {
    tile.sort_weight()
}

pub fn compare_sort_weight(a: &Tile, b: &Tile) -> Ordering {
    a.sort_weight().cmp(&b.sort_weight())
}

/// Stable sort by weight; tiles of equal kind keep their relative order.
pub fn sort_tiles(tiles: &mut [Tile]) {
    tiles.sort_by(compare_sort_weight);
}

/// Multiset view of `tiles`, iterated in sort-weight order.
pub fn kind_counts<'a, I>(tiles: I) -> BTreeMap<TileKey, u8>
where
    I: IntoIterator<Item = &'a Tile>,
{
    let mut map = BTreeMap::new();
    for t in tiles {
        let n = map.entry(t.key()).or_insert(0u8);
        *n = n.saturating_add(1);
    }
    map
}

/// Canonical body layout after a mutation: locked groups first, ordered by
/// their lowest tile, then the loose tiles by weight.
pub fn arrange_hand(tiles: &[Tile]) -> Vec<Tile> {
    let mut groups: BTreeMap<GroupId, Vec<Tile>> = BTreeMap::new();
    let mut loose = vec![];

    for t in tiles {
        match t.group() {
            Some(g) => groups.entry(g).or_default().push(*t),
            None => loose.push(*t),
        }
    }

    let mut locked: Vec<Vec<Tile>> = groups.into_values().collect();
    for g in &mut locked {
        sort_tiles(g);
    }
    // groups are non-empty by construction
    locked.sort_by_key(|g| g.first().map(Tile::sort_weight).unwrap_or(u16::MAX));

    sort_tiles(&mut loose);

    let mut out: Vec<Tile> = locked.into_iter().flatten().collect();
    out.extend(loose);
    out
}
