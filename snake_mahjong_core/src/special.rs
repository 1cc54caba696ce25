use crate::order::kind_counts;
use crate::tile::{Dragon, Suit, Tile, TileKey, Wind};

/// Terminals of the three numeral suits plus every honor identity.
pub const ORPHANS: [TileKey; 13] = [
    TileKey::numeral(Suit::Characters, 1),
    TileKey::numeral(Suit::Characters, 9),
    TileKey::numeral(Suit::Bamboos, 1),
    TileKey::numeral(Suit::Bamboos, 9),
    TileKey::numeral(Suit::Circles, 1),
    TileKey::numeral(Suit::Circles, 9),
    TileKey::wind(Wind::East),
    TileKey::wind(Wind::South),
    TileKey::wind(Wind::West),
    TileKey::wind(Wind::North),
    TileKey::dragon(Dragon::White),
    TileKey::dragon(Dragon::Green),
    TileKey::dragon(Dragon::Red),
];

/// Raw tile count both special shapes require, locked tiles included.
pub const SPECIAL_HAND_SIZE: usize = 14;

/// All 13 orphan kinds, one of them doubled.
pub fn is_thirteen_orphans(tiles: &[Tile]) -> bool {
    if tiles.len() != SPECIAL_HAND_SIZE {
        return false;
    }
    if tiles.iter().any(|t| !ORPHANS.contains(&t.key())) {
        return false;
    }

    let counts = kind_counts(tiles);
    counts.len() == ORPHANS.len() && counts.values().filter(|&&c| c == 2).count() == 1
}

/// Seven distinct kinds, exactly two of each. Four of a kind is not two pairs.
pub fn is_seven_pairs(tiles: &[Tile]) -> bool {
    if tiles.len() != SPECIAL_HAND_SIZE {
        return false;
    }

    let counts = kind_counts(tiles);
    counts.len() == 7 && counts.values().all(|&c| c == 2)
}
