use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Suit {
    Characters,
    Bamboos,
    Circles,
    Wind,
    Dragon,
}

impl Suit {
    pub fn is_honor(self) -> bool {
        matches!(self, Suit::Wind | Suit::Dragon)
    }

    pub fn is_numeral(self) -> bool {
        !self.is_honor()
    }

    fn weight_base(self) -> u16 {
        match self {
            Suit::Characters => 100,
            Suit::Bamboos => 200,
            Suit::Circles => 300,
            Suit::Wind => 400,
            Suit::Dragon => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dragon {
    White,
    Green,
    Red,
}

/// Identity of a tile: suit and rank, lock state excluded.
///
/// Honor ranks are identities, not numbers: winds use 1..=4 (E, S, W, N)
/// and dragons use 1..=3 (White, Green, Red).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileKey {
    pub suit: Suit,
    pub rank: u8,
}

impl TileKey {
    pub const fn numeral(suit: Suit, rank: u8) -> Self {
        TileKey { suit, rank }
    }

    pub const fn wind(w: Wind) -> Self {
        let rank = match w {
            Wind::East => 1,
            Wind::South => 2,
            Wind::West => 3,
            Wind::North => 4,
        };
        TileKey {
            suit: Suit::Wind,
            rank,
        }
    }

    pub const fn dragon(d: Dragon) -> Self {
        let rank = match d {
            Dragon::White => 1,
            Dragon::Green => 2,
            Dragon::Red => 3,
        };
        TileKey {
            suit: Suit::Dragon,
            rank,
        }
    }

    /// Single comparable scalar: suits occupy disjoint hundreds, numerals
    /// ascend by rank inside their suit.
    pub fn sort_weight(&self) -> u16 {
        self.suit.weight_base() + self.rank as u16
    }

    pub fn is_honor(&self) -> bool {
        self.suit.is_honor()
    }

    pub fn is_terminal(&self) -> bool {
        self.suit.is_numeral() && (self.rank == 1 || self.rank == 9)
    }

    /// Numeral tile ranked 2..=8.
    pub fn is_simple(&self) -> bool {
        self.suit.is_numeral() && (2..=8).contains(&self.rank)
    }

    /// Same suit, rank shifted by `delta`. `None` for honors or when the
    /// result leaves 1..=9; runs never wrap.
    pub fn offset(&self, delta: i8) -> Option<Self> {
        if self.is_honor() {
            return None;
        }
        let r = self.rank as i8 + delta;
        if !(1..=9).contains(&r) {
            return None;
        }
        Some(TileKey {
            suit: self.suit,
            rank: r as u8,
        })
    }

    pub fn next(&self) -> Option<Self> {
        self.offset(1)
    }

    pub fn next2(&self) -> Option<Self> {
        self.offset(2)
    }

    pub fn from_code(code: &str) -> Result<Self, String> {
        match code {
            "E" => return Ok(Self::wind(Wind::East)),
            "S" => return Ok(Self::wind(Wind::South)),
            "W" => return Ok(Self::wind(Wind::West)),
            "N" => return Ok(Self::wind(Wind::North)),
            "P" => return Ok(Self::dragon(Dragon::White)),
            "F" => return Ok(Self::dragon(Dragon::Green)),
            "C" => return Ok(Self::dragon(Dragon::Red)),
            _ => {}
        }

        let bytes = code.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("invalid tile code: {}", code));
        }

        let n = (bytes[0] as char)
            .to_digit(10)
            .ok_or_else(|| format!("invalid number: {}", code))? as u8;
        if !(1..=9).contains(&n) {
            return Err(format!("invalid number: {}", code));
        }

        let suit = match bytes[1] as char {
            'm' => Suit::Characters,
            's' => Suit::Bamboos,
            'p' => Suit::Circles,
            _ => return Err(format!("invalid suit: {}", code)),
        };

        Ok(TileKey::numeral(suit, n))
    }

    pub fn code(&self) -> String {
        match self.suit {
            Suit::Characters => format!("{}m", self.rank),
            Suit::Bamboos => format!("{}s", self.rank),
            Suit::Circles => format!("{}p", self.rank),
            Suit::Wind => match self.rank {
                1 => "E".into(),
                2 => "S".into(),
                3 => "W".into(),
                _ => "N".into(),
            },
            Suit::Dragon => match self.rank {
                1 => "P".into(),
                2 => "F".into(),
                _ => "C".into(),
            },
        }
    }
}

impl Ord for TileKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_weight().cmp(&other.sort_weight())
    }
}

impl PartialOrd for TileKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shared id of every tile bound into the same exposed meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

/// A single tile held in a hand slot.
///
/// The kind never changes after construction. Lock state only moves from
/// unlocked to locked, through [`Tile::lock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "WireTile", into = "WireTile")]
pub struct Tile {
    key: TileKey,
    group: Option<GroupId>,
}

impl Tile {
    pub fn new(key: TileKey) -> Self {
        Tile { key, group: None }
    }

    pub fn locked_in(key: TileKey, group: GroupId) -> Self {
        Tile {
            key,
            group: Some(group),
        }
    }

    pub fn from_code(code: &str) -> Result<Self, String> {
        TileKey::from_code(code).map(Tile::new)
    }

    pub fn code(&self) -> String {
        self.key.code()
    }

    pub fn key(&self) -> TileKey {
        self.key
    }

    pub fn suit(&self) -> Suit {
        self.key.suit
    }

    pub fn rank(&self) -> u8 {
        self.key.rank
    }

    pub fn is_locked(&self) -> bool {
        self.group.is_some()
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Same suit and rank; lock state is ignored.
    pub fn same_kind(&self, other: &Tile) -> bool {
        self.key == other.key
    }

    pub fn sort_weight(&self) -> u16 {
        self.key.sort_weight()
    }

    /// Binds the tile into `group`. Returns `false` and leaves the tile
    /// untouched when it is already locked.
    pub fn lock(&mut self, group: GroupId) -> bool {
        if self.group.is_some() {
            return false;
        }
        self.group = Some(group);
        true
    }
}

/// Wire form of a tile: `{"tile": "5p", "locked": true, "group": 3}`.
/// `locked` and `group` must agree: both present or both absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireTile {
    pub tile: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
}

impl TryFrom<WireTile> for Tile {
    type Error = String;

    fn try_from(wire: WireTile) -> Result<Self, Self::Error> {
        let key = TileKey::from_code(&wire.tile)?;
        match (wire.locked, wire.group) {
            (true, Some(g)) => Ok(Tile::locked_in(key, g)),
            (true, None) => Err(format!("locked tile {} has no group", wire.tile)),
            (false, Some(g)) => Err(format!("loose tile {} names group {}", wire.tile, g.0)),
            (false, None) => Ok(Tile::new(key)),
        }
    }
}

impl From<Tile> for WireTile {
    fn from(t: Tile) -> Self {
        WireTile {
            tile: t.code(),
            locked: t.is_locked(),
            group: t.group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_parse_into_five_suits() {
        assert_eq!(
            TileKey::from_code("3m").unwrap(),
            TileKey::numeral(Suit::Characters, 3)
        );
        assert_eq!(TileKey::from_code("7s").unwrap().suit, Suit::Bamboos);
        assert_eq!(TileKey::from_code("9p").unwrap().suit, Suit::Circles);
        assert_eq!(TileKey::from_code("N").unwrap(), TileKey::wind(Wind::North));
        assert_eq!(TileKey::from_code("C").unwrap(), TileKey::dragon(Dragon::Red));

        assert!(TileKey::from_code("0m").is_err());
        assert!(TileKey::from_code("5x").is_err());
        assert!(TileKey::from_code("10m").is_err());
    }

    #[test]
    fn code_is_inverse_of_from_code() {
        for c in ["1m", "5s", "9p", "E", "S", "W", "N", "P", "F", "C"] {
            assert_eq!(TileKey::from_code(c).unwrap().code(), c);
        }
    }

    #[test]
    fn offsets_stay_inside_one_suit() {
        let k = TileKey::numeral(Suit::Bamboos, 8);
        assert_eq!(k.next(), Some(TileKey::numeral(Suit::Bamboos, 9)));
        assert_eq!(k.next2(), None);
        assert_eq!(TileKey::numeral(Suit::Circles, 1).offset(-1), None);
        assert_eq!(TileKey::wind(Wind::East).next(), None);
    }

    #[test]
    fn lock_is_one_way() {
        let mut t = Tile::from_code("4m").unwrap();
        assert!(!t.is_locked());
        assert!(t.lock(GroupId(1)));
        assert!(!t.lock(GroupId(2)));
        assert_eq!(t.group(), Some(GroupId(1)));
        assert!(t.same_kind(&Tile::from_code("4m").unwrap()));
    }

    #[test]
    fn wire_form_lock_and_group_agree() {
        let wire = WireTile {
            tile: "2p".into(),
            locked: true,
            group: None,
        };
        assert!(Tile::try_from(wire).is_err());

        let wire = WireTile {
            tile: "2p".into(),
            locked: false,
            group: Some(GroupId(4)),
        };
        assert!(Tile::try_from(wire).is_err());

        let wire = WireTile {
            tile: "2p".into(),
            locked: true,
            group: Some(GroupId(4)),
        };
        assert_eq!(Tile::try_from(wire).unwrap().group(), Some(GroupId(4)));
    }
}
