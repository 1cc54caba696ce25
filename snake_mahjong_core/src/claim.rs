use crate::engine::{evaluate_hand, Evaluation};
use crate::tile::{GroupId, Tile, TileKey};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClaimKind {
    Win,
    Quad,
    /// Claimed tile joins an exposed triplet the attacker already owns.
    AddedQuad,
    Triplet,
    Run,
}

impl ClaimKind {
    /// Lower is stronger. Both quad kinds share a class.
    pub fn priority(self) -> u8 {
        match self {
            ClaimKind::Win => 0,
            ClaimKind::Quad | ClaimKind::AddedQuad => 1,
            ClaimKind::Triplet => 2,
            ClaimKind::Run => 3,
        }
    }

    pub fn effect_label(self) -> &'static str {
        match self {
            ClaimKind::Win => "Hu!",
            ClaimKind::Quad | ClaimKind::AddedQuad => "Kong!",
            ClaimKind::Triplet => "Pung!",
            ClaimKind::Run => "Chow!",
        }
    }
}

const PRIORITY_CLASSES: [u8; 4] = [0, 1, 2, 3];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub kind: ClaimKind,
    /// Attacker tiles that join the claimed tile, in slot order.
    pub consumed: Vec<Tile>,
    /// Indices of `consumed` in the attacker hand.
    pub consumed_slots: Vec<usize>,
    pub is_quad: bool,
    pub effect_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends_group: Option<GroupId>,
}

impl Claim {
    fn win(ev: Evaluation) -> Self {
        Claim {
            kind: ClaimKind::Win,
            consumed: vec![],
            consumed_slots: vec![],
            is_quad: false,
            effect_label: ClaimKind::Win.effect_label(),
            win: Some(ev),
            extends_group: None,
        }
    }

    fn meld(kind: ClaimKind, attacker: &[Tile], slots: &[usize]) -> Self {
        Claim {
            kind,
            consumed: slots.iter().map(|&i| attacker[i]).collect(),
            consumed_slots: slots.to_vec(),
            is_quad: kind == ClaimKind::Quad,
            effect_label: kind.effect_label(),
            win: None,
            extends_group: None,
        }
    }

    fn added_quad(group: GroupId) -> Self {
        Claim {
            kind: ClaimKind::AddedQuad,
            consumed: vec![],
            consumed_slots: vec![],
            is_quad: true,
            effect_label: ClaimKind::AddedQuad.effect_label(),
            win: None,
            extends_group: Some(group),
        }
    }

    /// Instruction the caller applies after taking the tile. `fresh` is the
    /// group id to use when the claim opens a new meld. A win locks nothing.
    pub fn lock_plan(&self, fresh: GroupId) -> Option<LockPlan> {
        match self.kind {
            ClaimKind::Win => None,
            ClaimKind::AddedQuad => Some(LockPlan {
                slots: vec![],
                group: self.extends_group?,
                completes_quad: true,
                concealed: false,
            }),
            ClaimKind::Quad | ClaimKind::Triplet | ClaimKind::Run => Some(LockPlan {
                slots: self.consumed_slots.clone(),
                group: fresh,
                completes_quad: self.is_quad,
                concealed: false,
            }),
        }
    }
}

/// Locks to apply to a hand: the listed slots plus the incoming tile all
/// join `group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockPlan {
    pub slots: Vec<usize>,
    pub group: GroupId,
    /// The hand gains the per-quad capacity bonus.
    pub completes_quad: bool,
    pub concealed: bool,
}

/// Best legal claim of `attacker` on one defender tile.
///
/// Checks run strictly in order Win, Quad, AddedQuad, (capacity stop),
/// Triplet, Run and the first hit is returned.
pub fn resolve_claim(
    attacker: &[Tile],
    defender_tile: Option<&Tile>,
    upstream: bool,
    at_capacity: bool,
    capacity: usize,
) -> Option<Claim> {
    let target = defender_tile.filter(|t| !t.is_locked())?;
    let key = target.key();

    if let Some(ev) = win_with(attacker, target, capacity) {
        return Some(Claim::win(ev));
    }

    let same = loose_slots(attacker, key);
    if same.len() >= 3 {
        return Some(Claim::meld(ClaimKind::Quad, attacker, &same[..3]));
    }

    if let Some(g) = exposed_triplet(attacker, key) {
        return Some(Claim::added_quad(g));
    }

    if at_capacity {
        return None;
    }

    if same.len() >= 2 {
        return Some(Claim::meld(ClaimKind::Triplet, attacker, &same[..2]));
    }

    if upstream {
        if let Some(pair) = run_completion(attacker, key) {
            return Some(Claim::meld(ClaimKind::Run, attacker, &pair));
        }
    }

    None
}

/// Strongest claim across a whole defender body, with the slot it targets.
///
/// Classes are tried strongest first; inside a class the lowest slot wins.
/// Empty and locked slots are skipped.
pub fn resolve_best_claim(
    attacker: &[Tile],
    defender: &[Option<Tile>],
    upstream: bool,
    at_capacity: bool,
    capacity: usize,
) -> Option<(Claim, usize)> {
    let mut per_slot: Vec<Option<Claim>> = defender
        .iter()
        .map(|slot| resolve_claim(attacker, slot.as_ref(), upstream, at_capacity, capacity))
        .collect();

    for class in PRIORITY_CLASSES {
        let hit = per_slot
            .iter()
            .position(|c| c.as_ref().is_some_and(|c| c.kind.priority() == class));
        if let Some(i) = hit {
            let claim = per_slot[i].take()?;
            debug!(kind = ?claim.kind, slot = i, "claim chosen");
            return Some((claim, i));
        }
    }

    None
}

/// Claim kind per claimable defender slot, in slot order.
pub fn claim_highlights(
    attacker: &[Tile],
    defender: &[Option<Tile>],
    upstream: bool,
    at_capacity: bool,
    capacity: usize,
) -> Vec<(usize, ClaimKind)> {
    defender
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            resolve_claim(attacker, slot.as_ref(), upstream, at_capacity, capacity)
                .map(|c| (i, c.kind))
        })
        .collect()
}

/// Whether `defender_seat` plays right before `attacker_seat`.
pub fn is_upstream(attacker_seat: usize, defender_seat: usize, seat_count: usize) -> bool {
    if attacker_seat >= seat_count || defender_seat >= seat_count || attacker_seat == defender_seat
    {
        return false;
    }
    defender_seat == (attacker_seat + seat_count - 1) % seat_count
}

/// Self-drawn tile meeting three loose tiles of its kind: the four lock as
/// a concealed quad.
pub fn concealed_quad(hand: &[Tile], gained: &Tile, fresh: GroupId) -> Option<LockPlan> {
    if gained.is_locked() {
        return None;
    }
    let same = loose_slots(hand, gained.key());
    if same.len() < 3 {
        return None;
    }
    Some(LockPlan {
        slots: same[..3].to_vec(),
        group: fresh,
        completes_quad: true,
        concealed: true,
    })
}

fn win_with(attacker: &[Tile], target: &Tile, capacity: usize) -> Option<Evaluation> {
    let mut hand = attacker.to_vec();
    hand.push(*target);
    evaluate_hand(&hand, capacity)
}

fn loose_slots(hand: &[Tile], key: TileKey) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, t)| !t.is_locked() && t.key() == key)
        .map(|(i, _)| i)
        .collect()
}

/// Group id of an exposed triplet of `key`, if the hand has one.
fn exposed_triplet(hand: &[Tile], key: TileKey) -> Option<GroupId> {
    let mut groups: BTreeMap<GroupId, Vec<TileKey>> = BTreeMap::new();
    for t in hand {
        if let Some(g) = t.group() {
            groups.entry(g).or_default().push(t.key());
        }
    }
    groups
        .into_iter()
        .find(|(_, keys)| keys.len() == 3 && keys.iter().all(|&k| k == key))
        .map(|(g, _)| g)
}

/// Companion slots for a run through `key`: (r-2, r-1), (r-1, r+1) and
/// (r+1, r+2), tried in that order.
fn run_completion(hand: &[Tile], key: TileKey) -> Option<[usize; 2]> {
    const SHAPES: [(i8, i8); 3] = [(-2, -1), (-1, 1), (1, 2)];

    for (a, b) in SHAPES {
        let (Some(ka), Some(kb)) = (key.offset(a), key.offset(b)) else {
            continue;
        };
        let sa = loose_slots(hand, ka).first().copied();
        let sb = loose_slots(hand, kb).first().copied();
        if let (Some(sa), Some(sb)) = (sa, sb) {
            return Some([sa, sb]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(codes: &str) -> Vec<Tile> {
        codes
            .split_whitespace()
            .map(|c| Tile::from_code(c).unwrap())
            .collect()
    }

    fn tile(code: &str) -> Tile {
        Tile::from_code(code).unwrap()
    }

    fn locked(code: &str, group: u32) -> Tile {
        Tile::locked_in(TileKey::from_code(code).unwrap(), GroupId(group))
    }

    #[test]
    fn missing_or_locked_target_is_rejected() {
        let a = hand("5m 5m 5m");
        assert!(resolve_claim(&a, None, true, false, 14).is_none());
        assert!(resolve_claim(&a, Some(&locked("5m", 1)), true, false, 14).is_none());
    }

    #[test]
    fn win_beats_triplet() {
        // 13 tiles waiting on 9p, which also makes a triplet
        let a = hand("1m 2m 3m 4m 5m 6m 7s 8s 9s E E 9p 9p");
        let c = resolve_claim(&a, Some(&tile("9p")), false, false, 14).unwrap();
        assert_eq!(c.kind, ClaimKind::Win);
        assert_eq!(c.effect_label, "Hu!");
        assert!(c.lock_plan(GroupId(0)).is_none());
        assert!(c.win.unwrap().is_win);
    }

    #[test]
    fn quad_allowed_at_capacity() {
        let a = hand("7s 7s 7s 1m 3m 5m 9m 2p 4p 6p 8p E S W");
        let c = resolve_claim(&a, Some(&tile("7s")), false, true, 14).unwrap();
        assert_eq!(c.kind, ClaimKind::Quad);
        assert!(c.is_quad);
        assert_eq!(c.consumed_slots, vec![0, 1, 2]);
        assert_eq!(c.consumed.len(), 3);
    }

    #[test]
    fn triplet_blocked_at_capacity() {
        let a = hand("7s 7s 1m 3m 5m 9m 2p 4p 6p 8p E S W N");
        assert!(resolve_claim(&a, Some(&tile("7s")), false, true, 14).is_none());
        let c = resolve_claim(&a, Some(&tile("7s")), false, false, 14).unwrap();
        assert_eq!(c.kind, ClaimKind::Triplet);
        assert_eq!(c.consumed_slots, vec![0, 1]);
    }

    #[test]
    fn run_requires_upstream() {
        let a = hand("3p 5p E");
        assert!(resolve_claim(&a, Some(&tile("4p")), false, false, 14).is_none());
        let c = resolve_claim(&a, Some(&tile("4p")), true, false, 14).unwrap();
        assert_eq!(c.kind, ClaimKind::Run);
        assert_eq!(c.consumed_slots, vec![0, 1]);
        assert_eq!(c.effect_label, "Chow!");
    }

    #[test]
    fn run_shapes_tried_low_first() {
        let a = hand("2s 3s 5s 6s");
        let c = resolve_claim(&a, Some(&tile("4s")), true, false, 14).unwrap();
        assert_eq!(c.consumed_slots, vec![0, 1]);

        let a = hand("5s 6s 3s");
        let c = resolve_claim(&a, Some(&tile("4s")), true, false, 14).unwrap();
        assert_eq!(c.consumed_slots, vec![2, 0]);
    }

    #[test]
    fn runs_ignore_honors_other_suits_and_locked_tiles() {
        assert!(resolve_claim(&hand("E S"), Some(&tile("W")), true, false, 14).is_none());
        assert!(resolve_claim(&hand("3m 5m"), Some(&tile("4p")), true, false, 14).is_none());
        let a = vec![locked("3p", 1), tile("5p")];
        assert!(resolve_claim(&a, Some(&tile("4p")), true, false, 14).is_none());
    }

    #[test]
    fn exposed_triplet_takes_fourth_tile() {
        let a = vec![locked("E", 4), locked("E", 4), locked("E", 4), tile("1m")];
        let c = resolve_claim(&a, Some(&tile("E")), false, true, 14).unwrap();
        assert_eq!(c.kind, ClaimKind::AddedQuad);
        assert_eq!(c.extends_group, Some(GroupId(4)));
        let plan = c.lock_plan(GroupId(99)).unwrap();
        assert_eq!(plan.group, GroupId(4));
        assert!(plan.slots.is_empty());
        assert!(plan.completes_quad);
    }

    #[test]
    fn lock_plan_uses_fresh_group_for_new_melds() {
        let a = hand("8m 8m 1p");
        let c = resolve_claim(&a, Some(&tile("8m")), false, false, 14).unwrap();
        let plan = c.lock_plan(GroupId(12)).unwrap();
        assert_eq!(plan.slots, vec![0, 1]);
        assert_eq!(plan.group, GroupId(12));
        assert!(!plan.completes_quad);
    }

    #[test]
    fn best_claim_priority_beats_position() {
        let a = hand("2m 2m 6p 6p 6p");
        let d = vec![
            None,
            Some(tile("9s")),
            Some(tile("E")),
            Some(tile("2m")),
            Some(tile("1m")),
            Some(tile("6p")),
        ];
        let (c, i) = resolve_best_claim(&a, &d, false, false, 14).unwrap();
        assert_eq!(i, 5);
        assert_eq!(c.kind, ClaimKind::Quad);
    }

    #[test]
    fn best_claim_position_breaks_ties() {
        let a = hand("2m 2m 7s 7s");
        let d = vec![
            None,
            Some(tile("9s")),
            Some(tile("2m")),
            Some(locked("7s", 3)),
            Some(tile("7s")),
        ];
        let (c, i) = resolve_best_claim(&a, &d, false, false, 14).unwrap();
        assert_eq!(i, 2);
        assert_eq!(c.kind, ClaimKind::Triplet);
    }

    #[test]
    fn highlights_list_every_claimable_slot() {
        let a = hand("2m 2m 4s 5s");
        let d = vec![None, Some(tile("3s")), Some(tile("C")), Some(tile("2m"))];
        let h = claim_highlights(&a, &d, true, false, 14);
        assert_eq!(h, vec![(1, ClaimKind::Run), (3, ClaimKind::Triplet)]);
    }

    #[test]
    fn upstream_is_previous_seat() {
        assert!(is_upstream(1, 0, 4));
        assert!(is_upstream(0, 3, 4));
        assert!(!is_upstream(0, 1, 4));
        assert!(!is_upstream(2, 2, 4));
        assert!(!is_upstream(5, 4, 4));
    }

    #[test]
    fn concealed_quad_on_draw() {
        let h = vec![tile("C"), locked("C", 1), tile("C"), tile("3m"), tile("C")];
        let plan = concealed_quad(&h, &tile("C"), GroupId(8)).unwrap();
        assert_eq!(plan.slots, vec![0, 2, 4]);
        assert!(plan.concealed);
        assert!(concealed_quad(&h[..3], &tile("C"), GroupId(8)).is_none());
    }
}
