use crate::claim::{claim_highlights, concealed_quad, resolve_best_claim, resolve_claim};
use crate::engine::evaluate_hand;
use crate::order::{arrange_hand, kind_counts, sort_weight};
use crate::rules::Rules;
use crate::tile::{GroupId, Tile};
use crate::{
    BestClaimRequest, BestClaimResult, ClaimRequest, ClaimResult, DrawRequest, DrawResult,
    EvaluateRequest, EvaluateResult, Highlight, HighlightResult, SortRequest, SortResult,
};

/// Copies of each kind in a full set.
const KIND_SUPPLY: u8 = 4;

/// Tiles in a full set: 34 kinds, four copies each.
const FULL_SET: usize = 136;

/// Validated view of the claiming hand.
struct Seat {
    capacity: usize,
    at_capacity: bool,
    fresh_group: GroupId,
}

impl Seat {
    fn of(
        hand: &[Tile],
        capacity: Option<usize>,
        at_capacity: Option<bool>,
        fresh_group: Option<GroupId>,
        rules: &Rules,
    ) -> Result<Self, String> {
        check_hand(hand, "attacker", rules)?;
        let capacity = resolve_capacity(capacity, hand, rules)?;
        Ok(Seat {
            capacity,
            at_capacity: at_capacity.unwrap_or(hand.len() >= capacity),
            fresh_group: fresh_group.unwrap_or_else(|| next_group(hand)),
        })
    }
}

pub fn evaluate_request(req: &EvaluateRequest, rules: &Rules) -> Result<EvaluateResult, String> {
    check_hand(&req.tiles, "tiles", rules)?;
    let capacity = resolve_capacity(req.capacity, &req.tiles, rules)?;

    let result = match evaluate_hand(&req.tiles, capacity) {
        Some(ev) => EvaluateResult {
            is_win: true,
            capacity,
            patterns: ev.patterns,
            score: ev.score,
        },
        None => EvaluateResult {
            is_win: false,
            capacity,
            patterns: vec![],
            score: 0,
        },
    };
    Ok(result)
}

pub fn claim_request(req: &ClaimRequest, rules: &Rules) -> Result<ClaimResult, String> {
    let seat = Seat::of(
        &req.attacker,
        req.capacity,
        req.at_capacity,
        req.fresh_group,
        rules,
    )?;

    let claim = resolve_claim(
        &req.attacker,
        req.defender_tile.as_ref(),
        req.upstream,
        seat.at_capacity,
        seat.capacity,
    );
    let points = claim
        .as_ref()
        .map_or(0, |c| rules.points.for_claim(c.kind));
    let lock_plan = claim.as_ref().and_then(|c| c.lock_plan(seat.fresh_group));
    Ok(ClaimResult {
        claim,
        lock_plan,
        points,
    })
}

pub fn best_claim_request(
    req: &BestClaimRequest,
    rules: &Rules,
) -> Result<BestClaimResult, String> {
    let seat = Seat::of(
        &req.attacker,
        req.capacity,
        req.at_capacity,
        req.fresh_group,
        rules,
    )?;
    check_defender(&req.defender)?;

    let result = match resolve_best_claim(
        &req.attacker,
        &req.defender,
        req.upstream,
        seat.at_capacity,
        seat.capacity,
    ) {
        Some((claim, slot)) => BestClaimResult {
            points: rules.points.for_claim(claim.kind),
            lock_plan: claim.lock_plan(seat.fresh_group),
            claim: Some(claim),
            slot: Some(slot),
        },
        None => BestClaimResult {
            claim: None,
            slot: None,
            lock_plan: None,
            points: 0,
        },
    };
    Ok(result)
}

pub fn highlight_request(
    req: &BestClaimRequest,
    rules: &Rules,
) -> Result<HighlightResult, String> {
    let seat = Seat::of(
        &req.attacker,
        req.capacity,
        req.at_capacity,
        req.fresh_group,
        rules,
    )?;
    check_defender(&req.defender)?;

    let highlights = claim_highlights(
        &req.attacker,
        &req.defender,
        req.upstream,
        seat.at_capacity,
        seat.capacity,
    )
    .into_iter()
    .map(|(slot, kind)| Highlight { slot, kind })
    .collect();
    Ok(HighlightResult { highlights })
}

/// Concealed quad check for a self-gained tile. Anything else is plain food.
pub fn draw_request(req: &DrawRequest, rules: &Rules) -> Result<DrawResult, String> {
    check_hand(&req.hand, "hand", rules)?;
    let fresh = req.fresh_group.unwrap_or_else(|| next_group(&req.hand));

    let lock_plan = concealed_quad(&req.hand, &req.gained, fresh);
    let points = match &lock_plan {
        Some(plan) => rules.points.for_lock(plan),
        None => rules.points.food,
    };
    Ok(DrawResult { lock_plan, points })
}

pub fn sort_request(req: &SortRequest) -> Result<SortResult, String> {
    if req.tiles.len() > FULL_SET {
        return Err(format!("tiles: {} given, a set has {}", req.tiles.len(), FULL_SET));
    }
    let tiles = arrange_hand(&req.tiles);
    let weights = tiles.iter().map(sort_weight).collect();
    Ok(SortResult { tiles, weights })
}

fn resolve_capacity(given: Option<usize>, tiles: &[Tile], rules: &Rules) -> Result<usize, String> {
    match given {
        Some(0) => Err("capacity must be positive".to_string()),
        Some(c) if c > rules.max_capacity() => Err(format!(
            "capacity {} exceeds the largest possible {}",
            c,
            rules.max_capacity()
        )),
        Some(c) => Ok(c),
        None => Ok(rules.capacity_of(tiles)),
    }
}

/// Hand size within the largest capacity, and no kind beyond its supply.
fn check_hand(tiles: &[Tile], field: &str, rules: &Rules) -> Result<(), String> {
    if tiles.len() > rules.max_capacity() {
        return Err(format!(
            "{}: {} tiles, no hand holds more than {}",
            field,
            tiles.len(),
            rules.max_capacity()
        ));
    }
    for (key, n) in kind_counts(tiles) {
        if n > KIND_SUPPLY {
            return Err(format!(
                "{}: {} copies of {}, at most {} exist",
                field,
                n,
                key.code(),
                KIND_SUPPLY
            ));
        }
    }
    Ok(())
}

fn check_defender(slots: &[Option<Tile>]) -> Result<(), String> {
    if slots.len() > FULL_SET {
        return Err(format!("defender: {} slots, a set has {} tiles", slots.len(), FULL_SET));
    }
    Ok(())
}

fn next_group(hand: &[Tile]) -> GroupId {
    let top = hand.iter().filter_map(Tile::group).map(|g| g.0).max();
    GroupId(top.map_or(1, |g| g.saturating_add(1)))
}
