use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluateRequest {
    pub tiles: Vec<Tile>,
    /// Defaults to the rules' capacity for the quads already in `tiles`.
    #[serde(default)]
    pub capacity: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResult {
    pub is_win: bool,
    pub capacity: usize,
    pub patterns: Vec<Pattern>,
    pub score: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClaimRequest {
    pub attacker: Vec<Tile>,
    pub defender_tile: Option<Tile>,
    #[serde(default)]
    pub upstream: bool,
    #[serde(default)]
    pub at_capacity: Option<bool>,
    #[serde(default)]
    pub capacity: Option<usize>,
    /// Group id for a newly locked meld; defaults to one past the highest
    /// group in `attacker`.
    #[serde(default)]
    pub fresh_group: Option<GroupId>,
}

#[derive(Debug, Serialize)]
pub struct ClaimResult {
    pub claim: Option<Claim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_plan: Option<LockPlan>,
    pub points: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BestClaimRequest {
    pub attacker: Vec<Tile>,
    /// Defender body by slot; `null` marks an empty slot.
    pub defender: Vec<Option<Tile>>,
    #[serde(default)]
    pub upstream: bool,
    #[serde(default)]
    pub at_capacity: Option<bool>,
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub fresh_group: Option<GroupId>,
}

#[derive(Debug, Serialize)]
pub struct BestClaimResult {
    pub claim: Option<Claim>,
    pub slot: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_plan: Option<LockPlan>,
    pub points: u32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Highlight {
    pub slot: usize,
    pub kind: ClaimKind,
}

#[derive(Debug, Serialize)]
pub struct HighlightResult {
    pub highlights: Vec<Highlight>,
}

/// A tile gained by the hand itself rather than claimed from another.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DrawRequest {
    pub hand: Vec<Tile>,
    pub gained: Tile,
    #[serde(default)]
    pub fresh_group: Option<GroupId>,
}

#[derive(Debug, Serialize)]
pub struct DrawResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_plan: Option<LockPlan>,
    pub points: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SortRequest {
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Serialize)]
pub struct SortResult {
    pub tiles: Vec<Tile>,
    pub weights: Vec<u16>,
}

mod claim;
mod decompose;
mod engine;
mod order;
mod request;
mod rules;
mod special;
mod tile;
mod yaku;

pub use claim::{
    claim_highlights, concealed_quad, is_upstream, resolve_best_claim, resolve_claim, Claim,
    ClaimKind, LockPlan,
};
pub use decompose::{
    completed_quads, decompose_standard, has_runless_reading, is_standard, Block, HandPattern,
};
pub use engine::{evaluate_hand, Evaluation};
pub use order::{arrange_hand, compare_sort_weight, kind_counts, sort_tiles, sort_weight};
pub use request::{
    best_claim_request, claim_request, draw_request, evaluate_request, highlight_request,
    sort_request,
};
pub use rules::{ActionPoints, Rules};
pub use special::{is_seven_pairs, is_thirteen_orphans};
pub use tile::{Dragon, GroupId, Suit, Tile, TileKey, Wind, WireTile};
pub use yaku::{bonus_patterns, Pattern};
