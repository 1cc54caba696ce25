use crate::claim::{ClaimKind, LockPlan};
use crate::decompose::completed_quads;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Table-level settings shared by every hand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Rules {
    pub base_capacity: usize,
    pub capacity_per_quad: usize,
    pub points: ActionPoints,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            base_capacity: 14,
            capacity_per_quad: 1,
            points: ActionPoints::default(),
        }
    }
}

impl Rules {
    pub fn capacity(&self, completed_quads: usize) -> usize {
        self.base_capacity + completed_quads * self.capacity_per_quad
    }

    /// Capacity of `tiles` from the quads already locked in it.
    pub fn capacity_of(&self, tiles: &[Tile]) -> usize {
        self.capacity(completed_quads(tiles))
    }

    /// Most quads a hand can complete: every set of a base-size hand.
    pub fn max_quads(&self) -> usize {
        self.base_capacity.saturating_sub(2) / 3
    }

    /// Largest capacity any hand can reach.
    pub fn max_capacity(&self) -> usize {
        self.capacity(self.max_quads())
    }
}

/// Flat score the game awards per action, outside the pattern table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionPoints {
    pub food: u32,
    pub run: u32,
    pub triplet: u32,
    pub quad: u32,
    pub concealed_quad: u32,
    pub win: u32,
}

impl Default for ActionPoints {
    fn default() -> Self {
        ActionPoints {
            food: 10,
            run: 50,
            triplet: 100,
            quad: 200,
            concealed_quad: 300,
            win: 1000,
        }
    }
}

impl ActionPoints {
    pub fn for_claim(&self, kind: ClaimKind) -> u32 {
        match kind {
            ClaimKind::Win => self.win,
            ClaimKind::Quad | ClaimKind::AddedQuad => self.quad,
            ClaimKind::Triplet => self.triplet,
            ClaimKind::Run => self.run,
        }
    }

    pub fn for_lock(&self, plan: &LockPlan) -> u32 {
        match (plan.completes_quad, plan.concealed) {
            (true, true) => self.concealed_quad,
            (true, false) => self.quad,
            // a three-tile lock plan carries no kind; runs and triplets are
            // scored through for_claim
            (false, _) => 0,
        }
    }
}
