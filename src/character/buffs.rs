//! Timed attribute modifiers granted by buff potions.

use super::attributes::{AttributeType, Attributes};
use crate::items::types::BuffTarget;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub target: BuffTarget,
    pub value: u32,
    pub expires_at_ms: i64,
}

impl ActiveBuff {
    pub fn new(target: BuffTarget, value: u32, now_ms: i64, duration_ms: i64) -> Self {
        Self {
            target,
            value,
            expires_at_ms: now_ms.saturating_add(duration_ms.max(0)),
        }
    }

    /// A buff lasts up to but not including its expiry instant.
    pub fn is_active(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }

    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.expires_at_ms - now_ms).max(0)
    }

    /// The flat bonus this buff contributes.
    pub fn bonus(&self) -> Attributes {
        let mut bonus = Attributes::zero();
        match self.target {
            BuffTarget::Single(attr) => bonus.add_to(attr, self.value),
            BuffTarget::All => {
                for attr in AttributeType::all() {
                    bonus.add_to(attr, self.value);
                }
            }
        }
        bonus
    }
}

/// Sum of every buff still active at `now_ms`.
pub fn active_bonus(buffs: &[ActiveBuff], now_ms: i64) -> Attributes {
    let mut total = Attributes::zero();
    for buff in buffs.iter().filter(|b| b.is_active(now_ms)) {
        total.add(&buff.bonus());
    }
    total
}

/// Drops expired buffs, returning how many were removed.
pub fn prune_expired(buffs: &mut Vec<ActiveBuff>, now_ms: i64) -> usize {
    let before = buffs.len();
    buffs.retain(|b| b.is_active(now_ms));
    before - buffs.len()
}
