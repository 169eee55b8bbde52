//! Stat aggregation and the values derived from it.
//!
//! Effective attributes are always recomputed from base attributes and
//! worn gear, so equipment changes apply to the very next HP or damage
//! calculation. Nothing here is cached on the user except `max_hp`,
//! which callers refresh through [`refresh_max_hp`] or [`settle`].

use super::attributes::{AttributeType, Attributes};
use super::buffs::{active_bonus, prune_expired};
use super::user::User;
use crate::core::constants::{
    ATTRIBUTE_POINTS_PER_LEVEL, BASE_ATTRIBUTE_VALUE, BASE_MAX_HP, HP_BASELINE_VITALITY,
    HP_PER_VITALITY, NUM_ATTRIBUTES, XP_PER_LEVEL,
};
use crate::core::error::{EngineError, Result};

/// Base attributes plus every equipped item's modifiers.
pub fn effective_stats(user: &User) -> Attributes {
    let mut stats = user.attributes;
    for item in user.inventory.equipment.iter_equipped() {
        stats.add(&item.stats().to_attributes());
    }
    stats
}

/// [`effective_stats`] plus buffs still active at `now_ms`.
pub fn effective_stats_at(user: &User, now_ms: i64) -> Attributes {
    let mut stats = effective_stats(user);
    stats.add(&active_bonus(&user.active_buffs, now_ms));
    stats
}

/// 100 HP at 20 VIT, 5 HP per point above or below.
pub fn max_hp_for(vitality: u32) -> i64 {
    BASE_MAX_HP + (vitality as i64 - HP_BASELINE_VITALITY) * HP_PER_VITALITY
}

/// Recomputes `max_hp` from current stats and clamps `hp` into range.
pub fn refresh_max_hp(user: &mut User, now_ms: i64) -> u32 {
    let vitality = effective_stats_at(user, now_ms).vitality();
    user.max_hp = max_hp_for(vitality).clamp(0, u32::MAX as i64) as u32;
    user.hp = user.hp.min(user.max_hp);
    user.max_hp
}

/// Drops buffs that ran out by `now_ms`, then recomputes `max_hp` so a
/// lapsed VIT buff no longer props `hp` above the real maximum.
pub fn settle(user: &mut User, now_ms: i64) -> u32 {
    prune_expired(&mut user.active_buffs, now_ms);
    refresh_max_hp(user, now_ms)
}

/// Recomputes `max_hp` and restores the user to full.
pub fn heal_to_full(user: &mut User, now_ms: i64) {
    user.hp = refresh_max_hp(user, now_ms);
}

/// Points available to spend, derived from level and base attributes.
pub fn unspent_points(user: &User) -> u32 {
    let starting = BASE_ATTRIBUTE_VALUE as i64 * NUM_ATTRIBUTES as i64;
    let earned = ATTRIBUTE_POINTS_PER_LEVEL * (user.level as i64 - 1);
    let spent = user.attributes.total() as i64;
    (starting + earned - spent).max(0) as u32
}

/// Spends one unspent point on a base attribute.
pub fn assign_point(user: &mut User, attr: AttributeType) -> Result<u32> {
    if unspent_points(user) == 0 {
        return Err(EngineError::NoUnspentPoints);
    }
    user.attributes.increment(attr);
    Ok(user.attributes.get(attr))
}

pub fn xp_for_next_level(level: u32) -> u64 {
    level as u64 * XP_PER_LEVEL
}

/// Adds XP and levels up while the threshold is met. Returns levels gained.
pub fn apply_xp(user: &mut User, gain: u64) -> u32 {
    user.xp += gain;
    let mut levels = 0;
    while user.xp >= xp_for_next_level(user.level) {
        user.xp -= xp_for_next_level(user.level);
        user.level += 1;
        levels += 1;
    }
    levels
}
