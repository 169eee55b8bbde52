//! Inventory actions: wearing gear and drinking potions.

use super::equipment::EquipSlot;
use super::types::{Item, ItemKind, PotionEffect};
use crate::character::buffs::{prune_expired, ActiveBuff};
use crate::character::stats::refresh_max_hp;
use crate::character::user::User;
use crate::core::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Result of drinking a potion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotionOutcome {
    Healed { amount: u32, hp: u32 },
    /// Consumed with no mechanical effect
    Mana,
    Buffed(ActiveBuff),
}

/// Moves an item from the list into its slot. Anything displaced goes back
/// into the list. Max HP is refreshed since VIT may have changed.
pub fn equip_item(user: &mut User, item_id: &str, now_ms: i64) -> Result<Option<Item>> {
    let item = user
        .inventory
        .find(item_id)
        .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;
    if item.slot().is_none() {
        return Err(EngineError::ItemNotUsable);
    }

    let item = user
        .inventory
        .take(item_id)
        .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;
    let displaced = match user.inventory.equipment.equip(item) {
        Ok(displaced) => displaced,
        Err(item) => {
            user.inventory.items.push(item);
            return Err(EngineError::ItemNotUsable);
        }
    };
    if let Some(old) = &displaced {
        user.inventory.items.push(old.clone());
    }
    refresh_max_hp(user, now_ms);
    Ok(displaced)
}

pub fn unequip_item(user: &mut User, slot: EquipSlot, now_ms: i64) -> Result<Item> {
    let item = user
        .inventory
        .equipment
        .unequip(slot)
        .ok_or_else(|| EngineError::ItemNotFound(format!("{:?}", slot)))?;
    user.inventory.items.push(item.clone());
    refresh_max_hp(user, now_ms);
    Ok(item)
}

/// Drinks a potion. It is consumed only when it had an effect; healing at
/// full HP is rejected and the potion kept.
pub fn use_item(user: &mut User, item_id: &str, now_ms: i64) -> Result<PotionOutcome> {
    let item = user
        .inventory
        .find(item_id)
        .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;
    let ItemKind::Potion {
        effect,
        value,
        duration_ms,
    } = item.kind
    else {
        return Err(EngineError::ItemNotUsable);
    };

    prune_expired(&mut user.active_buffs, now_ms);
    refresh_max_hp(user, now_ms);

    let outcome = match effect {
        PotionEffect::Heal => {
            if user.hp >= user.max_hp {
                return Err(EngineError::ItemNotUsable);
            }
            let before = user.hp;
            user.hp = user.hp.saturating_add(value).min(user.max_hp);
            PotionOutcome::Healed {
                amount: user.hp - before,
                hp: user.hp,
            }
        }
        PotionEffect::Mana => PotionOutcome::Mana,
        PotionEffect::Buff(target) => {
            let buff = ActiveBuff::new(target, value, now_ms, duration_ms.unwrap_or(0));
            user.active_buffs.push(buff);
            refresh_max_hp(user, now_ms);
            PotionOutcome::Buffed(buff)
        }
    };

    user.inventory.take(item_id);
    Ok(outcome)
}
