//! Weighted rarity/category item selection over the catalog.

use super::catalog::{CatalogEntry, CATALOG};
use super::types::{Item, ItemCategory, Rarity};
use crate::core::constants::{
    DROP_RARITY_CASCADE, EQUIPMENT_BASE_PRICE, KILL_COIN_DIVISOR, POTION_BASE_PRICE,
    PRICE_JITTER,
};
use crate::dungeon::tiers::Tier;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chances used when converting kills into loot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillLootRules {
    /// Chance that a kill drops anything at all
    pub drop_chance: f64,
    /// Chance that a drop also carries an item
    pub item_chance: f64,
}

/// Loot gathered from a batch of kills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillLoot {
    pub kills: u32,
    pub drops: u32,
    pub coins: u64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct LootTable {
    entries: Vec<CatalogEntry>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl LootTable {
    /// Table over the full built-in catalog.
    pub fn standard() -> Self {
        Self::new(CATALOG.to_vec())
    }

    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Picks a concrete item of the given category and rarity.
    ///
    /// When no entry matches the exact rarity, any entry of the category is
    /// eligible instead. Returns `None` only when the category is empty.
    pub fn roll_item(
        &self,
        category: ItemCategory,
        rarity: Rarity,
        rng: &mut impl Rng,
    ) -> Option<Item> {
        let exact: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|e| e.category() == category && e.rarity == rarity)
            .collect();

        let pool = if exact.is_empty() {
            self.entries
                .iter()
                .filter(|e| e.category() == category)
                .collect()
        } else {
            exact
        };

        if pool.is_empty() {
            return None;
        }
        let entry = pool[rng.gen_range(0..pool.len())];
        Some(entry.instantiate_with(rng))
    }

    /// Random category, tier-scaled rarity, then a concrete item.
    pub fn roll_drop(&self, tier: Tier, rng: &mut impl Rng) -> Option<Item> {
        let category = roll_random_category(rng);
        let rarity = roll_drop_rarity(tier, rng);
        self.roll_item(category, rarity, rng)
    }

    /// One independent roll per kill.
    pub fn roll_kill_loot(
        &self,
        kills: u32,
        tier: Tier,
        rules: KillLootRules,
        rng: &mut impl Rng,
    ) -> KillLoot {
        let mut loot = KillLoot {
            kills,
            ..KillLoot::default()
        };
        let max_coins = (tier.config().base_coins / KILL_COIN_DIVISOR).max(1);

        for _ in 0..kills {
            if rng.gen::<f64>() >= rules.drop_chance {
                continue;
            }
            loot.drops += 1;
            loot.coins += rng.gen_range(1..=max_coins);

            if rng.gen::<f64>() < rules.item_chance {
                if let Some(item) = self.roll_drop(tier, rng) {
                    loot.items.push(item);
                }
            }
        }
        loot
    }
}

pub fn roll_random_category(rng: &mut impl Rng) -> ItemCategory {
    ItemCategory::ALL[rng.gen_range(0..ItemCategory::ALL.len())]
}

/// Rolls a rarity with the tier-scaled cascade.
///
/// A single roll is checked against thresholds from the top down; each
/// threshold only applies once the tier level unlocks it:
/// tier >= 5: 5% S, >= 4: 10% A, >= 3: 20% B, >= 2: 40% C, >= 1: 60% D, else E.
pub fn roll_drop_rarity(tier: Tier, rng: &mut impl Rng) -> Rarity {
    rarity_for_roll(tier, rng.gen::<f64>())
}

fn rarity_for_roll(tier: Tier, roll: f64) -> Rarity {
    let tier_level = tier.level();
    for (min_tier, threshold) in DROP_RARITY_CASCADE {
        if tier_level >= min_tier && roll < threshold {
            return Rarity::from_level(min_tier).unwrap_or(Rarity::E);
        }
    }
    Rarity::E
}

/// Shop price: category base times rarity multiplier plus jitter in [0, 30).
pub fn price_for(item: &Item, rng: &mut impl Rng) -> u64 {
    let base = match item.category() {
        ItemCategory::Potion => POTION_BASE_PRICE,
        _ => EQUIPMENT_BASE_PRICE,
    };
    (base * item.rarity.multiplier() + rng.gen::<f64>() * PRICE_JITTER).floor() as u64
}
