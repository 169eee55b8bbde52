//! Hand-authored item catalog shared by drops, chests and the shop.

use super::types::{
    BuffTarget, Item, ItemCategory, ItemKind, PotionEffect, Rarity, SlotKind, StatBonuses,
};
use crate::character::attributes::AttributeType;
use crate::core::ids::random_id;
use rand::Rng;
use uuid::Uuid;

/// What an entry turns into when instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Gear(SlotKind, StatBonuses),
    Potion {
        effect: PotionEffect,
        value: u32,
        duration_ms: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub rarity: Rarity,
    pub description: &'static str,
    pub template: Template,
}

impl CatalogEntry {
    pub fn category(&self) -> ItemCategory {
        match self.template {
            Template::Gear(slot, _) => slot.into(),
            Template::Potion { .. } => ItemCategory::Potion,
        }
    }

    /// Creates a fresh item instance with its own id.
    pub fn instantiate(&self) -> Item {
        self.instantiate_as(Uuid::new_v4().to_string())
    }

    /// Like [`Self::instantiate`], with the id drawn from `rng`.
    pub fn instantiate_with(&self, rng: &mut impl Rng) -> Item {
        self.instantiate_as(random_id(rng))
    }

    fn instantiate_as(&self, id: String) -> Item {
        let kind = match self.template {
            Template::Gear(slot, stats) => ItemKind::Equipment { slot, stats },
            Template::Potion {
                effect,
                value,
                duration_ms,
            } => ItemKind::Potion {
                effect,
                value,
                duration_ms,
            },
        };
        Item {
            id,
            name: self.name.to_string(),
            rarity: self.rarity,
            description: self.description.to_string(),
            kind,
        }
    }
}

const fn gear(
    slot: SlotKind,
    name: &'static str,
    rarity: Rarity,
    stats: StatBonuses,
    description: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        name,
        rarity,
        description,
        template: Template::Gear(slot, stats),
    }
}

const fn potion(
    name: &'static str,
    rarity: Rarity,
    effect: PotionEffect,
    value: u32,
    duration_ms: Option<i64>,
    description: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        name,
        rarity,
        description,
        template: Template::Potion {
            effect,
            value,
            duration_ms,
        },
    }
}

const fn stats(str: u32, agi: u32, vit: u32, int: u32, per: u32) -> StatBonuses {
    StatBonuses::new(str, agi, vit, int, per)
}

use Rarity::{A, B, C, D, E, S};
use SlotKind::{Accessory, Armor, Weapon};

const STR_BUFF: PotionEffect = PotionEffect::Buff(BuffTarget::Single(AttributeType::Strength));
const AGI_BUFF: PotionEffect = PotionEffect::Buff(BuffTarget::Single(AttributeType::Agility));
const VIT_BUFF: PotionEffect = PotionEffect::Buff(BuffTarget::Single(AttributeType::Vitality));
const ALL_BUFF: PotionEffect = PotionEffect::Buff(BuffTarget::All);

pub const CATALOG: [CatalogEntry; 34] = [
    // Weapons
    gear(Weapon, "Iron Sword", E, stats(2, 1, 0, 0, 0), "A sturdy iron blade"),
    gear(Weapon, "Steel Axe", E, stats(3, 0, 1, 0, 0), "Heavy two-handed axe"),
    gear(Weapon, "Hunter's Bow", E, stats(0, 3, 0, 0, 1), "Well-crafted hunting bow"),
    gear(Weapon, "Wizard Staff", D, stats(0, 0, 0, 4, 2), "Staff imbued with magic"),
    gear(Weapon, "Shadow Dagger", D, stats(2, 3, 0, 0, 0), "Blade that cuts through shadows"),
    gear(Weapon, "Flaming Sword", C, stats(5, 0, 0, 2, 0), "Sword wreathed in eternal flames"),
    gear(Weapon, "Dragon Slayer", B, stats(8, 0, 3, 0, 0), "Legendary weapon of dragon hunters"),
    gear(Weapon, "Excalibur", A, stats(10, 5, 3, 0, 0), "The legendary sword of kings"),
    gear(Weapon, "Void Blade", S, stats(15, 8, 0, 5, 0), "Forged from the essence of the void"),
    // Armor
    gear(Armor, "Leather Helmet", E, stats(0, 0, 2, 0, 0), "Basic leather protection"),
    gear(Armor, "Chain Mail", E, stats(1, 0, 3, 0, 0), "Interlocked metal rings"),
    gear(Armor, "Iron Plate", D, stats(2, 0, 4, 0, 0), "Heavy iron armor"),
    gear(Armor, "Ranger's Cloak", D, stats(0, 3, 0, 0, 2), "Light and stealthy"),
    gear(Armor, "Mage Robes", C, stats(0, 0, 0, 5, 3), "Robes woven with magic"),
    gear(Armor, "Dragon Scale Armor", B, stats(4, 0, 8, 0, 0), "Armor made from dragon scales"),
    gear(Armor, "Divine Plate", A, stats(5, 0, 10, 3, 0), "Blessed by the gods"),
    gear(Armor, "Celestial Aegis", S, stats(8, 0, 15, 6, 0), "Armor of the heavens"),
    // Accessories
    gear(Accessory, "Iron Ring", E, stats(1, 0, 0, 0, 0), "Simple iron band"),
    gear(Accessory, "Silver Necklace", E, stats(0, 0, 0, 2, 1), "Elegant silver chain"),
    gear(Accessory, "Agility Bracelet", D, stats(0, 3, 0, 0, 0), "Increases movement speed"),
    gear(Accessory, "Wisdom Amulet", D, stats(0, 0, 0, 3, 2), "Enhances magical knowledge"),
    gear(Accessory, "Ruby Ring", C, stats(3, 0, 2, 0, 0), "Ring with a brilliant ruby"),
    gear(Accessory, "Phoenix Feather", B, stats(0, 3, 0, 5, 0), "Feather of the legendary phoenix"),
    gear(Accessory, "Crown of Kings", A, stats(4, 0, 2, 4, 4), "Crown worn by ancient rulers"),
    gear(Accessory, "Eternal Sigil", S, stats(6, 6, 6, 6, 6), "Symbol of infinite power"),
    // Potions
    potion("Health Potion", E, PotionEffect::Heal, 50, None, "Restores 50 HP"),
    potion("Mana Potion", E, PotionEffect::Mana, 30, None, "Restores MP"),
    potion("Strength Elixir", D, STR_BUFF, 5, Some(300_000), "Temporarily boosts STR by 5"),
    potion("Agility Tonic", D, AGI_BUFF, 5, Some(300_000), "Temporarily boosts AGI by 5"),
    potion("Vitality Brew", C, VIT_BUFF, 8, Some(600_000), "Temporarily boosts VIT by 8"),
    potion("Greater Health Potion", C, PotionEffect::Heal, 100, None, "Restores 100 HP"),
    potion("Elixir of Power", B, ALL_BUFF, 5, Some(900_000), "Boosts all stats by 5"),
    potion("Divine Essence", A, ALL_BUFF, 10, Some(1_200_000), "Boosts all stats by 10"),
    potion("Immortal Elixir", S, ALL_BUFF, 15, Some(1_800_000), "Boosts all stats by 15"),
];

/// Looks up a catalog entry by exact name.
pub fn find_entry(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name == name)
}

/// The kit handed to every new user: basic gear plus a few potions.
pub fn starter_kit() -> Vec<Item> {
    [
        "Iron Sword",
        "Leather Helmet",
        "Chain Mail",
        "Iron Ring",
        "Silver Necklace",
        "Health Potion",
        "Health Potion",
        "Health Potion",
        "Strength Elixir",
        "Agility Tonic",
    ]
    .iter()
    .filter_map(|name| find_entry(name))
    .map(CatalogEntry::instantiate)
    .collect()
}
