use crate::character::attributes::{AttributeType, Attributes};
use crate::core::constants::RARITY_MULTIPLIERS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item rarity on the same E..S scale as dungeon tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::E,
        Rarity::D,
        Rarity::C,
        Rarity::B,
        Rarity::A,
        Rarity::S,
    ];

    pub fn level(&self) -> u8 {
        match self {
            Rarity::E => 0,
            Rarity::D => 1,
            Rarity::C => 2,
            Rarity::B => 3,
            Rarity::A => 4,
            Rarity::S => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Rarity> {
        Rarity::ALL.get(level as usize).copied()
    }

    /// Fixed multiplier table: E 1, D 1.5, C 2.5, B 4, A 6, S 10.
    pub fn multiplier(&self) -> f64 {
        RARITY_MULTIPLIERS[self.level() as usize]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::E => "E",
            Rarity::D => "D",
            Rarity::C => "C",
            Rarity::B => "B",
            Rarity::A => "A",
            Rarity::S => "S",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which equipment slot family an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Weapon,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Accessory,
    Potion,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Weapon,
        ItemCategory::Armor,
        ItemCategory::Accessory,
        ItemCategory::Potion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Accessory => "accessory",
            ItemCategory::Potion => "potion",
        }
    }
}

impl FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" | "weapons" => Ok(ItemCategory::Weapon),
            "armor" => Ok(ItemCategory::Armor),
            "accessory" | "accessories" => Ok(ItemCategory::Accessory),
            "potion" | "potions" => Ok(ItemCategory::Potion),
            other => Err(format!("unknown item category '{other}'")),
        }
    }
}

impl From<SlotKind> for ItemCategory {
    fn from(slot: SlotKind) -> Self {
        match slot {
            SlotKind::Weapon => ItemCategory::Weapon,
            SlotKind::Armor => ItemCategory::Armor,
            SlotKind::Accessory => ItemCategory::Accessory,
        }
    }
}

/// Flat attribute modifiers carried by equipment. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBonuses {
    pub str: u32,
    pub agi: u32,
    pub vit: u32,
    pub int: u32,
    pub per: u32,
}

impl StatBonuses {
    pub const NONE: StatBonuses = StatBonuses::new(0, 0, 0, 0, 0);

    pub const fn new(str: u32, agi: u32, vit: u32, int: u32, per: u32) -> Self {
        Self {
            str,
            agi,
            vit,
            int,
            per,
        }
    }

    pub fn total(&self) -> u32 {
        self.str + self.agi + self.vit + self.int + self.per
    }

    pub fn to_attributes(&self) -> Attributes {
        Attributes::from_values(self.str, self.agi, self.vit, self.int, self.per)
    }
}

/// What a potion buff raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffTarget {
    Single(AttributeType),
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotionEffect {
    Heal,
    Mana,
    Buff(BuffTarget),
}

/// Equipment carries stats; potions carry an effect. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Equipment {
        slot: SlotKind,
        stats: StatBonuses,
    },
    Potion {
        effect: PotionEffect,
        value: u32,
        duration_ms: Option<i64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub description: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn category(&self) -> ItemCategory {
        match &self.kind {
            ItemKind::Equipment { slot, .. } => (*slot).into(),
            ItemKind::Potion { .. } => ItemCategory::Potion,
        }
    }

    /// Stat modifiers; potions contribute nothing.
    pub fn stats(&self) -> StatBonuses {
        match &self.kind {
            ItemKind::Equipment { stats, .. } => *stats,
            ItemKind::Potion { .. } => StatBonuses::NONE,
        }
    }

    pub fn slot(&self) -> Option<SlotKind> {
        match &self.kind {
            ItemKind::Equipment { slot, .. } => Some(*slot),
            ItemKind::Potion { .. } => None,
        }
    }
}
