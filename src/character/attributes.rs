use crate::core::constants::{BASE_ATTRIBUTE_VALUE, NUM_ATTRIBUTES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Strength,
    Agility,
    Vitality,
    Intelligence,
    Perception,
}

impl AttributeType {
    pub fn all() -> [AttributeType; NUM_ATTRIBUTES] {
        [
            AttributeType::Strength,
            AttributeType::Agility,
            AttributeType::Vitality,
            AttributeType::Intelligence,
            AttributeType::Perception,
        ]
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            AttributeType::Strength => "STR",
            AttributeType::Agility => "AGI",
            AttributeType::Vitality => "VIT",
            AttributeType::Intelligence => "INT",
            AttributeType::Perception => "PER",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AttributeType::Strength => 0,
            AttributeType::Agility => 1,
            AttributeType::Vitality => 2,
            AttributeType::Intelligence => 3,
            AttributeType::Perception => 4,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(AttributeType::Strength),
            "agi" | "agility" => Ok(AttributeType::Agility),
            "vit" | "vitality" => Ok(AttributeType::Vitality),
            "int" | "intelligence" => Ok(AttributeType::Intelligence),
            "per" | "perception" => Ok(AttributeType::Perception),
            other => Err(format!("unknown attribute '{other}'")),
        }
    }
}

/// The five core attributes: STR, AGI, VIT, INT, PER.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    values: [u32; NUM_ATTRIBUTES],
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    /// Starting attributes: 20 in every stat.
    pub fn new() -> Self {
        Self {
            values: [BASE_ATTRIBUTE_VALUE; NUM_ATTRIBUTES],
        }
    }

    pub fn zero() -> Self {
        Self {
            values: [0; NUM_ATTRIBUTES],
        }
    }

    pub fn from_values(str: u32, agi: u32, vit: u32, int: u32, per: u32) -> Self {
        Self {
            values: [str, agi, vit, int, per],
        }
    }

    pub fn get(&self, attr: AttributeType) -> u32 {
        self.values[attr.index()]
    }

    pub fn set(&mut self, attr: AttributeType, value: u32) {
        self.values[attr.index()] = value;
    }

    pub fn increment(&mut self, attr: AttributeType) {
        self.values[attr.index()] = self.values[attr.index()].saturating_add(1);
    }

    /// Adds a flat bonus to one attribute.
    pub fn add_to(&mut self, attr: AttributeType, amount: u32) {
        self.values[attr.index()] = self.values[attr.index()].saturating_add(amount);
    }

    /// Adds another Attributes' values to this one (for equipment bonuses).
    pub fn add(&mut self, other: &Attributes) {
        for attr in AttributeType::all() {
            self.add_to(attr, other.get(attr));
        }
    }

    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }

    pub fn strength(&self) -> u32 {
        self.get(AttributeType::Strength)
    }

    pub fn agility(&self) -> u32 {
        self.get(AttributeType::Agility)
    }

    pub fn vitality(&self) -> u32 {
        self.get(AttributeType::Vitality)
    }

    pub fn intelligence(&self) -> u32 {
        self.get(AttributeType::Intelligence)
    }

    pub fn perception(&self) -> u32 {
        self.get(AttributeType::Perception)
    }

    /// True when every attribute is at least the matching one in `other`.
    pub fn dominates(&self, other: &Attributes) -> bool {
        AttributeType::all()
            .iter()
            .all(|attr| self.get(*attr) >= other.get(*attr))
    }
}
