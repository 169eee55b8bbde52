//! The user record every engine call reads and mutates.

use super::attributes::Attributes;
use super::buffs::ActiveBuff;
use crate::combat::party::{CapturedBoss, PartyMember};
use crate::core::constants::{BASE_MAX_HP, STARTING_COINS};
use crate::dungeon::progress::DungeonProgress;
use crate::items::catalog::starter_kit;
use crate::items::equipment::Equipment;
use crate::items::types::Item;
use crate::rewards::chest::Chest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub equipment: Equipment,
    /// Everything owned but not worn
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn find(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Removes an item from the unequipped list.
    pub fn take(&mut self, item_id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: String,
    pub level: u32,
    /// XP toward the next level
    pub xp: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub coins: u64,
    /// Base attributes, without gear or buffs
    pub attributes: Attributes,
    pub inventory: Inventory,
    pub captured_bosses: Vec<CapturedBoss>,
    pub party: Vec<PartyMember>,
    pub chests: Vec<Chest>,
    pub dungeon_progress: DungeonProgress,
    pub active_buffs: Vec<ActiveBuff>,
    pub created_at_ms: i64,
}

impl User {
    /// A fresh level 1 user holding the starter kit.
    pub fn new(nickname: impl Into<String>, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), nickname, now_ms)
    }

    pub fn with_id(id: impl Into<String>, nickname: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
            level: 1,
            xp: 0,
            hp: BASE_MAX_HP as u32,
            max_hp: BASE_MAX_HP as u32,
            coins: STARTING_COINS,
            attributes: Attributes::new(),
            inventory: Inventory {
                equipment: Equipment::new(),
                items: starter_kit(),
            },
            captured_bosses: Vec::new(),
            party: Vec::new(),
            chests: Vec::new(),
            dungeon_progress: DungeonProgress::new(now_ms),
            active_buffs: Vec::new(),
            created_at_ms: now_ms,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn chest(&self, chest_id: &str) -> Option<&Chest> {
        self.chests.iter().find(|chest| chest.id == chest_id)
    }

    pub fn chest_mut(&mut self, chest_id: &str) -> Option<&mut Chest> {
        self.chests.iter_mut().find(|chest| chest.id == chest_id)
    }

    pub fn captured_boss(&self, boss_id: &str) -> Option<&CapturedBoss> {
        self.captured_bosses.iter().find(|boss| boss.id == boss_id)
    }

    pub fn captured_boss_mut(&mut self, boss_id: &str) -> Option<&mut CapturedBoss> {
        self.captured_bosses.iter_mut().find(|boss| boss.id == boss_id)
    }

    pub fn living_allies(&self) -> usize {
        self.party.iter().filter(|member| member.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("hero", 0);
        assert_eq!(user.level, 1);
        assert_eq!(user.xp, 0);
        assert_eq!(user.hp, 100);
        assert_eq!(user.max_hp, 100);
        assert_eq!(user.coins, 1000);
        assert_eq!(user.attributes.total(), 100);
        assert_eq!(user.inventory.items.len(), 10);
        assert_eq!(user.inventory.equipment.iter_equipped().count(), 0);
        assert!(user.party.is_empty());
        assert!(user.chests.is_empty());
    }

    #[test]
    fn test_inventory_take() {
        let mut user = User::new("hero", 0);
        let id = user.inventory.items[0].id.clone();
        assert!(user.inventory.find(&id).is_some());
        let item = user.inventory.take(&id).expect("item present");
        assert_eq!(item.id, id);
        assert!(user.inventory.find(&id).is_none());
        assert!(user.inventory.take(&id).is_none());
    }

    #[test]
    fn test_users_get_distinct_ids() {
        assert_ne!(User::new("a", 0).id, User::new("a", 0).id);
    }
}
