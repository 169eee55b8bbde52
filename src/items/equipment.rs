use super::types::{Item, SlotKind};
use crate::core::constants::{ACCESSORY_SLOTS, ARMOR_SLOTS};
use serde::{Deserialize, Serialize};

/// A concrete equipment position: the weapon, or one of the numbered
/// armor/accessory slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor(usize),
    Accessory(usize),
}

impl EquipSlot {
    pub fn kind(&self) -> SlotKind {
        match self {
            EquipSlot::Weapon => SlotKind::Weapon,
            EquipSlot::Armor(_) => SlotKind::Armor,
            EquipSlot::Accessory(_) => SlotKind::Accessory,
        }
    }
}

/// Worn gear: one weapon, four armor pieces, four accessories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: [Option<Item>; ARMOR_SLOTS],
    pub accessories: [Option<Item>; ACCESSORY_SLOTS],
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            weapon: None,
            armor: Default::default(),
            accessories: Default::default(),
        }
    }

    /// Returns `None` for out-of-range slot indices.
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor(i) => self.armor.get(i).and_then(Option::as_ref),
            EquipSlot::Accessory(i) => self.accessories.get(i).and_then(Option::as_ref),
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> Option<&mut Option<Item>> {
        match slot {
            EquipSlot::Weapon => Some(&mut self.weapon),
            EquipSlot::Armor(i) => self.armor.get_mut(i),
            EquipSlot::Accessory(i) => self.accessories.get_mut(i),
        }
    }

    /// Where an item of this kind goes: the weapon slot, or the first empty
    /// numbered slot, else slot 0.
    pub fn target_slot(&self, kind: SlotKind) -> EquipSlot {
        match kind {
            SlotKind::Weapon => EquipSlot::Weapon,
            SlotKind::Armor => {
                EquipSlot::Armor(self.armor.iter().position(Option::is_none).unwrap_or(0))
            }
            SlotKind::Accessory => EquipSlot::Accessory(
                self.accessories
                    .iter()
                    .position(Option::is_none)
                    .unwrap_or(0),
            ),
        }
    }

    /// Puts an equipment item on and returns whatever it displaced.
    /// Potions are handed back unchanged as `Err`.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let Some(kind) = item.slot() else {
            return Err(item);
        };
        let slot = self.target_slot(kind);
        match self.slot_mut(slot) {
            Some(cell) => Ok(cell.replace(item)),
            None => Err(item),
        }
    }

    /// Empties a slot, returning its item.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slot_mut(slot).and_then(Option::take)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        std::iter::once(&self.weapon)
            .chain(self.armor.iter())
            .chain(self.accessories.iter())
            .filter_map(|item| item.as_ref())
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::find_entry;

    fn create_test_item(name: &str) -> Item {
        find_entry(name).expect("catalog entry").instantiate()
    }

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert!(eq.weapon.is_none());
        assert_eq!(eq.iter_equipped().count(), 0);
    }

    #[test]
    fn test_weapon_replaces_and_returns_old() {
        let mut eq = Equipment::new();
        let sword = create_test_item("Iron Sword");
        let axe = create_test_item("Steel Axe");

        assert_eq!(eq.equip(sword.clone()), Ok(None));
        assert_eq!(eq.equip(axe.clone()), Ok(Some(sword)));
        assert_eq!(eq.get(EquipSlot::Weapon), Some(&axe));
    }

    #[test]
    fn test_armor_fills_first_empty_then_slot_zero() {
        let mut eq = Equipment::new();
        let pieces: Vec<Item> = (0..4).map(|_| create_test_item("Chain Mail")).collect();
        for piece in &pieces {
            assert_eq!(eq.equip(piece.clone()), Ok(None));
        }
        for (i, piece) in pieces.iter().enumerate() {
            assert_eq!(eq.get(EquipSlot::Armor(i)), Some(piece));
        }

        let plate = create_test_item("Iron Plate");
        let displaced = eq.equip(plate.clone()).unwrap();
        assert_eq!(displaced.as_ref(), Some(&pieces[0]));
        assert_eq!(eq.get(EquipSlot::Armor(0)), Some(&plate));
    }

    #[test]
    fn test_unequip_frees_slot_for_reuse() {
        let mut eq = Equipment::new();
        for _ in 0..4 {
            eq.equip(create_test_item("Iron Ring")).unwrap();
        }
        let ring = eq.unequip(EquipSlot::Accessory(2)).expect("slot 2 filled");
        assert_eq!(ring.name, "Iron Ring");
        assert_eq!(eq.target_slot(SlotKind::Accessory), EquipSlot::Accessory(2));
        assert_eq!(eq.unequip(EquipSlot::Accessory(2)), None);
        assert_eq!(eq.unequip(EquipSlot::Accessory(9)), None);
    }

    #[test]
    fn test_potion_cannot_be_equipped() {
        let mut eq = Equipment::new();
        let potion = create_test_item("Health Potion");
        assert_eq!(eq.equip(potion.clone()), Err(potion));
        assert_eq!(eq.iter_equipped().count(), 0);
    }

    #[test]
    fn test_iter_equipped_covers_all_slots() {
        let mut eq = Equipment::new();
        eq.equip(create_test_item("Iron Sword")).unwrap();
        for _ in 0..4 {
            eq.equip(create_test_item("Leather Helmet")).unwrap();
            eq.equip(create_test_item("Silver Necklace")).unwrap();
        }
        assert_eq!(eq.iter_equipped().count(), 9);
    }
}
