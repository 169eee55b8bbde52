use super::tiers::Tier;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub max_hp: u32,
    pub current_hp: u32,
    pub attack: u32,
    pub agility: u32,
}

impl Enemy {
    pub fn new(name: String, max_hp: u32, attack: u32, agility: u32) -> Self {
        Self {
            name,
            current_hp: max_hp,
            max_hp,
            attack,
            agility,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Applies damage, clamping at zero. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_sub(amount);
        before - self.current_hp
    }
}

pub fn is_boss_index(index: u8) -> bool {
    index == BOSS_INDEX
}

/// Name of the encounter at `index` for a tier: mobs at 0..=2, boss at 3.
pub fn encounter_name(tier: Tier, index: u8) -> &'static str {
    let config = tier.config();
    if is_boss_index(index) {
        config.boss
    } else {
        config.mobs[(index as usize).min(MOBS_PER_RUN - 1)]
    }
}

/// Spawns the enemy for a tier and encounter index.
///
/// Deterministic: the same (tier, index) always yields the same stats.
pub fn spawn_enemy(tier: Tier, index: u8) -> Enemy {
    let level = tier.level() as u32;
    let base_hp = ENEMY_BASE_HP + level * ENEMY_HP_PER_TIER;
    let base_attack = ENEMY_BASE_ATTACK + level * ENEMY_ATTACK_PER_TIER;
    let agility = ENEMY_BASE_AGILITY + level * ENEMY_AGILITY_PER_TIER;

    let (hp, attack) = if is_boss_index(index) {
        (
            (base_hp as f64 * BOSS_HP_MULTIPLIER).floor() as u32,
            (base_attack as f64 * BOSS_ATTACK_MULTIPLIER).floor() as u32,
        )
    } else {
        (base_hp, base_attack)
    };

    Enemy::new(encounter_name(tier, index).to_string(), hp, attack, agility)
}

/// The full four-encounter sequence of a tier.
pub fn encounter_sequence(tier: Tier) -> Vec<Enemy> {
    (0..ENCOUNTERS_PER_RUN)
        .map(|index| spawn_enemy(tier, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tier_has_four_encounters_ending_in_boss() {
        for tier in Tier::ALL {
            let sequence = encounter_sequence(tier);
            assert_eq!(sequence.len(), 4);
            assert_eq!(sequence[3].name, tier.config().boss);
            for (i, mob) in sequence[..3].iter().enumerate() {
                assert_eq!(mob.name, tier.config().mobs[i]);
            }
        }
    }

    #[test]
    fn test_tier_e_stats() {
        let goblin = spawn_enemy(Tier::E, 0);
        assert_eq!(goblin.max_hp, 50);
        assert_eq!(goblin.attack, 10);
        assert_eq!(goblin.agility, 5);

        let king = spawn_enemy(Tier::E, 3);
        assert_eq!(king.name, "Goblin King");
        assert_eq!(king.max_hp, 75);
        assert_eq!(king.attack, 13);
    }

    #[test]
    fn test_tier_s_uses_ordinal_level() {
        let mob = spawn_enemy(Tier::S, 0);
        assert_eq!(mob.max_hp, 50 + 25 * 5);
        assert_eq!(mob.attack, 10 + 5 * 5);
    }

    #[test]
    fn test_tier_s_boss_stats() {
        let emperor = spawn_enemy(Tier::S, 3);
        // base hp 175, attack 35
        assert_eq!(emperor.max_hp, 262);
        assert_eq!(emperor.attack, 45);
        assert_eq!(emperor.agility, 15);
    }

    #[test]
    fn test_spawn_is_deterministic() {
        assert_eq!(spawn_enemy(Tier::C, 1), spawn_enemy(Tier::C, 1));
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut enemy = spawn_enemy(Tier::E, 0);
        let removed = enemy.take_damage(500);
        assert_eq!(removed, 50);
        assert_eq!(enemy.current_hp, 0);
        assert!(!enemy.is_alive());
    }
}
