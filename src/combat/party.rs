//! Captured bosses, the active party, and how the party shares a fight.

use crate::core::constants::{
    ALLY_ATTACK_PER_TIER, ALLY_BASE_ATTACK, ALLY_DAMAGE_ROLL, ALLY_MAX_HP,
    PLAYER_SHARE_DENOMINATOR, PLAYER_SHARE_NUMERATOR,
};
use crate::dungeon::enemy::Enemy;
use crate::dungeon::tiers::Tier;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a captured boss currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAssignment {
    Reserve,
    Party,
    Mission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedBoss {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub assignment: BossAssignment,
    pub captured_at_ms: i64,
}

impl CapturedBoss {
    pub fn new(name: impl Into<String>, tier: Tier, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, tier, now_ms)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        tier: Tier,
        now_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            assignment: BossAssignment::Reserve,
            captured_at_ms: now_ms,
        }
    }

    pub fn on_mission(&self) -> bool {
        self.assignment == BossAssignment::Mission
    }
}

/// A captured boss fighting alongside the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    /// Same id as the captured boss it came from
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub alive: bool,
}

impl PartyMember {
    pub fn from_boss(boss: &CapturedBoss) -> Self {
        Self {
            id: boss.id.clone(),
            name: boss.name.clone(),
            tier: boss.tier,
            hp: ALLY_MAX_HP,
            max_hp: ALLY_MAX_HP,
            attack: ALLY_BASE_ATTACK + boss.tier.level() as u32 * ALLY_ATTACK_PER_TIER,
            alive: true,
        }
    }

    pub fn restore(&mut self) {
        self.hp = self.max_hp;
        self.alive = true;
    }

    /// Dead members stay in the party until removed.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.alive = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllyHit {
    pub name: String,
    pub damage: u32,
}

/// How one enemy attack was spread over the defenders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageReport {
    pub total: u32,
    pub player: u32,
    pub allies: Vec<AllyHit>,
}

/// Splits `total` between the player and `living_allies` defenders.
///
/// With no allies the player takes everything. Otherwise the player takes
/// floor(40%) and the rest is divided evenly, the last ally absorbing the
/// rounding remainder. Returns the player share and one share per ally.
pub fn split_incoming_damage(total: u32, living_allies: usize) -> (u32, Vec<u32>) {
    if living_allies == 0 {
        return (total, Vec::new());
    }
    let player = total * PLAYER_SHARE_NUMERATOR / PLAYER_SHARE_DENOMINATOR;
    let party = total - player;
    let per_ally = party / living_allies as u32;

    let mut shares = vec![per_ally; living_allies];
    if let Some(last) = shares.last_mut() {
        *last = party - per_ally * (living_allies as u32 - 1);
    }
    (player, shares)
}

/// Applies an enemy hit to the living party members. The player share in
/// the report is left for the caller to apply.
pub fn absorb_enemy_hit(party: &mut [PartyMember], total: u32) -> DamageReport {
    let living: Vec<&mut PartyMember> = party.iter_mut().filter(|m| m.alive).collect();
    let (player, shares) = split_incoming_damage(total, living.len());

    let mut allies = Vec::with_capacity(shares.len());
    for (member, share) in living.into_iter().zip(shares) {
        member.take_damage(share);
        allies.push(AllyHit {
            name: member.name.clone(),
            damage: share,
        });
    }

    DamageReport {
        total,
        player,
        allies,
    }
}

/// Each living ally strikes in order. Once the enemy is down the rest hold.
pub fn ally_attacks(
    party: &[PartyMember],
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> Vec<AllyHit> {
    let mut hits = Vec::new();
    for member in party.iter().filter(|m| m.alive) {
        if !enemy.is_alive() {
            break;
        }
        let damage = rng.gen_range(0..ALLY_DAMAGE_ROLL) + member.attack;
        enemy.take_damage(damage);
        hits.push(AllyHit {
            name: member.name.clone(),
            damage,
        });
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::enemy::spawn_enemy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_member(name: &str, tier: Tier) -> PartyMember {
        PartyMember::from_boss(&CapturedBoss::new(name, tier, 0))
    }

    #[test]
    fn test_split_without_allies() {
        assert_eq!(split_incoming_damage(37, 0), (37, vec![]));
    }

    #[test]
    fn test_split_even() {
        assert_eq!(split_incoming_damage(100, 3), (40, vec![20, 20, 20]));
    }

    #[test]
    fn test_split_remainder_goes_to_last() {
        assert_eq!(split_incoming_damage(101, 2), (40, vec![30, 31]));
        assert_eq!(split_incoming_damage(11, 3), (4, vec![2, 2, 3]));
    }

    #[test]
    fn test_split_conserves_damage() {
        for total in 0..200 {
            for k in 0..=3 {
                let (player, shares) = split_incoming_damage(total, k);
                assert_eq!(player + shares.iter().sum::<u32>(), total);
            }
        }
    }

    #[test]
    fn test_ally_attack_scales_with_tier() {
        assert_eq!(create_member("Goblin King", Tier::E).attack, 10);
        assert_eq!(create_member("Shadow Emperor", Tier::S).attack, 35);
    }

    #[test]
    fn test_absorb_skips_dead_and_marks_deaths() {
        let mut party = vec![
            create_member("A", Tier::E),
            create_member("B", Tier::E),
            create_member("C", Tier::E),
        ];
        party[0].alive = false;
        party[0].hp = 0;
        party[1].hp = 10;

        let report = absorb_enemy_hit(&mut party, 50);
        assert_eq!(report.player, 20);
        assert_eq!(report.allies.len(), 2);
        assert_eq!(report.allies[0].name, "B");
        assert_eq!(report.allies[0].damage, 15);
        assert_eq!(report.allies[1].damage, 15);
        assert!(!party[1].alive);
        assert_eq!(party[1].hp, 0);
        assert_eq!(party[2].hp, 85);
        assert_eq!(party.len(), 3);
    }

    #[test]
    fn test_ally_attacks_stop_after_kill() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let party = vec![create_member("A", Tier::S), create_member("B", Tier::S)];
        let mut enemy = spawn_enemy(Tier::E, 0);
        enemy.current_hp = 5;

        let hits = ally_attacks(&party, &mut enemy, &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(enemy.current_hp, 0);
    }

    #[test]
    fn test_ally_attack_damage_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let party = vec![create_member("A", Tier::D)];
        for _ in 0..100 {
            let mut enemy = spawn_enemy(Tier::S, 3);
            let hits = ally_attacks(&party, &mut enemy, &mut rng);
            assert!((15..25).contains(&hits[0].damage));
            assert_eq!(enemy.current_hp, enemy.max_hp - hits[0].damage);
        }
    }

    #[test]
    fn test_restore() {
        let mut member = create_member("A", Tier::C);
        member.take_damage(500);
        assert!(!member.alive);
        member.restore();
        assert!(member.alive);
        assert_eq!(member.hp, 100);
    }
}
