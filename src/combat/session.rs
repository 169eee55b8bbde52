use super::party::{AllyHit, DamageReport};
use crate::core::constants::{BOSS_INDEX, WORKOUT_PROMPTS};
use crate::dungeon::enemy::{spawn_enemy, Enemy};
use crate::dungeon::tiers::Tier;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which completion branch a session resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterKind {
    /// Three mobs then the tier boss
    StandardDungeon,
    /// A single fight against the tier boss, always captured on a win
    SummonedBossFight,
}

/// Where a live session is in its turn cycle. A user with no session is
/// idle; a resolved fight has no session either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    PlayerTurn,
    /// Attack declared; damage waits for the workout to be confirmed
    AwaitingWorkout { prompt: String },
    EnemyTurn,
    /// Current enemy is dead and the next one has not been called in
    EnemyDefeated,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::PlayerTurn => "player turn",
            SessionPhase::AwaitingWorkout { .. } => "awaiting workout",
            SessionPhase::EnemyTurn => "enemy turn",
            SessionPhase::EnemyDefeated => "enemy defeated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSession {
    pub user_id: String,
    pub tier: Tier,
    pub kind: EncounterKind,
    pub enemy: Enemy,
    /// 0..=3 for the live encounter; reaching 4 ends the run
    pub enemy_index: u8,
    pub phase: SessionPhase,
    pub monsters_killed: u32,
    pub last_damage_dealt: Option<u32>,
    pub last_ally_hits: Vec<AllyHit>,
    pub last_damage_taken: Option<DamageReport>,
    pub started_at_ms: i64,
    pub last_action_ms: i64,
}

impl CombatSession {
    pub fn new(user_id: impl Into<String>, tier: Tier, kind: EncounterKind, now_ms: i64) -> Self {
        let enemy_index = match kind {
            EncounterKind::StandardDungeon => 0,
            EncounterKind::SummonedBossFight => BOSS_INDEX,
        };
        Self {
            user_id: user_id.into(),
            tier,
            kind,
            enemy: spawn_enemy(tier, enemy_index),
            enemy_index,
            phase: SessionPhase::PlayerTurn,
            monsters_killed: 0,
            last_damage_dealt: None,
            last_ally_hits: Vec::new(),
            last_damage_taken: None,
            started_at_ms: now_ms,
            last_action_ms: now_ms,
        }
    }

    pub fn is_awaiting_workout(&self) -> bool {
        matches!(self.phase, SessionPhase::AwaitingWorkout { .. })
    }

    pub fn workout_prompt(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::AwaitingWorkout { prompt } => Some(prompt),
            _ => None,
        }
    }

    /// Between a kill and the next enemy the player is scavenging.
    pub fn is_scavenging(&self) -> bool {
        self.phase == SessionPhase::EnemyDefeated
    }

    pub fn is_boss_fight(&self) -> bool {
        self.enemy_index == BOSS_INDEX
    }

    pub fn touch(&mut self, now_ms: i64) {
        self.last_action_ms = now_ms;
    }

    pub fn is_idle(&self, now_ms: i64, timeout_ms: i64) -> bool {
        now_ms - self.last_action_ms > timeout_ms
    }
}

pub fn random_workout_prompt(rng: &mut impl Rng) -> &'static str {
    WORKOUT_PROMPTS[rng.gen_range(0..WORKOUT_PROMPTS.len())]
}
