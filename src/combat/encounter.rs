//! The per-session combat state machine.
//!
//! Every transition checks its phase before touching anything, so a call
//! made out of order is rejected with `InvalidTransition` and leaves both
//! the session and the user exactly as they were.

use super::party::{absorb_enemy_hit, ally_attacks};
use super::session::{random_workout_prompt, CombatSession, EncounterKind, SessionPhase};
use crate::character::stats::{effective_stats_at, heal_to_full, settle};
use crate::character::user::User;
use crate::core::constants::{
    DAMAGE_PER_STRENGTH, ENCOUNTERS_PER_RUN, ENEMY_DAMAGE_ROLL, PLAYER_DAMAGE_ROLL,
};
use crate::core::error::{EngineError, Result};
use crate::dungeon::enemy::spawn_enemy;
use crate::dungeon::tiers::Tier;
use crate::items::loot::KillLoot;
use crate::rewards::resolver::{
    apply_kill_loot, defeat_outcome, resolve_victory, RewardContext, RewardOutcome,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a turn left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnResult {
    /// The session lives on
    Continue,
    /// The fight is over and the session must be discarded
    Resolved(RewardOutcome),
}

/// The public result of a combat action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterOutcome {
    Ongoing(CombatSession),
    Resolved(RewardOutcome),
}

impl EncounterOutcome {
    pub fn session(&self) -> Option<&CombatSession> {
        match self {
            EncounterOutcome::Ongoing(session) => Some(session),
            EncounterOutcome::Resolved(_) => None,
        }
    }

    pub fn outcome(&self) -> Option<&RewardOutcome> {
        match self {
            EncounterOutcome::Ongoing(_) => None,
            EncounterOutcome::Resolved(outcome) => Some(outcome),
        }
    }
}

/// What running away salvaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatOutcome {
    pub tier: Tier,
    pub enemy_index: u8,
    pub loot: KillLoot,
}

fn reject(action: &'static str, session: &CombatSession) -> EngineError {
    EngineError::InvalidTransition {
        action,
        phase: session.phase.name().to_string(),
    }
}

/// Starts a run: checks the perception gate, heals the user and the party
/// to full, and spawns the first enemy.
pub fn enter(
    user: &mut User,
    tier: Tier,
    kind: EncounterKind,
    now_ms: i64,
) -> Result<CombatSession> {
    let perception = effective_stats_at(user, now_ms).perception();
    let required = tier.config().perception_gate;
    if perception < required {
        return Err(EngineError::TierLocked {
            tier,
            required,
            actual: perception,
        });
    }

    heal_to_full(user, now_ms);
    for member in &mut user.party {
        member.restore();
    }

    let session = CombatSession::new(user.id.clone(), tier, kind, now_ms);
    info!(user = %user.id, %tier, ?kind, enemy = %session.enemy.name, "encounter started");
    Ok(session)
}

/// Declares an attack. No damage yet: a workout prompt is attached and the
/// session waits for confirmation.
pub fn attack(session: &mut CombatSession, rng: &mut impl Rng) -> Result<()> {
    if session.phase != SessionPhase::PlayerTurn {
        return Err(reject("attack", session));
    }
    session.phase = SessionPhase::AwaitingWorkout {
        prompt: random_workout_prompt(rng).to_string(),
    };
    Ok(())
}

pub fn cancel_workout(session: &mut CombatSession) -> Result<()> {
    if !session.is_awaiting_workout() {
        return Err(reject("cancel workout", session));
    }
    session.phase = SessionPhase::PlayerTurn;
    Ok(())
}

/// Lands the player's hit, then lets the living allies strike if the enemy
/// is still standing. A kill by either advances the run.
///
/// An ally kill in a standard dungeon ends in `EnemyDefeated` exactly like
/// a player kill, so no enemy turn follows it.
pub fn confirm_workout(
    user: &mut User,
    session: &mut CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> Result<TurnResult> {
    if !session.is_awaiting_workout() {
        return Err(reject("confirm workout", session));
    }

    let strength = effective_stats_at(user, ctx.now_ms).strength();
    let damage = rng.gen_range(0..PLAYER_DAMAGE_ROLL) + DAMAGE_PER_STRENGTH * strength;
    session.enemy.take_damage(damage);
    session.last_damage_dealt = Some(damage);
    session.last_ally_hits.clear();
    debug!(user = %user.id, damage, enemy_hp = session.enemy.current_hp, "player hit");

    if session.enemy.is_alive() {
        session.last_ally_hits = ally_attacks(&user.party, &mut session.enemy, rng);
    }

    if session.enemy.is_alive() {
        session.phase = SessionPhase::EnemyTurn;
        return Ok(TurnResult::Continue);
    }

    Ok(handle_kill(user, session, ctx, rng))
}

fn handle_kill(
    user: &mut User,
    session: &mut CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> TurnResult {
    session.monsters_killed += 1;
    session.enemy_index += 1;
    debug!(
        user = %user.id,
        enemy = %session.enemy.name,
        index = session.enemy_index,
        "enemy defeated"
    );

    let finished = match session.kind {
        EncounterKind::StandardDungeon => session.enemy_index >= ENCOUNTERS_PER_RUN,
        EncounterKind::SummonedBossFight => true,
    };
    if finished {
        TurnResult::Resolved(resolve_victory(user, session, ctx, rng))
    } else {
        session.phase = SessionPhase::EnemyDefeated;
        TurnResult::Continue
    }
}

/// Brings in the enemy at the current index.
pub fn next_enemy(session: &mut CombatSession) -> Result<()> {
    if session.phase != SessionPhase::EnemyDefeated {
        return Err(reject("advance", session));
    }
    session.enemy = spawn_enemy(session.tier, session.enemy_index);
    session.phase = SessionPhase::PlayerTurn;
    session.last_damage_dealt = None;
    session.last_ally_hits.clear();
    Ok(())
}

/// The enemy strikes; the hit is shared with living allies. Max HP is
/// settled against `now_ms` first so lapsed buffs stop counting.
pub fn enemy_turn(
    user: &mut User,
    session: &mut CombatSession,
    now_ms: i64,
    rng: &mut impl Rng,
) -> Result<TurnResult> {
    if session.phase != SessionPhase::EnemyTurn {
        return Err(reject("take enemy turn", session));
    }

    settle(user, now_ms);

    let total = rng.gen_range(0..ENEMY_DAMAGE_ROLL) + session.enemy.attack;
    let report = absorb_enemy_hit(&mut user.party, total);
    user.hp = user.hp.saturating_sub(report.player);
    debug!(user = %user.id, total, player = report.player, hp = user.hp, "enemy hit");

    if user.hp == 0 {
        info!(user = %user.id, tier = %session.tier, enemy = %session.enemy.name, "defeated");
        return Ok(TurnResult::Resolved(defeat_outcome(session, report)));
    }

    session.last_damage_taken = Some(report);
    session.phase = SessionPhase::PlayerTurn;
    Ok(TurnResult::Continue)
}

/// Abandons the run from any phase. Each kill so far earns one loot roll.
pub fn run_away(
    user: &mut User,
    session: &CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> RetreatOutcome {
    let loot = apply_kill_loot(user, session, ctx, rng);
    info!(user = %user.id, tier = %session.tier, kills = session.monsters_killed, "ran away");
    RetreatOutcome {
        tier: session.tier,
        enemy_index: session.enemy_index,
        loot,
    }
}
