//! The engine service: owns the stores and serializes work per user.
//!
//! Every operation takes the user's lock for its whole read-modify-write
//! and works on copies pulled from the stores. Results are written back
//! only when the operation succeeds, so a rejected call never leaves a
//! partial update behind. Lock order is always user lock, then RNG.
//! Every load settles lapsed buffs first, so `max_hp` is never stale.
//! Lock entries exist only for stored users.

use super::clock::{Clock, SystemClock};
use super::store::{InMemoryStore, Store, StoreError};
use crate::character::attributes::{AttributeType, Attributes};
use crate::character::stats::{self, effective_stats_at};
use crate::character::user::User;
use crate::combat::encounter::{self, EncounterOutcome, RetreatOutcome, TurnResult};
use crate::combat::party::{BossAssignment, PartyMember};
use crate::combat::session::{CombatSession, EncounterKind};
use crate::core::config::EngineConfig;
use crate::core::constants::MAX_PARTY_SIZE;
use crate::core::error::{EngineError, Result};
use crate::core::ids::random_id;
use crate::dungeon::tiers::{available_tiers, Tier};
use crate::items::equipment::EquipSlot;
use crate::items::inventory::{self, PotionOutcome};
use crate::items::loot::{price_for, LootTable};
use crate::items::types::Item;
use crate::rewards::chest::{self, Chest, ChestGrant, ChestSource, ChestStatus};
use crate::rewards::resolver::RewardContext;
use crate::utils::persistence::{EngineSnapshot, SnapshotFile};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub struct Engine {
    users: Box<dyn Store<User>>,
    sessions: Box<dyn Store<CombatSession>>,
    table: LootTable,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    rng: Mutex<ChaCha8Rng>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine {
    /// In-memory stores on the system clock.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_parts(
            config,
            Box::new(InMemoryStore::new()),
            Box::new(InMemoryStore::new()),
            clock,
        )
    }

    pub fn with_parts(
        config: EngineConfig,
        users: Box<dyn Store<User>>,
        sessions: Box<dyn Store<CombatSession>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            users,
            sessions,
            table: LootTable::standard(),
            config,
            clock,
            rng: Mutex::new(rng),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loot_table(&self) -> &LootTable {
        &self.table
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ----- locking and store plumbing -----

    /// The lock for a stored user. Unknown ids get `UserNotFound` and no
    /// entry.
    fn user_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>> {
        if !self.users.contains(user_id)? {
            return Err(EngineError::UserNotFound(user_id.to_string()));
        }
        self.lock_entry(user_id)
    }

    /// The lock for `user_id`, created on first use. Only for callers about
    /// to store that user.
    fn lock_entry(&self, user_id: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .user_locks
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(locks.entry(user_id.to_string()).or_default().clone())
    }

    fn lock_rng(&self) -> Result<MutexGuard<'_, ChaCha8Rng>> {
        Ok(self.rng.lock().map_err(|_| StoreError::LockPoisoned)?)
    }

    fn load_user(&self, user_id: &str) -> Result<User> {
        self.users
            .get(user_id)?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))
    }

    /// [`Self::load_user`] with expired buffs pruned and `max_hp` recomputed
    /// for `now_ms`.
    fn load_settled(&self, user_id: &str, now_ms: i64) -> Result<User> {
        let mut user = self.load_user(user_id)?;
        stats::settle(&mut user, now_ms);
        Ok(user)
    }

    fn reward_context(&self, now_ms: i64) -> RewardContext<'_> {
        RewardContext {
            config: &self.config,
            table: &self.table,
            now_ms,
        }
    }

    /// The user's session, discarding it first if it sat idle too long.
    fn live_session(&self, user_id: &str, now_ms: i64) -> Result<Option<CombatSession>> {
        let Some(session) = self.sessions.get(user_id)? else {
            return Ok(None);
        };
        if session.is_idle(now_ms, self.config.session_idle_timeout_ms) {
            self.sessions.delete(user_id)?;
            warn!(user = %user_id, tier = %session.tier, "combat session expired");
            return Err(EngineError::SessionExpired);
        }
        Ok(Some(session))
    }

    /// Runs `op` on a copy of the user under the user's lock and stores the
    /// copy back only if `op` succeeds.
    fn with_user<R>(
        &self,
        user_id: &str,
        op: impl FnOnce(&mut User, &mut ChaCha8Rng, i64) -> Result<R>,
    ) -> Result<R> {
        let lock = self.user_lock(user_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let now_ms = self.clock.now_ms();
        let mut user = self.load_settled(user_id, now_ms)?;

        let result = {
            let mut rng = self.lock_rng()?;
            op(&mut user, &mut *rng, now_ms)?
        };
        self.users.put(user_id, user)?;
        Ok(result)
    }

    /// Like [`Self::with_user`] but for a combat action on the live session.
    fn with_session(
        &self,
        user_id: &str,
        op: impl FnOnce(
            &mut User,
            &mut CombatSession,
            RewardContext<'_>,
            &mut ChaCha8Rng,
        ) -> Result<TurnResult>,
    ) -> Result<EncounterOutcome> {
        let lock = self.user_lock(user_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let now_ms = self.clock.now_ms();
        let mut user = self.load_settled(user_id, now_ms)?;
        let mut session = self
            .live_session(user_id, now_ms)?
            .ok_or_else(|| EngineError::SessionNotFound(user_id.to_string()))?;

        let result = {
            let mut rng = self.lock_rng()?;
            op(
                &mut user,
                &mut session,
                self.reward_context(now_ms),
                &mut *rng,
            )?
        };

        match result {
            TurnResult::Continue => {
                session.touch(now_ms);
                self.sessions.put(user_id, session.clone())?;
                self.users.put(user_id, user)?;
                Ok(EncounterOutcome::Ongoing(session))
            }
            TurnResult::Resolved(outcome) => {
                self.sessions.delete(user_id)?;
                self.users.put(user_id, user)?;
                Ok(EncounterOutcome::Resolved(outcome))
            }
        }
    }

    // ----- users and stats -----

    /// Creates and stores a fresh user.
    pub fn create_user(&self, nickname: &str) -> Result<User> {
        let id = random_id(&mut *self.lock_rng()?);
        let user = User::with_id(id, nickname, self.clock.now_ms());
        let lock = self.lock_entry(&user.id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        self.users.put(&user.id, user.clone())?;
        info!(user = %user.id, nickname, "user created");
        Ok(user)
    }

    /// Stores a user built elsewhere, replacing any with the same id.
    pub fn insert_user(&self, user: User) -> Result<()> {
        let lock = self.lock_entry(&user.id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        self.users.put(&user.id, user.clone())?;
        Ok(())
    }

    /// A copy of the user as of now, with lapsed buffs already dropped.
    pub fn user(&self, user_id: &str) -> Result<User> {
        self.load_settled(user_id, self.clock.now_ms())
    }

    pub fn user_ids(&self) -> Result<Vec<String>> {
        Ok(self.users.ids()?)
    }

    /// Effective attributes right now, buffs included.
    pub fn effective_stats(&self, user_id: &str) -> Result<Attributes> {
        let user = self.load_user(user_id)?;
        Ok(effective_stats_at(&user, self.clock.now_ms()))
    }

    pub fn available_tiers(&self, user_id: &str) -> Result<Vec<Tier>> {
        let perception = self.effective_stats(user_id)?.perception();
        Ok(available_tiers(perception))
    }

    pub fn unspent_points(&self, user_id: &str) -> Result<u32> {
        Ok(stats::unspent_points(&self.load_user(user_id)?))
    }

    pub fn assign_point(&self, user_id: &str, attr: AttributeType) -> Result<u32> {
        self.with_user(user_id, |user, _, now_ms| {
            let value = stats::assign_point(user, attr)?;
            stats::refresh_max_hp(user, now_ms);
            Ok(value)
        })
    }

    /// Restores HP to the freshly computed maximum.
    pub fn rest(&self, user_id: &str) -> Result<u32> {
        self.with_user(user_id, |user, _, now_ms| {
            stats::heal_to_full(user, now_ms);
            Ok(user.hp)
        })
    }

    /// Clears today's completed tiers when the UTC day has turned over.
    pub fn daily_reset(&self, user_id: &str) -> Result<bool> {
        self.with_user(user_id, |user, _, now_ms| {
            Ok(user.dungeon_progress.roll_over(now_ms))
        })
    }

    // ----- inventory -----

    pub fn equip(&self, user_id: &str, item_id: &str) -> Result<Option<Item>> {
        self.with_user(user_id, |user, _, now_ms| {
            inventory::equip_item(user, item_id, now_ms)
        })
    }

    pub fn unequip(&self, user_id: &str, slot: EquipSlot) -> Result<Item> {
        self.with_user(user_id, |user, _, now_ms| {
            inventory::unequip_item(user, slot, now_ms)
        })
    }

    pub fn use_item(&self, user_id: &str, item_id: &str) -> Result<PotionOutcome> {
        self.with_user(user_id, |user, _, now_ms| {
            inventory::use_item(user, item_id, now_ms)
        })
    }

    /// Shop price with jitter, for the shop collaborator.
    pub fn price_for(&self, item: &Item) -> Result<u64> {
        let mut rng = self.lock_rng()?;
        Ok(price_for(item, &mut *rng))
    }

    // ----- party -----

    pub fn add_to_party(&self, user_id: &str, boss_id: &str) -> Result<PartyMember> {
        self.with_user(user_id, |user, _, _| {
            let boss = user
                .captured_boss(boss_id)
                .ok_or_else(|| EngineError::BossNotFound(boss_id.to_string()))?;
            if boss.assignment != BossAssignment::Reserve
                || user.party.iter().any(|m| m.id == boss_id)
            {
                return Err(EngineError::BossUnavailable);
            }
            if user.party.len() >= MAX_PARTY_SIZE {
                return Err(EngineError::PartyFull);
            }
            let member = PartyMember::from_boss(boss);
            user.party.push(member.clone());
            if let Some(boss) = user.captured_boss_mut(boss_id) {
                boss.assignment = BossAssignment::Party;
            }
            Ok(member)
        })
    }

    pub fn remove_from_party(&self, user_id: &str, boss_id: &str) -> Result<PartyMember> {
        self.with_user(user_id, |user, _, _| {
            let index = user
                .party
                .iter()
                .position(|m| m.id == boss_id)
                .ok_or_else(|| EngineError::BossNotFound(boss_id.to_string()))?;
            let member = user.party.remove(index);
            if let Some(boss) = user.captured_boss_mut(boss_id) {
                boss.assignment = BossAssignment::Reserve;
            }
            Ok(member)
        })
    }

    /// Sends a reserve boss on a mission, or calls it back.
    pub fn set_on_mission(&self, user_id: &str, boss_id: &str, on_mission: bool) -> Result<()> {
        self.with_user(user_id, |user, _, _| {
            let boss = user
                .captured_boss_mut(boss_id)
                .ok_or_else(|| EngineError::BossNotFound(boss_id.to_string()))?;
            boss.assignment = match (boss.assignment, on_mission) {
                (BossAssignment::Reserve, true) => BossAssignment::Mission,
                (BossAssignment::Mission, false) => BossAssignment::Reserve,
                _ => return Err(EngineError::BossUnavailable),
            };
            Ok(())
        })
    }

    // ----- combat -----

    /// The live session, if any. Expired sessions are discarded here too.
    pub fn session(&self, user_id: &str) -> Result<Option<CombatSession>> {
        let lock = self.user_lock(user_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        match self.live_session(user_id, self.clock.now_ms()) {
            Err(EngineError::SessionExpired) => Ok(None),
            other => other,
        }
    }

    pub fn enter_dungeon(&self, user_id: &str, tier: Tier) -> Result<CombatSession> {
        self.start_encounter(user_id, tier, EncounterKind::StandardDungeon)
    }

    /// Starts a one-fight session against the tier's boss.
    pub fn summon_boss(&self, user_id: &str, tier: Tier) -> Result<CombatSession> {
        self.start_encounter(user_id, tier, EncounterKind::SummonedBossFight)
    }

    fn start_encounter(
        &self,
        user_id: &str,
        tier: Tier,
        kind: EncounterKind,
    ) -> Result<CombatSession> {
        let lock = self.user_lock(user_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let now_ms = self.clock.now_ms();
        let mut user = self.load_settled(user_id, now_ms)?;

        match self.live_session(user_id, now_ms) {
            Ok(Some(_)) => return Err(EngineError::SessionActive),
            Ok(None) | Err(EngineError::SessionExpired) => {}
            Err(e) => return Err(e),
        }

        let session = encounter::enter(&mut user, tier, kind, now_ms)?;
        self.sessions.put(user_id, session.clone())?;
        self.users.put(user_id, user)?;
        Ok(session)
    }

    pub fn attack(&self, user_id: &str) -> Result<EncounterOutcome> {
        self.with_session(user_id, |_, session, _, rng| {
            encounter::attack(session, rng)?;
            Ok(TurnResult::Continue)
        })
    }

    /// An ally kill lands in `EnemyDefeated` just like a player kill.
    pub fn confirm_workout(&self, user_id: &str) -> Result<EncounterOutcome> {
        self.with_session(user_id, |user, session, ctx, rng| {
            encounter::confirm_workout(user, session, ctx, rng)
        })
    }

    pub fn cancel_workout(&self, user_id: &str) -> Result<EncounterOutcome> {
        self.with_session(user_id, |_, session, _, _| {
            encounter::cancel_workout(session)?;
            Ok(TurnResult::Continue)
        })
    }

    pub fn next_enemy(&self, user_id: &str) -> Result<EncounterOutcome> {
        self.with_session(user_id, |_, session, _, _| {
            encounter::next_enemy(session)?;
            Ok(TurnResult::Continue)
        })
    }

    pub fn enemy_turn(&self, user_id: &str) -> Result<EncounterOutcome> {
        self.with_session(user_id, |user, session, ctx, rng| {
            encounter::enemy_turn(user, session, ctx.now_ms, rng)
        })
    }

    /// Leaves the run from any phase and discards the session.
    pub fn run_away(&self, user_id: &str) -> Result<RetreatOutcome> {
        let lock = self.user_lock(user_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let now_ms = self.clock.now_ms();
        let mut user = self.load_settled(user_id, now_ms)?;
        let session = self
            .live_session(user_id, now_ms)?
            .ok_or_else(|| EngineError::SessionNotFound(user_id.to_string()))?;

        let retreat = {
            let mut rng = self.lock_rng()?;
            encounter::run_away(&mut user, &session, self.reward_context(now_ms), &mut *rng)
        };
        self.sessions.delete(user_id)?;
        self.users.put(user_id, user)?;
        Ok(retreat)
    }

    /// Discards every session idle past the timeout. Returns how many went.
    pub fn sweep_idle_sessions(&self) -> Result<usize> {
        let mut expired = 0;
        for user_id in self.sessions.ids()? {
            let lock = match self.user_lock(&user_id) {
                Ok(lock) => lock,
                Err(EngineError::UserNotFound(_)) => {
                    self.sessions.delete(&user_id)?;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
            if let Err(EngineError::SessionExpired) =
                self.live_session(&user_id, self.clock.now_ms())
            {
                expired += 1;
            }
        }
        if expired > 0 {
            info!(expired, "swept idle sessions");
        }
        Ok(expired)
    }

    // ----- chests -----

    /// Mints a chest for the user, e.g. for a completed daily task.
    pub fn mint_chest(&self, user_id: &str, tier: Tier, source: ChestSource) -> Result<Chest> {
        self.with_user(user_id, |user, rng, now_ms| {
            let chest = chest::mint(tier, source, &self.config, &self.table, now_ms, rng);
            user.chests.push(chest.clone());
            debug!(user = %user.id, chest = %chest.id, %tier, ?source, "chest minted");
            Ok(chest)
        })
    }

    pub fn chest_status(&self, user_id: &str, chest_id: &str) -> Result<ChestStatus> {
        let user = self.load_user(user_id)?;
        let chest = user
            .chest(chest_id)
            .ok_or_else(|| EngineError::ChestNotFound(chest_id.to_string()))?;
        Ok(chest.status(self.clock.now_ms()))
    }

    pub fn start_opening(&self, user_id: &str, chest_id: &str) -> Result<ChestStatus> {
        self.with_user(user_id, |user, _, now_ms| {
            chest::start_opening(user, chest_id, now_ms)
        })
    }

    /// Grants a ready chest. Two racing calls cannot both succeed: the
    /// second finds the chest already gone.
    pub fn try_open(&self, user_id: &str, chest_id: &str) -> Result<ChestGrant> {
        self.with_user(user_id, |user, _, now_ms| {
            let grant = chest::try_open(user, chest_id, now_ms)?;
            info!(
                user = %user.id,
                chest = %grant.chest_id,
                coins = grant.coins,
                xp = grant.xp,
                items = grant.items.len(),
                "chest opened"
            );
            Ok(grant)
        })
    }

    // ----- durability -----

    /// Copies every user and session. Each record is read whole, but the
    /// set as a whole is not frozen against concurrent writers.
    pub fn snapshot(&self) -> Result<EngineSnapshot> {
        let mut users = Vec::new();
        for id in self.users.ids()? {
            if let Some(user) = self.users.get(&id)? {
                users.push(user);
            }
        }
        let mut sessions = Vec::new();
        for id in self.sessions.ids()? {
            if let Some(session) = self.sessions.get(&id)? {
                sessions.push(session);
            }
        }
        Ok(EngineSnapshot {
            saved_at_ms: self.clock.now_ms(),
            users,
            sessions,
        })
    }

    /// Loads users and sessions from a snapshot, replacing same-id records.
    /// Each user is written together with its session under that user's
    /// lock, so a restore never interleaves with a running operation.
    pub fn restore(&self, snapshot: EngineSnapshot) -> Result<()> {
        let (users, sessions) = (snapshot.users.len(), snapshot.sessions.len());
        let mut pending: HashMap<String, CombatSession> = snapshot
            .sessions
            .into_iter()
            .map(|session| (session.user_id.clone(), session))
            .collect();

        for user in snapshot.users {
            let user_id = user.id.clone();
            let lock = self.lock_entry(&user_id)?;
            let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
            self.users.put(&user_id, user)?;
            if let Some(session) = pending.remove(&user_id) {
                self.sessions.put(&user_id, session)?;
            }
        }

        // sessions whose user was not in the snapshot
        for (user_id, session) in pending {
            let lock = match self.user_lock(&user_id) {
                Ok(lock) => lock,
                Err(EngineError::UserNotFound(_)) => {
                    warn!(user = %user_id, "dropping snapshot session without a user");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
            self.sessions.put(&user_id, session)?;
        }
        info!(users, sessions, "snapshot restored");
        Ok(())
    }

    pub fn save_to(&self, file: &SnapshotFile) -> Result<()> {
        file.save(&self.snapshot()?)?;
        Ok(())
    }

    pub fn load_from(&self, file: &SnapshotFile) -> Result<()> {
        self.restore(file.load()?)
    }
}
