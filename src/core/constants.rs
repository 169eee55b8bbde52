// Attributes
pub const NUM_ATTRIBUTES: usize = 5;
pub const BASE_ATTRIBUTE_VALUE: u32 = 20;
pub const ATTRIBUTE_POINTS_PER_LEVEL: i64 = 5;

// Health: 20 VIT = 100 HP, +/-5 HP per VIT away from 20
pub const BASE_MAX_HP: i64 = 100;
pub const HP_PER_VITALITY: i64 = 5;
pub const HP_BASELINE_VITALITY: i64 = 20;

// Starting purse for a freshly created user
pub const STARTING_COINS: u64 = 1000;

// XP and leveling: threshold for the next level is level * XP_PER_LEVEL
pub const XP_PER_LEVEL: u64 = 100;

// Equipment layout
pub const ARMOR_SLOTS: usize = 4;
pub const ACCESSORY_SLOTS: usize = 4;
pub const MAX_PARTY_SIZE: usize = 3;

// Encounter layout: three mobs then the boss at index 3
pub const MOBS_PER_RUN: usize = 3;
pub const BOSS_INDEX: u8 = 3;
pub const ENCOUNTERS_PER_RUN: u8 = 4;

// Enemy stats: base + per tier level step
pub const ENEMY_BASE_HP: u32 = 50;
pub const ENEMY_HP_PER_TIER: u32 = 25;
pub const ENEMY_BASE_ATTACK: u32 = 10;
pub const ENEMY_ATTACK_PER_TIER: u32 = 5;
pub const ENEMY_BASE_AGILITY: u32 = 5;
pub const ENEMY_AGILITY_PER_TIER: u32 = 2;
pub const BOSS_HP_MULTIPLIER: f64 = 1.5;
pub const BOSS_ATTACK_MULTIPLIER: f64 = 1.3;

// Combat rolls (exclusive upper bounds)
pub const PLAYER_DAMAGE_ROLL: u32 = 20;
pub const DAMAGE_PER_STRENGTH: u32 = 5;
pub const ALLY_DAMAGE_ROLL: u32 = 10;
pub const ENEMY_DAMAGE_ROLL: u32 = 15;

// Incoming damage split when allies are alive: player takes 2/5 (floor of 40%)
pub const PLAYER_SHARE_NUMERATOR: u32 = 2;
pub const PLAYER_SHARE_DENOMINATOR: u32 = 5;

// Party members
pub const ALLY_MAX_HP: u32 = 100;
pub const ALLY_BASE_ATTACK: u32 = 10;
pub const ALLY_ATTACK_PER_TIER: u32 = 5;

// Rarity multipliers, indexed by rarity ordinal (E, D, C, B, A, S)
pub const RARITY_MULTIPLIERS: [f64; 6] = [1.0, 1.5, 2.5, 4.0, 6.0, 10.0];

// Drop rarity cascade: (minimum tier level, roll threshold), checked in order
pub const DROP_RARITY_CASCADE: [(u8, f64); 5] =
    [(5, 0.05), (4, 0.10), (3, 0.20), (2, 0.40), (1, 0.60)];

// Shop pricing
pub const EQUIPMENT_BASE_PRICE: f64 = 50.0;
pub const POTION_BASE_PRICE: f64 = 25.0;
pub const PRICE_JITTER: f64 = 30.0;

// Kill loot: a kill drop pays 1..=tier coins / KILL_COIN_DIVISOR
pub const KILL_COIN_DIVISOR: u64 = 3;

// Chest contents
pub const CHEST_COIN_MULTIPLIER: u64 = 2;

// Open durations by tier: 1h, 2h, 4h, 8h, 12h, 24h
pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const CHEST_OPEN_DURATIONS_MS: [i64; 6] = [
    HOUR_MS,
    2 * HOUR_MS,
    4 * HOUR_MS,
    8 * HOUR_MS,
    12 * HOUR_MS,
    24 * HOUR_MS,
];
pub const DEBUG_CHEST_OPEN_MS: i64 = 10 * 1000;

// Sessions left alone this long are discarded
pub const SESSION_IDLE_TIMEOUT_MS: i64 = 30 * 60 * 1000;

// Snapshot file format
pub const SNAPSHOT_VERSION_MAGIC: u64 = 0x534F_4C4F_4153_0001;

pub const WORKOUT_PROMPTS: [&str; 8] = [
    "10 Push-ups",
    "15 Squats",
    "20 Jumping Jacks",
    "30 Second Plank",
    "5 Burpees",
    "25 Crunches",
    "15 Lunges",
    "10 Burpees",
];
