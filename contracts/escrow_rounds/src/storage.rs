//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the `Round`
//! contract. One contract instance holds exactly one round, so the
//! round-global entries sit in instance storage and the per-milestone /
//! per-investor entries sit in persistent storage:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type          | Description                         |
//! |------------------|---------------|-------------------------------------|
//! | `Config`         | `RoundConfig` | Immutable round configuration       |
//! | `State`          | `RoundState`  | Mutable funding/phase state         |
//! | `MilestoneCount` | `u32`         | Number of milestones (fixed)        |
//! | `Locked`         | `bool`        | Re-entrancy lock for transfer paths |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                    | Type        | Description                    |
//! |------------------------|-------------|--------------------------------|
//! | `Milestone(id)`        | `Milestone` | One entry per milestone        |
//! | `Investment(investor)` | `i128`      | Live investment per investor   |
//! | `Whitelisted(addr)`    | `bool`      | Investor eligibility flag      |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! ## Why per-entry milestones and investments?
//!
//! Votes and investments are the high-frequency writes. Rewriting a
//! round-sized blob on every vote is wasteful; a `Milestone` entry is a
//! few hundred bytes and an `Investment` entry a handful, so each
//! operation rewrites only what it touched.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Milestone, RoundConfig, RoundState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All `Round` contract storage keys.
///
/// Registry storage lives in `RegistryKey` inside `registry.rs`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable round configuration (Instance).
    Config,
    /// Mutable round state (Instance).
    State,
    /// Milestone count, written once by the constructor (Instance).
    MilestoneCount,
    /// Re-entrancy lock flag (Instance).
    Locked,
    /// Milestone record keyed by index (Persistent).
    Milestone(u32),
    /// Live investment amount keyed by investor (Persistent).
    Investment(Address),
    /// Whitelist flag keyed by investor (Persistent).
    Whitelisted(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Store the immutable round configuration. Written exactly once.
pub fn save_config(env: &Env, config: &RoundConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Retrieve the round configuration.
/// Panics if the constructor has not run, which cannot happen post-deploy.
pub fn load_config(env: &Env) -> RoundConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("round config missing")
}

/// Store the mutable round state.
pub fn save_state(env: &Env, state: &RoundState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

/// Retrieve the mutable round state.
pub fn load_state(env: &Env) -> RoundState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("round state missing")
}

/// Store the milestone count. Written exactly once by the constructor.
pub fn save_milestone_count(env: &Env, count: u32) {
    env.storage()
        .instance()
        .set(&DataKey::MilestoneCount, &count);
    bump_instance(env);
}

/// Retrieve the milestone count.
pub fn load_milestone_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::MilestoneCount)
        .unwrap_or(0)
}

// ── Re-entrancy lock ─────────────────────────────────────────────────

/// Whether a value-moving entry point is currently executing.
pub fn is_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
}

pub fn set_locked(env: &Env, locked: bool) {
    env.storage().instance().set(&DataKey::Locked, &locked);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save one milestone entry.
pub fn save_milestone(env: &Env, id: u32, milestone: &Milestone) {
    let key = DataKey::Milestone(id);
    env.storage().persistent().set(&key, milestone);
    bump_persistent(env, &key);
}

/// Load one milestone entry, or `None` for an out-of-range index.
pub fn load_milestone(env: &Env, id: u32) -> Option<Milestone> {
    let key = DataKey::Milestone(id);
    let milestone: Option<Milestone> = env.storage().persistent().get(&key);
    if milestone.is_some() {
        bump_persistent(env, &key);
    }
    milestone
}

/// Live investment for `investor`; 0 when the investor never invested or
/// has fully withdrawn.
pub fn load_investment(env: &Env, investor: &Address) -> i128 {
    let key = DataKey::Investment(investor.clone());
    match env.storage().persistent().get(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Store the live investment for `investor`.
pub fn save_investment(env: &Env, investor: &Address, amount: i128) {
    let key = DataKey::Investment(investor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

/// `true` once `investor` has ever invested in this round.
pub fn has_invested(env: &Env, investor: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Investment(investor.clone()))
}

/// Whitelist flag for `investor`.
pub fn is_whitelisted(env: &Env, investor: &Address) -> bool {
    let key = DataKey::Whitelisted(investor.clone());
    match env.storage().persistent().get(&key) {
        Some(flag) => {
            bump_persistent(env, &key);
            flag
        }
        None => false,
    }
}

/// Mark `investor` as whitelisted.
pub fn set_whitelisted(env: &Env, investor: &Address) {
    let key = DataKey::Whitelisted(investor.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
