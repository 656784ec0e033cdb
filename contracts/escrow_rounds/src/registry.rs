//! # Registry
//!
//! The leaf contract of the pair: it owns the global juror whitelist and
//! the directory of rounds per founder and per investor.
//!
//! A `Round` consults the registry exactly twice in its life:
//!
//! 1. At construction, `is_juror` validates every milestone's jury
//!    wallets. Membership is frozen into the milestone from then on —
//!    revoking a juror here does not touch already-created milestones.
//! 2. On an investor's first investment, `record_participation` appends
//!    the round to the investor's list. The call is idempotent: repeats
//!    for the same investor/round pair are a no-op.
//!
//! `register_round` and `record_participation` authorize the *round
//! contract* itself: a direct cross-contract invocation satisfies
//! `round.require_auth()` through invoker auth, so no extra signer is
//! involved and third parties cannot pollute the lists.
//!
//! Registry storage lives entirely in [`RegistryKey`] inside this module;
//! the `Round` storage schema in `storage.rs` is untouched by it.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, Address,
    Env, Vec,
};

/// Errors returned by [`Registry`] entry points.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    /// Address already holds juror authorization.
    AlreadyJuror = 1,
    /// Address is not an authorized juror.
    JurorNotFound = 2,
    /// No round registered under the given id.
    RoundNotFound = 3,
}

// ── TTL Constants ────────────────────────────────────────────────────

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All registry storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistryKey {
    /// Administrator allowed to manage the juror set (Instance).
    Admin,
    /// Auto-increment round id counter (Instance).
    RoundCount,
    /// Juror authorization flag (Persistent).
    Juror(Address),
    /// Round contract address keyed by round id (Persistent).
    RoundAddr(u64),
    /// Round ids created by a founder, insertion order (Persistent).
    FounderRounds(Address),
    /// Round ids an investor has participated in, insertion order
    /// (Persistent).
    InvestorRounds(Address),
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &RegistryKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load_admin(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&RegistryKey::Admin)
        .expect("registry admin missing")
}

fn load_rounds(env: &Env, key: &RegistryKey) -> Vec<u64> {
    match env.storage().persistent().get(key) {
        Some(rounds) => {
            bump_persistent(env, key);
            rounds
        }
        None => Vec::new(env),
    }
}

/// Append `round_id` to the list under `key` unless already present.
/// Returns `true` when the list changed. The scan is O(n); lists hold a
/// handful of round ids.
fn append_round_unique(env: &Env, key: &RegistryKey, round_id: u64) -> bool {
    let mut rounds = load_rounds(env, key);
    if rounds.contains(round_id) {
        return false;
    }
    rounds.push_back(round_id);
    env.storage().persistent().set(key, &rounds);
    bump_persistent(env, key);
    true
}

#[contract]
pub struct Registry;

#[contractimpl]
impl Registry {
    /// Deploy-time initialisation; `admin` manages the juror set.
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&RegistryKey::Admin, &admin);
        env.storage().instance().set(&RegistryKey::RoundCount, &0u64);
        bump_instance(&env);
    }

    // ─────────────────────────────────────────────────────────
    // Juror administration
    // ─────────────────────────────────────────────────────────

    /// Authorize `juror` to sit on milestone juries created from now on.
    pub fn add_juror(env: Env, juror: Address) {
        let admin = load_admin(&env);
        admin.require_auth();

        let key = RegistryKey::Juror(juror.clone());
        if env.storage().persistent().get(&key).unwrap_or(false) {
            panic_with_error!(&env, RegistryError::AlreadyJuror);
        }
        env.storage().persistent().set(&key, &true);
        bump_persistent(&env, &key);

        env.events()
            .publish((symbol_short!("juror_add"),), juror);
    }

    /// Revoke `juror`'s authorization. Milestones that already froze the
    /// address keep it.
    pub fn remove_juror(env: Env, juror: Address) {
        let admin = load_admin(&env);
        admin.require_auth();

        let key = RegistryKey::Juror(juror.clone());
        if !env.storage().persistent().get(&key).unwrap_or(false) {
            panic_with_error!(&env, RegistryError::JurorNotFound);
        }
        env.storage().persistent().remove(&key);

        env.events()
            .publish((symbol_short!("juror_del"),), juror);
    }

    /// `true` if `address` currently holds juror authorization.
    pub fn is_juror(env: Env, address: Address) -> bool {
        let key = RegistryKey::Juror(address);
        match env.storage().persistent().get(&key) {
            Some(flag) => {
                bump_persistent(&env, &key);
                flag
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Round directory
    // ─────────────────────────────────────────────────────────

    /// Record a newly constructed round and hand back its id.
    ///
    /// Called by the round contract's constructor; `round` must be the
    /// calling contract, which satisfies `require_auth` via invoker auth.
    pub fn register_round(env: Env, founder: Address, round: Address) -> u64 {
        round.require_auth();
        bump_instance(&env);

        let round_id: u64 = env
            .storage()
            .instance()
            .get(&RegistryKey::RoundCount)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&RegistryKey::RoundCount, &(round_id + 1));

        let addr_key = RegistryKey::RoundAddr(round_id);
        env.storage().persistent().set(&addr_key, &round);
        bump_persistent(&env, &addr_key);

        append_round_unique(&env, &RegistryKey::FounderRounds(founder.clone()), round_id);

        env.events()
            .publish((symbol_short!("round_reg"), round_id), (founder, round));

        round_id
    }

    /// Record that `investor` participates in round `round_id`.
    ///
    /// Idempotent: a repeat call for the same pair changes nothing and
    /// emits nothing. Only the registered round contract may call.
    pub fn record_participation(env: Env, investor: Address, round_id: u64) {
        let round = Self::get_round_address(env.clone(), round_id);
        round.require_auth();

        let appended = append_round_unique(
            &env,
            &RegistryKey::InvestorRounds(investor.clone()),
            round_id,
        );
        if appended {
            env.events()
                .publish((symbol_short!("particip"), round_id), investor);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Address of the round contract registered under `round_id`.
    pub fn get_round_address(env: Env, round_id: u64) -> Address {
        let key = RegistryKey::RoundAddr(round_id);
        match env.storage().persistent().get(&key) {
            Some(addr) => {
                bump_persistent(&env, &key);
                addr
            }
            None => panic_with_error!(&env, RegistryError::RoundNotFound),
        }
    }

    /// Round ids created by `founder`, in creation order.
    pub fn get_founder_rounds(env: Env, founder: Address) -> Vec<u64> {
        load_rounds(&env, &RegistryKey::FounderRounds(founder))
    }

    /// Round ids `investor` has invested in, in first-investment order.
    pub fn get_investor_rounds(env: Env, investor: Address) -> Vec<u64> {
        load_rounds(&env, &RegistryKey::InvestorRounds(investor))
    }
}
