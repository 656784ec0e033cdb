//! # Events
//!
//! Event payload structs and emit helpers for the `Round` contract.
//!
//! Every observable state transition publishes an event whose leading
//! topic is a `symbol_short!` tag and whose second topic is the round id,
//! so an off-chain indexer can filter by round without decoding payloads.
//! Payloads are `#[contracttype]` structs and round-trip through
//! `try_into_val` on the consumer side.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::types::{MilestoneStatus, Phase};

/// Round phase transition (`phase` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseChanged {
    pub round_id: u64,
    pub phase: Phase,
}

/// Investor added to the whitelist (`listed` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorWhitelisted {
    pub round_id: u64,
    pub investor: Address,
}

/// Accepted investment (`invested` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestmentMade {
    pub round_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub current_amount: i128,
}

/// Milestone moved Pending → Active (`activated` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneActivated {
    pub round_id: u64,
    pub milestone_id: u32,
    pub voting_start: u64,
}

/// One accepted jury vote (`voted` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JuryVoteCast {
    pub round_id: u64,
    pub milestone_id: u32,
    pub juror: Address,
    pub approve: bool,
    pub votes_for: u32,
    pub votes_against: u32,
}

/// Voting decided (`finalized` topic). `status` is Approved or Rejected.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VotingFinalized {
    pub round_id: u64,
    pub milestone_id: u32,
    pub status: MilestoneStatus,
    pub votes_for: u32,
    pub votes_against: u32,
}

/// Founder completed an approved milestone (`completed` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneCompleted {
    pub round_id: u64,
    pub milestone_id: u32,
    pub completed_at: u64,
}

/// Funds paid out for a completed milestone (`released` topic).
///
/// `amount` is the proportionally scaled payout, not the nominal
/// milestone amount.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsReleased {
    pub round_id: u64,
    pub milestone_id: u32,
    pub amount: i128,
}

/// Investor reclaimed part or all of their stake (`withdrawn` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestmentWithdrawn {
    pub round_id: u64,
    pub investor: Address,
    pub amount: i128,
}

/// Founder cancelled the round (`cancelled` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundCancelled {
    pub round_id: u64,
    pub founder: Address,
}

// ── Emit helpers ─────────────────────────────────────────────────────

pub fn emit_phase_changed(env: &Env, event: PhaseChanged) {
    env.events()
        .publish((symbol_short!("phase"), event.round_id), event);
}

pub fn emit_investor_whitelisted(env: &Env, event: InvestorWhitelisted) {
    env.events()
        .publish((symbol_short!("listed"), event.round_id), event);
}

pub fn emit_investment_made(env: &Env, event: InvestmentMade) {
    env.events()
        .publish((symbol_short!("invested"), event.round_id), event);
}

pub fn emit_milestone_activated(env: &Env, event: MilestoneActivated) {
    env.events()
        .publish((symbol_short!("activated"), event.round_id), event);
}

pub fn emit_jury_vote_cast(env: &Env, event: JuryVoteCast) {
    env.events()
        .publish((symbol_short!("voted"), event.round_id), event);
}

pub fn emit_voting_finalized(env: &Env, event: VotingFinalized) {
    env.events()
        .publish((symbol_short!("finalized"), event.round_id), event);
}

pub fn emit_milestone_completed(env: &Env, event: MilestoneCompleted) {
    env.events()
        .publish((symbol_short!("completed"), event.round_id), event);
}

pub fn emit_funds_released(env: &Env, event: FundsReleased) {
    env.events()
        .publish((symbol_short!("released"), event.round_id), event);
}

pub fn emit_investment_withdrawn(env: &Env, event: InvestmentWithdrawn) {
    env.events()
        .publish((symbol_short!("withdrawn"), event.round_id), event);
}

pub fn emit_round_cancelled(env: &Env, event: RoundCancelled) {
    env.events()
        .publish((symbol_short!("cancelled"), event.round_id), event);
}
