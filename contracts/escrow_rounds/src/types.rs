//! # Types
//!
//! Shared data structures used across both contracts of the escrow rounds
//! crate.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Round` is internally stored as two separate ledger entries:
//!
//! - [`RoundConfig`] — written once by the constructor; never mutated.
//! - [`RoundState`] — written on every investment, phase change, and
//!   release.
//!
//! Milestones and per-investor investment records live in their own
//! persistent entries so that a vote or a deposit only rewrites the entry
//! it touches. The public API exposes the reconstructed [`RoundSummary`]
//! struct for convenience.
//!
//! ### Phase as a Finite-State Machine
//!
//! [`Phase`] enforces a strict forward-only round lifecycle:
//!
//! ```text
//! Funding ──► Execution ──► Completed
//!     └──────────┴──► Cancelled
//! ```
//!
//! Funding → Execution happens exactly once (full funding, or a forced
//! transition after the deadline). Cancelled is reachable from any
//! non-Completed phase; Completed and Cancelled are terminal.
//!
//! ### Milestone status as a Finite-State Machine
//!
//! ```text
//! Pending ──► Active ──► Approved ──► Completed
//!                 └─────► Rejected
//! ```
//!
//! Rejected is terminal. Completed is terminal for the status machine;
//! the separate `funds_released` flag gates the one-shot payout.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Coarse lifecycle phase of a round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Accepting investments from whitelisted investors.
    Funding,
    /// Target reached or deadline forced; milestones run their course.
    Execution,
    /// Every milestone reached a terminal disposition.
    Completed,
    /// Founder pulled the escape valve; only withdrawals and releases of
    /// already-completed milestones remain.
    Cancelled,
}

/// Fine-grained lifecycle of a single milestone.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MilestoneStatus {
    /// Deadline not yet triggered.
    Pending,
    /// Voting window open.
    Active,
    /// Majority approved; awaiting founder completion.
    Approved,
    /// Majority rejected (ties reject). Terminal.
    Rejected,
    /// Founder marked the approved milestone done; release may follow.
    Completed,
}

/// Constructor input for one milestone.
///
/// Validated in the Round constructor: positive amount, deadline strictly
/// after the funding deadline, exactly `JURY_SIZE` jury wallets each
/// authorized by the registry at that moment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneInput {
    pub description: String,
    pub funding_amount: i128,
    pub deadline: u64,
    pub jury: Vec<Address>,
}

/// A milestone as stored on-chain, one persistent entry per milestone.
///
/// `jury` is frozen at construction; votes are checked against this list,
/// never against the live registry. `voted` holds the jurors that have
/// voted (at most `JURY_SIZE` entries). `voting_start` and `completed_at`
/// are 0 until the corresponding transition happens.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub description: String,
    pub funding_amount: i128,
    pub deadline: u64,
    pub jury: Vec<Address>,
    pub status: MilestoneStatus,
    pub votes_for: u32,
    pub votes_against: u32,
    pub voted: Vec<Address>,
    pub voting_start: u64,
    pub completed_at: u64,
    pub funds_released: bool,
}

/// Immutable round configuration, written once by the constructor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundConfig {
    /// Identifier assigned by the registry.
    pub round_id: u64,
    /// Registry contract this round reports participation to.
    pub registry: Address,
    /// Address that created the round and receives released funds.
    pub founder: Address,
    /// SAC token address the round is denominated in.
    pub funding_token: Address,
    /// Funding target; equals the sum of all milestone amounts.
    pub target_amount: i128,
    /// Ledger timestamp closing the funding window.
    pub funding_deadline: u64,
}

/// Mutable round state, updated on investments, phase changes, releases.
///
/// `current_amount` is the historical funding level: it never decreases
/// once Execution begins and serves as the proportional-release
/// denominator. `total_released` accumulates the *nominal* funding
/// amounts of released milestones; the scaled equivalent is derived where
/// needed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundState {
    pub current_amount: i128,
    pub total_released: i128,
    pub phase: Phase,
}

/// Full round view returned by `get_round`.
///
/// Reconstructed from the split `RoundConfig` + `RoundState` entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundSummary {
    pub round_id: u64,
    pub founder: Address,
    pub funding_token: Address,
    pub target_amount: i128,
    pub funding_deadline: u64,
    pub current_amount: i128,
    pub total_released: i128,
    pub phase: Phase,
    pub milestone_count: u32,
}
