//! # Escrow Rounds Contract
//!
//! Root crate of the **milestone escrow rounds** system. It exposes two
//! Soroban contracts:
//!
//! - [`Registry`] — the leaf: global juror whitelist plus the directory
//!   of rounds per founder and per investor (see `registry.rs`).
//! - [`Round`] — the core: one contract instance per funding campaign,
//!   fully initialised by its constructor. Entry points cover the whole
//!   round lifecycle:
//!
//! | Stage       | Entry point(s)                                        |
//! |-------------|-------------------------------------------------------|
//! | Funding     | [`Round::whitelist_investor`], [`Round::invest`], [`Round::move_to_execution`] |
//! | Voting      | [`Round::trigger_milestone_deadline`], [`Round::cast_jury_vote`], [`Round::finalize_milestone_voting`] |
//! | Delivery    | [`Round::complete_milestone`], [`Round::release_funds`] |
//! | Exit        | [`Round::withdraw_investment`], [`Round::cancel_round`] |
//! | Queries     | `get_round`, `get_milestone`, `get_investment`, `is_whitelisted`, `calculate_withdrawable` |
//!
//! ## Architecture
//!
//! Storage access is fully delegated to [`storage`], event emission to
//! [`events`], shared data shapes to [`types`]. This file holds the entry
//! points, the guard logic, and the proportional arithmetic.
//!
//! The registry is consulted at exactly two points: jury validation in
//! the constructor (after which jury membership is frozen per milestone)
//! and participation recording on an investor's first investment.
//!
//! ## Accounting model
//!
//! `current_amount` is the historical funding level; once Execution
//! starts it never changes and acts as the denominator for every
//! proportional computation. A released milestone pays out
//! `funding_amount * current_amount / target_amount` (floor), and an
//! investor can always reclaim their share of whatever has not left
//! custody. Floor-division dust stays in custody and is not tracked.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, Vec,
};

mod events;
pub mod registry;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_withdrawals;

use events::{
    emit_funds_released, emit_investment_made, emit_investment_withdrawn,
    emit_investor_whitelisted, emit_jury_vote_cast, emit_milestone_activated,
    emit_milestone_completed, emit_phase_changed, emit_round_cancelled, emit_voting_finalized,
    FundsReleased, InvestmentMade, InvestmentWithdrawn, InvestorWhitelisted, JuryVoteCast,
    MilestoneActivated, MilestoneCompleted, PhaseChanged, RoundCancelled, VotingFinalized,
};
use registry::RegistryClient;
pub use registry::{Registry, RegistryError};
pub use types::{
    Milestone, MilestoneInput, MilestoneStatus, Phase, RoundConfig, RoundState, RoundSummary,
};

/// Number of jury wallets per milestone. The majority test below is a
/// strict greater-than on votes cast; changing the jury size changes
/// that arithmetic.
pub const JURY_SIZE: u32 = 3;

/// Window after activation during which jurors may vote, in seconds.
pub const VOTING_PERIOD: u64 = 7 * 24 * 60 * 60;

/// Cooling-off between milestone completion and fund release, in seconds.
pub const VERIFICATION_DELAY: u64 = 24 * 60 * 60;

/// Errors returned by [`Round`] entry points.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller is not on the round's investor whitelist.
    NotWhitelisted = 1,
    /// Investor already whitelisted.
    AlreadyWhitelisted = 2,
    /// Operation not valid in the round's current phase.
    InvalidPhase = 3,
    /// Funding window has closed.
    FundingDeadlinePassed = 4,
    /// Funding window is still open.
    FundingDeadlineNotReached = 5,
    /// Amount must be positive.
    InvalidAmount = 6,
    /// Investment would push the round past its target.
    ExceedsTarget = 7,
    /// No milestone at the given index.
    MilestoneNotFound = 8,
    /// Milestone is not in the status the operation requires.
    InvalidMilestoneStatus = 9,
    /// Milestone deadline has not arrived yet.
    MilestoneDeadlineNotReached = 10,
    /// Caller is not on this milestone's jury.
    NotJuror = 11,
    /// Juror already voted on this milestone.
    AlreadyVoted = 12,
    /// Voting window has closed.
    VotingPeriodEnded = 13,
    /// Voting window is still open.
    VotingPeriodNotEnded = 14,
    /// Milestone funds were already released.
    FundsAlreadyReleased = 15,
    /// Verification delay since completion has not elapsed.
    VerificationDelayNotElapsed = 16,
    /// Caller holds no investment in this round.
    NoInvestment = 17,
    /// Nothing is withdrawable in the current round state.
    NothingToWithdraw = 18,
    /// The founder cannot be whitelisted as an investor.
    FounderCannotInvest = 19,
    /// Forced transition requires at least one live investment.
    NoFundsRaised = 20,
    /// Deadline ordering constraint violated.
    InvalidDeadline = 21,
    /// A milestone must carry exactly `JURY_SIZE` jury wallets.
    InvalidJurySize = 22,
    /// A jury wallet is not an authorized juror in the registry.
    UnauthorizedJuror = 23,
    /// Milestone amounts must sum to the funding target.
    MilestoneSumMismatch = 24,
    /// A round needs at least one milestone.
    NoMilestones = 25,
    /// Proportional arithmetic exceeded i128 range.
    ArithmeticOverflow = 26,
    /// Nested call into a value-moving entry point.
    ReentrantCall = 27,
}

#[contract]
pub struct Round;

#[contractimpl]
impl Round {
    // ─────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────

    /// Create a fully initialised round.
    ///
    /// Validates the schedule (positive target, future funding deadline,
    /// milestone deadlines strictly after it, amounts summing exactly to
    /// the target, exactly [`JURY_SIZE`] registry-authorized jurors per
    /// milestone), registers the round with `registry`, and persists
    /// every milestone as `Pending`. The round is never observable in a
    /// partially constructed state.
    pub fn __constructor(
        env: Env,
        registry: Address,
        founder: Address,
        funding_token: Address,
        target_amount: i128,
        funding_deadline: u64,
        milestones: Vec<MilestoneInput>,
    ) {
        if target_amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let now = env.ledger().timestamp();
        if funding_deadline <= now {
            panic_with_error!(&env, Error::InvalidDeadline);
        }
        if milestones.is_empty() {
            panic_with_error!(&env, Error::NoMilestones);
        }

        let registry_client = RegistryClient::new(&env, &registry);

        let mut sum: i128 = 0;
        for input in milestones.iter() {
            if input.funding_amount <= 0 {
                panic_with_error!(&env, Error::InvalidAmount);
            }
            if input.deadline <= funding_deadline {
                panic_with_error!(&env, Error::InvalidDeadline);
            }
            if input.jury.len() != JURY_SIZE {
                panic_with_error!(&env, Error::InvalidJurySize);
            }
            for juror in input.jury.iter() {
                if !registry_client.is_juror(&juror) {
                    panic_with_error!(&env, Error::UnauthorizedJuror);
                }
            }
            sum = sum
                .checked_add(input.funding_amount)
                .unwrap_or_else(|| panic_with_error!(&env, Error::ArithmeticOverflow));
        }
        if sum != target_amount {
            panic_with_error!(&env, Error::MilestoneSumMismatch);
        }

        let round_id =
            registry_client.register_round(&founder, &env.current_contract_address());

        storage::save_config(
            &env,
            &RoundConfig {
                round_id,
                registry,
                founder,
                funding_token,
                target_amount,
                funding_deadline,
            },
        );
        storage::save_state(
            &env,
            &RoundState {
                current_amount: 0,
                total_released: 0,
                phase: Phase::Funding,
            },
        );
        storage::save_milestone_count(&env, milestones.len());

        for (i, input) in milestones.iter().enumerate() {
            storage::save_milestone(
                &env,
                i as u32,
                &Milestone {
                    description: input.description,
                    funding_amount: input.funding_amount,
                    deadline: input.deadline,
                    jury: input.jury,
                    status: MilestoneStatus::Pending,
                    votes_for: 0,
                    votes_against: 0,
                    voted: Vec::new(&env),
                    voting_start: 0,
                    completed_at: 0,
                    funds_released: false,
                },
            );
        }
    }

    // ─────────────────────────────────────────────────────────
    // Funding phase
    // ─────────────────────────────────────────────────────────

    /// Make `investor` eligible to invest. Founder only, Funding phase
    /// only; the founder cannot whitelist themselves.
    pub fn whitelist_investor(env: Env, investor: Address) {
        let config = storage::load_config(&env);
        config.founder.require_auth();

        let state = storage::load_state(&env);
        if state.phase != Phase::Funding {
            panic_with_error!(&env, Error::InvalidPhase);
        }
        if investor == config.founder {
            panic_with_error!(&env, Error::FounderCannotInvest);
        }
        if storage::is_whitelisted(&env, &investor) {
            panic_with_error!(&env, Error::AlreadyWhitelisted);
        }

        storage::set_whitelisted(&env, &investor);
        emit_investor_whitelisted(
            &env,
            InvestorWhitelisted {
                round_id: config.round_id,
                investor,
            },
        );
    }

    /// Pull `amount` of the funding token from `investor` into custody.
    ///
    /// The investor's first investment in the round is reported to the
    /// registry (idempotent on that side). Reaching the target flips the
    /// phase to Execution in the same call.
    pub fn invest(env: Env, investor: Address, amount: i128) {
        investor.require_auth();
        lock(&env);

        let config = storage::load_config(&env);
        let mut state = storage::load_state(&env);

        if !storage::is_whitelisted(&env, &investor) {
            panic_with_error!(&env, Error::NotWhitelisted);
        }
        if state.phase != Phase::Funding {
            panic_with_error!(&env, Error::InvalidPhase);
        }
        let now = env.ledger().timestamp();
        if now > config.funding_deadline {
            panic_with_error!(&env, Error::FundingDeadlinePassed);
        }
        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let new_total = state
            .current_amount
            .checked_add(amount)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ArithmeticOverflow));
        if new_total > config.target_amount {
            panic_with_error!(&env, Error::ExceedsTarget);
        }

        let first_investment = !storage::has_invested(&env, &investor);

        // Effects before the external transfer.
        let invested = storage::load_investment(&env, &investor);
        storage::save_investment(&env, &investor, invested + amount);
        state.current_amount = new_total;
        let target_reached = new_total == config.target_amount;
        if target_reached {
            state.phase = Phase::Execution;
        }
        storage::save_state(&env, &state);

        if first_investment {
            RegistryClient::new(&env, &config.registry)
                .record_participation(&investor, &config.round_id);
        }

        token::Client::new(&env, &config.funding_token).transfer(
            &investor,
            &env.current_contract_address(),
            &amount,
        );

        emit_investment_made(
            &env,
            InvestmentMade {
                round_id: config.round_id,
                investor,
                amount,
                current_amount: new_total,
            },
        );
        if target_reached {
            emit_phase_changed(
                &env,
                PhaseChanged {
                    round_id: config.round_id,
                    phase: Phase::Execution,
                },
            );
        }

        unlock(&env);
    }

    /// Force Funding → Execution after the deadline under partial
    /// funding. Callable by anyone so a stalled round cannot sit on a
    /// specific actor.
    pub fn move_to_execution(env: Env) {
        let config = storage::load_config(&env);
        let mut state = storage::load_state(&env);

        if state.phase != Phase::Funding {
            panic_with_error!(&env, Error::InvalidPhase);
        }
        if env.ledger().timestamp() <= config.funding_deadline {
            panic_with_error!(&env, Error::FundingDeadlineNotReached);
        }
        if state.current_amount <= 0 {
            panic_with_error!(&env, Error::NoFundsRaised);
        }

        state.phase = Phase::Execution;
        storage::save_state(&env, &state);
        emit_phase_changed(
            &env,
            PhaseChanged {
                round_id: config.round_id,
                phase: Phase::Execution,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Milestone voting
    // ─────────────────────────────────────────────────────────

    /// Open the voting window on a milestone whose deadline has arrived.
    /// Callable by anyone; the founder cannot stall a milestone by
    /// withholding the trigger.
    pub fn trigger_milestone_deadline(env: Env, milestone_id: u32) {
        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        if state.phase != Phase::Execution {
            panic_with_error!(&env, Error::InvalidPhase);
        }

        let mut milestone = load_milestone(&env, milestone_id);
        if milestone.status != MilestoneStatus::Pending {
            panic_with_error!(&env, Error::InvalidMilestoneStatus);
        }
        let now = env.ledger().timestamp();
        if now < milestone.deadline {
            panic_with_error!(&env, Error::MilestoneDeadlineNotReached);
        }

        milestone.status = MilestoneStatus::Active;
        milestone.voting_start = now;
        storage::save_milestone(&env, milestone_id, &milestone);

        emit_milestone_activated(
            &env,
            MilestoneActivated {
                round_id: config.round_id,
                milestone_id,
                voting_start: now,
            },
        );
    }

    /// Record one jury vote. `juror` must be on the milestone's frozen
    /// jury list; the live registry is not consulted. The third vote
    /// finalizes the milestone in the same call.
    pub fn cast_jury_vote(env: Env, juror: Address, milestone_id: u32, approve: bool) {
        juror.require_auth();

        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        if state.phase != Phase::Execution {
            panic_with_error!(&env, Error::InvalidPhase);
        }

        let mut milestone = load_milestone(&env, milestone_id);
        if milestone.status != MilestoneStatus::Active {
            panic_with_error!(&env, Error::InvalidMilestoneStatus);
        }
        if !milestone.jury.contains(&juror) {
            panic_with_error!(&env, Error::NotJuror);
        }
        if env.ledger().timestamp() > milestone.voting_start + VOTING_PERIOD {
            panic_with_error!(&env, Error::VotingPeriodEnded);
        }
        if milestone.voted.contains(&juror) {
            panic_with_error!(&env, Error::AlreadyVoted);
        }

        milestone.voted.push_back(juror.clone());
        if approve {
            milestone.votes_for += 1;
        } else {
            milestone.votes_against += 1;
        }

        emit_jury_vote_cast(
            &env,
            JuryVoteCast {
                round_id: config.round_id,
                milestone_id,
                juror,
                approve,
                votes_for: milestone.votes_for,
                votes_against: milestone.votes_against,
            },
        );

        let all_voted = milestone.votes_for + milestone.votes_against == JURY_SIZE;
        if all_voted {
            finalize_votes(&env, config.round_id, milestone_id, &mut milestone);
        }
        storage::save_milestone(&env, milestone_id, &milestone);

        if all_voted && milestone.status == MilestoneStatus::Rejected {
            settle_round_if_done(&env, &config);
        }
    }

    /// Finalize voting after the window closed, on however many votes
    /// were cast. Callable by anyone; guarantees liveness with absent
    /// jurors.
    pub fn finalize_milestone_voting(env: Env, milestone_id: u32) {
        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        if state.phase != Phase::Execution {
            panic_with_error!(&env, Error::InvalidPhase);
        }

        let mut milestone = load_milestone(&env, milestone_id);
        if milestone.status != MilestoneStatus::Active {
            panic_with_error!(&env, Error::InvalidMilestoneStatus);
        }
        if env.ledger().timestamp() <= milestone.voting_start + VOTING_PERIOD {
            panic_with_error!(&env, Error::VotingPeriodNotEnded);
        }

        finalize_votes(&env, config.round_id, milestone_id, &mut milestone);
        storage::save_milestone(&env, milestone_id, &milestone);

        if milestone.status == MilestoneStatus::Rejected {
            settle_round_if_done(&env, &config);
        }
    }

    /// Mark an approved milestone as delivered. Founder only. Starts the
    /// verification delay clock.
    pub fn complete_milestone(env: Env, milestone_id: u32) {
        let config = storage::load_config(&env);
        config.founder.require_auth();

        let state = storage::load_state(&env);
        if state.phase != Phase::Execution {
            panic_with_error!(&env, Error::InvalidPhase);
        }

        let mut milestone = load_milestone(&env, milestone_id);
        if milestone.status != MilestoneStatus::Approved {
            panic_with_error!(&env, Error::InvalidMilestoneStatus);
        }

        let now = env.ledger().timestamp();
        milestone.status = MilestoneStatus::Completed;
        milestone.completed_at = now;
        storage::save_milestone(&env, milestone_id, &milestone);

        emit_milestone_completed(
            &env,
            MilestoneCompleted {
                round_id: config.round_id,
                milestone_id,
                completed_at: now,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Fund release
    // ─────────────────────────────────────────────────────────

    /// Pay out a completed milestone after the verification delay.
    ///
    /// The payout is proportional to achieved funding:
    /// `funding_amount * current_amount / target_amount`, floored. Gated
    /// on milestone status, not phase, so it stays reachable after
    /// cancellation. One-shot per milestone.
    pub fn release_funds(env: Env, milestone_id: u32) {
        let config = storage::load_config(&env);
        config.founder.require_auth();
        lock(&env);

        let mut state = storage::load_state(&env);
        let mut milestone = load_milestone(&env, milestone_id);

        if milestone.status != MilestoneStatus::Completed {
            panic_with_error!(&env, Error::InvalidMilestoneStatus);
        }
        if milestone.funds_released {
            panic_with_error!(&env, Error::FundsAlreadyReleased);
        }
        if env.ledger().timestamp() < milestone.completed_at + VERIFICATION_DELAY {
            panic_with_error!(&env, Error::VerificationDelayNotElapsed);
        }

        let release_amount = mul_div_floor(
            &env,
            milestone.funding_amount,
            state.current_amount,
            config.target_amount,
        );

        milestone.funds_released = true;
        storage::save_milestone(&env, milestone_id, &milestone);
        state.total_released += milestone.funding_amount;
        storage::save_state(&env, &state);

        settle_round_if_done(&env, &config);

        token::Client::new(&env, &config.funding_token).transfer(
            &env.current_contract_address(),
            &config.founder,
            &release_amount,
        );

        emit_funds_released(
            &env,
            FundsReleased {
                round_id: config.round_id,
                milestone_id,
                amount: release_amount,
            },
        );

        unlock(&env);
    }

    // ─────────────────────────────────────────────────────────
    // Withdrawal
    // ─────────────────────────────────────────────────────────

    /// Withdrawable share of `investor`'s stake right now. Pure view.
    ///
    /// During a live funding window nothing is withdrawable. After a
    /// failed funding window the full remaining investment is. In every
    /// later phase the investor owns their proportional share of the
    /// funds that have not physically left custody.
    pub fn calculate_withdrawable(env: Env, investor: Address) -> i128 {
        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        let invested = storage::load_investment(&env, &investor);
        withdrawable_amount(&env, &config, &state, invested)
    }

    /// Withdraw up to `amount` of the caller's withdrawable share;
    /// `amount == 0` means "withdraw all".
    ///
    /// The stored investment shrinks *proportionally*, not by flat
    /// subtraction: withdrawable is itself the unreleased fraction of the
    /// investment, so a full withdrawal must zero the record exactly and
    /// a partial one must scale the remaining claim.
    pub fn withdraw_investment(env: Env, investor: Address, amount: i128) {
        investor.require_auth();
        lock(&env);

        if amount < 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        let invested = storage::load_investment(&env, &investor);
        if invested == 0 {
            panic_with_error!(&env, Error::NoInvestment);
        }

        let withdrawable = withdrawable_amount(&env, &config, &state, invested);
        if withdrawable == 0 {
            panic_with_error!(&env, Error::NothingToWithdraw);
        }

        let actual = if amount == 0 {
            withdrawable
        } else {
            amount.min(withdrawable)
        };

        let reduction = mul_div_floor(&env, actual, invested, withdrawable);
        storage::save_investment(&env, &investor, invested - reduction);

        token::Client::new(&env, &config.funding_token).transfer(
            &env.current_contract_address(),
            &investor,
            &actual,
        );

        emit_investment_withdrawn(
            &env,
            InvestmentWithdrawn {
                round_id: config.round_id,
                investor,
                amount: actual,
            },
        );

        unlock(&env);
    }

    // ─────────────────────────────────────────────────────────
    // Cancellation
    // ─────────────────────────────────────────────────────────

    /// One-way escape valve: drop the round into Cancelled from any
    /// non-terminal phase. Investments, triggering, voting, and
    /// completion all shut down; withdrawal and release of
    /// already-completed milestones remain.
    pub fn cancel_round(env: Env) {
        let config = storage::load_config(&env);
        config.founder.require_auth();

        let mut state = storage::load_state(&env);
        if state.phase == Phase::Completed || state.phase == Phase::Cancelled {
            panic_with_error!(&env, Error::InvalidPhase);
        }

        state.phase = Phase::Cancelled;
        storage::save_state(&env, &state);

        emit_round_cancelled(
            &env,
            RoundCancelled {
                round_id: config.round_id,
                founder: config.founder,
            },
        );
        emit_phase_changed(
            &env,
            PhaseChanged {
                round_id: config.round_id,
                phase: Phase::Cancelled,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Full round view, reconstructed from config and state.
    pub fn get_round(env: Env) -> RoundSummary {
        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        RoundSummary {
            round_id: config.round_id,
            founder: config.founder,
            funding_token: config.funding_token,
            target_amount: config.target_amount,
            funding_deadline: config.funding_deadline,
            current_amount: state.current_amount,
            total_released: state.total_released,
            phase: state.phase,
            milestone_count: storage::load_milestone_count(&env),
        }
    }

    /// One milestone record by index.
    pub fn get_milestone(env: Env, milestone_id: u32) -> Milestone {
        load_milestone(&env, milestone_id)
    }

    /// Number of milestones in the schedule.
    pub fn get_milestone_count(env: Env) -> u32 {
        storage::load_milestone_count(&env)
    }

    /// Live investment for `investor`; 0 when none remains.
    pub fn get_investment(env: Env, investor: Address) -> i128 {
        storage::load_investment(&env, &investor)
    }

    /// Whitelist flag for `investor`.
    pub fn is_whitelisted(env: Env, investor: Address) -> bool {
        storage::is_whitelisted(&env, &investor)
    }
}

// ─────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────

fn load_milestone(env: &Env, milestone_id: u32) -> Milestone {
    match storage::load_milestone(env, milestone_id) {
        Some(m) => m,
        None => panic_with_error!(env, Error::MilestoneNotFound),
    }
}

/// Decide a milestone on the votes cast: strict majority approves,
/// anything else (ties included) rejects.
fn finalize_votes(env: &Env, round_id: u64, milestone_id: u32, milestone: &mut Milestone) {
    milestone.status = if milestone.votes_for > milestone.votes_against {
        MilestoneStatus::Approved
    } else {
        MilestoneStatus::Rejected
    };
    emit_voting_finalized(
        env,
        VotingFinalized {
            round_id,
            milestone_id,
            status: milestone.status.clone(),
            votes_for: milestone.votes_for,
            votes_against: milestone.votes_against,
        },
    );
}

/// Flip the round to Completed once every milestone is terminal:
/// Rejected, or Completed with funds released. Only an Execution-phase
/// round settles; a cancelled round stays Cancelled.
fn settle_round_if_done(env: &Env, config: &RoundConfig) {
    let mut state = storage::load_state(env);
    if state.phase != Phase::Execution {
        return;
    }
    let count = storage::load_milestone_count(env);
    for i in 0..count {
        if let Some(m) = storage::load_milestone(env, i) {
            let terminal = m.status == MilestoneStatus::Rejected || m.funds_released;
            if !terminal {
                return;
            }
        }
    }
    state.phase = Phase::Completed;
    storage::save_state(env, &state);
    emit_phase_changed(
        env,
        PhaseChanged {
            round_id: config.round_id,
            phase: Phase::Completed,
        },
    );
}

/// `invested`'s currently reclaimable share under `state`.
///
/// `total_released` holds nominal milestone amounts; scaling it by the
/// achieved-funding ratio gives the value that physically left custody,
/// and the investor owns their pro-rata slice of the rest.
fn withdrawable_amount(env: &Env, config: &RoundConfig, state: &RoundState, invested: i128) -> i128 {
    if invested == 0 {
        return 0;
    }
    match state.phase {
        Phase::Funding => {
            if env.ledger().timestamp() > config.funding_deadline {
                invested
            } else {
                0
            }
        }
        Phase::Execution | Phase::Completed | Phase::Cancelled => {
            if state.current_amount == 0 {
                return 0;
            }
            let released_scaled = mul_div_floor(
                env,
                state.total_released,
                state.current_amount,
                config.target_amount,
            );
            let remaining = state.current_amount - released_scaled;
            mul_div_floor(env, invested, remaining, state.current_amount)
        }
    }
}

/// `a * b / denom` with a checked wide multiply and floor division.
/// Call sites guarantee `denom > 0`.
fn mul_div_floor(env: &Env, a: i128, b: i128, denom: i128) -> i128 {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(denom))
        .unwrap_or_else(|| panic_with_error!(env, Error::ArithmeticOverflow))
}

/// Re-entrancy lock around every entry point that moves value. Soroban
/// rejects contract re-entry at the host level; the explicit flag keeps
/// the invariant enforced in the contract itself.
fn lock(env: &Env) {
    if storage::is_locked(env) {
        panic_with_error!(env, Error::ReentrantCall);
    }
    storage::set_locked(env, true);
}

fn unlock(env: &Env) {
    storage::set_locked(env, false);
}
