//! Canonical event types emitted by the round contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/escrow_rounds/src/events.rs`. The registry contract's
//! bookkeeping events are not indexed; the round contract is the record
//! of a campaign.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the round contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Round phase transition (`phase` topic).
    PhaseChanged,
    /// An investor was whitelisted (`listed` topic).
    InvestorWhitelisted,
    /// An investment was accepted (`invested` topic).
    InvestmentMade,
    /// A milestone's voting window opened (`activated` topic).
    MilestoneActivated,
    /// A juror voted on a milestone (`voted` topic).
    JuryVoteCast,
    /// Milestone voting was decided (`finalized` topic).
    VotingFinalized,
    /// The founder completed an approved milestone (`completed` topic).
    MilestoneCompleted,
    /// Milestone funds were paid out (`released` topic).
    FundsReleased,
    /// An investor withdrew part of their stake (`withdrawn` topic).
    InvestmentWithdrawn,
    /// The founder cancelled the round (`cancelled` topic).
    RoundCancelled,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an
    /// [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "phase" => Self::PhaseChanged,
            "listed" => Self::InvestorWhitelisted,
            "invested" => Self::InvestmentMade,
            "activated" => Self::MilestoneActivated,
            "voted" => Self::JuryVoteCast,
            "finalized" => Self::VotingFinalized,
            "completed" => Self::MilestoneCompleted,
            "released" => Self::FundsReleased,
            "withdrawn" => Self::InvestmentWithdrawn,
            "cancelled" => Self::RoundCancelled,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the
    /// database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseChanged => "phase_changed",
            Self::InvestorWhitelisted => "investor_whitelisted",
            Self::InvestmentMade => "investment_made",
            Self::MilestoneActivated => "milestone_activated",
            Self::JuryVoteCast => "jury_vote_cast",
            Self::VotingFinalized => "voting_finalized",
            Self::MilestoneCompleted => "milestone_completed",
            Self::FundsReleased => "funds_released",
            Self::InvestmentWithdrawn => "investment_withdrawn",
            Self::RoundCancelled => "round_cancelled",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded round event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEvent {
    pub event_type: String,
    pub round_id: Option<String>,
    pub milestone_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub round_id: Option<String>,
    pub milestone_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
