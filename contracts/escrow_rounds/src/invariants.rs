#![allow(dead_code)]

extern crate std;

use crate::types::{Milestone, MilestoneStatus, Phase, RoundSummary};
use crate::JURY_SIZE;

/// INV-1: achieved funding never exceeds the target and never goes
/// negative.
pub fn assert_funding_bounded(round: &RoundSummary) {
    assert!(
        round.current_amount >= 0,
        "INV-1 violated: round {} has negative current_amount ({})",
        round.round_id,
        round.current_amount
    );
    assert!(
        round.current_amount <= round.target_amount,
        "INV-1 violated: round {} funded past target ({} > {})",
        round.round_id,
        round.current_amount,
        round.target_amount
    );
}

/// INV-2: the milestone schedule splits the target exactly.
pub fn assert_schedule_matches_target(target_amount: i128, milestones: &[Milestone]) {
    let sum: i128 = milestones.iter().map(|m| m.funding_amount).sum();
    assert_eq!(
        sum, target_amount,
        "INV-2 violated: milestone amounts sum to {} but target is {}",
        sum, target_amount
    );
}

/// INV-3: vote counters agree with the voted list and stay within the
/// jury size.
pub fn assert_vote_counts_consistent(milestone: &Milestone) {
    let cast = milestone.votes_for + milestone.votes_against;
    assert_eq!(
        cast,
        milestone.voted.len(),
        "INV-3 violated: {} votes counted but {} jurors recorded",
        cast,
        milestone.voted.len()
    );
    assert!(
        cast <= JURY_SIZE,
        "INV-3 violated: {} votes cast on a {}-juror milestone",
        cast,
        JURY_SIZE
    );
}

/// INV-4: funds only ever leave through completed milestones.
pub fn assert_release_requires_completion(milestone: &Milestone) {
    if milestone.funds_released {
        assert_eq!(
            milestone.status,
            MilestoneStatus::Completed,
            "INV-4 violated: funds released on a {:?} milestone",
            milestone.status
        );
    }
}

/// INV-5: nominal released total stays within the target.
pub fn assert_released_bounded(round: &RoundSummary) {
    assert!(
        round.total_released >= 0 && round.total_released <= round.target_amount,
        "INV-5 violated: round {} released {} of target {}",
        round.round_id,
        round.total_released,
        round.target_amount
    );
}

/// INV-6: phase transition validity. Only forward transitions are
/// allowed:
///   Funding   -> Execution | Cancelled
///   Execution -> Completed | Cancelled
///   Completed -> (none)
///   Cancelled -> (none)
pub fn assert_valid_phase_transition(from: &Phase, to: &Phase) {
    let valid = matches!(
        (from, to),
        (Phase::Funding, Phase::Execution)
            | (Phase::Funding, Phase::Cancelled)
            | (Phase::Execution, Phase::Completed)
            | (Phase::Execution, Phase::Cancelled)
    );
    assert!(
        valid,
        "INV-6 violated: invalid phase transition from {:?} to {:?}",
        from, to
    );
}

/// INV-7: withdrawal reduces the stored investment proportionally, so a
/// full withdrawal zeroes the record exactly.
pub fn assert_withdrawal_reduces_proportionally(
    invested_before: i128,
    invested_after: i128,
    actual: i128,
    withdrawable: i128,
) {
    let expected = invested_before - actual * invested_before / withdrawable;
    assert_eq!(
        invested_after, expected,
        "INV-7 violated: investment {} should reduce to {} after withdrawing {} of {}",
        invested_before, expected, actual, withdrawable
    );
}

/// Run all stateless round invariants.
pub fn assert_all_round_invariants(round: &RoundSummary) {
    assert_funding_bounded(round);
    assert_released_bounded(round);
}
