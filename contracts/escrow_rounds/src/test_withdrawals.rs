extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, vec, Address, Env, String, Vec,
};

use crate::invariants;
use crate::registry::{Registry, RegistryClient};
use crate::{MilestoneInput, Phase, Round, RoundClient, VERIFICATION_DELAY};

const START: u64 = 1_000_000;
const FUNDING_DEADLINE: u64 = START + 86_400;
const M0_DEADLINE: u64 = FUNDING_DEADLINE + 86_400;
const M1_DEADLINE: u64 = FUNDING_DEADLINE + 172_800;

struct Setup {
    env: Env,
    founder: Address,
    jurors: [Address; 3],
    registry: RegistryClient<'static>,
    token: token::Client<'static>,
    sac: token::StellarAssetClient<'static>,
}

fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);

    let admin = Address::generate(&env);
    let founder = Address::generate(&env);
    let jurors = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];

    let registry_id = env.register(Registry, (&admin,));
    let registry = RegistryClient::new(&env, &registry_id);
    for juror in jurors.iter() {
        registry.add_juror(juror);
    }

    let token_admin = Address::generate(&env);
    let sac_addr = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token = token::Client::new(&env, &sac_addr.address());
    let sac = token::StellarAssetClient::new(&env, &sac_addr.address());

    Setup {
        env,
        founder,
        jurors,
        registry,
        token,
        sac,
    }
}

fn set_time(env: &Env, timestamp: u64) {
    env.ledger().with_mut(|li| li.timestamp = timestamp);
}

fn jury(setup: &Setup) -> Vec<Address> {
    vec![
        &setup.env,
        setup.jurors[0].clone(),
        setup.jurors[1].clone(),
        setup.jurors[2].clone(),
    ]
}

/// Round with the target split `amounts.0` / `amounts.1` across two
/// milestones.
fn deploy_split_round(setup: &Setup, amounts: (i128, i128)) -> RoundClient<'static> {
    let milestones = vec![
        &setup.env,
        MilestoneInput {
            description: String::from_str(&setup.env, "phase one"),
            funding_amount: amounts.0,
            deadline: M0_DEADLINE,
            jury: jury(setup),
        },
        MilestoneInput {
            description: String::from_str(&setup.env, "phase two"),
            funding_amount: amounts.1,
            deadline: M1_DEADLINE,
            jury: jury(setup),
        },
    ];
    let round_id = setup.env.register(
        Round,
        (
            &setup.registry.address,
            &setup.founder,
            &setup.token.address,
            amounts.0 + amounts.1,
            FUNDING_DEADLINE,
            milestones.clone(),
        ),
    );
    RoundClient::new(&setup.env, &round_id)
}

fn invest_from(setup: &Setup, round: &RoundClient, amount: i128) -> Address {
    let investor = Address::generate(&setup.env);
    round.whitelist_investor(&investor);
    setup.sac.mint(&investor, &amount);
    round.invest(&investor, &amount);
    investor
}

/// Approve, complete, and release milestone `milestone_id`, entering at
/// `deadline`.
fn release_milestone(setup: &Setup, round: &RoundClient, milestone_id: u32, deadline: u64) {
    set_time(&setup.env, deadline);
    round.trigger_milestone_deadline(&milestone_id);
    for juror in setup.jurors.iter() {
        round.cast_jury_vote(juror, &milestone_id, &true);
    }
    round.complete_milestone(&milestone_id);
    set_time(&setup.env, deadline + VERIFICATION_DELAY);
    round.release_funds(&milestone_id);
}

#[test]
fn test_nothing_withdrawable_during_live_funding() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    let investor = invest_from(&setup, &round, 300);

    assert_eq!(round.calculate_withdrawable(&investor), 0);
    assert!(round.try_withdraw_investment(&investor, &0).is_err());
}

#[test]
#[should_panic(expected = "Error(Contract, #17)")]
fn test_withdraw_rejected_without_investment() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    round.cancel_round();
    round.withdraw_investment(&Address::generate(&setup.env), &0);
}

#[test]
fn test_failed_funding_refunds_in_full() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    let investor = invest_from(&setup, &round, 300);

    // Deadline passes with the round underfunded and nobody forcing the
    // Execution transition: the whole stake is reclaimable.
    set_time(&setup.env, FUNDING_DEADLINE + 1);
    assert_eq!(round.calculate_withdrawable(&investor), 300);

    round.withdraw_investment(&investor, &0);
    assert_eq!(setup.token.balance(&investor), 300);
    assert_eq!(round.get_investment(&investor), 0);
    assert_eq!(setup.token.balance(&round.address), 0);
}

#[test]
fn test_cancellation_before_any_release_refunds_in_full() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    let investor = invest_from(&setup, &round, 300);

    round.cancel_round();
    assert_eq!(round.get_round().phase, Phase::Cancelled);
    assert_eq!(round.calculate_withdrawable(&investor), 300);

    round.withdraw_investment(&investor, &0);
    assert_eq!(setup.token.balance(&investor), 300);
    assert_eq!(round.get_investment(&investor), 0);
}

#[test]
fn test_withdrawable_reflects_released_share() {
    let setup = setup();
    let round = deploy_split_round(&setup, (20, 80));
    let alice = invest_from(&setup, &round, 50);
    let bob = invest_from(&setup, &round, 50);
    assert_eq!(round.get_round().phase, Phase::Execution);

    release_milestone(&setup, &round, 0, M0_DEADLINE);

    // 20 of 100 released: each 50-unit stake keeps 50 * 80 / 100 = 40.
    assert_eq!(round.calculate_withdrawable(&alice), 40);
    assert_eq!(round.calculate_withdrawable(&bob), 40);

    round.withdraw_investment(&alice, &0);
    assert_eq!(setup.token.balance(&alice), 40);
    assert_eq!(round.get_investment(&alice), 0);

    // Bob's claim is untouched by Alice's exit.
    assert_eq!(round.calculate_withdrawable(&bob), 40);
}

#[test]
fn test_partial_withdrawal_scales_claim() {
    let setup = setup();
    let round = deploy_split_round(&setup, (20, 80));
    let alice = invest_from(&setup, &round, 50);
    let _bob = invest_from(&setup, &round, 50);

    release_milestone(&setup, &round, 0, M0_DEADLINE);
    assert_eq!(round.calculate_withdrawable(&alice), 40);

    round.withdraw_investment(&alice, &10);
    assert_eq!(setup.token.balance(&alice), 10);

    // Investment shrinks proportionally: 50 - floor(10 * 50 / 40) = 38,
    // so the remaining claim is floor(38 * 80 / 100) = 30. The floor dust
    // stays in custody.
    assert_eq!(round.get_investment(&alice), 38);
    assert_eq!(round.calculate_withdrawable(&alice), 30);
    invariants::assert_withdrawal_reduces_proportionally(50, 38, 10, 40);
}

#[test]
fn test_withdraw_request_capped_at_withdrawable() {
    let setup = setup();
    let round = deploy_split_round(&setup, (20, 80));
    let alice = invest_from(&setup, &round, 50);
    let _bob = invest_from(&setup, &round, 50);

    release_milestone(&setup, &round, 0, M0_DEADLINE);

    // Asking for more than the withdrawable share pays out exactly the
    // withdrawable share.
    round.withdraw_investment(&alice, &1_000);
    assert_eq!(setup.token.balance(&alice), 40);
    assert_eq!(round.get_investment(&alice), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #17)")]
fn test_second_full_withdrawal_rejected() {
    let setup = setup();
    let round = deploy_split_round(&setup, (20, 80));
    let alice = invest_from(&setup, &round, 50);
    let _bob = invest_from(&setup, &round, 50);

    release_milestone(&setup, &round, 0, M0_DEADLINE);
    round.withdraw_investment(&alice, &0);
    round.withdraw_investment(&alice, &0);
}

#[test]
fn test_execution_phase_unreleased_funds_fully_recoverable() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    let investor = invest_from(&setup, &round, 600);

    set_time(&setup.env, FUNDING_DEADLINE + 1);
    round.move_to_execution();

    // Nothing released yet: the whole stake is still in custody.
    assert_eq!(round.calculate_withdrawable(&investor), 600);
    round.withdraw_investment(&investor, &0);
    assert_eq!(setup.token.balance(&investor), 600);
}

#[test]
fn test_partial_funding_release_history_then_cancel() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));

    let alice = invest_from(&setup, &round, 400);
    let bob = invest_from(&setup, &round, 200);
    set_time(&setup.env, FUNDING_DEADLINE + 1);
    round.move_to_execution();

    // Milestone 0 releases 400 * 600 / 1000 = 240 to the founder.
    release_milestone(&setup, &round, 0, M0_DEADLINE);
    assert_eq!(setup.token.balance(&setup.founder), 240);

    // Scaled released value is 240, so 360 of the 600 raised remain:
    // alice keeps 400 * 360 / 600 = 240, bob 200 * 360 / 600 = 120.
    assert_eq!(round.calculate_withdrawable(&alice), 240);
    assert_eq!(round.calculate_withdrawable(&bob), 120);

    // Cancellation switches the phase but not the arithmetic.
    round.cancel_round();
    assert_eq!(round.calculate_withdrawable(&alice), 240);
    assert_eq!(round.calculate_withdrawable(&bob), 120);

    round.withdraw_investment(&alice, &0);
    round.withdraw_investment(&bob, &0);
    assert_eq!(setup.token.balance(&alice), 240);
    assert_eq!(setup.token.balance(&bob), 120);

    // 240 released + 240 + 120 withdrawn accounts for every unit raised.
    assert_eq!(setup.token.balance(&round.address), 0);
}

#[test]
fn test_withdrawable_across_two_release_histories() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    let investor = invest_from(&setup, &round, 500);
    set_time(&setup.env, FUNDING_DEADLINE + 1);
    round.move_to_execution();

    // History 1: milestone 0 released. Scaled release 400*500/1000 = 200,
    // leaving 300 of 500; the sole investor owns all of it.
    release_milestone(&setup, &round, 0, M0_DEADLINE);
    assert_eq!(round.calculate_withdrawable(&investor), 300);

    // History 2: milestone 1 also released. Everything raised has been
    // paid out; nothing is left to reclaim.
    release_milestone(&setup, &round, 1, M1_DEADLINE);
    assert_eq!(round.get_round().phase, Phase::Completed);
    assert_eq!(round.calculate_withdrawable(&investor), 0);
    assert!(round.try_withdraw_investment(&investor, &0).is_err());

    assert_eq!(setup.token.balance(&setup.founder), 500);
    assert_eq!(setup.token.balance(&round.address), 0);
    invariants::assert_all_round_invariants(&round.get_round());
}

#[test]
fn test_rejected_milestone_share_flows_back_to_investors() {
    let setup = setup();
    let round = deploy_split_round(&setup, (400, 600));
    let investor = invest_from(&setup, &round, 1_000);
    assert_eq!(round.get_round().phase, Phase::Execution);

    // Milestone 0 pays out in full; milestone 1 is voted down.
    release_milestone(&setup, &round, 0, M0_DEADLINE);
    set_time(&setup.env, M1_DEADLINE);
    round.trigger_milestone_deadline(&1);
    for juror in setup.jurors.iter() {
        round.cast_jury_vote(juror, &1, &false);
    }

    // The undeliverable 600 stays claimable by the investor.
    assert_eq!(round.get_round().phase, Phase::Completed);
    assert_eq!(round.calculate_withdrawable(&investor), 600);
    round.withdraw_investment(&investor, &0);
    assert_eq!(setup.token.balance(&investor), 600);
    assert_eq!(setup.token.balance(&round.address), 0);
}
