use proptest::prelude::*;

use upgov_governance::Epoch;
use upgov_nullables::NullClock;
use upgov_token::{AllocationConfig, TokenConfig, TokenError, UpgradeableToken};
use upgov_types::{Address, EpochId};

const HOLDERS: u64 = 5;
const BALANCE: u64 = 1_000;
const SPENDER: u64 = 9;
const COUNCIL: u64 = 0xc0;
const IMPLEMENTATIONS: std::ops::Range<u64> = 0x100..0x104;

#[derive(Clone, Debug)]
enum Op {
    Transfer(u64, u64, u128),
    TransferFrom(u64, u64, u128),
    Burn(u64, u128),
    Lock(u64, u128),
    TransferAndLock(u64, u64, u128),
    Vote(u64, u64),
    Revoke(u64, u64),
    ScheduleVoterBody,
    CancelVoterBody,
    ScheduleCouncil(u64),
    CancelCouncil,
    Veto,
    Upgrade(u64),
    Wait(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1..=HOLDERS, 1..=HOLDERS, 0u128..700).prop_map(|(f, t, v)| Op::Transfer(f, t, v)),
        1 => (1..=HOLDERS, 1..=HOLDERS, 0u128..700).prop_map(|(f, t, v)| Op::TransferFrom(f, t, v)),
        1 => (1..=HOLDERS, 0u128..500).prop_map(|(a, v)| Op::Burn(a, v)),
        4 => (1..=HOLDERS, 0u128..800).prop_map(|(a, v)| Op::Lock(a, v)),
        2 => (1..=HOLDERS, 1..=HOLDERS, 0u128..500).prop_map(|(f, t, v)| Op::TransferAndLock(f, t, v)),
        4 => (1..=HOLDERS, IMPLEMENTATIONS).prop_map(|(a, i)| Op::Vote(a, i)),
        1 => (1..=HOLDERS, IMPLEMENTATIONS).prop_map(|(a, i)| Op::Revoke(a, i)),
        1 => Just(Op::ScheduleVoterBody),
        1 => Just(Op::CancelVoterBody),
        1 => IMPLEMENTATIONS.prop_map(Op::ScheduleCouncil),
        1 => Just(Op::CancelCouncil),
        1 => Just(Op::Veto),
        1 => IMPLEMENTATIONS.prop_map(Op::Upgrade),
        1 => (0u64..1_500_000).prop_map(Op::Wait),
    ]
}

fn addr(n: u64) -> Address {
    Address::from_index(n)
}

fn token() -> (UpgradeableToken<NullClock>, NullClock) {
    let config = TokenConfig {
        council: addr(COUNCIL),
        allocations: (1..=HOLDERS)
            .map(|n| AllocationConfig { account: addr(n), amount: BALANCE })
            .collect(),
        ..Default::default()
    };
    let clock = NullClock::new(1_000);
    let mut token = UpgradeableToken::from_config(&config, clock.clone()).unwrap();
    for holder in 1..=HOLDERS {
        token.approve(&addr(holder), &addr(SPENDER), u128::MAX).unwrap();
    }
    (token, clock)
}

fn apply(token: &mut UpgradeableToken<NullClock>, clock: &NullClock, op: &Op) -> Result<(), TokenError> {
    match op {
        Op::Transfer(f, t, v) => token.transfer(&addr(*f), &addr(*t), *v),
        Op::TransferFrom(f, t, v) => token.transfer_from(&addr(SPENDER), &addr(*f), &addr(*t), *v),
        Op::Burn(a, v) => token.burn(&addr(*a), *v),
        Op::Lock(a, v) => token.lock(&addr(*a), *v),
        Op::TransferAndLock(f, t, v) => token.transfer_and_lock(&addr(*f), &addr(*t), *v),
        Op::Vote(a, i) => token.cast_vote(&addr(*a), &addr(*i)),
        Op::Revoke(a, i) => token.revoke_vote(&addr(*a), &addr(*i)),
        Op::ScheduleVoterBody => token.schedule_voter_body_upgrade().map(|_| ()),
        Op::CancelVoterBody => token.cancel_voter_body_upgrade(),
        Op::ScheduleCouncil(i) => token
            .schedule_council_upgrade(&addr(COUNCIL), &addr(*i))
            .map(|_| ()),
        Op::CancelCouncil => token.cancel_council_upgrade(&addr(COUNCIL)),
        Op::Veto => token.veto_council_upgrade(),
        Op::Upgrade(i) => token.upgrade_to(&addr(*i)).map(|_| ()),
        Op::Wait(secs) => {
            clock.advance(*secs);
            Ok(())
        }
    }
}

fn balances(token: &UpgradeableToken<NullClock>) -> Vec<u128> {
    (1..=HOLDERS).map(|n| token.balance_of(&addr(n))).collect()
}

fn voti(epoch: &Epoch) -> Vec<u128> {
    (1..=HOLDERS)
        .flat_map(|holder| IMPLEMENTATIONS.map(move |i| (holder, i)))
        .map(|(holder, i)| epoch.votum(&addr(holder), &addr(i)))
        .collect()
}

fn pair_index(holder: u64, implementation: u64) -> usize {
    let per_holder = IMPLEMENTATIONS.end - IMPLEMENTATIONS.start;
    ((holder - 1) * per_holder + (implementation - IMPLEMENTATIONS.start)) as usize
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Ledger and governance invariants hold together after every step of a
    /// mixed sequence, and a failed step changes nothing.
    #[test]
    fn token_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let (mut token, clock) = token();
        let mut epoch_id = EpochId::GENESIS;
        let mut prev_voti = voti(token.governance().current());

        for op in &ops {
            let before_balances = balances(&token);
            let before_epoch = token.governance().current().clone();
            let before_impl = token.implementation();

            let result = apply(&mut token, &clock, op);
            if result.is_err() {
                prop_assert_eq!(balances(&token), before_balances, "failed {:?} moved balances", op);
                prop_assert_eq!(token.governance().current(), &before_epoch, "failed {:?} mutated the epoch", op);
                prop_assert_eq!(token.implementation(), before_impl);
            }

            let gov = token.governance();
            let epoch = gov.current();

            let mut sum_locked = 0u128;
            let mut sum_balances = 0u128;
            for holder in 1..=HOLDERS {
                let account = addr(holder);
                let balance = token.balance_of(&account);
                let locked = token.locked_balance(&account);
                prop_assert!(locked <= balance, "{:?}: locked {} > balance {}", account, locked, balance);
                prop_assert_eq!(token.unlocked_balance(&account), balance - locked);
                sum_locked += locked;
                sum_balances += balance;
            }
            prop_assert_eq!(sum_locked, gov.locked_supply());
            prop_assert_eq!(sum_balances, token.total_supply());
            prop_assert!(gov.voter_body_schedule().is_none() || gov.council_schedule().is_none());

            let current_voti = voti(epoch);
            if epoch.id() == epoch_id {
                for holder in 1..=HOLDERS {
                    for implementation in IMPLEMENTATIONS {
                        let idx = pair_index(holder, implementation);
                        let revoked = result.is_ok()
                            && matches!(op, Op::Revoke(a, i) if *a == holder && *i == implementation);
                        if revoked {
                            prop_assert_eq!(current_voti[idx], 0);
                        } else {
                            prop_assert!(current_voti[idx] >= prev_voti[idx], "votum shrank after {:?}", op);
                        }
                    }
                }
            } else {
                prop_assert!(matches!(op, Op::Upgrade(_)) && result.is_ok());
                prop_assert!(current_voti.iter().all(|v| *v == 0));
                prop_assert_eq!(gov.locked_supply(), 0);
                epoch_id = epoch.id();
            }
            prev_voti = current_voti;
        }
    }
}
