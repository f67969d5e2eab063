#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use upgov_nullables::NullClock;
use upgov_token::{AllocationConfig, TokenConfig, UpgradeableToken};
use upgov_types::{Address, GovernanceParams};

const HOLDERS: u8 = 5;
const COUNCIL: u64 = 0xc0;

#[derive(Arbitrary, Debug)]
enum Op {
    Transfer { from: u8, to: u8, value: u32 },
    Burn { from: u8, value: u32 },
    Lock { account: u8, value: u32 },
    TransferAndLock { from: u8, to: u8, value: u32 },
    Vote { voter: u8, implementation: u8 },
    Revoke { voter: u8, implementation: u8 },
    ScheduleVoterBody,
    CancelVoterBody,
    ScheduleCouncil { implementation: u8 },
    CancelCouncil,
    VetoCouncil,
    Upgrade { implementation: u8 },
    Wait { secs: u32 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    balances: [u32; HOLDERS as usize],
    ops: Vec<Op>,
}

fn holder(n: u8) -> Address {
    Address::from_index(u64::from(n % HOLDERS) + 1)
}

fn implementation(n: u8) -> Address {
    Address::from_index(0x100 + u64::from(n % 4))
}

// Random operation sequences never panic, and the lock invariants hold after
// every step whether the step succeeded or not.
fuzz_target!(|input: Input| {
    let config = TokenConfig {
        council: Address::from_index(COUNCIL),
        governance: GovernanceParams {
            delay_duration_secs: 3_600,
            ..Default::default()
        },
        allocations: (0..HOLDERS)
            .map(|i| AllocationConfig {
                account: holder(i),
                amount: u64::from(input.balances[i as usize]),
            })
            .filter(|a| a.amount > 0)
            .collect(),
        ..Default::default()
    };
    let clock = NullClock::new(0);
    let Ok(mut token) = UpgradeableToken::from_config(&config, clock.clone()) else {
        return;
    };
    let council = Address::from_index(COUNCIL);

    for op in input.ops.iter().take(256) {
        let _ = match *op {
            Op::Transfer { from, to, value } => token.transfer(&holder(from), &holder(to), value.into()),
            Op::Burn { from, value } => token.burn(&holder(from), value.into()),
            Op::Lock { account, value } => token.lock(&holder(account), value.into()),
            Op::TransferAndLock { from, to, value } => {
                token.transfer_and_lock(&holder(from), &holder(to), value.into())
            }
            Op::Vote { voter, implementation: i } => token.cast_vote(&holder(voter), &implementation(i)),
            Op::Revoke { voter, implementation: i } => token.revoke_vote(&holder(voter), &implementation(i)),
            Op::ScheduleVoterBody => token.schedule_voter_body_upgrade().map(|_| ()),
            Op::CancelVoterBody => token.cancel_voter_body_upgrade(),
            Op::ScheduleCouncil { implementation: i } => {
                token.schedule_council_upgrade(&council, &implementation(i)).map(|_| ())
            }
            Op::CancelCouncil => token.cancel_council_upgrade(&council),
            Op::VetoCouncil => token.veto_council_upgrade(),
            Op::Upgrade { implementation: i } => token.upgrade_to(&implementation(i)).map(|_| ()),
            Op::Wait { secs } => {
                clock.advance(secs.into());
                Ok(())
            }
        };

        let gov = token.governance();
        let epoch = gov.current();
        assert_eq!(epoch.sum_of_locked(), epoch.locked_supply());
        assert!(epoch.voter_body_schedule().is_none() || epoch.council_schedule().is_none());
        for i in 0..HOLDERS {
            let account = holder(i);
            assert!(token.locked_balance(&account) <= token.balance_of(&account));
        }
        for (_, ballot) in epoch.ballots() {
            let sum: u128 = ballot.voters().map(|(_, v)| v).sum();
            assert_eq!(sum, ballot.total_votes());
            for (voter, votum) in ballot.voters() {
                assert!(votum <= epoch.locked_balance(voter));
            }
        }
    }
});
