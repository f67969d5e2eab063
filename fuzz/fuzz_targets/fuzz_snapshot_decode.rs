#![no_main]

use libfuzzer_sys::fuzz_target;

use upgov_nullables::NullClock;
use upgov_token::TokenSnapshot;

// Decoding and restoring arbitrary bytes never panics. A snapshot that
// restores must produce a token whose locks fit inside its balances.
fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = TokenSnapshot::from_bytes(data) else {
        return;
    };
    let Ok(token) = snapshot.restore(NullClock::new(0)) else {
        return;
    };
    let epoch = token.governance().current();
    assert_eq!(epoch.sum_of_locked(), epoch.locked_supply());
    assert!(epoch.locked_supply() <= token.total_supply());
});
