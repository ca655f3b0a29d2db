#![no_main]
use libfuzzer_sys::fuzz_target;
use libtally::{parse, LedgerState};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(statements) = parse(input) {
            let mut state = LedgerState::new();
            for statement in statements {
                let _ = state.apply(statement);
            }
        }
    }
});
