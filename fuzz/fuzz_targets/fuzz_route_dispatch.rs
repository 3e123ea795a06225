//! Fuzz target for router dispatch.
//!
//! Dispatch must never panic for any path string and must stay
//! deterministic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use press_route::MatchOutcome;
use press_server::route_table;

fuzz_target!(|path: &str| {
    let router = route_table().expect("route table compiles");

    let first = summarize(&router.dispatch(path));
    let second = summarize(&router.dispatch(path));
    assert_eq!(first, second);
});

fn summarize(outcome: &MatchOutcome<press_server::Endpoint>) -> String {
    match outcome {
        MatchOutcome::Matched(matched) => format!("{}:{:?}", matched.route, matched.value),
        MatchOutcome::NotMatched { attempts } => format!("miss:{}", attempts.len()),
    }
}
