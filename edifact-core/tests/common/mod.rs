//! Test infrastructure for the EDIFACT parser
//!
//! Provides fixture loading, stochastic dialect variations, and assertion helpers.

#![allow(dead_code)]

mod generators;
mod harness;
mod loader;

#[allow(unused_imports)]
pub use generators::Gen;
#[allow(unused_imports)]
pub use harness::{
    check_well_formed, format_event, format_events, parse_events, run_test, run_with_variations,
    to_dialect, Log,
};
#[allow(unused_imports)]
pub use loader::{load_fixtures_by_name, ExpectedEvent, TestCase};
