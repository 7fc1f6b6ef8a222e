//! Common types shared among all olamai crates

pub mod logging;

#[cfg(any(test, feature = "test-utils"))]
pub use test::*;

use rand::distributions::{Alphanumeric, DistString};

pub fn rand_string<const N: usize>() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), N)
}
