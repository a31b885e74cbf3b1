//! Type definitions for Vigil configuration

mod poll_policy;

pub use poll_policy::*;
