//! Poll policy configuration loading

mod loader;

pub use loader::PollConfigLoader;
