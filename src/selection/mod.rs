pub mod dedupe;
pub mod policy;

pub use dedupe::{dedupe, merge};
pub use policy::{DEFAULT_TARGET_COUNT, SelectionPolicy};
