//! Ordered strategy cascades.
//!
//! Every heuristic in the engine is an ordered list of named strategies. A
//! strategy either produces a value or reports [`NotFound`]; the cascade
//! stops at the first success.

use scraper::Selector;
use thiserror::Error;

/// A strategy produced nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no strategy produced a result")]
pub struct NotFound;

/// A named CSS selector tried at a fixed position in a cascade.
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    pub name: &'static str,
    pub selector: Selector,
}

impl SelectorStrategy {
    /// Compile a built-in selector list, keeping its order.
    ///
    /// Only called with compile-time constant selectors, so a parse failure
    /// is a programming error.
    pub fn compile(names: &[&'static str]) -> Vec<SelectorStrategy> {
        names
            .iter()
            .copied()
            .map(|name| SelectorStrategy {
                name,
                selector: Selector::parse(name).expect("built-in selector must parse"),
            })
            .collect()
    }
}

/// Run `attempt` over `strategies` in order and return the first success.
pub fn first_success<S, T>(
    strategies: &[S],
    mut attempt: impl FnMut(&S) -> Result<T, NotFound>,
) -> Result<T, NotFound> {
    strategies
        .iter()
        .find_map(|strategy| attempt(strategy).ok())
        .ok_or(NotFound)
}
