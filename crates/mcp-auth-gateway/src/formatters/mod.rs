//! Output formatters for tool results.

mod card;

pub use card::{ResultCard, display_number};
