pub mod analyzer;
pub mod config;
pub mod error;
pub mod first;
pub mod follow;
pub mod grammar;
pub mod parse;
pub mod predict;
pub mod pretty_print;
pub mod symbol_set;

pub use analyzer::GrammarAnalyzer;
pub use config::{AnalyzerConfig, SymbolMode};
pub use error::{GrammarError, Result};
pub use grammar::{Grammar, Production};
pub use symbol_set::SymbolSet;

pub const EPSILON: &str = "ε";
/// Alternate spelling of the epsilon marker (U+03F5), accepted on input.
pub const EPSILON_ALT: &str = "ϵ";
pub const END_MARK: &str = "$";

pub const DEFAULT_DELIMITER: char = '|';
pub const DEFAULT_MAX_FOLLOW_PASSES: usize = 100;

pub fn is_epsilon(symbol: &str) -> bool {
    symbol == EPSILON || symbol == EPSILON_ALT
}
