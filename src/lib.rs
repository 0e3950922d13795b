extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{
    AnalyzerConfig, Grammar, GrammarAnalyzer, GrammarError, Production, SymbolMode, SymbolSet,
};

fn symbol_sets_to_json(grammar: &str, config: AnalyzerConfig) -> grammar::Result<String> {
    let g = Grammar::parse_with_delimiter(grammar, config.delimiter)?;
    let sets = GrammarAnalyzer::with_config(config).symbol_sets(&g)?;
    grammar::pretty_print::SymbolSetOutputVec::new(&sets).to_json()
}

fn error_to_json(e: GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_predict_to_json(grammar: &str) -> String {
    symbol_sets_to_json(grammar, AnalyzerConfig::default()).unwrap_or_else(error_to_json)
}

#[wasm_bindgen]
pub fn first_follow_predict_with_config_to_json(grammar: &str, config: &str) -> String {
    AnalyzerConfig::from_json(config)
        .and_then(|config| symbol_sets_to_json(grammar, config))
        .unwrap_or_else(error_to_json)
}
