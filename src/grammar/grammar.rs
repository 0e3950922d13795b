use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{
    config::{AnalyzerConfig, SymbolMode},
    is_epsilon, GrammarError, Result, END_MARK,
};

/// One `non_terminal -> right_side` rule. The right side is kept as raw text:
/// alternatives split by a delimiter, symbols split by whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub non_terminal: String,
    pub right_side: String,
}

impl Production {
    pub fn new(non_terminal: &str, right_side: &str) -> Self {
        Self {
            non_terminal: non_terminal.to_string(),
            right_side: right_side.to_string(),
        }
    }

    /// Splits the right side into alternatives. Epsilon markers are dropped,
    /// so an empty `Vec` is an alternative deriving the empty string.
    pub fn alternatives(&self, delimiter: char) -> Vec<Vec<&str>> {
        self.right_side
            .split(delimiter)
            .map(|alternative| {
                alternative
                    .split_whitespace()
                    .filter(|s| !is_epsilon(s))
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    pub start_symbol: String,
    pub productions: Vec<Production>,
}

impl Grammar {
    pub fn new(start_symbol: &str, productions: Vec<Production>) -> Self {
        Self {
            start_symbol: start_symbol.to_string(),
            productions,
        }
    }

    /// Distinct left-hand sides, in order of first appearance.
    pub fn non_terminals(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.productions
            .iter()
            .map(|p| p.non_terminal.as_str())
            .filter(|&nt| !is_reserved(nt) && seen.insert(nt))
            .collect()
    }

    pub fn non_terminal_set(&self) -> HashSet<&str> {
        self.productions
            .iter()
            .map(|p| p.non_terminal.as_str())
            .filter(|&nt| !is_reserved(nt))
            .collect()
    }

    pub fn productions_of<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a Production> {
        self.productions
            .iter()
            .filter(move |p| p.non_terminal == symbol)
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        is_reserved(symbol) || self.productions_of(symbol).next().is_none()
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Checks the structural invariants the engine relies on. In strict mode
    /// every right-hand-side symbol must also be a nonterminal, a reserved
    /// marker or one of `config.terminals`.
    pub fn validate(&self, config: &AnalyzerConfig) -> Result<()> {
        if self.productions.is_empty() {
            return Err(GrammarError::InvalidInput(
                "grammar has no productions".to_string(),
            ));
        }
        if self.start_symbol.trim().is_empty() {
            return Err(GrammarError::InvalidInput(
                "start symbol is required".to_string(),
            ));
        }
        for production in &self.productions {
            let left = production.non_terminal.as_str();
            if left.is_empty()
                || left != left.trim()
                || left.split_whitespace().count() != 1
            {
                return Err(GrammarError::InvalidInput(format!(
                    "left side \"{}\" must be a single symbol",
                    left
                )));
            }
            if is_reserved(left) {
                return Err(GrammarError::InvalidInput(format!(
                    "reserved marker {} cannot have productions",
                    left
                )));
            }
        }
        if self.productions_of(&self.start_symbol).next().is_none() {
            return Err(GrammarError::InvalidInput(format!(
                "start symbol {} has no production",
                self.start_symbol
            )));
        }

        let non_terminals = self.non_terminal_set();
        let declared: HashSet<&str> = config.terminals.iter().map(|t| t.as_str()).collect();
        for production in &self.productions {
            for alternative in production.alternatives(config.delimiter) {
                for symbol in alternative {
                    if non_terminals.contains(symbol)
                        || is_reserved(symbol)
                        || declared.contains(symbol)
                    {
                        continue;
                    }
                    match config.symbol_mode {
                        SymbolMode::Strict => {
                            return Err(GrammarError::UndefinedSymbol {
                                symbol: symbol.to_string(),
                                non_terminal: production.non_terminal.clone(),
                            })
                        }
                        SymbolMode::Lenient => log::debug!(
                            "treating undeclared symbol {} in {} as terminal",
                            symbol,
                            production.non_terminal
                        ),
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_reserved(symbol: &str) -> bool {
    symbol.is_empty() || is_epsilon(symbol) || symbol == END_MARK
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Grammar, Production};
    use crate::grammar::{AnalyzerConfig, GrammarAnalyzer, GrammarError, SymbolMode};

    fn expr() -> Grammar {
        Grammar::new(
            "E",
            vec![
                Production::new("E", "T E'"),
                Production::new("E'", "+ T E' | ε"),
                Production::new("T", "id"),
            ],
        )
    }

    #[test]
    fn alternatives_split() {
        let p = Production::new("E'", " + T E' |ε|  ");
        assert_eq!(
            p.alternatives('|'),
            vec![vec!["+", "T", "E'"], vec![], vec![]]
        );
        assert_eq!(Production::new("S", "").alternatives('|'), vec![Vec::<&str>::new()]);
    }

    #[test]
    fn classify() {
        let g = expr();
        assert!(!g.is_terminal("E"));
        assert!(!g.is_terminal("E'"));
        assert!(g.is_terminal("id"));
        assert!(g.is_terminal("+"));
        assert!(g.is_terminal(""));
        assert!(g.is_terminal("ε"));
        assert!(g.is_terminal("$"));
        assert!(g.is_terminal("undeclared"));
    }

    #[test]
    fn non_terminals_in_order() {
        let mut g = expr();
        g.productions.push(Production::new("E", "x"));
        assert_eq!(g.non_terminals(), vec!["E", "E'", "T"]);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let g = expr();
        assert_eq!(g.fingerprint(), expr().fingerprint());
        let mut h = expr();
        h.productions[2].right_side = "num".to_string();
        assert_ne!(g.fingerprint(), h.fingerprint());
    }

    #[test]
    fn validate_structure() {
        let config = AnalyzerConfig::default();
        assert_eq!(expr().validate(&config), Ok(()));

        let empty = Grammar::new("S", Vec::new());
        assert!(matches!(
            empty.validate(&config),
            Err(GrammarError::InvalidInput(_))
        ));

        let no_start = Grammar::new("S", vec![Production::new("A", "a")]);
        assert!(matches!(
            no_start.validate(&config),
            Err(GrammarError::InvalidInput(_))
        ));

        let reserved = Grammar::new("S", vec![Production::new("S", "a"), Production::new("$", "b")]);
        assert!(matches!(
            reserved.validate(&config),
            Err(GrammarError::InvalidInput(_))
        ));
    }

    #[test]
    fn validate_strict_symbols() {
        let mut config = AnalyzerConfig {
            symbol_mode: SymbolMode::Strict,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            expr().validate(&config),
            Err(GrammarError::UndefinedSymbol {
                symbol: "+".to_string(),
                non_terminal: "E'".to_string(),
            })
        );

        config.terminals = vec!["+".to_string(), "id".to_string()];
        assert_eq!(expr().validate(&config), Ok(()));
    }

    #[test]
    fn padded_left_side_is_rejected() {
        let g = Grammar::new(
            "S",
            vec![Production::new("S", "A b"), Production::new("A ", "a")],
        );
        assert!(matches!(
            g.validate(&AnalyzerConfig::default()),
            Err(GrammarError::InvalidInput(_))
        ));

        let mut a = GrammarAnalyzer::new();
        assert!(matches!(
            a.compute_first(&g, "S"),
            Err(GrammarError::InvalidInput(_))
        ));
    }

    #[test]
    fn alternate_epsilon_spelling() {
        let g = Grammar::parse("S -> a | ϵ").unwrap();
        assert_eq!(g.productions[0].alternatives('|'), vec![vec!["a"], vec![]]);

        let mut a = GrammarAnalyzer::new();
        let first = a.compute_first(&g, "S").unwrap();
        let expected: HashSet<String> = ["a", "ε"].iter().map(|s| s.to_string()).collect();
        assert_eq!(first, expected);
    }

    #[test]
    fn serde_field_names() {
        let g: Grammar = serde_json::from_str(
            r#"{"startSymbol": "S", "productions": [{"nonTerminal": "S", "rightSide": "a"}]}"#,
        )
        .unwrap();
        assert_eq!(g, Grammar::new("S", vec![Production::new("S", "a")]));
    }
}
