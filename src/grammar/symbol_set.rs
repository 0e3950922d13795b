use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::{is_epsilon, GrammarAnalyzer, Grammar, Production, Result, END_MARK, EPSILON};

/// PREDICT set of one alternative, keyed by its normalized text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativePredict {
    pub alternative: String,
    pub predict: Vec<String>,
}

/// Everything computed for one nonterminal, in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSet {
    pub non_terminal: String,
    pub first: Vec<String>,
    pub follow: Vec<String>,
    pub predict: Vec<AlternativePredict>,
}

/// Sorts a set for display, with the epsilon and end markers last.
pub fn sorted(set: HashSet<String>) -> Vec<String> {
    let mut v: Vec<String> = set.into_iter().collect();
    v.sort_by(|a, b| {
        (is_epsilon(a), a == END_MARK, a).cmp(&(is_epsilon(b), b == END_MARK, b))
    });
    v
}

fn alternative_text(alternative: &[&str]) -> String {
    if alternative.is_empty() {
        EPSILON.to_string()
    } else {
        alternative.join(" ")
    }
}

impl GrammarAnalyzer {
    pub fn first_map(&mut self, grammar: &Grammar) -> Result<BTreeMap<String, Vec<String>>> {
        self.bind(grammar)?;
        let mut map = BTreeMap::new();
        for nt in grammar.non_terminals() {
            map.insert(nt.to_string(), sorted(self.compute_first(grammar, nt)?));
        }
        Ok(map)
    }

    pub fn follow_map(&mut self, grammar: &Grammar) -> Result<BTreeMap<String, Vec<String>>> {
        self.bind(grammar)?;
        let mut map = BTreeMap::new();
        for nt in grammar.non_terminals() {
            map.insert(nt.to_string(), sorted(self.compute_follow(grammar, nt)?));
        }
        Ok(map)
    }

    /// PREDICT of every alternative, grouped by left side. Alternatives keep
    /// grammar order; duplicates of the same text are merged.
    pub fn predict_map(
        &mut self,
        grammar: &Grammar,
    ) -> Result<Vec<(String, Vec<AlternativePredict>)>> {
        self.bind(grammar)?;
        let mut rows: Vec<(String, Vec<AlternativePredict>)> = grammar
            .non_terminals()
            .into_iter()
            .map(|nt| (nt.to_string(), Vec::new()))
            .collect();

        let delimiter = self.config.delimiter;
        for production in &grammar.productions {
            let row = match rows
                .iter()
                .position(|(nt, _)| *nt == production.non_terminal)
            {
                Some(row) => row,
                None => continue,
            };
            for alternative in production.alternatives(delimiter) {
                let text = alternative_text(&alternative);
                if rows[row].1.iter().any(|p| p.alternative == text) {
                    continue;
                }
                let single = Production::new(&production.non_terminal, &alternative.join(" "));
                let predict = sorted(self.compute_predict(grammar, &single)?);
                rows[row].1.push(AlternativePredict {
                    alternative: text,
                    predict,
                });
            }
        }
        Ok(rows)
    }

    pub fn symbol_sets(&mut self, grammar: &Grammar) -> Result<Vec<SymbolSet>> {
        let predict = self.predict_map(grammar)?;
        let mut sets = Vec::new();
        for (non_terminal, predict) in predict {
            sets.push(SymbolSet {
                first: sorted(self.compute_first(grammar, &non_terminal)?),
                follow: sorted(self.compute_follow(grammar, &non_terminal)?),
                non_terminal,
                predict,
            });
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::sorted;
    use crate::grammar::{Grammar, GrammarAnalyzer};

    #[test]
    fn markers_sort_last() {
        let set = ["$", "b", "ε", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted(set), vec!["a", "b", "$", "ε"]);
    }

    #[test]
    fn expression_symbol_sets() {
        let g = Grammar::parse("E -> T E'\nE' -> + T E' | ε\nT -> id").unwrap();
        let mut a = GrammarAnalyzer::new();
        let sets = a.symbol_sets(&g).unwrap();

        let names: Vec<&str> = sets.iter().map(|s| s.non_terminal.as_str()).collect();
        assert_eq!(names, vec!["E", "E'", "T"]);

        assert_eq!(sets[1].first, vec!["+", "ε"]);
        assert_eq!(sets[2].follow, vec!["+", "$"]);
        assert_eq!(sets[1].predict.len(), 2);
        assert_eq!(sets[1].predict[0].alternative, "+ T E'");
        assert_eq!(sets[1].predict[0].predict, vec!["+"]);
        assert_eq!(sets[1].predict[1].alternative, "ε");
        assert_eq!(sets[1].predict[1].predict, vec!["$"]);
    }

    #[test]
    fn maps_cover_every_non_terminal() {
        let g = Grammar::parse("S -> A b\nA -> a\n| ε").unwrap();
        let mut a = GrammarAnalyzer::new();
        let first = a.first_map(&g).unwrap();
        let follow = a.follow_map(&g).unwrap();
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["A", "S"]);
        assert_eq!(first["S"], vec!["a", "b"]);
        assert_eq!(first["A"], vec!["a", "ε"]);
        assert_eq!(follow["A"], vec!["b"]);
        assert_eq!(follow["S"], vec!["$"]);

        let predict = a.predict_map(&g).unwrap();
        assert_eq!(predict[1].0, "A");
        assert_eq!(predict[1].1[1].predict, vec!["b"]);
    }
}
