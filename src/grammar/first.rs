use std::collections::{HashMap, HashSet};

use log::trace;

use super::{
    analyzer::{check_symbol, GrammarAnalyzer},
    Grammar, Result, EPSILON,
};

/// One expansion round of a FIRST query. Symbols met again while still being
/// expanded yield their value from the previous round instead of recursing.
struct FirstRound<'g, 'a> {
    grammar: &'g Grammar,
    delimiter: char,
    non_terminals: &'a HashSet<&'g str>,
    cache: &'a HashMap<String, HashSet<String>>,
    previous: &'a HashMap<&'g str, HashSet<String>>,
    in_progress: HashSet<&'g str>,
    done: HashMap<&'g str, HashSet<String>>,
}

impl<'g, 'a> FirstRound<'g, 'a> {
    fn expand(&mut self, symbol: &'g str) -> HashSet<String> {
        if let Some(first) = self.cache.get(symbol).or_else(|| self.done.get(symbol)) {
            return first.clone();
        }
        if self.in_progress.contains(symbol) {
            return self.previous.get(symbol).cloned().unwrap_or_default();
        }

        self.in_progress.insert(symbol);
        let grammar = self.grammar;
        let mut first = HashSet::new();
        for production in grammar.productions_of(symbol) {
            for alternative in production.alternatives(self.delimiter) {
                self.scan(&alternative, &mut first);
            }
        }
        self.in_progress.remove(symbol);

        self.done.insert(symbol, first.clone());
        first
    }

    fn scan(&mut self, alternative: &[&'g str], first: &mut HashSet<String>) {
        for &symbol in alternative {
            if !self.non_terminals.contains(symbol) {
                first.insert(symbol.to_string());
                return;
            }
            let sub = self.expand(symbol);
            let nullable = sub.contains(EPSILON);
            first.extend(sub.into_iter().filter(|s| s != EPSILON));
            if !nullable {
                return;
            }
        }
        first.insert(EPSILON.to_string());
    }
}

impl GrammarAnalyzer {
    /// FIRST set of `symbol`. Symbols without productions have an empty set.
    pub fn compute_first(&mut self, grammar: &Grammar, symbol: &str) -> Result<HashSet<String>> {
        check_symbol(symbol)?;
        self.bind(grammar)?;
        if let Some(first) = self.first_cache.get(symbol) {
            return Ok(first.clone());
        }

        let non_terminals = grammar.non_terminal_set();
        let symbol = match non_terminals.get(symbol) {
            Some(&symbol) => symbol,
            None => return Ok(HashSet::new()),
        };

        let mut provisional: HashMap<&str, HashSet<String>> = HashMap::new();
        let mut rounds = 0;
        loop {
            rounds += 1;
            let done = {
                let mut round = FirstRound {
                    grammar,
                    delimiter: self.config.delimiter,
                    non_terminals: &non_terminals,
                    cache: &self.first_cache,
                    previous: &provisional,
                    in_progress: HashSet::new(),
                    done: HashMap::new(),
                };
                round.expand(symbol);
                round.done
            };

            let stable = done
                .iter()
                .all(|(s, first)| provisional.get(s).map_or(first.is_empty(), |p| p == first));
            provisional = done;
            if stable {
                break;
            }
        }
        trace!(
            "FIRST({}) settled after {} round(s), {} symbol(s) resolved",
            symbol,
            rounds,
            provisional.len()
        );

        let first = provisional.get(symbol).cloned().unwrap_or_default();
        self.first_cache.extend(
            provisional
                .into_iter()
                .map(|(s, first)| (s.to_string(), first)),
        );
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::grammar::{Grammar, GrammarAnalyzer, GrammarError};

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expression_grammar() {
        let g = Grammar::parse("E -> T E'\nE' -> + T E' | ε\nT -> id").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert_eq!(a.compute_first(&g, "E").unwrap(), set(&["id"]));
        assert_eq!(a.compute_first(&g, "E'").unwrap(), set(&["+", "ε"]));
        assert_eq!(a.compute_first(&g, "T").unwrap(), set(&["id"]));
    }

    #[test]
    fn cycle_terminates() {
        let g = Grammar::parse("A -> B\nB -> A | a").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert_eq!(a.compute_first(&g, "A").unwrap(), set(&["a"]));
        assert_eq!(a.compute_first(&g, "B").unwrap(), set(&["a"]));
    }

    #[test]
    fn mutual_recursion_is_complete() {
        // B is expanded while A is in progress; its cached set must still see x.
        let g = Grammar::parse("A -> B | x\nB -> A | y").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert_eq!(a.compute_first(&g, "A").unwrap(), set(&["x", "y"]));
        assert_eq!(a.first_cache.get("B"), Some(&set(&["x", "y"])));
    }

    #[test]
    fn nullable_left_recursion() {
        let g = Grammar::parse("A -> A b | ε").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert_eq!(a.compute_first(&g, "A").unwrap(), set(&["b", "ε"]));
    }

    #[test]
    fn scan_continues_through_nullable() {
        let g = Grammar::parse("S -> A B c\nA -> a |\nB -> | b").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert_eq!(a.compute_first(&g, "S").unwrap(), set(&["a", "b", "c"]));
        assert_eq!(a.compute_first(&g, "A").unwrap(), set(&["a", "ε"]));
    }

    #[test]
    fn all_nullable_adds_epsilon() {
        let g = Grammar::parse("S -> A B\nA -> a | ε\nB -> ε").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert_eq!(a.compute_first(&g, "S").unwrap(), set(&["a", "ε"]));
    }

    #[test]
    fn terminal_has_empty_first() {
        let g = Grammar::parse("S -> a").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert!(a.compute_first(&g, "a").unwrap().is_empty());
    }

    #[test]
    fn returned_set_is_a_copy() {
        let g = Grammar::parse("S -> a").unwrap();
        let mut a = GrammarAnalyzer::new();
        let mut first = a.compute_first(&g, "S").unwrap();
        first.insert("poison".to_string());
        assert_eq!(a.compute_first(&g, "S").unwrap(), set(&["a"]));
    }

    #[test]
    fn empty_symbol_is_rejected() {
        let g = Grammar::parse("S -> a").unwrap();
        let mut a = GrammarAnalyzer::new();
        assert!(matches!(
            a.compute_first(&g, ""),
            Err(GrammarError::InvalidInput(_))
        ));
    }
}
