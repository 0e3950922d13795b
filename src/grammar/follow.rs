use std::collections::{HashMap, HashSet};

use log::debug;

use super::{
    analyzer::{check_symbol, GrammarAnalyzer},
    Grammar, GrammarError, Result, END_MARK, EPSILON,
};

/// Every alternative of every production, tokenized once, with its left side.
type Sites<'g> = Vec<(&'g str, Vec<&'g str>)>;

/// One full pass of the FOLLOW update rule over `sites`. Sets only grow;
/// returns whether any of them did.
fn follow_pass<'g>(
    sites: &[(&'g str, Vec<&'g str>)],
    non_terminals: &HashSet<&'g str>,
    first: &HashMap<&'g str, HashSet<String>>,
    follow: &mut HashMap<&'g str, HashSet<String>>,
) -> bool {
    let mut changed = false;
    for (left, alternative) in sites {
        for (i, &symbol) in alternative.iter().enumerate() {
            if !non_terminals.contains(symbol) {
                continue;
            }

            let mut additions: HashSet<String> = HashSet::new();
            let mut reaches_end = true;
            for &next in &alternative[i + 1..] {
                if !non_terminals.contains(next) {
                    additions.insert(next.to_string());
                    reaches_end = false;
                    break;
                }
                let next_first = first.get(next);
                additions.extend(
                    next_first
                        .into_iter()
                        .flatten()
                        .filter(|s| *s != EPSILON)
                        .cloned(),
                );
                if !next_first.map_or(false, |f| f.contains(EPSILON)) {
                    reaches_end = false;
                    break;
                }
            }
            if reaches_end && symbol != *left {
                if let Some(left_follow) = follow.get(left) {
                    additions.extend(left_follow.iter().cloned());
                }
            }

            let entry = follow.entry(symbol).or_default();
            for terminal in additions {
                changed |= entry.insert(terminal);
            }
        }
    }
    changed
}

fn sites(grammar: &Grammar, delimiter: char) -> Sites<'_> {
    grammar
        .productions
        .iter()
        .flat_map(|p| {
            p.alternatives(delimiter)
                .into_iter()
                .map(move |alternative| (p.non_terminal.as_str(), alternative))
        })
        .collect()
}

impl GrammarAnalyzer {
    /// FOLLOW set of `symbol`. The first call for a grammar resolves FOLLOW
    /// for every nonterminal at once; symbols that are not nonterminals get
    /// an empty set.
    pub fn compute_follow(&mut self, grammar: &Grammar, symbol: &str) -> Result<HashSet<String>> {
        check_symbol(symbol)?;
        self.bind(grammar)?;
        if self.follow_cache.is_none() {
            let follow = self
                .follow_fixpoint(grammar)
                .map_err(|e| e.context(format!("FOLLOW({})", symbol)))?;
            self.follow_cache = Some(follow);
        }
        Ok(self
            .follow_cache
            .as_ref()
            .and_then(|follow| follow.get(symbol))
            .cloned()
            .unwrap_or_default())
    }

    fn follow_fixpoint(&mut self, grammar: &Grammar) -> Result<HashMap<String, HashSet<String>>> {
        let non_terminals = grammar.non_terminal_set();
        let mut first = HashMap::new();
        for nt in grammar.non_terminals() {
            let nt_first = self
                .compute_first(grammar, nt)
                .map_err(|e| e.context(format!("FIRST({})", nt)))?;
            first.insert(nt, nt_first);
        }

        let sites = sites(grammar, self.config.delimiter);
        let mut follow: HashMap<&str, HashSet<String>> = non_terminals
            .iter()
            .map(|&nt| (nt, HashSet::new()))
            .collect();
        follow
            .entry(grammar.start_symbol.as_str())
            .or_default()
            .insert(END_MARK.to_string());

        let max_passes = self.config.max_follow_passes;
        for pass in 1..=max_passes {
            if !follow_pass(&sites, &non_terminals, &first, &mut follow) {
                debug!(
                    "FOLLOW sets of {} nonterminal(s) converged after {} pass(es)",
                    follow.len(),
                    pass
                );
                return Ok(follow
                    .into_iter()
                    .map(|(nt, set)| (nt.to_string(), set))
                    .collect());
            }
        }
        Err(GrammarError::MalformedGrammar { passes: max_passes })
    }
}
