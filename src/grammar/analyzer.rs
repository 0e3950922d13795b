use std::collections::{HashMap, HashSet};

use log::debug;

use super::{AnalyzerConfig, Grammar, GrammarError, Result};

/// Computes FIRST, FOLLOW and PREDICT sets, memoizing FIRST per symbol and
/// FOLLOW per grammar.
///
/// Cache keys are bare symbol names. The analyzer remembers a fingerprint of
/// the grammar the caches were filled from and drops them when a different
/// grammar is queried, but callers switching grammars should still call
/// [`GrammarAnalyzer::clear_cache`]. Not meant to be shared between threads
/// without a lock.
#[derive(Debug, Default)]
pub struct GrammarAnalyzer {
    pub(super) config: AnalyzerConfig,
    pub(super) first_cache: HashMap<String, HashSet<String>>,
    /// `None` until the FOLLOW fixpoint has run for the bound grammar.
    pub(super) follow_cache: Option<HashMap<String, HashSet<String>>>,
    bound: Option<u64>,
}

impl GrammarAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn clear_cache(&mut self) {
        debug!(
            "clearing {} FIRST entries and {} FOLLOW entries",
            self.first_cache.len(),
            self.follow_cache.as_ref().map_or(0, |f| f.len())
        );
        self.first_cache.clear();
        self.follow_cache = None;
        self.bound = None;
    }

    /// Ties the caches to `grammar`, validating it the first time it is seen.
    pub(super) fn bind(&mut self, grammar: &Grammar) -> Result<()> {
        let fingerprint = grammar.fingerprint();
        if self.bound == Some(fingerprint) {
            return Ok(());
        }
        if self.bound.is_some() {
            debug!("grammar changed since the caches were filled");
            self.clear_cache();
        }
        self.config.check()?;
        grammar.validate(&self.config)?;
        self.bound = Some(fingerprint);
        Ok(())
    }
}

pub(super) fn check_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        Err(GrammarError::InvalidInput("empty symbol".to_string()))
    } else {
        Ok(())
    }
}
