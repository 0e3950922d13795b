use std::collections::HashSet;

use super::{analyzer::GrammarAnalyzer, Grammar, GrammarError, Production, Result, EPSILON};

impl GrammarAnalyzer {
    /// PREDICT set of `production`. A production with several alternatives
    /// gets the union of each alternative's PREDICT set.
    pub fn compute_predict(
        &mut self,
        grammar: &Grammar,
        production: &Production,
    ) -> Result<HashSet<String>> {
        if production.non_terminal.trim().is_empty() {
            return Err(GrammarError::InvalidInput(
                "production without left side".to_string(),
            ));
        }
        self.bind(grammar)?;

        let mut predict = HashSet::new();
        for alternative in production.alternatives(self.config.delimiter) {
            self.predict_alternative(grammar, &production.non_terminal, &alternative, &mut predict)
                .map_err(|e| {
                    let right = if alternative.is_empty() {
                        EPSILON.to_string()
                    } else {
                        alternative.join(" ")
                    };
                    e.context(format!("PREDICT({} -> {})", production.non_terminal, right))
                })?;
        }
        Ok(predict)
    }

    fn predict_alternative(
        &mut self,
        grammar: &Grammar,
        left: &str,
        alternative: &[&str],
        predict: &mut HashSet<String>,
    ) -> Result<()> {
        for &symbol in alternative {
            if grammar.is_terminal(symbol) {
                predict.insert(symbol.to_string());
                return Ok(());
            }
            let first = self.compute_first(grammar, symbol)?;
            let nullable = first.contains(EPSILON);
            predict.extend(first.into_iter().filter(|s| s != EPSILON));
            if !nullable {
                return Ok(());
            }
        }
        predict.extend(self.compute_follow(grammar, left)?);
        Ok(())
    }
}
