use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::{GrammarError, Result, DEFAULT_DELIMITER, DEFAULT_MAX_FOLLOW_PASSES};

/// How a right-hand-side symbol without productions is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolMode {
    /// Anything that is not a left-hand side is a terminal.
    Lenient,
    /// Such a symbol must be a reserved marker or listed in `terminals`.
    Strict,
}

impl Default for SymbolMode {
    fn default() -> Self {
        SymbolMode::Lenient
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub delimiter: char,
    pub max_follow_passes: usize,
    pub symbol_mode: SymbolMode,
    pub terminals: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_follow_passes: DEFAULT_MAX_FOLLOW_PASSES,
            symbol_mode: SymbolMode::Lenient,
            terminals: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GrammarError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| GrammarError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn check(&self) -> Result<()> {
        if self.delimiter.is_whitespace() {
            return Err(GrammarError::Config(
                "delimiter cannot be whitespace".to_string(),
            ));
        }
        if self.max_follow_passes == 0 {
            return Err(GrammarError::Config(
                "max_follow_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalyzerConfig, SymbolMode};
    use crate::grammar::GrammarError;

    #[test]
    fn missing_fields_take_defaults() {
        let c = AnalyzerConfig::from_json(r#"{"delimiter": ","}"#).unwrap();
        assert_eq!(c.delimiter, ',');
        assert_eq!(c.max_follow_passes, 100);
        assert_eq!(c.symbol_mode, SymbolMode::Lenient);
        assert!(c.terminals.is_empty());
    }

    #[test]
    fn strict_mode_with_terminals() {
        let c = AnalyzerConfig::from_json(r#"{"symbol_mode": "strict", "terminals": ["id", "+"]}"#)
            .unwrap();
        assert_eq!(c.symbol_mode, SymbolMode::Strict);
        assert_eq!(c.terminals, vec!["id", "+"]);
    }

    #[test]
    fn zero_passes_rejected() {
        assert!(matches!(
            AnalyzerConfig::from_json(r#"{"max_follow_passes": 0}"#),
            Err(GrammarError::Config(_))
        ));
    }

    #[test]
    fn whitespace_delimiter_rejected() {
        assert!(matches!(
            AnalyzerConfig::from_json(r#"{"delimiter": " "}"#),
            Err(GrammarError::Config(_))
        ));
    }
}
