use super::{Grammar, GrammarError, Production, Result, DEFAULT_DELIMITER};

impl Grammar {
    pub fn parse(grammar: &str) -> Result<Self> {
        Self::parse_with_delimiter(grammar, DEFAULT_DELIMITER)
    }

    /// Reads `A -> α | β` lines. A line starting with the delimiter continues
    /// the previous left side. The first left side is the start symbol.
    pub fn parse_with_delimiter(grammar: &str, delimiter: char) -> Result<Self> {
        let mut g = Self::default();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let error = |message: &str| GrammarError::Parse {
                line: i + 1,
                message: message.to_string(),
            };

            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(error("too many \"->\""));
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(error("empty left side"));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(error("left side contains whitespace"));
                }
                (left_str, parts[1].trim())
            } else {
                match (previous_left, parts[0].trim().strip_prefix(delimiter)) {
                    (Some(left), Some(rights)) => (left, rights.trim()),
                    _ => return Err(error("cannot find left side")),
                }
            };

            previous_left = Some(left);
            if g.start_symbol.is_empty() {
                g.start_symbol = left.to_string();
            }
            g.productions.push(Production::new(left, rights));
        }

        Ok(g)
    }
}
