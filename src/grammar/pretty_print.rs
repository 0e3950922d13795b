use std::collections::BTreeMap;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    symbol_set::{AlternativePredict, SymbolSet},
    Result, EPSILON,
};

fn align(output: Vec<Vec<String>>) -> String {
    if output.is_empty() {
        return String::new();
    }
    let width: Vec<usize> = (0..output[0].len())
        .map(|j| output.iter().map(|line| line[j].chars().count()).max().unwrap_or(0))
        .collect();

    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:<width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn set_to_plaintext(set: &[String]) -> String {
    format!("{{{}}}", set.join(", "))
}

fn set_to_latex(set: &[String]) -> String {
    let inner = set
        .iter()
        .map(|s| {
            if s == EPSILON {
                r"\epsilon".to_string()
            } else {
                format!(r"\text{{{}}}", escape::tex(s.as_str()))
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(r"$\{{{}\}}$", inner)
}

fn alternative_to_latex(alternative: &str) -> String {
    alternative
        .split_whitespace()
        .map(|s| escape::tex(s).to_string())
        .collect::<Vec<_>>()
        .join(r"\ ")
        .replace(EPSILON, r"$\epsilon$")
}

/// FIRST or FOLLOW sets of every nonterminal.
#[derive(Serialize)]
#[serde(transparent)]
pub struct SetMapOutput<'a> {
    #[serde(skip)]
    title: &'a str,
    data: &'a BTreeMap<String, Vec<String>>,
}

impl<'a> SetMapOutput<'a> {
    pub fn new(title: &'a str, data: &'a BTreeMap<String, Vec<String>>) -> Self {
        Self { title, data }
    }

    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec!["Symbol".to_string(), self.title.to_string()]];
        output.extend(
            self.data
                .iter()
                .map(|(nt, set)| vec![nt.clone(), set_to_plaintext(set)]),
        );
        align(output)
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|(nt, set)| format!("{} & {}", escape::tex(nt.as_str()), set_to_latex(set)))
            .collect::<Vec<_>>()
            .join("\\\\\n");

        format!(
            "\\begin{{tabular}}{{c|l}}\nSymbol & {}\\\\\\hline\n{}\\\\\n\\end{{tabular}}",
            self.title, content
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// PREDICT sets of every alternative, one row per `A -> α`.
#[derive(Serialize)]
#[serde(transparent)]
pub struct PredictOutput<'a> {
    data: &'a [(String, Vec<AlternativePredict>)],
}

impl<'a> PredictOutput<'a> {
    pub fn new(data: &'a [(String, Vec<AlternativePredict>)]) -> Self {
        Self { data }
    }

    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec!["Production".to_string(), "Predict".to_string()]];
        for (left, alternatives) in self.data {
            for p in alternatives {
                output.push(vec![
                    format!("{} -> {}", left, p.alternative),
                    set_to_plaintext(&p.predict),
                ]);
            }
        }
        align(output)
    }

    pub fn to_latex(&self) -> String {
        let mut content = Vec::new();
        for (left, alternatives) in self.data {
            for p in alternatives {
                content.push(format!(
                    "{} & \\rightarrow & {} & {}",
                    escape::tex(left.as_str()),
                    alternative_to_latex(&p.alternative),
                    set_to_latex(&p.predict)
                ));
            }
        }

        "\\begin{tabular}{cll|l}\n".to_string()
            + "\\multicolumn{3}{c|}{Production} & Predict\\\\\\hline\n"
            + &content.join("\\\\\n")
            + "\\\\\n\\end{tabular}"
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct SymbolSetOutputVec<'a> {
    data: &'a [SymbolSet],
}

impl<'a> SymbolSetOutputVec<'a> {
    pub fn new(data: &'a [SymbolSet]) -> Self {
        Self { data }
    }

    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec![
            "Symbol".to_string(),
            "First".to_string(),
            "Follow".to_string(),
        ]];
        output.extend(self.data.iter().map(|s| {
            vec![
                s.non_terminal.clone(),
                set_to_plaintext(&s.first),
                set_to_plaintext(&s.follow),
            ]
        }));
        align(output)
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|s| {
                format!(
                    "{} & {} & {}",
                    escape::tex(s.non_terminal.as_str()),
                    set_to_latex(&s.first),
                    set_to_latex(&s.follow)
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c}\n".to_string()
            + "Symbol & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
