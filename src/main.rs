use std::{fs, io::Read, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use grammar_sets::grammar::pretty_print::{PredictOutput, SetMapOutput, SymbolSetOutputVec};
use grammar_sets::{AnalyzerConfig, Grammar, GrammarAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// FIRST set of every nonterminal
    First,
    /// FOLLOW set of every nonterminal
    Follow,
    /// PREDICT set of every alternative
    Predict,
    /// FIRST, FOLLOW and PREDICT together
    Sets,
}

/// Computes FIRST, FOLLOW and PREDICT sets of a context-free grammar.
///
/// The grammar is read one rule per line, `A -> a B | c`, with lines that
/// start with the delimiter continuing the previous rule.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What to print (first, follow, predict, sets), then the grammar file;
    /// stdin when no file is given
    #[arg(required = true, value_name = "OUTPUT... [FILE]")]
    args: Vec<String>,

    /// Analyzer configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print in LaTeX format
    #[arg(short, long, conflicts_with = "json")]
    latex: bool,

    /// Print in JSON format
    #[arg(short, long)]
    json: bool,
}

impl Args {
    /// Splits the positional list into outputs and an optional trailing file.
    fn outputs_and_input(&self) -> Result<(Vec<Output>, Option<PathBuf>)> {
        let mut outputs = Vec::new();
        let mut rest = self.args.iter();
        let mut input = None;
        for arg in rest.by_ref() {
            match Output::from_str(arg, true) {
                Ok(output) => outputs.push(output),
                Err(_) => {
                    input = Some(PathBuf::from(arg));
                    break;
                }
            }
        }
        if let Some(extra) = rest.next() {
            bail!("unexpected argument \"{}\" after the grammar file", extra);
        }
        if outputs.is_empty() {
            bail!("no output requested; expected one of first, follow, predict, sets");
        }
        Ok((outputs, input))
    }
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn render(
    format: &OutputFormat,
    plain: impl FnOnce() -> String,
    latex: impl FnOnce() -> String,
    json: impl FnOnce() -> grammar_sets::grammar::Result<String>,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Plain => plain(),
        OutputFormat::LaTeX => latex(),
        OutputFormat::JSON => json()?,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (outputs, input_path) = args.outputs_and_input()?;

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };

    let input: String = match &input_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            input
        }
    };

    let output_format = if args.latex {
        OutputFormat::LaTeX
    } else if args.json {
        OutputFormat::JSON
    } else {
        OutputFormat::Plain
    };

    let g = Grammar::parse_with_delimiter(&input, config.delimiter)?;
    let mut analyzer = GrammarAnalyzer::with_config(config);

    for output in outputs {
        let text = match output {
            Output::First => {
                let first = analyzer.first_map(&g)?;
                let t = SetMapOutput::new("First", &first);
                render(&output_format, || t.to_plaintext(), || t.to_latex(), || t.to_json())?
            }
            Output::Follow => {
                let follow = analyzer.follow_map(&g)?;
                let t = SetMapOutput::new("Follow", &follow);
                render(&output_format, || t.to_plaintext(), || t.to_latex(), || t.to_json())?
            }
            Output::Predict => {
                let predict = analyzer.predict_map(&g)?;
                let t = PredictOutput::new(&predict);
                render(&output_format, || t.to_plaintext(), || t.to_latex(), || t.to_json())?
            }
            Output::Sets => {
                let sets = analyzer.symbol_sets(&g)?;
                let t = SymbolSetOutputVec::new(&sets);
                render(&output_format, || t.to_plaintext(), || t.to_latex(), || t.to_json())?
            }
        };
        println!("{}", text);
    }

    Ok(())
}

#[cfg(test)]
mod args_tests {
    use super::{Args, Output};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn trailing_file_is_positional() {
        let args = Args::try_parse_from(["grammar-sets", "first", "follow", "g.txt", "-j"]).unwrap();
        let (outputs, input) = args.outputs_and_input().unwrap();
        assert_eq!(outputs, vec![Output::First, Output::Follow]);
        assert_eq!(input, Some(PathBuf::from("g.txt")));
        assert!(args.json);
    }

    #[test]
    fn stdin_when_no_file() {
        let args = Args::try_parse_from(["grammar-sets", "sets"]).unwrap();
        let (outputs, input) = args.outputs_and_input().unwrap();
        assert_eq!(outputs, vec![Output::Sets]);
        assert_eq!(input, None);
    }

    #[test]
    fn rejects_arguments_after_file() {
        let args = Args::try_parse_from(["grammar-sets", "first", "a.txt", "b.txt"]).unwrap();
        assert!(args.outputs_and_input().is_err());

        let args = Args::try_parse_from(["grammar-sets", "a.txt"]).unwrap();
        assert!(args.outputs_and_input().is_err());
    }
}
