//! Mode Classifier - Decides How Stimuli Reach the Solution
//!
//! **Core Responsibility:**
//! Look at the solution source and one sample stimulus, and decide whether the
//! stimuli of the whole run are code appended to the solution or text piped to
//! standard input.
//!
//! **Heuristic:**
//! - Collect the names introduced by every `def` and every `class` in the source
//! - If the sample stimulus mentions any of those names, stimuli are code
//! - Otherwise stimuli are standard input
//!
//! The scan is plain substring matching, so `def` inside `undefined` counts as
//! an occurrence just like a real definition. The decision is taken once per
//! run from the first test only.

use clap::ValueEnum;
use clue_common::types::ExecutionMode;
use tracing::debug;

/// A construct-introducing keyword and the character that ends its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Construct {
    pub keyword: &'static str,
    pub terminator: char,
}

pub const FUNCTION: Construct = Construct {
    keyword: "def",
    terminator: '(',
};

/// Classes may omit the parameter list, so the name runs up to `:`
pub const CLASS: Construct = Construct {
    keyword: "class",
    terminator: ':',
};

/// Run-wide mode selection from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeChoice {
    /// Classify from the solution and the first test
    #[default]
    Auto,
    /// Append every stimulus to the solution
    Code,
    /// Pipe every stimulus to standard input
    Stdin,
}

impl ModeChoice {
    pub fn resolve(self, solution: &str, sample: &str) -> ExecutionMode {
        match self {
            ModeChoice::Auto => classify(solution, sample),
            ModeChoice::Code => ExecutionMode::CodeAppend,
            ModeChoice::Stdin => ExecutionMode::StdinFeed,
        }
    }
}

/// Decide the execution mode for a run
pub fn classify(solution: &str, sample: &str) -> ExecutionMode {
    if is_invoked(solution, sample, FUNCTION) || is_invoked(solution, sample, CLASS) {
        ExecutionMode::CodeAppend
    } else {
        ExecutionMode::StdinFeed
    }
}

/// Whether any name introduced by `construct` shows up in `sample`.
///
/// A decorator use `@name` contains the bare name, so one check covers both.
pub fn is_invoked(solution: &str, sample: &str, construct: Construct) -> bool {
    let names = defined_names(solution, construct);
    debug!(keyword = construct.keyword, names = ?names, "Collected definitions");

    names.iter().any(|name| sample.contains(name))
}

/// Names following each occurrence of `construct.keyword`, in source order.
///
/// A name starts one character after the keyword and ends at the next
/// terminator, or at the end of the source when none follows. Class names
/// lose their base-class list.
pub fn defined_names(source: &str, construct: Construct) -> Vec<&str> {
    let mut names = Vec::new();
    let mut cursor = 0;

    while let Some(found) = source[cursor..].find(construct.keyword) {
        let keyword_end = cursor + found + construct.keyword.len();
        cursor = keyword_end;

        let rest = &source[keyword_end..];
        let separator = rest.chars().next().map_or(0, char::len_utf8);
        let rest = &rest[separator..];

        let mut name = match rest.find(construct.terminator) {
            Some(end) => &rest[..end],
            // whole tail, last character included
            None => rest,
        };
        if construct == CLASS {
            if let Some(paren) = name.find('(') {
                name = &name[..paren];
            }
        }

        names.push(name);
    }

    names
}
