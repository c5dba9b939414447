//! Candidate argument synthesis.
//!
//! Tuples come from the suggestion service when it cooperates, and from a
//! deterministic parameter-shape fallback when it does not. Replies are
//! read with the narrow literal parser only.

use std::fmt;

use crate::branches::Branch;
use crate::literal::{parse_literal, parse_tuple_list, Literal};
use crate::source::SourceUnit;
use crate::suggest::SuggestError;

/// The external-collaborator seam. Production code talks to a chat
/// endpoint; tests substitute canned replies.
pub trait SuggestionService {
    fn complete(&self, prompt: &str) -> Result<String, SuggestError>;
}

/// One candidate argument tuple for a probe call.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub args: Vec<Literal>,
}

impl TestCase {
    pub fn new(args: Vec<Literal>) -> Self {
        Self { args }
    }

    /// Render as a call on `name`: `add(1, 2)`.
    pub fn call_text(&self, name: &str) -> String {
        let args: Vec<String> = self.args.iter().map(Literal::to_string).collect();
        format!("{}({})", name, args.join(", "))
    }
}

impl fmt::Display for TestCase {
    /// Python tuple notation, trailing comma on a single element.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        if self.args.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Produce candidate tuples for `unit`. Never fails: service errors and
/// unusable replies degrade to [`fallback_cases`] with a warning.
pub fn synthesize(
    unit: &SourceUnit,
    branches: &[Branch],
    service: &dyn SuggestionService,
) -> Vec<TestCase> {
    let prompt = build_prompt(unit, branches);
    match service.complete(&prompt) {
        Ok(reply) => {
            let cases = extract_cases(&reply);
            if cases.is_empty() {
                eprintln!(
                    "warning: no usable argument tuples in the suggestion reply; using fallback cases"
                );
                fallback_cases(&unit.params)
            } else {
                cases
            }
        }
        Err(err) => {
            eprintln!("warning: suggestion request failed ({err}); using fallback cases");
            fallback_cases(&unit.params)
        }
    }
}

/// Assemble the user prompt: source, signature summary, branch inventory,
/// and the reply-format instruction.
pub fn build_prompt(unit: &SourceUnit, branches: &[Branch]) -> String {
    let mut prompt = format!(
        "Generate test inputs for this Python function:\n\n{}\n\n",
        unit.code.trim_end()
    );
    if unit.params.is_empty() {
        prompt.push_str(&format!("The function `{}` takes no parameters.\n", unit.name));
    } else {
        prompt.push_str(&format!(
            "The function `{}` takes parameters: {}.\n",
            unit.name,
            unit.params.join(", ")
        ));
    }
    if !branches.is_empty() {
        prompt.push_str("Branches to cover:\n");
        for branch in branches {
            prompt.push_str(&format!("- line {}: {}\n", branch.line, branch.description));
        }
    }
    prompt.push_str(
        "\nReply with one Python list of argument tuples, one tuple per call, \
         like [(0,), (10,)]. Reply with the list only.",
    );
    prompt
}

/// Pull argument tuples out of a reply. First a well-formed bracketed
/// tuple list anywhere in the text; failing that, every flat
/// parenthesized group.
pub fn extract_cases(reply: &str) -> Vec<TestCase> {
    for (idx, _) in reply.match_indices('[') {
        if let Some(tuples) = parse_tuple_list(&reply[idx..]) {
            if !tuples.is_empty() {
                return tuples.into_iter().map(TestCase::new).collect();
            }
        }
    }
    flat_groups(reply)
}

/// Innermost `(...)` groups with no nested parentheses, one case per
/// group. Pieces that fail literal parsing ride along as `Raw`.
fn flat_groups(reply: &str) -> Vec<TestCase> {
    let mut cases = Vec::new();
    let mut start = None;
    for (idx, c) in reply.char_indices() {
        match c {
            '(' => start = Some(idx + 1),
            ')' => {
                if let Some(open) = start.take() {
                    cases.push(TestCase::new(split_args(&reply[open..idx])));
                }
            }
            _ => {}
        }
    }
    cases
}

fn split_args(interior: &str) -> Vec<Literal> {
    interior
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| parse_literal(piece).unwrap_or_else(|| Literal::Raw(piece.to_string())))
        .collect()
}

/// Deterministic tuples keyed on the parameter list shape. Pure: the
/// same parameters always yield the same cases.
pub fn fallback_cases(params: &[String]) -> Vec<TestCase> {
    match params.len() {
        0 => int_cases(&[&[0], &[1], &[-1]]),
        1 => {
            let name = params[0].to_lowercase();
            if name.contains("arr") || name.contains("list") {
                // Empty, singleton, ascending, descending, duplicates, unordered.
                let rows: [&[i64]; 6] =
                    [&[], &[1], &[1, 2, 3], &[3, 2, 1], &[1, 1, 2, 2], &[5, 3, 8, 1]];
                rows.iter()
                    .map(|row| {
                        TestCase::new(vec![Literal::Seq(
                            row.iter().copied().map(Literal::Int).collect(),
                        )])
                    })
                    .collect()
            } else {
                int_cases(&[&[0], &[10], &[-10]])
            }
        }
        2 => int_cases(&[&[1, 1], &[-1, -1], &[1, -1], &[-1, 1]]),
        3 => int_cases(&[&[0, 0, 0], &[1, 2, 3], &[-1, -2, -3], &[1, -1, 1]]),
        n => {
            let alternating: Vec<i64> = (0..n).map(|i| if i % 2 == 0 { 1 } else { -1 }).collect();
            let zeros = vec![0; n];
            vec![ints_case(&alternating), ints_case(&zeros)]
        }
    }
}

fn ints_case(values: &[i64]) -> TestCase {
    TestCase::new(values.iter().copied().map(Literal::Int).collect())
}

fn int_cases(rows: &[&[i64]]) -> Vec<TestCase> {
    rows.iter().map(|row| ints_case(row)).collect()
}
