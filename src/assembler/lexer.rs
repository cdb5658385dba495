/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The assembler's lexer.
//!
//! Source text is scanned into logical lines of tokens.  Spaces, tabs and
//! commas separate tokens; `#` starts a comment running to the end of the
//! line; a token ending in `:` is a label.  A source line that ends in a
//! label (in particular, a line holding nothing but a label) stays open, so
//! the label lands on the same logical line as the next instruction.  Blank
//! lines disappear entirely, which is what makes the logical line index
//! double as the instruction's slot in the output.

use std::collections::VecDeque;

/// A logical source line: a nonempty sequence of tokens, tagged with the
/// 1-based number of the source line its first token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The source line number of the first token.
    pub number: usize,
    /// The tokens of the line, label (if any) first.
    pub tokens: VecDeque<String>,
}

impl Line {
    /// Returns the tokens joined back into a single string, for use in
    /// diagnostics.
    pub fn text(&self) -> String {
        let tokens: Vec<&str> = self.tokens.iter().map(|t| t.as_str()).collect();
        tokens.join(" ")
    }
}

/// Returns whether the given character separates tokens.
fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t' || c == ',' || c == '\r'
}

/// Splits source text into logical lines of tokens.
pub fn tokenize(source: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut pending: VecDeque<String> = VecDeque::new();
    let mut pending_line = 0;

    for (n, raw) in source.lines().enumerate() {
        let code = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        for token in code.split(is_separator) {
            if token.is_empty() {
                continue;
            }
            if pending.is_empty() {
                pending_line = n + 1;
            }
            pending.push_back(token.to_owned());
        }
        // A trailing label keeps the line open so that the label attaches to
        // the next instruction; so does an empty line.
        let open = pending.back().map_or(true, |t| t.ends_with(':'));
        if !open {
            lines.push(Line {
                number: pending_line,
                tokens: pending,
            });
            pending = VecDeque::new();
        }
    }
    if !pending.is_empty() {
        lines.push(Line {
            number: pending_line,
            tokens: pending,
        });
    }

    lines
}
