use tracing::{debug, trace};

use crate::block::{Block, Document, Span};
use crate::inline::tokenize;

/// Parse a chat reply into blocks, one input line at a time.
pub fn classify(text: &str) -> Document {
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    let mut lines = 0;
    for line in text.split('\n') {
        process_line(trim_line(line), &mut state, &mut blocks);
        lines += 1;
    }
    state.flush_list(&mut blocks);

    debug!(lines, blocks = blocks.len(), "classified reply");
    Document::new(blocks)
}

/// Trim whitespace and byte order marks, which editors and APIs sometimes
/// leave at the start of a reply.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

#[derive(Default)]
struct ParseState {
    // Items of the unordered list currently being collected
    open_list: Option<Vec<Span>>,
}

impl ParseState {
    fn flush_list(&mut self, blocks: &mut Vec<Block>) {
        if let Some(items) = self.open_list.take().filter(|items| !items.is_empty()) {
            blocks.push(Block::ListGroup { items });
        }
    }

    fn in_list(&self) -> bool {
        self.open_list.is_some()
    }
}

/// What a trimmed line looks like on its own, before list state is consulted.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Heading(u8, &'a str),
    ListItem(&'a str),
    Numbered { label: &'a str, rest: &'a str },
    Callout(&'a str),
    Text(&'a str),
    Blank,
}

fn line_kind(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("# ") {
        return LineKind::Heading(1, rest);
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return LineKind::Heading(2, rest);
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return LineKind::Heading(3, rest);
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
        return LineKind::ListItem(rest);
    }
    if let Some((label, rest)) = split_number(line) {
        return LineKind::Numbered { label, rest };
    }
    if line.starts_with("**") && line.ends_with("**") && line.chars().count() > 4 {
        // Both markers are ASCII, so byte slicing is on char boundaries.
        return LineKind::Callout(&line[2..line.len() - 2]);
    }
    if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text(line)
    }
}

/// Split `12. text` into `("12", "text")`. Needs at least one ASCII digit
/// directly followed by a dot; whatever follows the dot is trimmed.
fn split_number(line: &str) -> Option<(&str, &str)> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    Some((&line[..digits], rest.trim()))
}

fn process_line(line: &str, state: &mut ParseState, blocks: &mut Vec<Block>) {
    let kind = line_kind(line);
    trace!(?kind, in_list = state.in_list(), "line");

    match kind {
        LineKind::Heading(level, rest) => {
            state.flush_list(blocks);
            blocks.push(Block::Heading {
                level,
                content: tokenize(rest),
            });
        }

        // List items never flush; they extend the open list or start one.
        LineKind::ListItem(rest) => {
            state
                .open_list
                .get_or_insert_with(Vec::new)
                .push(tokenize(rest));
        }

        LineKind::Numbered { label, rest } => {
            state.flush_list(blocks);
            blocks.push(Block::NumberedItem {
                label: label.to_string(),
                content: tokenize(rest),
            });
        }

        LineKind::Callout(inner) => {
            state.flush_list(blocks);
            blocks.push(Block::Callout {
                content: tokenize(inner),
            });
        }

        // Plain text cannot interleave with an open list: the line is
        // dropped and the list stays open.
        LineKind::Text(_) if state.in_list() => {
            trace!(line, "dropped text line inside list");
        }
        LineKind::Text(text) => {
            blocks.push(Block::Paragraph {
                content: tokenize(text),
            });
        }

        LineKind::Blank => {
            state.flush_list(blocks);
            if !blocks.is_empty() {
                blocks.push(Block::Spacer);
            }
        }
    }
}
