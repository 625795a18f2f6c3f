use std::sync::OnceLock;

use regex::Regex;

use crate::block::{Run, Span};

fn bold_regex() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"))
}

fn code_regex() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"`(.*?)`").expect("Invalid code regex"))
}

/// Split `text` around every match of `re`, yielding the unmatched text and
/// the first capture group in alternation: `(between, Some(inner))` for each
/// match, then `(tail, None)`.
fn split_captures<'t>(re: &Regex, text: &'t str) -> Vec<(&'t str, Option<&'t str>)> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        pieces.push((&text[last..whole.start()], Some(inner.as_str())));
        last = whole.end();
    }
    pieces.push((&text[last..], None));
    pieces
}

/// Resolve the bold and inline-code runs of one line of text.
///
/// Bold is split out first and emitted verbatim. Only the text around bold
/// runs is searched for backtick code. Delimiters without a partner on the
/// same line are left as literal characters.
pub fn tokenize(text: &str) -> Span {
    let mut runs = Vec::new();

    for (plain, bold) in split_captures(bold_regex(), text) {
        push_plain(plain, &mut runs);
        if let Some(bold) = bold {
            runs.push(Run::Bold(bold.to_string()));
        }
    }

    Span::new(runs)
}

fn push_plain(text: &str, runs: &mut Vec<Run>) {
    for (plain, code) in split_captures(code_regex(), text) {
        if !plain.is_empty() {
            runs.push(Run::PlainText(plain.to_string()));
        }
        if let Some(code) = code {
            runs.push(Run::Code(code.to_string()));
        }
    }
}
