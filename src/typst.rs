use crate::block::{Block, Document, Run, Span};
use crate::config::Config;

/// Convert a parsed reply to Typst markup
pub fn blocks_to_typst(doc: &Document, config: &Config) -> String {
    let blocks = doc.blocks();
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if let Some(family) = config.font.family() {
        out.push_str(&format!("#set text(font: \"{}\")\n", typst_str(family)));
    }
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push('\n');

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { .. } => {
                // Keep heading with the first real block after it
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, config, &mut out);
                while i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], config, &mut out);
                    if blocks[i] != Block::Spacer {
                        break;
                    }
                }
                out.push_str("]\n\n");
            }
            _ => {
                emit_block(block, config, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            line_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Paragraph { content } => {
            line_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::ListGroup { items } => {
            // Keep short lists on one page, let long ones break
            if items.len() <= config.layout.keep_list_together {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(items, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(items, out);
                out.push('\n');
            }
        }
        Block::NumberedItem { label, content } => {
            out.push_str(&format!(
                "#box(fill: rgb(\"{}\"), inset: (x: 4pt, y: 2pt), radius: 4pt)[{}] ",
                typst_str(&config.numbered.badge),
                label
            ));
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Callout { content } => {
            let callout = &config.callout;
            out.push_str(&format!(
                "#block(fill: rgb(\"{}\"), stroke: (left: {} + rgb(\"{}\")), inset: 8pt, width: 100%)[#strong[",
                typst_str(&callout.fill),
                callout.stroke_width,
                typst_str(&callout.stroke)
            ));
            line_to_typst(content, out);
            out.push_str("]]\n\n");
        }
        Block::Spacer => {
            out.push_str(&format!("#v({})\n\n", config.layout.spacer));
        }
    }
}

fn list_to_typst(items: &[Span], out: &mut String) {
    for item in items {
        out.push_str("- ");
        line_to_typst(item, out);
        out.push('\n');
    }
}

/// Write spans that begin a markup line, escaping anything Typst would read
/// as a heading, list, enum or term marker.
fn line_to_typst(spans: &Span, out: &mut String) {
    let mut line = String::new();
    spans_to_typst(spans, &mut line);
    push_line_start_escaped(&line, out);
}

fn push_line_start_escaped(line: &str, out: &mut String) {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if line.starts_with(['=', '-', '+']) {
        out.push('\\');
    } else if digits > 0 && line[digits..].starts_with('.') {
        out.push_str(&line[..digits]);
        out.push('\\');
        out.push_str(&line[digits..]);
        return;
    }
    out.push_str(line);
}

fn spans_to_typst(spans: &Span, out: &mut String) {
    let runs = spans.runs();
    for (i, run) in runs.iter().enumerate() {
        run_to_typst(run, out);

        // `#strong[..]` would otherwise absorb a following `.field` or `(args)`
        if matches!(run, Run::Bold(text) if !text.is_empty())
            && matches!(runs.get(i + 1), Some(Run::PlainText(next)) if next.starts_with(['.', '(']))
        {
            out.push(';');
        }
    }
}

fn run_to_typst(run: &Run, out: &mut String) {
    match run {
        Run::PlainText(text) => escape_text(text, out),
        Run::Bold(text) if text.is_empty() => {}
        Run::Bold(text) => {
            // The function form works mid-word, where `*` delimiters do not.
            let mut inner = String::new();
            escape_text(text, &mut inner);
            out.push_str("#strong[");
            push_line_start_escaped(&inner, out);
            out.push(']');
        }
        Run::Code(text) if text.is_empty() => {}
        Run::Code(text) => {
            out.push('`');
            out.push_str(text);
            out.push('`');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    // Escape special Typst characters; `/` because `//` and `/*` open comments
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '~' | '/' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Escape a value for use inside a Typst string literal.
fn typst_str(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::{markdown_to_typst, markdown_to_typst_with_config};
    use pretty_assertions::assert_eq;

    const PREAMBLE: &str = "#set par(linebreaks: \"optimized\")\n\n";

    #[test]
    fn heading() {
        assert_eq!(
            markdown_to_typst("# Hello"),
            format!("{PREAMBLE}#block(breakable: false)[\n= Hello\n\n]\n\n")
        );
    }

    #[test]
    fn heading_levels() {
        assert!(markdown_to_typst("## Two").contains("\n== Two\n"));
        assert!(markdown_to_typst("### Three").contains("\n=== Three\n"));
    }

    #[test]
    fn heading_kept_with_content_past_spacer() {
        let result = markdown_to_typst("# Title\n\nSome text.");
        assert_eq!(
            result,
            format!(
                "{PREAMBLE}#block(breakable: false)[\n= Title\n\n#v(0.4em)\n\nSome text.\n\n]\n\n"
            )
        );
    }

    #[test]
    fn paragraph() {
        assert_eq!(
            markdown_to_typst("Hello world"),
            format!("{PREAMBLE}Hello world\n\n")
        );
    }

    #[test]
    fn bold_and_code() {
        assert_eq!(
            markdown_to_typst("a **b** `c`"),
            format!("{PREAMBLE}a #strong[b] `c`\n\n")
        );
    }

    #[test]
    fn bold_inside_a_word() {
        assert_eq!(
            markdown_to_typst("**API**s and x**y**z"),
            format!("{PREAMBLE}#strong[API]s and x#strong[y]z\n\n")
        );
    }

    #[test]
    fn bold_followed_by_dot_or_paren_ends_expression() {
        assert_eq!(
            markdown_to_typst("see **main**.rs (**lib**(x))"),
            format!("{PREAMBLE}see #strong[main];.rs (#strong[lib];(x))\n\n")
        );
    }

    #[test]
    fn slashes_cannot_open_comments() {
        assert_eq!(
            markdown_to_typst("keep // this text"),
            format!("{PREAMBLE}keep \\/\\/ this text\n\n")
        );
        assert_eq!(
            markdown_to_typst("See **a // b** now /* ok */"),
            format!("{PREAMBLE}See #strong[a \\/\\/ b] now \\/\\* ok \\*\\/\n\n")
        );
    }

    #[test]
    fn bold_content_starting_with_marker_is_escaped() {
        assert_eq!(
            markdown_to_typst("x **- y**"),
            format!("{PREAMBLE}x #strong[\\- y]\n\n")
        );
    }

    #[test]
    fn empty_runs_are_skipped() {
        assert_eq!(markdown_to_typst("****"), format!("{PREAMBLE}\n\n"));
    }

    #[test]
    fn short_list_is_unbreakable() {
        assert_eq!(
            markdown_to_typst("- one\n• two"),
            format!("{PREAMBLE}#block(breakable: false)[\n- one\n- two\n]\n\n")
        );
    }

    #[test]
    fn long_list_may_break() {
        assert_eq!(
            markdown_to_typst("- a\n- b\n- c\n- d\n- e\n- f"),
            format!("{PREAMBLE}- a\n- b\n- c\n- d\n- e\n- f\n\n")
        );
    }

    #[test]
    fn numbered_item_badge() {
        assert_eq!(
            markdown_to_typst("3. Third"),
            format!(
                "{PREAMBLE}#box(fill: rgb(\"#dbeafe\"), inset: (x: 4pt, y: 2pt), radius: 4pt)[3] Third\n\n"
            )
        );
    }

    #[test]
    fn callout_block() {
        assert_eq!(
            markdown_to_typst("**Note this**"),
            format!(
                "{PREAMBLE}#block(fill: rgb(\"#eef4ff\"), stroke: (left: 3pt + rgb(\"#3b82f6\")), inset: 8pt, width: 100%)[#strong[Note this]]\n\n"
            )
        );
    }

    #[test]
    fn callout_content_starting_with_marker_is_escaped() {
        let result = markdown_to_typst("**= Warning**\n**- note**");
        assert!(result.contains("[#strong[\\= Warning]]\n"));
        assert!(result.contains("[#strong[\\- note]]\n"));
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(markdown_to_typst("a * b"), format!("{PREAMBLE}a \\* b\n\n"));
        assert_eq!(markdown_to_typst("a # b"), format!("{PREAMBLE}a \\# b\n\n"));
        assert_eq!(markdown_to_typst("a_b"), format!("{PREAMBLE}a\\_b\n\n"));
    }

    #[test]
    fn escapes_line_start_markers() {
        assert_eq!(markdown_to_typst("= x"), format!("{PREAMBLE}\\= x\n\n"));
        assert_eq!(markdown_to_typst("+ x"), format!("{PREAMBLE}\\+ x\n\n"));
        assert!(markdown_to_typst("- - nested").contains("\n- \\- nested\n"));
        assert!(markdown_to_typst("## 2. Setup").contains("\n== 2\\. Setup\n"));
    }

    #[test]
    fn config_changes_preamble_and_styles() {
        let mut config = Config::default();
        config.page.numbers = true;
        config.font.family = "Inter".to_string();
        config.layout.spacer = "1em".to_string();

        let result = markdown_to_typst_with_config("a\n\nb", &config);
        assert_eq!(
            result,
            "#set par(linebreaks: \"optimized\")\n#set text(font: \"Inter\")\n#set page(numbering: \"1\")\n\na\n\n#v(1em)\n\nb\n\n"
        );
    }
}
