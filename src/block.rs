use serde::Serialize;

/// Smallest inline unit of a chat reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Run {
    PlainText(String),
    /// Bold text is kept verbatim; backticks inside it are not code.
    Bold(String),
    Code(String),
}

impl Run {
    /// The literal text of the run, without delimiters.
    pub fn text(&self) -> &str {
        match self {
            Run::PlainText(text) | Run::Bold(text) | Run::Code(text) => text,
        }
    }
}

/// Inline content of one block or list item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Span(Vec<Run>);

impl Span {
    pub fn new(runs: Vec<Run>) -> Self {
        Self(runs)
    }

    pub fn runs(&self) -> &[Run] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.0.iter()
    }

    /// Concatenated text of every run with the bold and code markers removed.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(Run::text).collect()
    }
}

impl From<Vec<Run>> for Span {
    fn from(runs: Vec<Run>) -> Self {
        Self(runs)
    }
}

impl<'a> IntoIterator for &'a Span {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Block-level elements of the chat dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Span,
    },
    /// One contiguous run of `- ` / `• ` lines.
    ListGroup {
        items: Vec<Span>,
    },
    /// A single `N.` line. Consecutive numbered lines stay separate blocks.
    NumberedItem {
        label: String,
        content: Span,
    },
    /// A whole line wrapped in `**`, rendered as a highlighted box.
    Callout {
        content: Span,
    },
    Paragraph {
        content: Span,
    },
    Spacer,
}

/// Parsed chat reply, in input line order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document(Vec<Block>);

impl Document {
    pub(crate) fn new(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.0.iter()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Document {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_drops_markers() {
        let span = Span::new(vec![
            Run::PlainText("use ".to_string()),
            Run::Code("cargo".to_string()),
            Run::PlainText(" or ".to_string()),
            Run::Bold("make".to_string()),
        ]);
        assert_eq!(span.plain_text(), "use cargo or make");
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn owned_document_yields_blocks_in_order() {
        let blocks = vec![
            Block::Paragraph {
                content: Span::from(vec![Run::PlainText("a".to_string())]),
            },
            Block::Spacer,
        ];
        let doc = Document::new(blocks.clone());

        assert_eq!(doc.clone().into_blocks(), blocks);
        assert_eq!(doc.into_iter().collect::<Vec<_>>(), blocks);
    }

    #[test]
    fn serializes_externally_tagged() {
        let doc = Document::new(vec![
            Block::Heading {
                level: 2,
                content: Span::new(vec![Run::Bold("Hi".to_string())]),
            },
            Block::Spacer,
        ]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"[{"heading":{"level":2,"content":[{"bold":"Hi"}]}},"spacer"]"#
        );
    }
}
