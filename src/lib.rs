//! Parser and renderers for the small markdown dialect that chat assistants
//! write their replies in: `#`/`##`/`###` headings, `- ` and `• ` bullets,
//! `N.` numbered lines, full-line `**callouts**`, inline `**bold**` and
//! `` `code` ``. Anything else is paragraph text.

mod block;
mod config;
mod error;
mod inline;
mod parser;
mod typst;

pub use block::{Block, Document, Run, Span};
pub use config::{CalloutConfig, Config, FontConfig, LayoutConfig, NumberedConfig, PageConfig};
pub use error::Error;
pub use inline::tokenize;
pub use parser::classify;

use tracing::debug;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse a chat reply into a document tree.
pub fn parse(text: &str) -> Document {
    parser::classify(text)
}

/// Convert a chat reply to Typst markup using default config.
pub fn markdown_to_typst(text: &str) -> String {
    markdown_to_typst_with_config(text, &Config::compiled_default())
}

/// Convert a chat reply to Typst markup with custom config.
pub fn markdown_to_typst_with_config(text: &str, config: &Config) -> String {
    let doc = parse(text);
    typst::blocks_to_typst(&doc, config)
}

/// Serialize the parsed tree as pretty-printed JSON.
pub fn markdown_to_json(text: &str) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(&parse(text))?)
}

/// Convert a chat reply to PDF bytes using default config.
pub fn markdown_to_pdf(text: &str) -> Result<Vec<u8>, Error> {
    markdown_to_pdf_with_config(text, &Config::compiled_default())
}

/// Compile a chat reply to a Typst document.
fn compile_document(
    text: &str,
    config: &Config,
) -> Result<typst_library::layout::PagedDocument, Error> {
    let typst_content = markdown_to_typst_with_config(text, config);
    debug!(bytes = typst_content.len(), "compiling typst markup");

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(config.font.system);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| Error::Compile(format!("{:?}", e)))
}

/// Convert a chat reply to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(text: &str, config: &Config) -> Result<Vec<u8>, Error> {
    let doc = compile_document(text, config)?;
    debug!(pages = doc.pages.len(), "compiled document");

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_export_uses_snake_case_tags() {
        let json = markdown_to_json("1. Go").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "numbered_item": { "label": "1", "content": [{ "plain_text": "Go" }] } }
            ])
        );
    }

    #[test]
    fn parse_and_classify_agree() {
        let text = "# A\n- b\n\n**Callout!**\n2. c";
        assert_eq!(parse(text), classify(text));
    }
}
