//! The text ⇄ parse tree boundary.
//!
//! The translation core only ever talks to PQL text through [`PqlCodec`], so any parser
//! that produces [`Node`] trees can be plugged in. [`PqlTextCodec`] is the built-in one.

use crate::ast::Node;
use crate::error::ParseError;
use crate::{parser, printer};

pub trait PqlCodec {
    /// Parses PQL text into a statement.
    fn parse(&self, text: &str) -> Result<Vec<Node>, ParseError>;

    /// Serializes a statement back to PQL text.
    fn serialize(&self, nodes: &[Node]) -> String;

    /// Reports whether the text is syntactically valid PQL.
    fn is_valid(&self, text: &str) -> bool {
        self.parse(text).is_ok()
    }
}

/// Codec backed by this crate's lexer, parser and printer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PqlTextCodec;

impl PqlCodec for PqlTextCodec {
    fn parse(&self, text: &str) -> Result<Vec<Node>, ParseError> {
        parser::parse(text)
    }

    fn serialize(&self, nodes: &[Node]) -> String {
        printer::print(nodes)
    }
}
