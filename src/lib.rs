//! A JSON value tree with dynamic-language array and object semantics.
//!
//! Text is parsed into a [`Node`] tree, edited in place with
//! [`Node::get`], [`Node::set`], [`Node::erase`], [`Node::splice`] and
//! friends, then written back out with [`stringify`]. Arrays may carry named
//! entries after their anonymous items, and an erased slot becomes the
//! `undefined` sentinel until [`Node::sanitize`] sweeps it away.
//!
//! ```
//! let mut node = jsontree::parse(r#"{"a":1,"b":[true,false,null]}"#).unwrap();
//! node.erase_key("a").unwrap();
//! assert_eq!(jsontree::stringify(&node).unwrap(), r#"{"b":[true,false,null]}"#);
//! ```

mod array;
pub mod ast;
pub mod error;
pub mod formatter;
pub mod lexer;
pub mod library;
mod node;
pub mod parser;
pub mod util;

pub use ast::{Kind, Members, Node};
pub use error::{Error, Result};
pub use formatter::{stringify, Formatter};
pub use library::{assign, entries, keys, values};
pub use parser::{ParseOptions, Parser};

pub fn parse(text: &str) -> Result<Node> {
    parse_with_options(text, ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: ParseOptions) -> Result<Node> {
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }
    Parser::new(text, options).parse()
}
