//! Tree-sitter based HTML parsing for claimcheck
//!
//! This crate turns downloaded pages into a small DOM-style tree:
//! - Elements in document order with tag and attribute lookup
//! - Text content with entities decoded and whitespace collapsed
//! - Table rows as `th`/`td` cells
//!
//! # Example
//! ```ignore
//! use parser::HtmlDocument;
//!
//! let doc = HtmlDocument::parse(html)?;
//! for table in doc.tables() {
//!   for row in table.rows() {
//!     println!("{:?}", row.iter().map(|c| c.text()).collect::<Vec<_>>());
//!   }
//! }
//! ```

mod document;
mod error;
pub mod text;

pub use document::{Element, HtmlDocument, Table};
pub use error::ParseError;
