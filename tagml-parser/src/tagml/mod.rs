//! Main module for tagml library functionality

pub mod cursor;
pub mod error;
pub mod escaping;
pub mod include;
pub mod indexed;
pub mod parsing;
pub mod tree;

pub use cursor::{Position, Source};
pub use error::{ParseError, ParseResult};
pub use include::process_includes;
pub use indexed::{IndexedSeq, Key};
pub use parsing::{GrammarConfig, Parser, ParserBuilder};
pub use tree::{Child, NodeId, TagTree, ValueItem, ValuePolicy, ITEM_NAME, ROOT_NAME};
