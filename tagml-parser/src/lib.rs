//! # tagml
//!
//! A parser for the tagml markup format.
//!
//! Format Overview
//!
//!     Tagml is an indentation-sensitive markup language. A tag is an escape
//!     character followed by a name. Written at the start of a line, a tag's body
//!     is the subsequent more-indented lines (like Python, the block closes on
//!     dedent). Written mid-line with bracketed arguments, a tag is inline and its
//!     arguments may span lines. A block-type tag appearing mid-line is an
//!     "attribute" tag: its body runs to the next attribute tag or the end of the
//!     logical line.
//!
//!         Hello
//!         \section
//!             Some text with an \emph{inline} tag.
//!             \figure \label fig:one
//!                 \caption A figure
//!
//!     Parsing produces an ordered, navigable tree of named nodes whose children
//!     are text chunks or nested tags. The grammar is recursive descent over a
//!     (start, stop) cursor range with no backtracking; the first structural
//!     error aborts the parse.
//!
//! Layout
//!
//!     The crate follows src/tagml/<concern>, one file per concern:
//!
//!     src/tagml
//!       ├── indexed    Key-indexed ordered container backing every child list
//!       ├── cursor     Line array + immutable (line, offset) positions
//!       ├── escaping   Placeholder pass that runs before structural scanning
//!       ├── tree       The tag tree: arena, navigation, serialization
//!       ├── parsing    Parser configuration and the fragment grammar
//!       ├── include    Post-parse include splicing
//!       └── error      The single structural error kind
//!
//! For the renderer collaborator (handler table over a parsed tree), see the
//! sibling `tagml-render` crate.

#![allow(rustdoc::invalid_html_tags)]

pub mod tagml;
