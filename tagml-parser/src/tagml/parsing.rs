//! Parser configuration and the fragment grammar
//!
//!     A `Parser` carries read-only grammar configuration: the escape
//!     character, the tag names recognized in block position, the names
//!     recognized in inline position, an alias table mapping surface tokens to
//!     canonical names, and the reserved include tag (always allowed). One
//!     parser is safely reused across many parses; every per-parse cache (the
//!     escaped line array and indent table) is local to the parse call.
//!
//! The Grammar
//!
//!     Parsing is recursive descent over a (start, stop) position range with
//!     no backtracking. `parse_fragment` walks the range line by line and emits
//!     a flat sequence of children; everything strictly before the cursor has
//!     already been emitted as text or a tag. Per line:
//!
//!         1. A blank line keeps its newline and advances.
//!         2. At a line start the line is dedented by the current indent
//!            (dedent mismatch is an error) and block mode is entered.
//!         3. In block mode a line beginning with the escape character may open
//!            a block tag; its body is the rest of the line plus the following
//!            more-indented lines, delimited by the block extent scan.
//!         4. Otherwise the line is scanned for the next tag of any kind. A
//!            block-type tag found mid-line is an attribute tag whose body runs
//!            to the next attribute tag or end of line; an inline tag collects
//!            bracketed arguments, `{...}` splicing and `[...]` wrapping into
//!            an `_item` node. Unrecognized names are skipped.
//!         5. Text between tags accumulates into chunks, unescaped only when
//!            finally appended as a leaf.
//!
//!     The tag-name token is one or more characters excluding whitespace,
//!     `{`, `[`, `&` and the escape character. The regex engine here has no
//!     lookahead, so the boundary that the original notation expresses as a
//!     lookahead is checked on the character following the name: space, escape
//!     character or end of line means block position, `{` or `[` means inline
//!     position, anything else is not a tag.

use crate::tagml::cursor::{Position, Source};
use crate::tagml::error::{ParseError, ParseResult};
use crate::tagml::escaping::Escaper;
use crate::tagml::tree::{Child, NodeId, TagTree, ITEM_NAME, ROOT_NAME};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// The reserved prefix character, used unless the grammar overrides it.
pub const DEFAULT_ESCAPE_CHAR: char = '\\';
/// The include tag name, implicitly allowed by every grammar.
pub const DEFAULT_INCLUDE_TAG: &str = "_include";

/// Whitespace run, used to skip from a tag name to its body.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*").unwrap());

/// Declarative grammar description, loadable from a data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    #[serde(default = "default_escape_char")]
    pub escape_char: char,
    /// Tag names recognized in block position.
    pub tags: BTreeSet<String>,
    /// Tag names recognized in inline position; defaults to `tags`.
    #[serde(default)]
    pub inline_tags: Option<BTreeSet<String>>,
    /// Surface token to canonical tag name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default = "default_include_tag")]
    pub include_tag: String,
}

fn default_escape_char() -> char {
    DEFAULT_ESCAPE_CHAR
}

fn default_include_tag() -> String {
    DEFAULT_INCLUDE_TAG.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Block,
    Inline,
}

/// A tag recognized by `locate_tag`.
#[derive(Debug)]
struct Located {
    name: String,
    kind: TagKind,
    /// First non-space position after the name (block), or the first bracket
    /// (inline).
    after: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BracketKind {
    Curly,
    Square,
}

/// One bracketed argument of an inline tag; `start..stop` is the interior.
#[derive(Debug)]
struct InlineArg {
    kind: BracketKind,
    start: Position,
    stop: Position,
}

/// General tagml parser.
#[derive(Debug)]
pub struct Parser {
    escape_char: char,
    block_tags: HashSet<String>,
    inline_tags: HashSet<String>,
    aliases: HashMap<String, String>,
    include_tag: String,
    escaper: Escaper,
    tag_re: Regex,
}

/// Builder for `Parser`; the inline set defaults to the block set.
#[derive(Debug, Default)]
pub struct ParserBuilder {
    escape_char: Option<char>,
    block_tags: HashSet<String>,
    inline_tags: Option<HashSet<String>>,
    aliases: HashMap<String, String>,
    include_tag: Option<String>,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escape_char(mut self, escape_char: char) -> Self {
        self.escape_char = Some(escape_char);
        self
    }

    pub fn block_tag(mut self, name: impl Into<String>) -> Self {
        self.block_tags.insert(name.into());
        self
    }

    pub fn block_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_tags.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn inline_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inline_tags
            .get_or_insert_with(HashSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn include_tag(mut self, name: impl Into<String>) -> Self {
        self.include_tag = Some(name.into());
        self
    }

    pub fn build(self) -> Parser {
        let escape_char = self.escape_char.unwrap_or(DEFAULT_ESCAPE_CHAR);
        let include_tag = self
            .include_tag
            .unwrap_or_else(|| DEFAULT_INCLUDE_TAG.to_string());
        let mut block_tags = self.block_tags;
        block_tags.insert(include_tag.clone());
        let inline_tags = self.inline_tags.unwrap_or_else(|| block_tags.clone());

        // escape char + name token; the name excludes whitespace, brackets
        // that open arguments, `&` (placeholder alphabet) and the escape char
        let escaped = regex::escape(&escape_char.to_string());
        let pattern = format!(r"{esc}([^\s{{\[&{esc}]+)", esc = escaped);
        let tag_re = Regex::new(&pattern).expect("tag pattern must compile");

        Parser {
            escape_char,
            block_tags,
            inline_tags,
            aliases: self.aliases,
            include_tag,
            escaper: Escaper::new(escape_char),
            tag_re,
        }
    }
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parser with the default escape character and the given block tags
    /// (also recognized inline).
    pub fn new<I, S>(block_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Parser::builder().block_tags(block_tags).build()
    }

    pub fn from_config(config: &GrammarConfig) -> Self {
        let mut builder = Parser::builder()
            .escape_char(config.escape_char)
            .block_tags(config.tags.iter().cloned())
            .include_tag(config.include_tag.clone());
        if let Some(inline) = &config.inline_tags {
            builder = builder.inline_tags(inline.iter().cloned());
        }
        for (from, to) in &config.aliases {
            builder = builder.alias(from.clone(), to.clone());
        }
        builder.build()
    }

    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    pub fn include_tag(&self) -> &str {
        &self.include_tag
    }

    /// Parse a whole document into a tree rooted at `_root`.
    pub fn parse(&self, text: &str) -> ParseResult<TagTree> {
        self.parse_lines(split_keepends(text))
    }

    /// Parse a pre-split line array (each line keeping its newline).
    pub fn parse_lines(&self, lines: Vec<String>) -> ParseResult<TagTree> {
        let src = self.prepare(lines)?;
        let mut tree = TagTree::new(ROOT_NAME);
        if src.line_count() > 0 {
            let base_indent = src.first_content_indent();
            let children = self.parse_fragment(
                &src,
                &mut tree,
                src.start(),
                src.end(),
                base_indent,
                false,
            )?;
            let root = tree.root();
            tree.extend_children(root, children);
        }
        Ok(tree)
    }

    /// Read and parse a file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseResult<TagTree> {
        let text = fs::read_to_string(path)?;
        self.parse(&text)
    }

    /// Escape every line and build the per-parse source state.
    pub(crate) fn prepare(&self, lines: Vec<String>) -> ParseResult<Source> {
        let escaped = lines
            .iter()
            .map(|line| self.escaper.escape_line(line))
            .collect();
        Source::new(escaped)
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// The recursive scan producing the children of one fragment.
    ///
    /// Loop invariant: everything strictly before the cursor has been emitted
    /// into `out` or the pending text chunk.
    pub(crate) fn parse_fragment(
        &self,
        src: &Source,
        tree: &mut TagTree,
        start: Position,
        stop: Position,
        current_indent: usize,
        merge_lines: bool,
    ) -> ParseResult<Vec<Child>> {
        let mut out: Vec<Child> = Vec::new();
        let mut chunk = String::new();
        let mut pos = start;

        while pos < stop {
            let clipped = src.clipped_line(pos, stop);
            if clipped.trim().is_empty() {
                if clipped.ends_with('\n') {
                    chunk.push('\n');
                }
                pos = src.next_line(pos);
                continue;
            }

            let block_mode = pos.offset == 0;
            let line = if block_mode {
                let dedented = dedent(clipped, current_indent)?;
                pos = Position::new(pos.line, current_indent);
                dedented.to_string()
            } else {
                clipped.to_string()
            };

            if !merge_lines && block_mode && line.starts_with(self.escape_char) {
                if let Some((name, name_end)) = self.block_tag_at_start(&line) {
                    let resolved = self.resolve(name).to_string();
                    if self.block_tags.contains(&resolved) {
                        let body_start = current_indent + first_nonspace_idx(&line, name_end);
                        let (body_stop_line, body_indent) =
                            self.block_extent(src, pos.line, stop.line)?;
                        let children = self.parse_fragment(
                            src,
                            tree,
                            Position::new(pos.line, body_start),
                            Position::new(body_stop_line, 0),
                            body_indent,
                            false,
                        )?;
                        self.flush_chunk(&mut out, &mut chunk);
                        out.push(Child::Tag(build_tag(tree, &resolved, children)));
                        pos = Position::new(body_stop_line, 0);
                        continue;
                    }
                }
            }

            let (tag_pos, located) = self.locate_tag(src, pos, stop);
            let Some(found) = located else {
                chunk.push_str(&line);
                pos = src.next_line(pos);
                continue;
            };

            chunk.push_str(src.clipped_line(pos, tag_pos));
            self.flush_chunk(&mut out, &mut chunk);
            match found.kind {
                TagKind::Block => {
                    // attribute tag: the body runs to the next block-type tag
                    // on this logical line, or to its end
                    let (body_stop, _) =
                        self.scan_after_attribute_tag(src, found.after, stop, merge_lines)?;
                    let children = self.parse_fragment(
                        src,
                        tree,
                        found.after,
                        body_stop,
                        current_indent,
                        false,
                    )?;
                    out.push(Child::Tag(build_tag(tree, &found.name, children)));
                    pos = body_stop;
                }
                TagKind::Inline => {
                    let args = self.inline_tag_contents(src, found.after, stop)?;
                    let mut parsed: Vec<Child> = Vec::new();
                    for arg in &args {
                        let content = self.parse_fragment(
                            src,
                            tree,
                            arg.start,
                            arg.stop,
                            current_indent,
                            true,
                        )?;
                        match arg.kind {
                            BracketKind::Curly => parsed.extend(content),
                            BracketKind::Square => {
                                parsed.push(Child::Tag(build_tag(tree, ITEM_NAME, content)));
                            }
                        }
                    }
                    out.push(Child::Tag(build_tag(tree, &found.name, parsed)));
                    pos = match args.last() {
                        Some(last) => src.next_char(last.stop),
                        None => found.after,
                    };
                }
            }
        }

        self.flush_chunk(&mut out, &mut chunk);
        Ok(out)
    }

    fn flush_chunk(&self, out: &mut Vec<Child>, chunk: &mut String) {
        if !chunk.is_empty() {
            out.push(Child::Text(self.escaper.unescape(chunk)));
            chunk.clear();
        }
    }

    /// Match a block tag anchored at the start of a (dedented) line; returns
    /// the raw name and the byte offset just past it.
    fn block_tag_at_start<'a>(&self, line: &'a str) -> Option<(&'a str, usize)> {
        let caps = self.tag_re.captures(line)?;
        let whole = caps.get(0)?;
        let name = caps.get(1)?;
        if whole.start() != 0 {
            return None;
        }
        if !self.block_boundary(line, name.end()) {
            return None;
        }
        Some((name.as_str(), name.end()))
    }

    /// Whether the character after a name leaves the tag in block position:
    /// a space, the escape character, or the end of the line.
    fn block_boundary(&self, line: &str, name_end: usize) -> bool {
        let rest = &line[name_end..];
        match rest.chars().next() {
            None => true,
            Some(' ') => true,
            Some(c) if c == self.escape_char => true,
            Some('\n') => rest == "\n",
            _ => false,
        }
    }

    /// Locate the next tag on the line starting at `start`. Does not look at
    /// the following lines. Returns the position where scanning stopped (the
    /// tag's escape character, or the end of line) and the recognized tag.
    fn locate_tag(&self, src: &Source, start: Position, stop: Position) -> (Position, Option<Located>) {
        let line = src.clipped_line(start, stop);
        for caps in self.tag_re.captures_iter(line) {
            let whole = caps.get(0).expect("capture 0 always present");
            let name = caps.get(1).expect("name group always present");
            let resolved = self.resolve(name.as_str());
            let next_char = line[name.end()..].chars().next();
            let inline_position = matches!(next_char, Some('{') | Some('['));
            let allowed = if inline_position {
                self.inline_tags.contains(resolved)
            } else {
                self.block_tags.contains(resolved) && self.block_boundary(line, name.end())
            };
            if !allowed {
                continue;
            }
            let tag_pos = Position::new(start.line, start.offset + whole.start());
            let after = Position::new(
                start.line,
                start.offset + first_nonspace_idx(line, name.end()),
            );
            let kind = if inline_position {
                TagKind::Inline
            } else {
                TagKind::Block
            };
            return (
                tag_pos,
                Some(Located {
                    name: resolved.to_string(),
                    kind,
                    after,
                }),
            );
        }
        (src.end_of_line(start).min(stop), None)
    }

    /// Determine how many following lines belong to a block tag's body and at
    /// what indent. Returns the first line past the body and the body indent.
    fn block_extent(
        &self,
        src: &Source,
        start_line: usize,
        stop_line: usize,
    ) -> ParseResult<(usize, usize)> {
        let tag_indent = src.indent(start_line).unwrap_or(0);
        if stop_line <= start_line + 1 {
            // no more lines; the tag consumed only its own
            return Ok((start_line + 1, 0));
        }

        let mut cur = start_line + 1;
        while cur < stop_line && src.indent(cur).is_none() {
            cur += 1;
        }
        if cur == stop_line {
            // only blank lines follow
            return Ok((cur, 0));
        }

        let content_indent = src.indent(cur).unwrap_or(0);
        if content_indent <= tag_indent {
            // the tag is already closed
            return Ok((cur, 0));
        }

        for i in (cur + 1)..stop_line {
            let Some(indent) = src.indent(i) else {
                continue;
            };
            if indent < content_indent {
                if indent > tag_indent {
                    return Err(ParseError::with_line(
                        "incorrect indent",
                        src.line(i).unwrap_or_default(),
                    ));
                }
                return Ok((i, content_indent));
            }
        }
        Ok((stop_line, content_indent))
    }

    /// Collect the bracketed argument list of an inline tag, starting right
    /// at the first bracket.
    fn inline_tag_contents(
        &self,
        src: &Source,
        start: Position,
        stop: Position,
    ) -> ParseResult<Vec<InlineArg>> {
        let mut args = Vec::new();
        let mut pos = start;
        while pos < stop {
            let kind = match src.char_at(pos) {
                Some('{') => BracketKind::Curly,
                Some('[') => BracketKind::Square,
                _ => break,
            };
            let close = self.match_bracket(src, pos, stop)?;
            args.push(InlineArg {
                kind,
                start: src.next_char(pos),
                stop: close,
            });
            pos = src.next_char(close);
        }
        Ok(args)
    }

    /// Find the matching closing bracket via a balanced counter, scanning
    /// across lines. Counters are per bracket kind.
    fn match_bracket(&self, src: &Source, start: Position, stop: Position) -> ParseResult<Position> {
        let (open, close) = match src.char_at(start) {
            Some('{') => ('{', '}'),
            Some('[') => ('[', ']'),
            other => {
                return Err(ParseError::new(format!(
                    "expected a bracket at {}, found {:?}",
                    start, other
                )))
            }
        };
        let mut counter: usize = 0;
        let mut pos = start;
        while pos < stop {
            let line = src.clipped_line(pos, stop);
            for (i, ch) in line.char_indices() {
                if ch == open {
                    counter += 1;
                } else if ch == close {
                    counter -= 1;
                    if counter == 0 {
                        return Ok(Position::new(pos.line, pos.offset + i));
                    }
                }
            }
            pos = src.next_line(pos);
        }
        Err(ParseError::new(format!(
            "no closing bracket found: start {}, stop {}",
            start, stop
        )))
    }

    /// Scan the rest of the line (or fragment, when merging) after a block
    /// tag found mid-line, looking for the next block-type tag and skipping
    /// every inline tag together with its bracketed contents.
    ///
    /// Returns the position where the body ends, plus the body start of the
    /// next attribute tag when one was found.
    fn scan_after_attribute_tag(
        &self,
        src: &Source,
        start: Position,
        stop: Position,
        merge_lines: bool,
    ) -> ParseResult<(Position, Option<Position>)> {
        let stop = if merge_lines {
            stop
        } else {
            stop.min(src.next_line(start))
        };
        let mut pos = start;
        let mut end = start;
        while pos < stop {
            let (tag_pos, located) = self.locate_tag(src, pos, stop);
            match located {
                None => {
                    pos = src.next_line(pos);
                    end = tag_pos;
                }
                Some(found) if found.kind == TagKind::Block => {
                    return Ok((tag_pos, Some(found.after)));
                }
                Some(found) => {
                    let args = self.inline_tag_contents(src, found.after, stop)?;
                    pos = match args.last() {
                        Some(last) => src.next_char(last.stop),
                        None => found.after,
                    };
                    end = src.end_of_line(pos).min(stop);
                }
            }
        }
        Ok((end, None))
    }
}

/// Create a tag node and attach its already-parsed children.
fn build_tag(tree: &mut TagTree, name: &str, children: Vec<Child>) -> NodeId {
    let id = tree.new_node(name);
    tree.extend_children(id, children);
    id
}

fn split_keepends(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(String::from).collect()
}

/// Strip exactly `indent` leading spaces.
fn dedent(line: &str, indent: usize) -> ParseResult<&str> {
    if line.len() >= indent && line.as_bytes()[..indent].iter().all(|&b| b == b' ') {
        Ok(&line[indent..])
    } else {
        Err(ParseError::with_line(
            format!("cannot dedent line by {}", indent),
            line,
        ))
    }
}

/// Byte index of the first non-whitespace character at or after `from`, or
/// the end of the line.
fn first_nonspace_idx(line: &str, from: usize) -> usize {
    WHITESPACE
        .find(&line[from..])
        .map_or(from, |m| from + m.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(parser: &Parser, text: &str) -> Source {
        parser.prepare(split_keepends(text)).unwrap()
    }

    #[test]
    fn test_match_bracket_across_lines() {
        let doc = "hello { world {\n    some test } {\n    okay { }\nthis is a test }} test\n";
        let parser = Parser::new(Vec::<String>::new());
        let src = prepared(&parser, doc);
        let close = parser
            .match_bracket(&src, Position::new(0, 6), src.end())
            .unwrap();
        assert_eq!(src.clipped_line(close, src.end()), "} test\n");
    }

    #[test]
    fn test_unclosed_bracket_is_an_error() {
        let parser = Parser::new(["tag"]);
        let err = parser.parse("so \\tag{unclosed\n").unwrap_err();
        assert!(err.message().contains("no closing bracket"));
    }

    #[test]
    fn test_locate_tag_and_inline_contents() {
        let doc = "haha \\tag{this}{\n    that}[another]{this\n    }[okay test] stop\n";
        let parser = Parser::new(["tag"]);
        let src = prepared(&parser, doc);
        let (tag_pos, located) = parser.locate_tag(&src, src.start(), src.end());
        let located = located.unwrap();
        assert_eq!(src.clipped_line(src.start(), tag_pos), "haha ");
        assert_eq!(located.name, "tag");
        assert_eq!(located.kind, TagKind::Inline);

        let args = parser
            .inline_tag_contents(&src, located.after, src.end())
            .unwrap();
        let contents: Vec<String> = args
            .iter()
            .map(|arg| src.lines_before(arg.start, arg.stop).concat())
            .collect();
        assert_eq!(
            contents,
            vec!["this", "\n    that", "another", "this\n    ", "okay test"]
        );
        let kinds: Vec<BracketKind> = args.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BracketKind::Curly,
                BracketKind::Curly,
                BracketKind::Square,
                BracketKind::Curly,
                BracketKind::Square
            ]
        );
    }

    #[test]
    fn test_scan_after_attribute_tag() {
        let doc = "test \\tag this \\tag{inline \\tag{} \\tag}q \\tag\nother tag\n";
        let parser = Parser::new(["tag"]);
        let src = prepared(&parser, doc);
        let (_, located) = parser.locate_tag(&src, src.start(), src.end());
        let after = located.unwrap().after;
        let (body_stop, _) = parser
            .scan_after_attribute_tag(&src, after, src.end(), false)
            .unwrap();
        assert_eq!(
            src.clipped_line(after, body_stop),
            "this \\tag{inline \\tag{} \\tag}q "
        );
    }

    #[test]
    fn test_scan_after_attribute_tag_adjacent() {
        let doc = "test \\tag this \\tag{inline \\tag{} \\tag}\\tag\nother tag\n";
        let parser = Parser::new(["tag"]);
        let src = prepared(&parser, doc);
        let (_, located) = parser.locate_tag(&src, src.start(), src.end());
        let after = located.unwrap().after;
        let (body_stop, _) = parser
            .scan_after_attribute_tag(&src, after, src.end(), false)
            .unwrap();
        assert_eq!(
            src.clipped_line(after, body_stop),
            "this \\tag{inline \\tag{} \\tag}"
        );
    }

    #[test]
    fn test_block_extent_illegal_indent() {
        let doc = "\\tag\n        body\n    between\n";
        let parser = Parser::new(["tag"]);
        let err = parser.parse(doc).unwrap_err();
        assert!(err.message().contains("incorrect indent"));
        assert_eq!(err.line(), Some("    between\n"));
    }

    #[test]
    fn test_dedent_mismatch() {
        // the base indent comes from the first non-blank line; the second
        // line does not carry that prefix
        let doc = "    top\n   short\n";
        let parser = Parser::new(["tag"]);
        let err = parser.parse(doc).unwrap_err();
        assert!(err.message().contains("cannot dedent"));
    }

    #[test]
    fn test_builder_defaults() {
        let parser = Parser::builder().block_tag("tag").build();
        assert_eq!(parser.escape_char(), DEFAULT_ESCAPE_CHAR);
        assert_eq!(parser.include_tag(), DEFAULT_INCLUDE_TAG);
        // the include tag is always allowed in block position
        assert!(parser.block_tags.contains(DEFAULT_INCLUDE_TAG));
        // inline set defaults to the block set
        assert!(parser.inline_tags.contains("tag"));
    }

    #[test]
    fn test_grammar_config_roundtrip() {
        let json = r###"{
            "tags": ["h1", "h2"],
            "aliases": {"#": "h1", "##": "h2"},
            "include_tag": "_include"
        }"###;
        let config: GrammarConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.escape_char, DEFAULT_ESCAPE_CHAR);
        let parser = Parser::from_config(&config);
        assert_eq!(parser.resolve("#"), "h1");
        assert!(parser.block_tags.contains("h2"));
        let back = serde_json::to_string(&config).unwrap();
        assert!(back.contains("\"h1\""));
    }
}
