//! The tag tree
//!
//!     A parsed document is a tree of named nodes whose children are text
//!     chunks or nested tags, stored in a key-indexed ordered sequence so that
//!     children can be found by name without a scan. Nodes live in an arena
//!     owned by `TagTree` and are addressed by `NodeId`; parent links are
//!     non-owning ids plus a cached position in the parent's child list, and
//!     every mutation renumbers the affected back-links.
//!
//!     An *adopter* node holds child references without claiming back-link
//!     ownership. `find_all` returns one: a transient view over every matching
//!     child that leaves the real tree untouched.
//!
//!     A tag with exactly one child which is text is *simple*; only simple tags
//!     expose a scalar value.

use crate::tagml::error::{ParseError, ParseResult};
use crate::tagml::indexed::{IndexedSeq, Key};
use crate::tagml::parsing::DEFAULT_ESCAPE_CHAR;
use serde_json::Value;

/// Name of the synthetic root produced by every parse.
pub const ROOT_NAME: &str = "_root";
/// Name of the synthetic node wrapping a square-bracket inline argument.
pub const ITEM_NAME: &str = "_item";
/// Name of the transient view node returned by `find_all`.
const VIEW_NAME: &str = "_";

/// Indent step used when serializing a tree back to source syntax.
const TAB_WIDTH: usize = 4;

/// Handle to a node in a `TagTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One child of a tag: a raw text chunk or a nested tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Text(String),
    Tag(NodeId),
}

#[derive(Debug)]
struct TagNode {
    name: String,
    children: IndexedSeq<Child>,
    parent: Option<NodeId>,
    index: Option<usize>,
    adopter: bool,
}

/// Policy for `children_values` when a text child or a non-simple tag child
/// is encountered: error out, keep it as is, substitute a null, or skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePolicy {
    Raise,
    Keep,
    Null,
    Skip,
}

/// One element of a `children_values` result.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueItem {
    Text(String),
    Tag(NodeId),
    Null,
}

/// Arena of tag nodes with a designated root.
#[derive(Debug)]
pub struct TagTree {
    nodes: Vec<TagNode>,
    root: NodeId,
}

impl TagTree {
    pub fn new(root_name: &str) -> Self {
        let mut tree = TagTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.new_node(root_name);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a detached node. It owns back-links for children attached to
    /// it later.
    pub fn new_node(&mut self, name: &str) -> NodeId {
        self.alloc(name, false)
    }

    /// Allocate a detached adopter node: it holds child references without
    /// rewriting their parent links.
    pub fn new_adopter(&mut self, name: &str) -> NodeId {
        self.alloc(name, true)
    }

    fn alloc(&mut self, name: &str, adopter: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TagNode {
            name: name.to_string(),
            children: IndexedSeq::new(),
            parent: None,
            index: None,
            adopter,
        });
        id
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn index(&self, id: NodeId) -> Option<usize> {
        self.nodes[id.0].index
    }

    pub fn is_adopter(&self, id: NodeId) -> bool {
        self.nodes[id.0].adopter
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<&Child> {
        self.nodes[id.0].children.get(index)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Child> {
        self.nodes[id.0].children.values()
    }

    fn child_key(&self, child: &Child) -> Key {
        match child {
            Child::Text(_) => Key::Text,
            Child::Tag(id) => Key::name(self.nodes[id.0].name.clone()),
        }
    }

    /// Insert a child at `index`, claiming the back-link when the parent is
    /// not an adopter and renumbering every later tag child.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: Child) {
        let key = self.child_key(&child);
        let adopter = self.nodes[parent.0].adopter;
        let inserted_tag = match &child {
            Child::Tag(id) => Some(*id),
            Child::Text(_) => None,
        };
        self.nodes[parent.0].children.insert(index, child, key);
        if !adopter {
            if let Some(cid) = inserted_tag {
                self.nodes[cid.0].parent = Some(parent);
                self.nodes[cid.0].index = Some(index);
            }
            self.renumber_from(parent, index + 1);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: Child) {
        let index = self.child_count(parent);
        self.insert_child(parent, index, child);
    }

    /// Append a text chunk, dropping it when empty.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.append_child(parent, Child::Text(text));
        }
    }

    pub fn extend_children(&mut self, parent: NodeId, children: Vec<Child>) {
        for child in children {
            self.append_child(parent, child);
        }
    }

    /// Remove the child at `index`, renumbering every later tag child.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Child {
        let adopter = self.nodes[parent.0].adopter;
        let removed = self.nodes[parent.0].children.remove(index);
        if !adopter {
            if let Child::Tag(cid) = &removed {
                self.nodes[cid.0].parent = None;
                self.nodes[cid.0].index = None;
            }
            self.renumber_from(parent, index);
        }
        removed
    }

    /// Replace the child at `index` in place.
    pub fn set_child(&mut self, parent: NodeId, index: usize, child: Child) -> Child {
        let key = self.child_key(&child);
        let adopter = self.nodes[parent.0].adopter;
        let inserted_tag = match &child {
            Child::Tag(id) => Some(*id),
            Child::Text(_) => None,
        };
        let old = self.nodes[parent.0].children.set(index, child, key);
        if !adopter {
            if let Child::Tag(cid) = &old {
                self.nodes[cid.0].parent = None;
                self.nodes[cid.0].index = None;
            }
            if let Some(cid) = inserted_tag {
                self.nodes[cid.0].parent = Some(parent);
                self.nodes[cid.0].index = Some(index);
            }
        }
        old
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        self.nodes[parent.0].children.clear();
    }

    fn renumber_from(&mut self, parent: NodeId, from: usize) {
        let updates: Vec<(NodeId, usize)> = {
            let children = &self.nodes[parent.0].children;
            (from..children.len())
                .filter_map(|j| match children.get(j) {
                    Some(Child::Tag(cid)) => Some((*cid, j)),
                    _ => None,
                })
                .collect()
        };
        for (cid, j) in updates {
            self.nodes[cid.0].index = Some(j);
        }
    }

    /// First direct child tag with the given name.
    pub fn find(&self, id: NodeId, name: &str) -> Option<NodeId> {
        match self.nodes[id.0].children.find(&Key::name(name)) {
            Some(Child::Tag(cid)) => Some(*cid),
            _ => None,
        }
    }

    /// Every direct child tag with the given name, as an adopter view. The
    /// real tree is left untouched.
    pub fn find_all(&mut self, id: NodeId, name: &str) -> NodeId {
        let matched: Vec<Child> = self.nodes[id.0]
            .children
            .find_all(&Key::name(name))
            .into_iter()
            .cloned()
            .collect();
        let view = self.new_adopter(VIEW_NAME);
        for child in matched {
            let key = self.child_key(&child);
            self.nodes[view.0].children.push(child, key);
        }
        view
    }

    pub fn exists(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id.0].children.contains_key(&Key::name(name))
    }

    fn simple_text(&self, id: NodeId) -> Option<&str> {
        let children = &self.nodes[id.0].children;
        if children.len() != 1 {
            return None;
        }
        match children.get(0) {
            Some(Child::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn is_simple(&self, id: NodeId) -> bool {
        self.simple_text(id).is_some()
    }

    /// Scalar value of a simple tag (its sole text child, trimmed).
    pub fn value(&self, id: NodeId) -> ParseResult<String> {
        self.simple_text(id)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                ParseError::new(format!(
                    "value is not defined for non-simple tag '{}'",
                    self.name(id)
                ))
            })
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> ParseResult<()> {
        if !self.is_simple(id) {
            return Err(ParseError::new(format!(
                "cannot set value of non-simple tag '{}'",
                self.name(id)
            )));
        }
        self.nodes[id.0]
            .children
            .set(0, Child::Text(value.into()), Key::Text);
        Ok(())
    }

    /// Value of the first simple child tag with the given name, if any.
    pub fn get(&self, id: NodeId, name: &str) -> Option<String> {
        let child = self.find(id, name)?;
        if self.is_simple(child) {
            self.value(child).ok()
        } else {
            None
        }
    }

    pub fn get_or(&self, id: NodeId, name: &str, default: &str) -> String {
        self.get(id, name).unwrap_or_else(|| default.to_string())
    }

    /// Scalar values of all children. `strings` controls text children,
    /// `not_simple` controls tag children without a scalar value.
    pub fn children_values(
        &self,
        id: NodeId,
        strings: ValuePolicy,
        not_simple: ValuePolicy,
    ) -> ParseResult<Vec<ValueItem>> {
        let mut values = Vec::new();
        for child in self.nodes[id.0].children.values() {
            match child {
                Child::Text(text) => match strings {
                    ValuePolicy::Raise => {
                        return Err(ParseError::new(
                            "text child has no value (use a non-strict strings policy)",
                        ))
                    }
                    ValuePolicy::Keep => values.push(ValueItem::Text(text.trim().to_string())),
                    ValuePolicy::Null => values.push(ValueItem::Null),
                    ValuePolicy::Skip => {}
                },
                Child::Tag(cid) => {
                    if self.is_simple(*cid) {
                        values.push(ValueItem::Text(self.value(*cid)?));
                        continue;
                    }
                    match not_simple {
                        ValuePolicy::Raise => {
                            return Err(ParseError::new(format!(
                                "child '{}' is not simple (use a non-strict not_simple policy)",
                                self.name(*cid)
                            )))
                        }
                        ValuePolicy::Keep => values.push(ValueItem::Tag(*cid)),
                        ValuePolicy::Null => values.push(ValueItem::Null),
                        ValuePolicy::Skip => {}
                    }
                }
            }
        }
        Ok(values)
    }

    /// Concatenation of all direct text children.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.nodes[id.0].children.values() {
            if let Child::Text(text) = child {
                out.push_str(text);
            }
        }
        out
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<&Child> {
        let node = &self.nodes[id.0];
        let parent = node.parent?;
        let index = node.index?;
        self.nodes[parent.0].children.get(index + 1)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<&Child> {
        let node = &self.nodes[id.0];
        let parent = node.parent?;
        let index = node.index?;
        if index == 0 {
            return None;
        }
        self.nodes[parent.0].children.get(index - 1)
    }

    /// The chain from `id` up to the root, inclusive on both ends.
    pub fn ancestor_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// The ancestor that is a direct child of the root.
    pub fn eva(&self, id: NodeId) -> Option<NodeId> {
        let path = self.ancestor_path(id);
        (path.len() >= 2).then(|| path[path.len() - 2])
    }

    /// True when every child is an `_item` tag.
    pub fn itemized(&self, id: NodeId) -> bool {
        let children = &self.nodes[id.0].children;
        children.indexes(&Key::name(ITEM_NAME)).len() == children.len()
    }

    /// Wrap a non-itemized tag's children into a single `_item`, so that
    /// single- and multi-argument forms can be handled uniformly.
    pub fn itemize(&mut self, id: NodeId) -> NodeId {
        if self.itemized(id) {
            return id;
        }
        let name = self.name(id).to_string();
        let children: Vec<Child> = self.nodes[id.0].children.values().cloned().collect();
        let item = self.new_adopter(ITEM_NAME);
        for child in children {
            let key = self.child_key(&child);
            self.nodes[item.0].children.push(child, key);
        }
        let wrapper = self.new_node(&name);
        self.append_child(wrapper, Child::Tag(item));
        wrapper
    }

    /// Inverse of `itemize` for the single-argument case: a simple tag is
    /// returned as is, a sole `_item` child is unwrapped.
    pub fn unitemize(&self, id: NodeId) -> ParseResult<NodeId> {
        if self.is_simple(id) {
            return Ok(id);
        }
        if self.child_count(id) == 1 {
            if let Some(Child::Tag(cid)) = self.child(id, 0) {
                if self.name(*cid) == ITEM_NAME {
                    return Ok(*cid);
                }
            }
        }
        Err(ParseError::new(format!(
            "cannot unitemize tag '{}'",
            self.name(id)
        )))
    }

    /// Check the back-link invariant for every tag child of `id`. Adopters
    /// hold no back-links and cannot be checked.
    pub fn is_consistent(&self, id: NodeId) -> ParseResult<bool> {
        let node = &self.nodes[id.0];
        if node.adopter {
            return Err(ParseError::new(
                "adopter cannot be checked for consistency",
            ));
        }
        if !node.children.is_consistent() {
            return Ok(false);
        }
        for (i, child) in node.children.values().enumerate() {
            if let Child::Tag(cid) = child {
                let child_node = &self.nodes[cid.0];
                if child_node.parent != Some(id) || child_node.index != Some(i) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Normalized list form of the subtree: `[name, child, ...]` where text
    /// children are strings and tag children are nested lists.
    pub fn snapshot(&self, id: NodeId) -> Value {
        let node = &self.nodes[id.0];
        let mut items = vec![Value::String(node.name.clone())];
        for child in node.children.values() {
            match child {
                Child::Text(text) => items.push(Value::String(text.clone())),
                Child::Tag(cid) => items.push(self.snapshot(*cid)),
            }
        }
        Value::Array(items)
    }

    /// Deep-copy the subtree rooted at `id` in `src` into this arena,
    /// returning the new detached node.
    pub fn import_node(&mut self, src: &TagTree, id: NodeId) -> NodeId {
        let new_id = if src.nodes[id.0].adopter {
            self.new_adopter(src.name(id))
        } else {
            self.new_node(src.name(id))
        };
        let children: Vec<Child> = src.nodes[id.0].children.values().cloned().collect();
        for child in children {
            match child {
                Child::Text(text) => self.append_child(new_id, Child::Text(text)),
                Child::Tag(cid) => {
                    let copied = self.import_node(src, cid);
                    self.append_child(new_id, Child::Tag(copied));
                }
            }
        }
        new_id
    }

    /// Render the subtree back to surface syntax: each non-root tag emits
    /// `\name` on its own line, children one tab stop deeper, metacharacters
    /// in literal text re-escaped.
    pub fn to_source(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_source(id, 0, &mut out);
        out
    }

    fn write_source(&self, id: NodeId, indent: usize, out: &mut String) {
        let node = &self.nodes[id.0];
        let child_indent = if node.name == ROOT_NAME && node.parent.is_none() {
            indent
        } else {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&" ".repeat(indent));
            out.push(DEFAULT_ESCAPE_CHAR);
            out.push_str(&node.name);
            out.push('\n');
            indent + TAB_WIDTH
        };
        for child in node.children.values() {
            match child {
                Child::Text(text) => write_text(text, child_indent, out),
                Child::Tag(cid) => self.write_source(*cid, child_indent, out),
            }
        }
    }
}

impl Default for TagTree {
    fn default() -> Self {
        TagTree::new(ROOT_NAME)
    }
}

/// Trees compare by structure and content, not arena layout.
impl PartialEq for TagTree {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot(self.root) == other.snapshot(other.root)
    }
}

fn write_text(text: &str, indent: usize, out: &mut String) {
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            // blank lines are written bare so they never look indented
            if line.ends_with('\n') {
                out.push('\n');
            }
            continue;
        }
        if out.is_empty() || out.ends_with('\n') {
            out.push_str(&" ".repeat(indent));
            if line.starts_with(' ') {
                // an escaped space keeps the literal leading space out of the
                // indent prefix when the text is parsed again
                out.push(DEFAULT_ESCAPE_CHAR);
            }
        }
        out.push_str(&escape_text(line));
    }
}

fn escape_text(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        if ch == DEFAULT_ESCAPE_CHAR || matches!(ch, '{' | '[' | '}' | ']') {
            out.push(DEFAULT_ESCAPE_CHAR);
        }
        out.push(ch);
    }
    out
}
