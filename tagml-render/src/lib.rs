//! Renderer for parsed tagml trees
//!
//!     A renderer walks a tree's children in order, passes text through, and
//!     dispatches every tag by name to a handler. Handlers are registered
//!     explicitly at construction time in a name-to-handler table; a tag
//!     without a specific handler falls back to the optional fallback handler,
//!     or renders as nothing. Handlers receive the renderer back, so they can
//!     recursively format nested children.
//!
//!     The registered names double as the grammar: `parse_and_render` builds a
//!     parser whose allowed tag set is exactly the handler table.
//!
//!         let renderer = Renderer::new()
//!             .on("emph", |r, tree, id| format!("<em>{}</em>", r.render(tree, id)))
//!             .with_fallback(|r, tree, id| r.render(tree, id));
//!         let html = parse_and_render("Hello \\emph{world}!\n", &renderer)?;

use std::collections::HashMap;
use tagml_parser::tagml::{Child, NodeId, ParseResult, Parser, TagTree};

/// A tag handler: renders one tag node to output text.
pub type Handler = Box<dyn Fn(&Renderer, &TagTree, NodeId) -> String>;

/// Walks trees and dispatches tags through an explicit registration table.
#[derive(Default)]
pub struct Renderer {
    handlers: HashMap<String, Handler>,
    fallback: Option<Handler>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Register a handler for a tag name.
    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Renderer, &TagTree, NodeId) -> String + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    /// Register the handler used for any tag without a specific one.
    pub fn with_fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Renderer, &TagTree, NodeId) -> String + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Names this renderer declares handlers for. Feeding these to the parser
    /// keeps the grammar and the renderer in sync.
    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Render the children of `id` in order: text passes through, tags are
    /// dispatched by name.
    pub fn render(&self, tree: &TagTree, id: NodeId) -> String {
        let mut out = String::new();
        for child in tree.children(id) {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Tag(cid) => out.push_str(&self.handle(tree, *cid)),
            }
        }
        out
    }

    /// Dispatch one tag to its handler, the fallback, or nothing.
    pub fn handle(&self, tree: &TagTree, id: NodeId) -> String {
        if let Some(handler) = self.handlers.get(tree.name(id)) {
            return handler(self, tree, id);
        }
        if let Some(fallback) = &self.fallback {
            return fallback(self, tree, id);
        }
        String::new()
    }
}

/// Renderer whose fallback wraps every tag in `<name>...</name>`.
pub fn xml_renderer() -> Renderer {
    Renderer::new().with_fallback(|renderer, tree, id| {
        let name = tree.name(id);
        format!("<{}>{}</{}>", name, renderer.render(tree, id), name)
    })
}

/// Parse `source` with a grammar derived from the renderer's handler table,
/// then render the resulting tree.
pub fn parse_and_render(source: &str, renderer: &Renderer) -> ParseResult<String> {
    let parser = Parser::new(renderer.tag_names());
    let tree = parser.parse(source)?;
    Ok(renderer.render(&tree, tree.root()))
}
