//! Include splicing
//!
//!     A tree transform, not part of the grammar: every child tag carrying the
//!     parser's include tag name is replaced by the fully parsed contents of
//!     the file it references. The referenced path is normalized against
//!     traversal (treated as rooted at `/`, `..` and `.` resolved, the leading
//!     separator stripped) before joining with the include directory. The
//!     original tree is never modified; a new tree is returned.
//!
//!     Included files may themselves carry include tags; with `follow` these
//!     are spliced recursively, bounded by `MAX_INCLUDE_DEPTH` so a cycle
//!     among files fails with an error instead of recursing forever.

use crate::tagml::error::{ParseError, ParseResult};
use crate::tagml::parsing::Parser;
use crate::tagml::tree::{Child, NodeId, TagTree};
use std::path::{Component, Path, PathBuf};

/// Upper bound on nested include splicing.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Replace include tags under `id` with the parsed contents of the files they
/// reference, returning a new tree rooted at a node of the same name.
pub fn process_includes(
    tree: &TagTree,
    id: NodeId,
    parser: &Parser,
    include_dir: &Path,
    follow: bool,
) -> ParseResult<TagTree> {
    let mut out = TagTree::new(tree.name(id));
    let root = out.root();
    splice_children(&mut out, root, tree, id, parser, include_dir, follow, 0)?;
    Ok(out)
}

#[allow(clippy::too_many_arguments)]
fn splice_children(
    dest: &mut TagTree,
    dest_parent: NodeId,
    src: &TagTree,
    src_id: NodeId,
    parser: &Parser,
    include_dir: &Path,
    follow: bool,
    depth: usize,
) -> ParseResult<()> {
    let children: Vec<Child> = src.children(src_id).cloned().collect();
    for child in children {
        match child {
            Child::Text(text) => dest.append_child(dest_parent, Child::Text(text)),
            Child::Tag(cid) if src.name(cid) == parser.include_tag() => {
                if depth >= MAX_INCLUDE_DEPTH {
                    return Err(ParseError::new(format!(
                        "include depth {} exceeded",
                        MAX_INCLUDE_DEPTH
                    )));
                }
                let reference = src.value(cid)?;
                let path = include_dir.join(sanitize_include_path(&reference));
                let included = parser.parse_file(&path)?;
                if follow {
                    let included_root = included.root();
                    splice_children(
                        dest,
                        dest_parent,
                        &included,
                        included_root,
                        parser,
                        include_dir,
                        follow,
                        depth + 1,
                    )?;
                } else {
                    let included_root = included.root();
                    let spliced: Vec<Child> = included.children(included_root).cloned().collect();
                    for grand in spliced {
                        match grand {
                            Child::Text(text) => dest.append_child(dest_parent, Child::Text(text)),
                            Child::Tag(gid) => {
                                let copied = dest.import_node(&included, gid);
                                dest.append_child(dest_parent, Child::Tag(copied));
                            }
                        }
                    }
                }
            }
            Child::Tag(cid) => {
                let copied = dest.new_node(src.name(cid));
                dest.append_child(dest_parent, Child::Tag(copied));
                splice_children(dest, copied, src, cid, parser, include_dir, follow, depth)?;
            }
        }
    }
    Ok(())
}

/// Normalize an include reference so it cannot escape the include directory:
/// treat it as rooted at `/`, resolve `.` and `..`, and strip the root.
fn sanitize_include_path(reference: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for component in Path::new(reference).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                out.pop();
            }
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_path() {
        assert_eq!(
            sanitize_include_path("chapters/intro.tag"),
            PathBuf::from("chapters/intro.tag")
        );
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(
            sanitize_include_path("../../etc/passwd"),
            PathBuf::from("etc/passwd")
        );
        assert_eq!(
            sanitize_include_path("/absolute/path.tag"),
            PathBuf::from("absolute/path.tag")
        );
        assert_eq!(
            sanitize_include_path("a/../b/./c.tag"),
            PathBuf::from("b/c.tag")
        );
    }
}
