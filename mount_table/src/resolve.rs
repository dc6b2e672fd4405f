//! Longest-prefix path resolution over the mount tree
//!
//! Resolution is an iterative walk down the trie that remembers the deepest
//! link node it entered. The walk may descend past a link into that link's
//! internal subtree; the resolved path then snaps back to the link itself.
//! The `resolve_last_component` flag controls whether the final segment of
//! the query may be treated as a mount point: links entered at non-final
//! positions are always honored.

use crate::path::{join_segments, split_path, PathError};
use crate::spec::LinkSpec;
use crate::tree::MountTree;

/// Whether a resolution landed on a link or on internal structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// The path stops inside the mount structure itself
    InternalDir,
    /// The path is handled by a configured link or the fallback
    ExternalLink,
}

/// What a resolution matched
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTarget<'a> {
    /// A configured link (single or merge)
    Link(&'a LinkSpec),
    /// The fallback entry; nothing else matched
    Fallback(&'a LinkSpec),
    /// Internal structure; carries the stop node's child names
    InternalDir { children: Vec<String> },
}

/// The outcome of resolving one path
///
/// Created fresh per call, immutable, borrows the tree it was resolved
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub kind: ResolutionKind,
    /// The prefix of the query consumed by the mount table
    pub resolved_path: String,
    /// The rest of the query, to be handled by the target; starts with `/`,
    /// equals `/` when nothing remains
    pub remaining_path: String,
    pub target: ResolvedTarget<'a>,
    /// True iff the node the walk stopped on is itself a link node
    pub last_component_is_link: bool,
}

impl MountTree {
    /// Resolves an absolute path against this tree
    ///
    /// Fails only on malformed input. A path matching no link resolves to
    /// the fallback if a lookup missed and one exists, otherwise to the
    /// deepest internal node reached, never an error.
    pub fn resolve(
        &self,
        path: &str,
        resolve_last_component: bool,
    ) -> Result<Resolution<'_>, PathError> {
        let segments = split_path(path)?;

        let mut node = self.root();
        let mut consumed = 0;
        let mut deepest_link: Option<(usize, &LinkSpec)> = None;
        let mut missed = false;

        for (i, segment) in segments.iter().enumerate() {
            let is_last = i + 1 == segments.len();
            if is_last && !resolve_last_component {
                // Policy stop: the final segment's own link-ness is ignored.
                break;
            }
            match node.child(segment) {
                Some(child) => {
                    node = child;
                    consumed = i + 1;
                    if let Some(spec) = node.link_spec() {
                        deepest_link = Some((consumed, spec));
                    }
                }
                None => {
                    missed = true;
                    break;
                }
            }
        }

        let last_component_is_link = node.is_link();

        if let Some((depth, spec)) = deepest_link {
            return Ok(Resolution {
                kind: ResolutionKind::ExternalLink,
                resolved_path: join_segments(&segments[..depth]),
                remaining_path: join_segments(&segments[depth..]),
                target: ResolvedTarget::Link(spec),
                last_component_is_link,
            });
        }

        // Only a failed lookup falls through to the fallback; a path that
        // stops on existing internal structure, or whose final segment was
        // left unresolved by policy, stays internal.
        if missed {
            if let Some(fallback) = self.fallback() {
                return Ok(Resolution {
                    kind: ResolutionKind::ExternalLink,
                    resolved_path: "/".to_string(),
                    remaining_path: join_segments(&segments),
                    target: ResolvedTarget::Fallback(fallback),
                    last_component_is_link,
                });
            }
        }

        Ok(Resolution {
            kind: ResolutionKind::InternalDir,
            resolved_path: join_segments(&segments[..consumed]),
            remaining_path: join_segments(&segments[consumed..]),
            target: ResolvedTarget::InternalDir {
                children: node.child_names(),
            },
            last_component_is_link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TargetRef;

    fn single(path: &str, uri: &str) -> LinkSpec {
        LinkSpec::single(path, TargetRef::new(uri)).unwrap()
    }

    /// Two nested branches plus a fallback:
    /// /a/b, /a/b/e, /a/b/c/d, /a/b/c/d/e, /b/c/d/e, /b/c/d/e/f, fallback nn0
    fn nested_tree() -> MountTree {
        MountTree::build(vec![
            single("/a/b", "remote://nn1"),
            single("/a/b/e", "remote://nn2"),
            single("/a/b/c/d", "remote://nn3"),
            single("/a/b/c/d/e", "remote://nn4"),
            single("/b/c/d/e", "remote://nn5"),
            single("/b/c/d/e/f", "remote://nn6"),
            LinkSpec::fallback(TargetRef::new("remote://nn0")),
        ])
        .unwrap()
    }

    fn assert_link(
        tree: &MountTree,
        path: &str,
        resolve_last: bool,
        resolved: &str,
        remaining: &str,
        uri: &str,
    ) {
        let r = tree.resolve(path, resolve_last).unwrap();
        assert_eq!(r.kind, ResolutionKind::ExternalLink, "kind for {path}");
        assert_eq!(r.resolved_path, resolved, "resolved for {path}");
        assert_eq!(r.remaining_path, remaining, "remaining for {path}");
        match r.target {
            ResolvedTarget::Link(spec) => assert_eq!(spec.targets()[0].uri(), uri),
            other => panic!("expected link match for {path}, got {other:?}"),
        }
    }

    #[test]
    fn test_deepest_link_wins_resolving_last_component() {
        let tree = nested_tree();
        assert_link(&tree, "/a/b/c/d/e/f", true, "/a/b/c/d/e", "/f", "remote://nn4");
        assert_link(&tree, "/a/b/c/d/e", true, "/a/b/c/d/e", "/", "remote://nn4");
        assert_link(
            &tree,
            "/a/b/c/d/e/f/g/h/i",
            true,
            "/a/b/c/d/e",
            "/f/g/h/i",
            "remote://nn4",
        );
        assert_link(&tree, "/a/b/c/d/e/f/g", true, "/a/b/c/d/e", "/f/g", "remote://nn4");
    }

    #[test]
    fn test_deepest_link_wins_not_resolving_last_component() {
        let tree = nested_tree();
        // The final segment is past the deepest link, so the flag changes
        // nothing here.
        assert_link(&tree, "/a/b/c/d/e/f", false, "/a/b/c/d/e", "/f", "remote://nn4");
        // The final segment lands exactly on the /a/b/c/d/e link; with the
        // flag off the next link up answers instead.
        assert_link(&tree, "/a/b/c/d/e", false, "/a/b/c/d", "/e", "remote://nn3");
        assert_link(
            &tree,
            "/a/b/c/d/e/f/g/h/i",
            false,
            "/a/b/c/d/e",
            "/f/g/h/i",
            "remote://nn4",
        );
    }

    #[test]
    fn test_miss_below_link_stays_with_link() {
        let tree = nested_tree();
        // Lookup misses under a link's subtree; the link already entered
        // answers, never the fallback.
        assert_link(
            &tree,
            "/a/b/e/c/d/a/g/h/i",
            false,
            "/a/b/e",
            "/c/d/a/g/h/i",
            "remote://nn2",
        );
        assert_link(
            &tree,
            "/a/b/a/c/d/a/g/h/i",
            false,
            "/a/b",
            "/a/c/d/a/g/h/i",
            "remote://nn1",
        );
        assert_link(
            &tree,
            "/b/c/d/e/d/a/g/h/i",
            false,
            "/b/c/d/e",
            "/d/a/g/h/i",
            "remote://nn5",
        );
        assert_link(
            &tree,
            "/b/c/d/e/f/d/a/g/h/i",
            false,
            "/b/c/d/e/f",
            "/d/a/g/h/i",
            "remote://nn6",
        );
    }

    #[test]
    fn test_dir_link_consumes_internal_subpath() {
        let tree = nested_tree();
        assert_link(&tree, "/a/b/c/d/f", true, "/a/b/c/d", "/f", "remote://nn3");
        assert_link(&tree, "/a/b/c/d", true, "/a/b/c/d", "/", "remote://nn3");
        assert_link(&tree, "/a/b/c/d/f/g/h/i", true, "/a/b/c/d", "/f/g/h/i", "remote://nn3");
        assert_link(&tree, "/a/b/c/d/f", false, "/a/b/c/d", "/f", "remote://nn3");
        // The final segment names the /a/b/c/d link itself; the flag hands
        // the match to /a/b.
        assert_link(&tree, "/a/b/c/d", false, "/a/b", "/c/d", "remote://nn1");
        assert_link(&tree, "/a/b/f", true, "/a/b", "/f", "remote://nn1");
        assert_link(&tree, "/a/b", true, "/a/b", "/", "remote://nn1");
        assert_link(&tree, "/a/b/f", false, "/a/b", "/f", "remote://nn1");
    }

    #[test]
    fn test_link_as_final_segment_not_resolved_yields_internal() {
        let tree = nested_tree();
        let r = tree.resolve("/a/b", false).unwrap();
        assert_eq!(r.kind, ResolutionKind::InternalDir);
        assert_eq!(r.resolved_path, "/a");
        assert_eq!(r.remaining_path, "/b");
        assert!(!r.last_component_is_link);
        assert!(matches!(r.target, ResolvedTarget::InternalDir { .. }));
    }

    #[test]
    fn test_link_entered_through_internal_child() {
        let tree = nested_tree();
        // /a/b/c ends on internal structure inside the /a/b link's subtree;
        // the link still answers under both flag values.
        assert_link(&tree, "/a/b/c", true, "/a/b", "/c", "remote://nn1");
        assert_link(&tree, "/a/b/c", false, "/a/b", "/c", "remote://nn1");
    }

    #[test]
    fn test_unmatched_path_uses_fallback() {
        let tree = nested_tree();
        let r = tree.resolve("/a/e", true).unwrap();
        assert_eq!(r.kind, ResolutionKind::ExternalLink);
        assert_eq!(r.resolved_path, "/");
        assert_eq!(r.remaining_path, "/a/e");
        assert!(!r.last_component_is_link);
        match r.target {
            ResolvedTarget::Fallback(spec) => {
                assert_eq!(spec.targets()[0].uri(), "remote://nn0");
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_policy_stop_precedes_fallback() {
        let tree = nested_tree();
        // With the last component left unresolved the walk never misses, so
        // the fallback is not consulted.
        let r = tree.resolve("/a/e", false).unwrap();
        assert_eq!(r.kind, ResolutionKind::InternalDir);
        assert_eq!(r.resolved_path, "/a");
        assert_eq!(r.remaining_path, "/e");
        assert!(!r.last_component_is_link);
    }

    #[test]
    fn test_internal_structure_never_falls_back() {
        let tree = nested_tree();
        let r = tree.resolve("/b/c", true).unwrap();
        assert_eq!(r.kind, ResolutionKind::InternalDir);
        assert_eq!(r.resolved_path, "/b/c");
        assert_eq!(r.remaining_path, "/");
        match r.target {
            ResolvedTarget::InternalDir { children } => assert_eq!(children, vec!["d"]),
            other => panic!("expected internal dir, got {other:?}"),
        }

        let r = tree.resolve("/b/c", false).unwrap();
        assert_eq!(r.kind, ResolutionKind::InternalDir);
        assert_eq!(r.resolved_path, "/b");
        assert_eq!(r.remaining_path, "/c");
    }

    #[test]
    fn test_root_resolves_to_internal_dir() {
        let tree = nested_tree();
        for resolve_last in [true, false] {
            let r = tree.resolve("/", resolve_last).unwrap();
            assert_eq!(r.kind, ResolutionKind::InternalDir);
            assert_eq!(r.resolved_path, "/");
            assert_eq!(r.remaining_path, "/");
            assert!(!r.last_component_is_link);
            match r.target {
                ResolvedTarget::InternalDir { ref children } => {
                    assert_eq!(children, &vec!["a", "b"]);
                }
                ref other => panic!("expected internal dir, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_no_match_without_fallback_is_internal() {
        let tree = MountTree::build(vec![single("/a/b", "disk://d1")]).unwrap();
        let r = tree.resolve("/x/y/z", true).unwrap();
        assert_eq!(r.kind, ResolutionKind::InternalDir);
        assert_eq!(r.resolved_path, "/");
        assert_eq!(r.remaining_path, "/x/y/z");
    }

    #[test]
    fn test_fallback_only_table() {
        let tree =
            MountTree::build(vec![LinkSpec::fallback(TargetRef::new("remote://nn0"))]).unwrap();
        let r = tree.resolve("/any/path/at/all", true).unwrap();
        assert_eq!(r.kind, ResolutionKind::ExternalLink);
        assert_eq!(r.resolved_path, "/");
        assert_eq!(r.remaining_path, "/any/path/at/all");
        assert!(matches!(r.target, ResolvedTarget::Fallback(_)));
    }

    #[test]
    fn test_last_component_is_link_reflects_stop_node() {
        let tree = nested_tree();
        // Stop node is the /a/b/c/d link itself (miss below it).
        let r = tree.resolve("/a/b/c/d/f", true).unwrap();
        assert!(r.last_component_is_link);
        // Stop node is the internal node c inside the /a/b subtree, even
        // though the /a/b link answers.
        let r = tree.resolve("/a/b/c", true).unwrap();
        assert_eq!(r.kind, ResolutionKind::ExternalLink);
        assert!(!r.last_component_is_link);
        // Stop node is the /a/b/c/d/e link, fully consumed.
        let r = tree.resolve("/a/b/c/d/e", true).unwrap();
        assert!(r.last_component_is_link);
    }

    #[test]
    fn test_resolution_is_idempotent_on_resolved_path() {
        let tree = nested_tree();
        for path in ["/a/b/c/d/e/f", "/a/b/c/d/f", "/a/b/f", "/b/c/d/e/x", "/a/e"] {
            let first = tree.resolve(path, true).unwrap();
            let again = tree.resolve(&first.resolved_path, true).unwrap();
            assert_eq!(again.resolved_path, first.resolved_path, "fixed point for {path}");
            assert_eq!(again.remaining_path, "/");
        }
    }

    #[test]
    fn test_longest_prefix_property() {
        let tree = MountTree::build(vec![
            single("/a/b", "disk://d1"),
            single("/a/b/c/d", "disk://d2"),
        ])
        .unwrap();
        assert_link(&tree, "/a/b/c/d/e", true, "/a/b/c/d", "/e", "disk://d2");
        // Nested-mount-without-last-component: the deeper link is not
        // consumed when it is itself the final segment.
        assert_link(&tree, "/a/b/c/d", false, "/a/b", "/c/d", "disk://d1");
    }

    #[test]
    fn test_malformed_query_rejected() {
        let tree = nested_tree();
        assert!(tree.resolve("a/b", true).is_err());
        assert!(tree.resolve("/a//b", true).is_err());
        assert!(tree.resolve("/a/../b", true).is_err());
    }

    #[test]
    fn test_resolution_against_spec_scenario() {
        // Links /a/b -> X1, /a/b/c/d -> X2, /a/b/c/d/e -> X3, fallback F.
        let tree = MountTree::build(vec![
            single("/a/b", "x1://"),
            single("/a/b/c/d", "x2://"),
            single("/a/b/c/d/e", "x3://"),
            LinkSpec::fallback(TargetRef::new("f://")),
        ])
        .unwrap();

        assert_link(&tree, "/a/b/c/d/e/f", true, "/a/b/c/d/e", "/f", "x3://");

        let r = tree.resolve("/a/e", true).unwrap();
        assert_eq!(r.kind, ResolutionKind::ExternalLink);
        assert_eq!(r.resolved_path, "/");
        assert_eq!(r.remaining_path, "/a/e");
        assert!(matches!(r.target, ResolvedTarget::Fallback(_)));

        let r = tree.resolve("/a/e", false).unwrap();
        assert_eq!(r.kind, ResolutionKind::InternalDir);
        assert_eq!(r.resolved_path, "/a");
        assert_eq!(r.remaining_path, "/e");
    }
}
