//! Finds the command a token sequence names.

use hark_types::PermissionLevel;

use crate::tree::{CommandNode, CommandTree, Group, NodeKind};

/// The deepest node matched by a token prefix.
pub struct ResolvedPath<'t, 'a, C> {
    pub node: &'t CommandNode<C>,
    /// Primary names from the top level down to `node`.
    pub names: Vec<&'t str>,
    /// Tokens after the matched prefix.
    pub remaining: &'a [String],
}

impl<C> ResolvedPath<'_, '_, C> {
    /// The matched path as the user should see it, e.g. `window resize`.
    pub fn display(&self) -> String {
        self.names.join(" ")
    }
}

/// Result of walking the tree.
pub enum Resolution<'t, 'a, C> {
    /// No tokens at all.
    Empty,
    /// A leaf (remaining tokens are its arguments) or a group with nothing
    /// left to consume.
    Found(ResolvedPath<'t, 'a, C>),
    /// A token matched nothing the caller may see.
    NotFound {
        /// The group matched before the failing token; `None` at top level.
        deepest: Option<ResolvedPath<'t, 'a, C>>,
        /// Matched names plus the failing token.
        attempted: String,
    },
}

/// Walk `tree` consuming `tokens` for a caller at `level`.
///
/// Matching stops at the first leaf, at a group whose next token matches no
/// accessible child, or when the tokens run out. Nodes above `level` are
/// indistinguishable from names that were never registered.
pub fn resolve<'t, 'a, C>(
    tree: &'t CommandTree<C>,
    tokens: &'a [String],
    level: PermissionLevel,
) -> Resolution<'t, 'a, C> {
    let mut group: &'t Group<C> = &tree.root;
    let mut current: Option<&'t CommandNode<C>> = None;
    let mut names: Vec<&'t str> = Vec::new();

    for (pos, token) in tokens.iter().enumerate() {
        let Some(child) = tree.child(group, token, level) else {
            let mut attempted = names.join(" ");
            if !attempted.is_empty() {
                attempted.push(' ');
            }
            attempted.push_str(token);
            let deepest = current.map(|node| ResolvedPath {
                node,
                names,
                remaining: &tokens[pos..],
            });
            return Resolution::NotFound { deepest, attempted };
        };

        names.push(child.name());
        match &child.kind {
            NodeKind::Leaf { .. } => {
                return Resolution::Found(ResolvedPath {
                    node: child,
                    names,
                    remaining: &tokens[pos + 1..],
                });
            },
            NodeKind::Group(children) => {
                group = children;
                current = Some(child);
            },
        }
    }

    match current {
        Some(node) => Resolution::Found(ResolvedPath {
            node,
            names,
            remaining: &[],
        }),
        None => Resolution::Empty,
    }
}
