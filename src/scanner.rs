//! Lexical reference scanning
//!
//! A member counts as mentioned when any member-access expression in the
//! mapper body accesses a name equal to it (case-sensitive). No binding is
//! checked: `other.B` mentions `B` even when `other` is unrelated to the
//! source object.
//!
//! A matching access is not descended into, so its receiver is never
//! re-scanned. A non-matching access is descended into, which is why the
//! receiver position counts: in `source.A.Length` the outer access does not
//! match `A`, the inner one does.

use crate::host::{NodeId, SyntaxKind, SyntaxTree};

/// Walks a subtree looking for accesses of one member name
pub struct MentionVisitor<'a> {
    watched: &'a str,
    mentions: usize,
}

impl<'a> MentionVisitor<'a> {
    pub fn new(watched: &'a str) -> Self {
        Self {
            watched,
            mentions: 0,
        }
    }

    /// Traverse the whole subtree under `root`
    pub fn visit<T: SyntaxTree + ?Sized>(&mut self, tree: &T, root: NodeId) {
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if tree.kind(node) == SyntaxKind::MemberAccess && tree.text(node) == Some(self.watched) {
                self.mentions += 1;
                continue;
            }
            stack.extend(tree.children(node).iter().rev());
        }
    }

    pub fn mention_found(&self) -> bool {
        self.mentions > 0
    }

    /// Number of matching access nodes (nested matches under a match are not counted)
    pub fn mentions(&self) -> usize {
        self.mentions
    }
}

/// Check whether `member_name` is accessed anywhere under `body_root`
pub fn is_mentioned<T: SyntaxTree + ?Sized>(
    tree: &T,
    member_name: &str,
    body_root: NodeId,
) -> bool {
    let mut visitor = MentionVisitor::new(member_name);
    visitor.visit(tree, body_root);
    visitor.mention_found()
}
