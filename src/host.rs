//! Query interface onto the host's syntax tree and symbol tables
//!
//! The engine never owns the program it analyzes. A front end parses and
//! resolves source text, then exposes the result through [`SyntaxTree`] and
//! [`SymbolResolver`]. Nodes and types are addressed by copyable handles.

use crate::diagnostic::Location;
use crate::exclusion::MemberMarkers;
use crate::schema::QualifiedName;
use serde::{Deserialize, Serialize};

/// Handle to a syntax node owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a resolved type owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Syntax node kinds the engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// A class declaration; its subtree is a mapper body
    ClassDeclaration,
    /// An annotation applied to a declaration; children are its arguments
    Annotation,
    /// `typeof(T)`; its single child is the type name
    TypeOf,
    /// A reference to a type by name
    TypeName,
    /// A string literal; text is the unquoted value
    StringLiteral,
    /// `receiver.name`; text is the accessed name, child is the receiver
    MemberAccess,
    /// A bare identifier
    Identifier,
    /// Anything else (statements, calls, initializers, ...)
    Other,
}

/// Kind of a type member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Property,
    Field,
    Method,
    Indexer,
    Event,
}

/// A member declared on a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Simple name
    pub name: String,
    /// Declared type, as written
    pub declared_type: String,
    /// Member kind
    pub kind: MemberKind,
    /// Resolved identities of annotations on the member declaration
    pub annotations: Vec<QualifiedName>,
}

impl Member {
    pub fn property(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            kind: MemberKind::Property,
            annotations: Vec::new(),
        }
    }

    /// Check whether any annotation on this member is one of `markers`
    pub fn has_annotation(&self, markers: &[QualifiedName]) -> bool {
        self.annotations.iter().any(|a| markers.contains(a))
    }
}

/// A resolved type as reported by the symbol service
///
/// Partial declarations are already merged: `members` holds the members of
/// every fragment in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    /// Simple name
    pub name: String,
    /// Fully qualified name
    pub qualified_name: QualifiedName,
    /// Declared members
    pub members: Vec<Member>,
}

/// Read-only view of the host's syntax tree
pub trait SyntaxTree {
    /// Kind of a node (`Other` for unknown handles)
    fn kind(&self, node: NodeId) -> SyntaxKind;

    /// Child nodes in source order
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Parent node (if any)
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Node text: accessed name, identifier, literal value or written name
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Source location
    fn location(&self, node: NodeId) -> Location;

    /// Every annotation occurrence in the tree, in source order
    fn annotation_occurrences(&self) -> Vec<NodeId>;
}

/// Read-only view of the host's symbol tables
pub trait SymbolResolver {
    /// Fully qualified identity of the annotation type applied at `node`
    fn resolve_annotation_identity(&self, node: NodeId) -> Option<&QualifiedName>;

    /// Type denoted by a type-name node
    fn resolve_type(&self, type_ref: NodeId) -> Option<TypeId>;

    /// Type declared by the class enclosing `node`
    fn resolve_enclosing_type(&self, node: NodeId) -> Option<TypeId>;

    /// Symbol for a resolved type
    fn type_symbol(&self, id: TypeId) -> Option<&TypeSymbol>;

    /// Per-member exclusion flags of a type, keyed by member name
    fn member_markers(&self, id: TypeId, exclusion_markers: &[QualifiedName]) -> MemberMarkers {
        let mut markers = MemberMarkers::new();
        if let Some(ty) = self.type_symbol(id) {
            for member in &ty.members {
                let marked = member.has_annotation(exclusion_markers);
                *markers.entry(member.name.clone()).or_insert(false) |= marked;
            }
        }
        markers
    }
}

/// Everything the engine needs from a host
pub trait Host: SyntaxTree + SymbolResolver + Send + Sync {}

impl<T: SyntaxTree + SymbolResolver + Send + Sync> Host for T {}
