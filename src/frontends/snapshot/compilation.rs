//! Arena-backed host built from a snapshot

use super::parser::{AnnotationDecl, ClassDecl, Snapshot, SyntaxDecl};
use crate::diagnostic::Location;
use crate::frontend::LoadError;
use crate::host::{Member, NodeId, SymbolResolver, SyntaxKind, SyntaxTree, TypeId, TypeSymbol};
use crate::schema::QualifiedName;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct NodeData {
    kind: SyntaxKind,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    line: usize,
    column: usize,
}

/// A loaded program: syntax arena plus symbol table
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    path: PathBuf,
    nodes: Vec<NodeData>,
    annotations: Vec<NodeId>,
    annotation_identity: HashMap<NodeId, QualifiedName>,
    type_refs: HashMap<NodeId, TypeId>,
    class_types: HashMap<NodeId, TypeId>,
    types: Vec<TypeSymbol>,
    type_index: HashMap<QualifiedName, TypeId>,
}

impl Compilation {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, LoadError> {
        Ok(Self::from_snapshot(Snapshot::from_yaml(content)?, path))
    }

    pub fn from_json(content: &str, path: &Path) -> Result<Self, LoadError> {
        Ok(Self::from_snapshot(Snapshot::from_json(content)?, path))
    }

    /// Lower a snapshot into the arena
    ///
    /// Types are registered before any syntax so that every `typeof`
    /// argument can be bound regardless of declaration order.
    pub fn from_snapshot(snapshot: Snapshot, path: &Path) -> Self {
        let mut comp = Self {
            path: path.to_path_buf(),
            ..Self::default()
        };

        for decl in snapshot.types {
            let id = comp.declare_type(&decl.name);
            let members = decl.members.into_iter().map(|m| Member {
                name: m.name,
                declared_type: m.declared_type,
                kind: m.kind,
                annotations: m.annotations,
            });
            comp.types[id.0 as usize].members.extend(members);
        }

        let bound: Vec<Option<TypeId>> = snapshot
            .classes
            .iter()
            .map(|c| (!c.unresolved).then(|| comp.declare_type(&c.name)))
            .collect();

        for (class, ty) in snapshot.classes.into_iter().zip(bound) {
            comp.lower_class(class, ty);
        }

        comp
    }

    /// Look up a type by qualified name
    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.type_index.get(&QualifiedName::new(name)).copied()
    }

    fn declare_type(&mut self, name: &str) -> TypeId {
        let qualified_name = QualifiedName::new(name);
        if let Some(&id) = self.type_index.get(&qualified_name) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeSymbol {
            name: qualified_name.simple_name().to_string(),
            qualified_name: qualified_name.clone(),
            members: Vec::new(),
        });
        self.type_index.insert(qualified_name, id);
        id
    }

    /// Bind a written type name: exact qualified match, else a unique simple-name match
    fn bind_type_name(&self, written: &str) -> Option<TypeId> {
        if let Some(id) = self.type_by_name(written) {
            return Some(id);
        }
        let mut candidates = self
            .types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name == written.trim());
        match (candidates.next(), candidates.next()) {
            (Some((idx, _)), None) => Some(TypeId(idx as u32)),
            _ => None,
        }
    }

    fn push_node(
        &mut self,
        kind: SyntaxKind,
        text: Option<String>,
        parent: Option<NodeId>,
        line: usize,
        column: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            text,
            parent,
            children: Vec::new(),
            line,
            column,
        });
        if let Some(p) = parent {
            self.nodes[p.0 as usize].children.push(id);
        }
        id
    }

    fn lower_class(&mut self, class: ClassDecl, ty: Option<TypeId>) {
        let simple = QualifiedName::new(&class.name).simple_name().to_string();
        let node = self.push_node(
            SyntaxKind::ClassDeclaration,
            Some(simple),
            None,
            class.line,
            class.column,
        );
        if let Some(ty) = ty {
            self.class_types.insert(node, ty);
        }

        for annotation in class.annotations {
            self.lower_annotation(annotation, node);
        }
        for syntax in class.body {
            self.lower_syntax(syntax, node);
        }
    }

    fn lower_annotation(&mut self, annotation: AnnotationDecl, class: NodeId) {
        let written = annotation.name.clone().or_else(|| {
            annotation
                .identity
                .as_ref()
                .map(|id| id.simple_name().trim_end_matches("Attribute").to_string())
        });
        let node = self.push_node(
            SyntaxKind::Annotation,
            written,
            Some(class),
            annotation.line,
            annotation.column,
        );
        self.annotations.push(node);
        if let Some(identity) = annotation.identity {
            self.annotation_identity.insert(node, identity);
        }
        for arg in annotation.arguments {
            self.lower_syntax(arg, node);
        }
    }

    /// Lower an expression tree without recursion
    fn lower_syntax(&mut self, root: SyntaxDecl, parent: NodeId) {
        let mut stack = vec![(root, parent)];

        while let Some((syntax, parent)) = stack.pop() {
            match syntax {
                SyntaxDecl::TypeOf { type_name } => {
                    let node = self.push_node(SyntaxKind::TypeOf, None, Some(parent), 0, 0);
                    let bound = self.bind_type_name(&type_name);
                    let name_node =
                        self.push_node(SyntaxKind::TypeName, Some(type_name), Some(node), 0, 0);
                    if let Some(ty) = bound {
                        self.type_refs.insert(name_node, ty);
                    }
                }
                SyntaxDecl::Literal { value } => {
                    self.push_node(SyntaxKind::StringLiteral, Some(value), Some(parent), 0, 0);
                }
                SyntaxDecl::Identifier { name } => {
                    self.push_node(SyntaxKind::Identifier, Some(name), Some(parent), 0, 0);
                }
                SyntaxDecl::MemberAccess {
                    name,
                    receiver,
                    line,
                    column,
                } => {
                    let node = self.push_node(
                        SyntaxKind::MemberAccess,
                        Some(name),
                        Some(parent),
                        line,
                        column,
                    );
                    stack.push((*receiver, node));
                }
                SyntaxDecl::Node {
                    label,
                    children,
                    line,
                    column,
                } => {
                    let node = self.push_node(SyntaxKind::Other, label, Some(parent), line, column);
                    // Reversed so children pop, and are numbered, in source order
                    stack.extend(children.into_iter().rev().map(|c| (c, node)));
                }
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }
}

impl SyntaxTree for Compilation {
    fn kind(&self, node: NodeId) -> SyntaxKind {
        self.node(node).map_or(SyntaxKind::Other, |n| n.kind)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        match self.node(node) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.text.as_deref()
    }

    fn location(&self, node: NodeId) -> Location {
        let (line, column, length) = self.node(node).map_or((0, 0, 0), |n| {
            (n.line, n.column, n.text.as_ref().map_or(0, String::len))
        });
        Location::new(self.path.clone(), line, column).with_length(length)
    }

    fn annotation_occurrences(&self) -> Vec<NodeId> {
        self.annotations.clone()
    }
}

impl SymbolResolver for Compilation {
    fn resolve_annotation_identity(&self, node: NodeId) -> Option<&QualifiedName> {
        self.annotation_identity.get(&node)
    }

    fn resolve_type(&self, type_ref: NodeId) -> Option<TypeId> {
        self.type_refs.get(&type_ref).copied()
    }

    fn resolve_enclosing_type(&self, node: NodeId) -> Option<TypeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.kind(id) == SyntaxKind::ClassDeclaration {
                return self.class_types.get(&id).copied();
            }
            current = self.parent(id);
        }
        None
    }

    fn type_symbol(&self, id: TypeId) -> Option<&TypeSymbol> {
        self.types.get(id.0 as usize)
    }
}
