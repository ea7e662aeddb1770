//! Mapper annotation schema and argument resolution
//!
//! A mapper is declared by annotating a class:
//!
//! ```text
//! [Mapper(typeof(SourceDto))]                              // source type only
//! [Mapper(typeof(SourceDto), typeof(SourceDtoMetadata))]   // with a metadata type
//! [Mapper(typeof(SourceDto), "Internal", "Audit")]         // with explicit exclusions
//! [MapperExclusions("Audit")]                              // class-level exclusions
//! ```
//!
//! Annotation identity is always confirmed through the symbol service against
//! fully qualified names; a user type that merely shares the short name
//! `Mapper` is not a marker.

use crate::config::SchemaConfig;
use crate::host::{Host, NodeId, SyntaxKind, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A dotted, fully qualified type name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment (`MyApp.SourceDto` -> `SourceDto`)
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Arguments of a confirmed mapper annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperArguments {
    /// Argument 0: the source type
    pub source: TypeId,
    /// Argument 1 when it is a resolvable type-of expression
    pub metadata: Option<TypeId>,
    /// Remaining string literal arguments
    pub explicit_exclusions: BTreeSet<String>,
}

/// A fully resolved mapper declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperDeclaration {
    /// Simple name of the mapper class
    pub name: String,
    /// Class declaration node scanned for mentions
    pub body_root: NodeId,
    /// The mapper class itself
    pub mapper_type: TypeId,
    /// Type being mapped from
    pub source_type: TypeId,
    /// Optional type whose member markers shadow the source type's
    pub metadata_type: Option<TypeId>,
    /// Names from the annotation arguments and class-level exclusion annotations
    pub explicit_exclusions: BTreeSet<String>,
}

/// The recognized annotation identities
#[derive(Debug, Clone, Default)]
pub struct AnnotationSchema {
    mapper_markers: Vec<QualifiedName>,
    exclusion_markers: Vec<QualifiedName>,
    class_exclusion_markers: Vec<QualifiedName>,
}

impl AnnotationSchema {
    pub fn from_config(config: &SchemaConfig) -> Self {
        let names = |list: &[String]| -> Vec<QualifiedName> {
            list.iter().map(|n| QualifiedName::new(n)).collect()
        };
        Self {
            mapper_markers: names(&config.mapper_markers),
            exclusion_markers: names(&config.exclusion_markers),
            class_exclusion_markers: names(&config.class_exclusion_markers),
        }
    }

    /// Per-member exclusion marker identities
    pub fn exclusion_markers(&self) -> &[QualifiedName] {
        &self.exclusion_markers
    }

    /// Check that `node` is an annotation resolving to a mapper marker
    pub fn is_mapper_marker<H: Host + ?Sized>(&self, host: &H, node: NodeId) -> bool {
        host.kind(node) == SyntaxKind::Annotation
            && host
                .resolve_annotation_identity(node)
                .is_some_and(|id| self.mapper_markers.contains(id))
    }

    fn is_class_exclusion_marker<H: Host + ?Sized>(&self, host: &H, node: NodeId) -> bool {
        host.kind(node) == SyntaxKind::Annotation
            && host
                .resolve_annotation_identity(node)
                .is_some_and(|id| self.class_exclusion_markers.contains(id))
    }

    /// Extract the arguments of a mapper annotation
    ///
    /// Returns `None` when the node is not a confirmed marker or its first
    /// argument does not resolve to a type.
    pub fn resolve_arguments<H: Host + ?Sized>(
        &self,
        host: &H,
        annotation: NodeId,
    ) -> Option<MapperArguments> {
        if !self.is_mapper_marker(host, annotation) {
            return None;
        }

        let (first, rest) = host.children(annotation).split_first()?;
        let source = resolve_type_of(host, *first)?;

        let mut rest = rest.iter().copied().peekable();
        let metadata = match rest.peek() {
            Some(&arg) if host.kind(arg) == SyntaxKind::TypeOf => {
                rest.next();
                resolve_type_of(host, arg)
            }
            _ => None,
        };

        let explicit_exclusions = rest.filter_map(|arg| string_literal(host, arg)).collect();

        Some(MapperArguments {
            source,
            metadata,
            explicit_exclusions,
        })
    }

    /// Resolve the class carrying a mapper annotation
    ///
    /// Returns `None` when the annotation is not attached to a class
    /// declaration or the class has no symbol.
    pub fn resolve_declaration<H: Host + ?Sized>(
        &self,
        host: &H,
        annotation: NodeId,
        args: MapperArguments,
    ) -> Option<MapperDeclaration> {
        let class_node = host
            .parent(annotation)
            .filter(|&p| host.kind(p) == SyntaxKind::ClassDeclaration)?;
        let mapper_type = host.resolve_enclosing_type(annotation)?;
        let name = host.type_symbol(mapper_type)?.name.clone();

        let mut explicit_exclusions = args.explicit_exclusions;
        explicit_exclusions.extend(self.class_exclusions(host, class_node));

        Some(MapperDeclaration {
            name,
            body_root: class_node,
            mapper_type,
            source_type: args.source,
            metadata_type: args.metadata,
            explicit_exclusions,
        })
    }

    /// Names listed by class-level exclusion annotations on `class_node`
    fn class_exclusions<H: Host + ?Sized>(&self, host: &H, class_node: NodeId) -> Vec<String> {
        host.children(class_node)
            .iter()
            .filter(|&&child| self.is_class_exclusion_marker(host, child))
            .flat_map(|&annotation| host.children(annotation).iter())
            .filter_map(|&arg| string_literal(host, arg))
            .collect()
    }
}

fn resolve_type_of<H: Host + ?Sized>(host: &H, node: NodeId) -> Option<TypeId> {
    if host.kind(node) != SyntaxKind::TypeOf {
        return None;
    }
    let type_name = host.children(node).first().copied()?;
    host.resolve_type(type_name)
}

fn string_literal<H: Host + ?Sized>(host: &H, node: NodeId) -> Option<String> {
    (host.kind(node) == SyntaxKind::StringLiteral)
        .then(|| host.text(node).map(String::from))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontends::snapshot::Compilation;
    use crate::host::SyntaxTree;
    use std::path::Path;

    fn compile(yaml: &str) -> Compilation {
        Compilation::from_yaml(yaml, Path::new("test.mapper.yaml")).unwrap()
    }

    fn schema() -> AnnotationSchema {
        AnnotationSchema::from_config(&SchemaConfig::default())
    }

    const TYPES: &str = r#"
types:
  - name: MyApp.SourceDto
    members:
      - { name: A, type: int }
  - name: MyApp.SourceDtoMetadata
    members:
      - { name: A, type: int }
"#;

    #[test]
    fn test_qualified_name() {
        let name = QualifiedName::new(" MyApp.Dto.SourceDto ");
        assert_eq!(name.as_str(), "MyApp.Dto.SourceDto");
        assert_eq!(name.simple_name(), "SourceDto");
        assert_eq!(QualifiedName::from("Plain").simple_name(), "Plain");
    }

    #[test]
    fn test_resolve_all_argument_forms() {
        let yaml = format!(
            "{}{}",
            TYPES,
            r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.MapperAttribute
        arguments:
          - { kind: type_of, type: MyApp.SourceDto }
          - { kind: type_of, type: MyApp.SourceDtoMetadata }
          - { kind: string, value: B }
          - { kind: identifier, name: SomeConstant }
          - { kind: string, value: C }
"#
        );
        let comp = compile(&yaml);
        let annotation = comp.annotation_occurrences()[0];
        let args = schema().resolve_arguments(&comp, annotation).unwrap();

        assert!(args.metadata.is_some());
        assert_eq!(
            args.explicit_exclusions.into_iter().collect::<Vec<_>>(),
            vec!["B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_string_second_argument_is_an_exclusion() {
        let yaml = format!(
            "{}{}",
            TYPES,
            r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.Attributes.MapperAttribute
        arguments:
          - { kind: type_of, type: MyApp.SourceDto }
          - { kind: string, value: B }
"#
        );
        let comp = compile(&yaml);
        let annotation = comp.annotation_occurrences()[0];
        let args = schema().resolve_arguments(&comp, annotation).unwrap();

        assert_eq!(args.metadata, None);
        assert!(args.explicit_exclusions.contains("B"));
    }

    #[test]
    fn test_unrelated_annotation_with_same_short_name_is_rejected() {
        let yaml = format!(
            "{}{}",
            TYPES,
            r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MyApp.Other.MapperAttribute
        name: Mapper
        arguments:
          - { kind: type_of, type: MyApp.SourceDto }
"#
        );
        let comp = compile(&yaml);
        let annotation = comp.annotation_occurrences()[0];

        assert!(!schema().is_mapper_marker(&comp, annotation));
        assert!(schema().resolve_arguments(&comp, annotation).is_none());
    }

    #[test]
    fn test_unresolved_source_type_is_not_applicable() {
        let yaml = format!(
            "{}{}",
            TYPES,
            r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.MapperAttribute
        arguments:
          - { kind: type_of, type: MyApp.Missing }
"#
        );
        let comp = compile(&yaml);
        let annotation = comp.annotation_occurrences()[0];
        assert!(schema().resolve_arguments(&comp, annotation).is_none());
    }

    #[test]
    fn test_missing_arguments_is_not_applicable() {
        let yaml = r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.MapperAttribute
"#;
        let comp = compile(yaml);
        let annotation = comp.annotation_occurrences()[0];
        assert!(schema().resolve_arguments(&comp, annotation).is_none());
    }

    #[test]
    fn test_unresolved_metadata_degrades_to_none() {
        let yaml = format!(
            "{}{}",
            TYPES,
            r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.MapperAttribute
        arguments:
          - { kind: type_of, type: MyApp.SourceDto }
          - { kind: type_of, type: MyApp.Gone }
          - { kind: string, value: B }
"#
        );
        let comp = compile(&yaml);
        let annotation = comp.annotation_occurrences()[0];
        let args = schema().resolve_arguments(&comp, annotation).unwrap();

        assert_eq!(args.metadata, None);
        assert!(args.explicit_exclusions.contains("B"));
    }

    #[test]
    fn test_declaration_collects_class_level_exclusions() {
        let yaml = format!(
            "{}{}",
            TYPES,
            r#"
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.MapperAttribute
        arguments:
          - { kind: type_of, type: MyApp.SourceDto }
          - { kind: string, value: B }
      - type: MapEnforcer.Attributes.MapperExclusionsAttribute
        arguments:
          - { kind: string, value: C }
          - { kind: string, value: D }
"#
        );
        let comp = compile(&yaml);
        let annotation = comp.annotation_occurrences()[0];
        let schema = schema();
        let args = schema.resolve_arguments(&comp, annotation).unwrap();
        let decl = schema.resolve_declaration(&comp, annotation, args).unwrap();

        assert_eq!(decl.name, "MyMapper");
        assert_eq!(
            decl.explicit_exclusions.into_iter().collect::<Vec<_>>(),
            vec!["B".to_string(), "C".to_string(), "D".to_string()]
        );
    }
}
