//! Snapshot file format
//!
//! A snapshot is what a language front end exports after parsing and binding
//! a program: resolved types with their members, and the classes whose
//! annotations and bodies the engine inspects.
//!
//! ```yaml
//! types:
//!   - name: MyApp.SourceDto
//!     members:
//!       - { name: A, type: int }
//!       - { name: C, type: int, annotations: [MapEnforcer.ExcludeFromMappingAttribute] }
//! classes:
//!   - name: MyApp.MyMapper
//!     line: 6
//!     annotations:
//!       - type: MapEnforcer.MapperAttribute
//!         name: Mapper
//!         line: 6
//!         column: 6
//!         arguments:
//!           - { kind: type_of, type: MyApp.SourceDto }
//!     body:
//!       - kind: member_access
//!         name: A
//!         receiver: { kind: identifier, name: source }
//! ```

use crate::frontend::LoadError;
use crate::host::MemberKind;
use crate::schema::QualifiedName;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

/// One declaration fragment of a type; fragments sharing a name merge
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDecl {
    pub name: String,

    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberDecl {
    pub name: String,

    #[serde(rename = "type", default)]
    pub declared_type: String,

    #[serde(default)]
    pub kind: MemberKind,

    /// Resolved identities of annotations on the member
    #[serde(default)]
    pub annotations: Vec<QualifiedName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassDecl {
    pub name: String,

    /// The front end could not bind this class
    #[serde(default)]
    pub unresolved: bool,

    #[serde(default)]
    pub line: usize,

    #[serde(default)]
    pub column: usize,

    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,

    #[serde(default)]
    pub body: Vec<SyntaxDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationDecl {
    /// Resolved annotation type; absent when binding failed
    #[serde(rename = "type", default)]
    pub identity: Option<QualifiedName>,

    /// Name as written in source
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub line: usize,

    #[serde(default)]
    pub column: usize,

    #[serde(default)]
    pub arguments: Vec<SyntaxDecl>,
}

/// Expression and statement syntax
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntaxDecl {
    /// `typeof(T)`
    TypeOf {
        #[serde(rename = "type")]
        type_name: String,
    },

    /// String literal
    #[serde(rename = "string")]
    Literal { value: String },

    /// `receiver.name`
    MemberAccess {
        name: String,
        receiver: Box<SyntaxDecl>,
        #[serde(default)]
        line: usize,
        #[serde(default)]
        column: usize,
    },

    Identifier { name: String },

    /// Any other construct; only its children matter
    Node {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        children: Vec<SyntaxDecl>,
        #[serde(default)]
        line: usize,
        #[serde(default)]
        column: usize,
    },
}

impl Snapshot {
    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let snapshot: Self = serde_yaml::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let snapshot: Self = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), LoadError> {
        let type_names = self.types.iter().map(|t| t.name.as_str());
        let class_names = self.classes.iter().map(|c| c.name.as_str());
        if type_names.chain(class_names).any(|n| n.trim().is_empty()) {
            return Err(LoadError::Invalid("declaration with empty name".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_snapshot() {
        let yaml = r#"
types:
  - name: MyApp.SourceDto
    members:
      - { name: A, type: int }
      - { name: Save, kind: method }
classes:
  - name: MyApp.MyMapper
    annotations:
      - type: MapEnforcer.MapperAttribute
        arguments:
          - { kind: type_of, type: MyApp.SourceDto }
          - { kind: string, value: B }
    body:
      - kind: node
        label: return
        children:
          - kind: member_access
            name: A
            receiver: { kind: identifier, name: source }
"#;
        let snapshot = Snapshot::from_yaml(yaml).unwrap();

        assert_eq!(snapshot.types[0].members.len(), 2);
        assert_eq!(snapshot.types[0].members[1].kind, MemberKind::Method);
        assert_eq!(snapshot.classes[0].annotations[0].arguments.len(), 2);
        assert!(matches!(
            snapshot.classes[0].body[0],
            SyntaxDecl::Node { ref children, .. } if children.len() == 1
        ));
    }

    #[test]
    fn test_parse_json_snapshot() {
        let json = r#"{
            "classes": [{
                "name": "MyApp.MyMapper",
                "body": [{"kind": "identifier", "name": "x"}]
            }]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert!(snapshot.types.is_empty());
        assert_eq!(snapshot.classes.len(), 1);
    }

    #[test]
    fn test_empty_input_is_an_empty_snapshot() {
        let snapshot = Snapshot::from_yaml("   \n").unwrap();
        assert!(snapshot.types.is_empty());
        assert!(snapshot.classes.is_empty());
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let err = Snapshot::from_yaml("types:\n  - name: ''\n").unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
    }

    #[test]
    fn test_unknown_syntax_kind_is_an_error() {
        let yaml = "classes:\n  - name: M\n    body:\n      - { kind: lambda }\n";
        assert!(matches!(
            Snapshot::from_yaml(yaml),
            Err(LoadError::Yaml(_))
        ));
    }
}
