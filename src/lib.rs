//! Map Enforcer - Mapper Completeness Linter
//!
//! Classes annotated as mappers declare a source type. Every simple data
//! property of that source type must be mentioned somewhere in the mapper
//! class, unless it is excluded explicitly on the annotation or marked as
//! excluded on the source type (or on an optional metadata type). Each
//! property that is neither mentioned nor excluded is reported under rule
//! `MEA001`.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> Frontend -> Host (SyntaxTree + SymbolResolver)
//!                  \-> schema -> members -> exclusion -> scanner
//! ```
//!
//! The engine never parses source code itself. A [`Frontend`] turns an input
//! file into a [`Host`], and the analysis only asks the host questions.
//! The built-in [`SnapshotFrontend`] reads a YAML/JSON compilation snapshot:
//!
//! ```yaml
//! types:
//!   - name: MyApp.SourceDto
//!     members:
//!       - { name: A, type: string }
//!       - { name: B, type: int }
//! classes:
//!   - name: MyApp.MyMapper
//!     annotations:
//!       - type: MapEnforcer.MapperAttribute
//!         line: 6
//!         arguments:
//!           - { kind: type_of, type: MyApp.SourceDto }
//!     body:
//!       - { kind: member_access, name: A, receiver: { kind: identifier, name: source } }
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod exclusion;
pub mod frontend;
pub mod frontends;
pub mod host;
pub mod members;
pub mod output;
pub mod rule;
pub mod scanner;
pub mod schema;

// Re-export main types
pub use config::Config;
pub use diagnostic::{Diagnostic, Location, Severity};
pub use engine::{Engine, LintResult};
pub use exclusion::ExclusionSet;
pub use frontend::{Frontend, LoadError};
pub use frontends::snapshot::{Compilation, SnapshotFrontend};
pub use host::{
    Host, Member, MemberKind, NodeId, SymbolResolver, SyntaxKind, SyntaxTree, TypeId, TypeSymbol,
};
pub use rule::{Rule, RuleCategory, PROPERTY_NOT_MAPPED};
pub use schema::{AnnotationSchema, MapperDeclaration, QualifiedName};
