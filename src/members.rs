//! Candidate member enumeration

use crate::host::{Member, MemberKind, TypeSymbol};

/// Simple data properties of a source type, in declaration order
///
/// Methods, indexers, events and fields are not mapping candidates.
pub fn enumerate(ty: &TypeSymbol) -> Vec<&Member> {
    ty.members
        .iter()
        .filter(|m| m.kind == MemberKind::Property)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QualifiedName;

    #[test]
    fn test_only_properties_in_order() {
        let mut save = Member::property("Save", "void");
        save.kind = MemberKind::Method;
        let mut item = Member::property("Item", "int");
        item.kind = MemberKind::Indexer;
        let mut changed = Member::property("Changed", "EventHandler");
        changed.kind = MemberKind::Event;

        let ty = TypeSymbol {
            name: "SourceDto".to_string(),
            qualified_name: QualifiedName::new("MyApp.SourceDto"),
            members: vec![
                Member::property("C", "int"),
                save,
                Member::property("A", "string"),
                item,
                changed,
                Member::property("B", "int"),
            ],
        };

        let names: Vec<_> = enumerate(&ty).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
