//! Exclusion set computation
//!
//! Three sources decide which source members a mapper may leave unmentioned:
//! the explicit names on the declaration, the source type's own member
//! markers, and the markers of an optional metadata type. A metadata member
//! with the same name shadows the source member's marker; it never merges
//! with it.

use std::collections::{BTreeSet, HashMap};

/// Member name -> "excluded from mapping" marker
pub type MemberMarkers = HashMap<String, bool>;

/// Names a mapper is not required to mention
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Compute the exclusion set for one mapper occurrence
    ///
    /// Explicit names are taken verbatim; a name matching no member is inert.
    pub fn resolve<I>(
        source: &MemberMarkers,
        metadata: Option<&MemberMarkers>,
        explicit: I,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut names: BTreeSet<String> = explicit.into_iter().collect();

        for (name, &own) in source {
            let marked = metadata
                .and_then(|md| md.get(name))
                .copied()
                .unwrap_or(own);
            if marked {
                names.insert(name.clone());
            }
        }

        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
