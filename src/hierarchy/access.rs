// Tue Jan 20 2026 - Alex

use std::fmt;

/// C++ style access specifier for members and base specs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessSpecifier {
    Private,
    Protected,
    Public,
}

impl AccessSpecifier {
    /// Effective access of an inherited member seen through one
    /// inheritance edge with the given base-spec access.
    ///
    /// Public inheritance preserves access, protected inheritance caps
    /// it at protected, private inheritance caps it at private. A
    /// private member is never accessible past its declaring class.
    pub fn through_edge(self, edge: AccessSpecifier) -> AccessSpecifier {
        if self == AccessSpecifier::Private {
            return AccessSpecifier::Private;
        }
        self.min(edge)
    }

    pub fn is_accessible_in_derived(self) -> bool {
        self != AccessSpecifier::Private
    }
}

impl fmt::Display for AccessSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessSpecifier::Public => "public",
            AccessSpecifier::Protected => "protected",
            AccessSpecifier::Private => "private",
        };
        write!(f, "{}", s)
    }
}
