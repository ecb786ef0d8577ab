// Tue Jan 20 2026 - Alex

use crate::hierarchy::AccessSpecifier;
use std::fmt;

/// A data member declared by exactly one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub size: usize,
    pub align: usize,
    pub access: AccessSpecifier,
}

impl FieldDecl {
    pub fn new(name: &str, size: usize, align: usize) -> Self {
        Self {
            name: name.to_string(),
            size,
            align: align.max(1),
            access: AccessSpecifier::Public,
        }
    }

    /// 4-byte integer field
    pub fn int(name: &str) -> Self {
        Self::new(name, 4, 4)
    }

    /// Pointer-sized field
    pub fn ptr(name: &str) -> Self {
        Self::new(name, 8, 8)
    }

    pub fn with_access(mut self, access: AccessSpecifier) -> Self {
        self.access = access;
        self
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (size {}, align {})",
            self.access, self.name, self.size, self.align
        )
    }
}
