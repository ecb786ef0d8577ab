// Tue Jan 20 2026 - Alex

use crate::hierarchy::AccessSpecifier;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Dispatch-relevant properties of a method slot
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodFlags: u8 {
        const VIRTUAL = 0b01;
        const PURE    = 0b10;
    }
}

/// Identity of a method slot: name plus parameter/return shape.
/// Two declarations with equal `SlotId` occupy the same slot, which is
/// what makes one an override of the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub name: String,
    pub params: Vec<String>,
    pub ret: String,
}

impl SlotId {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            ret: "void".to_string(),
        }
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_return(mut self, ret: &str) -> Self {
        self.ret = ret.to_string();
        self
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}({})", self.ret, self.name, self.params.join(", "))
    }
}

/// A method declaration inside one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSlot {
    pub id: SlotId,
    pub flags: MethodFlags,
    pub access: AccessSpecifier,
}

impl MethodSlot {
    /// Plain, statically dispatched method. Never participates in
    /// dispatch resolution.
    pub fn plain(name: &str) -> Self {
        Self {
            id: SlotId::new(name),
            flags: MethodFlags::empty(),
            access: AccessSpecifier::Public,
        }
    }

    pub fn virtual_method(name: &str) -> Self {
        Self {
            id: SlotId::new(name),
            flags: MethodFlags::VIRTUAL,
            access: AccessSpecifier::Public,
        }
    }

    /// Pure virtual: declares the slot but contributes no implementation
    pub fn pure_virtual(name: &str) -> Self {
        Self {
            id: SlotId::new(name),
            flags: MethodFlags::VIRTUAL | MethodFlags::PURE,
            access: AccessSpecifier::Public,
        }
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.id = self.id.with_params(params);
        self
    }

    pub fn with_return(mut self, ret: &str) -> Self {
        self.id = self.id.with_return(ret);
        self
    }

    pub fn with_access(mut self, access: AccessSpecifier) -> Self {
        self.access = access;
        self
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.contains(MethodFlags::VIRTUAL)
    }

    pub fn is_pure(&self) -> bool {
        self.flags.contains(MethodFlags::PURE)
    }

    /// Whether this declaration supplies a body for its slot
    pub fn is_implementation(&self) -> bool {
        !self.is_pure()
    }
}

impl fmt::Display for MethodSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual() {
            write!(f, "virtual ")?;
        }
        write!(f, "{}", self.id)?;
        if self.is_pure() {
            write!(f, " = 0")?;
        }
        Ok(())
    }
}
