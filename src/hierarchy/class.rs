// Tue Jan 20 2026 - Alex

use crate::hierarchy::{AccessSpecifier, ClassId, FieldDecl, MethodSlot, SlotId};
use std::fmt;

/// One inheritance edge, declared in a fixed position within the
/// deriving class. Declaration order is significant: it is the
/// construction and layout tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSpec {
    pub class: ClassId,
    pub is_virtual: bool,
    pub access: AccessSpecifier,
}

impl BaseSpec {
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            is_virtual: false,
            access: AccessSpecifier::Public,
        }
    }

    pub fn with_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn with_access(mut self, access: AccessSpecifier) -> Self {
        self.access = access;
        self
    }
}

/// A class declaration: ordered bases, fields, and method slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<BaseSpec>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodSlot>,
    /// Whether the class can be constructed with no arguments. Matters
    /// only for virtual bases the most derived class fails to
    /// initialize explicitly.
    pub has_default_ctor: bool,
}

impl ClassDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bases: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            has_default_ctor: true,
        }
    }

    pub fn with_base(mut self, class: ClassId) -> Self {
        self.bases.push(BaseSpec::new(class));
        self
    }

    pub fn with_virtual_base(mut self, class: ClassId) -> Self {
        self.bases.push(BaseSpec::new(class).with_virtual());
        self
    }

    pub fn with_base_spec(mut self, spec: BaseSpec) -> Self {
        self.bases.push(spec);
        self
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodSlot) -> Self {
        self.methods.push(method);
        self
    }

    /// Classes with only a parametrized constructor must be
    /// initialized explicitly wherever they appear as a virtual base.
    pub fn without_default_ctor(mut self) -> Self {
        self.has_default_ctor = false;
        self
    }

    pub fn find_method(&self, id: &SlotId) -> Option<&MethodSlot> {
        self.methods.iter().find(|m| &m.id == id)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether this class declares any member (field or method) with
    /// the given plain name.
    pub fn declares_name(&self, name: &str) -> bool {
        self.find_field(name).is_some() || self.methods.iter().any(|m| m.id.name == name)
    }

    /// A virtual method slot declared directly by this class
    pub fn declares_virtual(&self) -> bool {
        self.methods.iter().any(|m| m.is_virtual())
    }

    /// Field names in declaration order. Construction always follows
    /// this order, whatever order the initializers were written in.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        writeln!(f, " {{")?;
        for m in &self.methods {
            writeln!(f, "    {};", m)?;
        }
        for field in &self.fields {
            writeln!(f, "    {};", field)?;
        }
        write!(f, "}}")
    }
}
