// Tue Jan 20 2026 - Alex

pub mod access;
pub mod class;
pub mod field;
pub mod graph;
pub mod method;
pub mod stats;

pub use access::AccessSpecifier;
pub use class::{BaseSpec, ClassDecl};
pub use field::FieldDecl;
pub use graph::{ClassId, HierarchyGraph};
pub use method::{MethodFlags, MethodSlot, SlotId};
pub use stats::HierarchyStats;
