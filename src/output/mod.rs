// Fri Jan 23 2026 - Alex

pub mod dot;
pub mod serializer;

pub use dot::hierarchy_dot;
pub use serializer::{
    SerializableConstructionPlan, SerializableDispatchTable, SerializableLayout,
};
