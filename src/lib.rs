// Tue Jan 20 2026 - Alex

//! Class hierarchy layout and dispatch simulator.
//!
//! Builds an in-memory model of a class hierarchy (single, multiple, and
//! virtual inheritance) and answers the questions a compiler's object
//! model backend would answer: how big is an object, where do its
//! subobjects and hidden pointers live, in which order do constructors
//! and destructors run, which implementation does a virtual call land
//! on, and which declaration does a name bind to.
//!
//! Everything here is pure analysis over declared shapes. No memory is
//! allocated for simulated objects and no code is generated. The byte
//! conventions (pointer width, block ordering, shared base placement)
//! are a documented convention of this crate, not a real ABI.

pub mod analysis;
pub mod hierarchy;
pub mod output;
pub mod utils;

pub use analysis::{
    dispatch_table, layout, linearize, plan_construction, plan_destruction, resolve_name,
    resolve_override, AnalysisError, AnalysisRegistry, AnalysisResult, BaseSubobject,
    ConstructionPlan, ConstructionStep, DestructionPlan, DispatchTable, LayoutKind, LayoutPlan,
    LayoutRecord, Linearization, MemberDecl, NameBinding, SlotResolution, StepRole,
    SuppliedInitializers, POINTER_SIZE,
};
pub use hierarchy::{
    AccessSpecifier, BaseSpec, ClassDecl, ClassId, FieldDecl, HierarchyGraph, HierarchyStats,
    MethodFlags, MethodSlot, SlotId,
};
pub use output::{
    hierarchy_dot, SerializableConstructionPlan, SerializableDispatchTable, SerializableLayout,
};
pub use utils::LoggingUtils;
