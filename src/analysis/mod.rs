// Wed Jan 21 2026 - Alex

pub mod dispatch;
pub mod error;
pub mod layout;
pub mod linearize;
pub mod lookup;
pub mod registry;
pub mod sequence;

pub use dispatch::{dispatch_table, resolve_override, DispatchTable, SlotResolution};
pub use error::{AnalysisError, AnalysisResult};
pub use layout::{layout, LayoutKind, LayoutPlan, LayoutRecord, SubobjectRef, POINTER_SIZE};
pub use linearize::{linearize, BaseSubobject, Linearization};
pub use lookup::{resolve_name, LookupSubobject, MemberDecl, NameBinding};
pub use registry::AnalysisRegistry;
pub use sequence::{
    plan_construction, plan_destruction, ConstructionPlan, ConstructionStep, DestructionPlan,
    DestructionStep, InitArgs, StepRole, SuppliedInitializers,
};
