// Fri Jan 23 2026 - Alex

use crate::analysis::{
    ConstructionPlan, DispatchTable, LayoutKind, LayoutPlan, SlotResolution, StepRole,
};
use crate::hierarchy::HierarchyGraph;
use serde::{Deserialize, Serialize};

/// JSON-friendly snapshot of a layout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableLayout {
    pub class: String,
    pub size: usize,
    pub alignment: usize,
    pub records: Vec<SerializableRecord>,
    pub padding: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableRecord {
    pub kind: String,
    pub subobject: String,
    pub offset: usize,
    pub size: usize,
}

impl SerializableLayout {
    pub fn from_plan(graph: &HierarchyGraph, plan: &LayoutPlan) -> Self {
        Self {
            class: graph.name_of(plan.class).to_string(),
            size: plan.size,
            alignment: plan.alignment,
            records: plan
                .records
                .iter()
                .map(|r| SerializableRecord {
                    kind: match &r.kind {
                        LayoutKind::DispatchPtr => "dispatch_ptr".to_string(),
                        LayoutKind::BaseLocator { base } => {
                            format!("locator:{}", graph.name_of(*base))
                        }
                        LayoutKind::Field { name } => format!("field:{}", name),
                    },
                    subobject: r.subobject.describe(graph),
                    offset: r.offset,
                    size: r.size,
                })
                .collect(),
            padding: plan.padding.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON-friendly snapshot of a dispatch table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableDispatchTable {
    pub class: String,
    pub slots: Vec<SerializableSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableSlot {
    pub slot: String,
    /// Final overrider class name, or null for a pure slot with no
    /// implementation
    pub implemented_by: Option<String>,
}

impl SerializableDispatchTable {
    pub fn from_table(graph: &HierarchyGraph, table: &DispatchTable) -> Self {
        Self {
            class: graph.name_of(table.class).to_string(),
            slots: table
                .iter()
                .map(|(slot, resolution)| SerializableSlot {
                    slot: slot.to_string(),
                    implemented_by: match resolution {
                        SlotResolution::Implemented(id) => {
                            Some(graph.name_of(id).to_string())
                        }
                        SlotResolution::Unimplemented { .. } => None,
                    },
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON-friendly snapshot of a construction plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableConstructionPlan {
    pub class: String,
    pub steps: Vec<SerializableStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableStep {
    pub class: String,
    pub role: String,
    pub args: Vec<i64>,
    pub fields: Vec<String>,
}

impl SerializableConstructionPlan {
    pub fn from_plan(graph: &HierarchyGraph, plan: &ConstructionPlan) -> Self {
        Self {
            class: graph.name_of(plan.class).to_string(),
            steps: plan
                .steps
                .iter()
                .map(|s| SerializableStep {
                    class: graph.name_of(s.class).to_string(),
                    role: match s.role {
                        StepRole::VirtualBase => "virtual_base".to_string(),
                        StepRole::Base => "base".to_string(),
                        StepRole::MostDerived => "most_derived".to_string(),
                    },
                    args: s.args.clone(),
                    fields: s.fields.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
