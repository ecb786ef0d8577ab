// Thu Jan 22 2026 - Alex

use crate::analysis::dispatch;
use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::linearize;
use crate::hierarchy::{ClassId, HierarchyGraph};
use indexmap::IndexMap;
use std::fmt;

/// Constructor arguments, opaque to the simulator
pub type InitArgs = Vec<i64>;

/// Initialization arguments the programmer wrote, keyed by (owning
/// class, base). Owners other than the most derived class are ignored
/// for virtual bases; that is the whole point of the precedence rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppliedInitializers {
    base_args: IndexMap<(ClassId, ClassId), InitArgs>,
    field_order: IndexMap<ClassId, Vec<String>>,
}

impl SuppliedInitializers {
    pub fn new() -> Self {
        Self::default()
    }

    /// `owner` initializes `base` with `args` in its initializer list
    pub fn base(mut self, owner: ClassId, base: ClassId, args: InitArgs) -> Self {
        self.base_args.insert((owner, base), args);
        self
    }

    /// Order the programmer listed `owner`'s field initializers in.
    /// Accepted silently; declaration order always wins.
    pub fn field_order(mut self, owner: ClassId, names: &[&str]) -> Self {
        self.field_order
            .insert(owner, names.iter().map(|n| n.to_string()).collect());
        self
    }

    fn args_for(&self, owner: ClassId, base: ClassId) -> Option<&InitArgs> {
        self.base_args.get(&(owner, base))
    }

    fn other_suppliers_for(&self, base: ClassId, except: ClassId) -> Vec<ClassId> {
        self.base_args
            .keys()
            .filter(|(owner, b)| *b == base && *owner != except)
            .map(|(owner, _)| *owner)
            .collect()
    }
}

/// Why a class appears at a given position in the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRole {
    /// Shared virtual base, constructed first by the most derived class
    VirtualBase,
    /// Ordinary non-virtual base subobject
    Base,
    /// The most derived class itself, last
    MostDerived,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionStep {
    pub class: ClassId,
    pub role: StepRole,
    pub args: InitArgs,
    /// Field initialization order: always declaration order
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionPlan {
    pub class: ClassId,
    pub steps: Vec<ConstructionStep>,
}

impl ConstructionPlan {
    pub fn classes(&self) -> Vec<ClassId> {
        self.steps.iter().map(|s| s.class).collect()
    }

    pub fn display<'a>(&'a self, graph: &'a HierarchyGraph) -> PlanDisplay<'a> {
        PlanDisplay { plan: self, graph }
    }
}

pub struct PlanDisplay<'a> {
    plan: &'a ConstructionPlan,
    graph: &'a HierarchyGraph,
}

impl fmt::Display for PlanDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Construction of {}:",
            self.graph.name_of(self.plan.class)
        )?;
        for (index, step) in self.plan.steps.iter().enumerate() {
            let role = match step.role {
                StepRole::VirtualBase => " [virtual base]",
                StepRole::Base => "",
                StepRole::MostDerived => " [most derived]",
            };
            write!(f, "  {}. {}", index + 1, self.graph.name_of(step.class))?;
            if !step.args.is_empty() {
                let args: Vec<String> = step.args.iter().map(|a| a.to_string()).collect();
                write!(f, "({})", args.join(", "))?;
            }
            writeln!(f, "{}", role)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructionStep {
    pub class: ClassId,
    pub role: StepRole,
}

/// Always the exact reverse of the construction sequence for the same
/// most derived class. There is no independent destruction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructionPlan {
    pub class: ClassId,
    pub steps: Vec<DestructionStep>,
}

impl DestructionPlan {
    pub fn classes(&self) -> Vec<ClassId> {
        self.steps.iter().map(|s| s.class).collect()
    }
}

/// Produce the ordered construction sequence for `class`.
///
/// Virtual bases come first in linearizer order, initialized only with
/// the most derived class's arguments; initializers written by
/// intermediate classes for them are discarded. Then non-virtual bases
/// recurse in declared order using their immediate owner's arguments.
///
/// Fails with `AbstractClass` when `class` has an unimplemented pure
/// slot: an abstract class can only ever be a base subobject, never
/// the most derived object of a construction.
pub fn plan_construction(
    graph: &HierarchyGraph,
    class: ClassId,
    supplied: &SuppliedInitializers,
) -> AnalysisResult<ConstructionPlan> {
    let table = dispatch::dispatch_table(graph, class)?;
    if let Some(slot) = table.unimplemented_slots().first() {
        return Err(AnalysisError::AbstractClass {
            class: graph.name_of(class).to_string(),
            slot: slot.to_string(),
        });
    }

    let lin = linearize::linearize(graph, class)?;
    let mut steps = Vec::new();

    for &vbase in &lin.shared_bases {
        for ignored in supplied.other_suppliers_for(vbase, class) {
            log::debug!(
                "initializer for virtual base {} written by {} is ignored; {} constructs it",
                graph.name_of(vbase),
                graph.name_of(ignored),
                graph.name_of(class)
            );
        }
        let args = match supplied.args_for(class, vbase) {
            Some(args) => args.clone(),
            None => {
                if !graph.class(vbase).has_default_ctor {
                    return Err(AnalysisError::MissingVirtualBaseInitializer {
                        class: graph.name_of(class).to_string(),
                        base: graph.name_of(vbase).to_string(),
                    });
                }
                InitArgs::new()
            }
        };
        steps.push(step(graph, vbase, StepRole::VirtualBase, args, supplied));
    }

    emit_non_virtual(graph, class, StepRole::MostDerived, InitArgs::new(), supplied, &mut steps);

    Ok(ConstructionPlan { class, steps })
}

fn emit_non_virtual(
    graph: &HierarchyGraph,
    id: ClassId,
    role: StepRole,
    args: InitArgs,
    supplied: &SuppliedInitializers,
    steps: &mut Vec<ConstructionStep>,
) {
    for spec in graph.bases_of(id) {
        if spec.is_virtual {
            // Already constructed up front by the most derived class
            continue;
        }
        let base_args = supplied
            .args_for(id, spec.class)
            .cloned()
            .unwrap_or_default();
        emit_non_virtual(graph, spec.class, StepRole::Base, base_args, supplied, steps);
    }
    steps.push(step(graph, id, role, args, supplied));
}

fn step(
    graph: &HierarchyGraph,
    id: ClassId,
    role: StepRole,
    args: InitArgs,
    supplied: &SuppliedInitializers,
) -> ConstructionStep {
    let declared = graph.class(id).field_names();
    if let Some(written) = supplied.field_order.get(&id) {
        if *written != declared {
            log::debug!(
                "field initializers of {} were written out of declaration order; declaration order wins",
                graph.name_of(id)
            );
        }
    }
    ConstructionStep {
        class: id,
        role,
        args,
        fields: declared,
    }
}

/// Derived mechanically from the construction sequence, with supplied
/// arguments irrelevant (destructors take none).
pub fn plan_destruction(graph: &HierarchyGraph, class: ClassId) -> AnalysisResult<DestructionPlan> {
    let construction = plan_construction_unchecked(graph, class)?;
    let steps = construction
        .steps
        .iter()
        .rev()
        .map(|s| DestructionStep {
            class: s.class,
            role: s.role,
        })
        .collect();
    Ok(DestructionPlan { class, steps })
}

// Construction order without initializer validation: destruction does
// not care whether a virtual base could have been default-constructed.
fn plan_construction_unchecked(
    graph: &HierarchyGraph,
    class: ClassId,
) -> AnalysisResult<ConstructionPlan> {
    let lin = linearize::linearize(graph, class)?;
    let supplied = SuppliedInitializers::new();
    let mut steps = Vec::new();
    for &vbase in &lin.shared_bases {
        steps.push(step(graph, vbase, StepRole::VirtualBase, InitArgs::new(), &supplied));
    }
    emit_non_virtual(graph, class, StepRole::MostDerived, InitArgs::new(), &supplied, &mut steps);
    Ok(ConstructionPlan { class, steps })
}
