// Wed Jan 21 2026 - Alex

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::hierarchy::{ClassId, HierarchyGraph, SlotId};
use indexmap::IndexMap;
use std::fmt;

/// Outcome of final-overrider resolution for one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotResolution {
    /// The class whose implementation executes for this most derived type
    Implemented(ClassId),
    /// Pure slot with no implementation anywhere in the ancestry; the
    /// class is abstract with respect to it
    Unimplemented { declared_in: ClassId },
}

/// Per-class mapping from virtual slot identity to final overrider.
/// One logical table per class, shared across all instances of that
/// class; instances only carry a pointer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    pub class: ClassId,
    slots: IndexMap<SlotId, SlotResolution>,
}

impl DispatchTable {
    pub fn get(&self, slot: &SlotId) -> Option<SlotResolution> {
        self.slots.get(slot).copied()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, SlotResolution)> {
        self.slots.iter().map(|(id, r)| (id, *r))
    }

    /// Derived abstractness: any pure slot left unimplemented
    pub fn is_abstract(&self) -> bool {
        self.slots
            .values()
            .any(|r| matches!(r, SlotResolution::Unimplemented { .. }))
    }

    pub fn unimplemented_slots(&self) -> Vec<&SlotId> {
        self.slots
            .iter()
            .filter(|(_, r)| matches!(r, SlotResolution::Unimplemented { .. }))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn display<'a>(&'a self, graph: &'a HierarchyGraph) -> DispatchTableDisplay<'a> {
        DispatchTableDisplay { table: self, graph }
    }
}

pub struct DispatchTableDisplay<'a> {
    table: &'a DispatchTable,
    graph: &'a HierarchyGraph,
}

impl fmt::Display for DispatchTableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DispatchTable for {} ({} slots)",
            self.graph.name_of(self.table.class),
            self.table.slot_count()
        )?;
        for (index, (slot, resolution)) in self.table.slots.iter().enumerate() {
            match resolution {
                SlotResolution::Implemented(class) => {
                    writeln!(f, "  [{}] {} -> {}", index, slot, self.graph.name_of(*class))?
                }
                SlotResolution::Unimplemented { .. } => {
                    writeln!(f, "  [{}] {} -> <pure, unimplemented>", index, slot)?
                }
            }
        }
        Ok(())
    }
}

/// Build the complete dispatch table for `class`.
///
/// Slots appear in first-declaration order over the depth-first
/// left-to-right ancestry walk. Non-virtual methods never enter the
/// table. Fails with `AmbiguousOverrider` when two branches supply
/// mutually unordered implementations and the class itself does not
/// settle the question.
pub fn dispatch_table(graph: &HierarchyGraph, class: ClassId) -> AnalysisResult<DispatchTable> {
    let ancestry = graph.ancestry(class);

    // A slot is virtual if any declaration in the ancestry says so;
    // a matching declaration further down is an implicit override.
    let mut slots: IndexMap<SlotId, ClassId> = IndexMap::new();
    for &id in &ancestry {
        for method in &graph.class(id).methods {
            if method.is_virtual() {
                slots.entry(method.id.clone()).or_insert(id);
            }
        }
    }

    let mut resolved = IndexMap::new();
    for (slot, declared_in) in slots {
        let resolution = resolve_slot(graph, class, &ancestry, &slot, declared_in)?;
        resolved.insert(slot, resolution);
    }

    Ok(DispatchTable {
        class,
        slots: resolved,
    })
}

fn resolve_slot(
    graph: &HierarchyGraph,
    class: ClassId,
    ancestry: &[ClassId],
    slot: &SlotId,
    declared_in: ClassId,
) -> AnalysisResult<SlotResolution> {
    // The most derived class wins outright
    if let Some(own) = graph.class(class).find_method(slot) {
        if own.is_implementation() {
            return Ok(SlotResolution::Implemented(class));
        }
    }

    // Every distinct implementation introduced along any path
    let candidates: Vec<ClassId> = ancestry
        .iter()
        .copied()
        .filter(|&id| id != class)
        .filter(|&id| {
            graph
                .class(id)
                .find_method(slot)
                .map(|m| m.is_implementation())
                .unwrap_or(false)
        })
        .collect();

    // Drop candidates superseded by a more derived candidate
    let survivors: Vec<ClassId> = candidates
        .iter()
        .copied()
        .filter(|&x| !candidates.iter().any(|&y| graph.derives_from(y, x)))
        .collect();

    match survivors.len() {
        0 => Ok(SlotResolution::Unimplemented { declared_in }),
        1 => Ok(SlotResolution::Implemented(survivors[0])),
        _ => Err(AnalysisError::AmbiguousOverrider {
            class: graph.name_of(class).to_string(),
            slot: slot.to_string(),
            candidates: survivors
                .iter()
                .map(|&id| graph.name_of(id).to_string())
                .collect(),
        }),
    }
}

/// Final overrider for one slot of one most derived class.
///
/// Errors with `NameNotFound` when the slot identity is not virtual
/// anywhere in the ancestry, and `AbstractClass` when the slot is pure
/// and nothing implements it.
pub fn resolve_override(
    graph: &HierarchyGraph,
    class: ClassId,
    slot: &SlotId,
) -> AnalysisResult<ClassId> {
    let table = dispatch_table(graph, class)?;
    match table.get(slot) {
        Some(SlotResolution::Implemented(id)) => Ok(id),
        Some(SlotResolution::Unimplemented { .. }) => Err(AnalysisError::AbstractClass {
            class: graph.name_of(class).to_string(),
            slot: slot.to_string(),
        }),
        None => Err(AnalysisError::NameNotFound {
            class: graph.name_of(class).to_string(),
            name: slot.name.clone(),
        }),
    }
}
