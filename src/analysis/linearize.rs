// Wed Jan 21 2026 - Alex

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::hierarchy::{ClassId, HierarchyGraph};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// One non-virtual base subobject, identified by the inheritance path
/// that reaches it from the most derived class. Two distinct paths to
/// the same class are two distinct subobjects; this is the non-virtual
/// diamond duplication and must be preserved, not collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSubobject {
    pub class: ClassId,
    /// Path of class ids from the most derived class (exclusive) down
    /// to this subobject (inclusive, last element == `class`).
    pub path: Vec<ClassId>,
}

impl BaseSubobject {
    /// Qualified name of the path, e.g. `Car::Vehicle`
    pub fn qualified_name(&self, graph: &HierarchyGraph) -> String {
        self.path.iter().map(|&id| graph.name_of(id)).join("::")
    }
}

/// Deduplicated, ordered base list for one most derived class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearization {
    pub class: ClassId,
    /// Every class reachable through at least one virtual base edge,
    /// exactly once, ordered by first reach in a depth-first
    /// left-to-right walk of the base spec lists.
    pub shared_bases: Vec<ClassId>,
    /// Non-virtual subobjects in pre-order, declared left-to-right,
    /// one per distinct non-virtual path. Virtual edges met during
    /// this walk are not expanded; they were absorbed above.
    pub subobjects: Vec<BaseSubobject>,
}

impl Linearization {
    pub fn is_shared(&self, id: ClassId) -> bool {
        self.shared_bases.contains(&id)
    }

    /// Distinct subobjects (shared or not) whose class is `id`
    pub fn copies_of(&self, id: ClassId) -> usize {
        let shared = usize::from(self.is_shared(id));
        shared + self.subobjects.iter().filter(|s| s.class == id).count()
    }
}

/// Compute the ordered base list for `class`.
///
/// Fails with `Cycle` if the base graph reaches `class` again from
/// itself, directly or transitively.
pub fn linearize(graph: &HierarchyGraph, class: ClassId) -> AnalysisResult<Linearization> {
    check_acyclic(graph, class)?;

    // First-reach order over every base edge, plus the set of classes
    // reached through at least one virtual edge anywhere in the walk.
    let mut reach_order = Vec::new();
    let mut reached = HashSet::new();
    let mut virtual_members = HashSet::new();
    walk(graph, class, &mut reach_order, &mut reached, &mut virtual_members);

    let shared_bases: Vec<ClassId> = reach_order
        .iter()
        .copied()
        .filter(|id| virtual_members.contains(id))
        .collect();

    let mut subobjects = Vec::new();
    collect_subobjects(graph, class, &[], &mut subobjects);

    log::debug!(
        "linearized {}: {} shared base(s), {} non-virtual subobject(s)",
        graph.name_of(class),
        shared_bases.len(),
        subobjects.len()
    );

    Ok(Linearization {
        class,
        shared_bases,
        subobjects,
    })
}

fn walk(
    graph: &HierarchyGraph,
    id: ClassId,
    reach_order: &mut Vec<ClassId>,
    reached: &mut HashSet<ClassId>,
    virtual_members: &mut HashSet<ClassId>,
) {
    for spec in graph.bases_of(id) {
        if spec.is_virtual {
            virtual_members.insert(spec.class);
        }
        let first_time = reached.insert(spec.class);
        if first_time {
            reach_order.push(spec.class);
            walk(graph, spec.class, reach_order, reached, virtual_members);
        } else {
            // Already expanded, but later virtual edges into this
            // subtree still have to mark membership.
            mark_virtual_edges(graph, spec.class, virtual_members, &mut HashSet::new());
        }
    }
}

fn mark_virtual_edges(
    graph: &HierarchyGraph,
    id: ClassId,
    virtual_members: &mut HashSet<ClassId>,
    seen: &mut HashSet<ClassId>,
) {
    if !seen.insert(id) {
        return;
    }
    for spec in graph.bases_of(id) {
        if spec.is_virtual {
            virtual_members.insert(spec.class);
        }
        mark_virtual_edges(graph, spec.class, virtual_members, seen);
    }
}

fn collect_subobjects(
    graph: &HierarchyGraph,
    id: ClassId,
    path: &[ClassId],
    out: &mut Vec<BaseSubobject>,
) {
    for spec in graph.bases_of(id) {
        if spec.is_virtual {
            continue;
        }
        let mut sub_path = path.to_vec();
        sub_path.push(spec.class);
        out.push(BaseSubobject {
            class: spec.class,
            path: sub_path.clone(),
        });
        collect_subobjects(graph, spec.class, &sub_path, out);
    }
}

fn check_acyclic(graph: &HierarchyGraph, root: ClassId) -> AnalysisResult<()> {
    #[derive(PartialEq)]
    enum State {
        OnStack,
        Done,
    }

    fn visit(
        graph: &HierarchyGraph,
        id: ClassId,
        states: &mut HashMap<ClassId, State>,
    ) -> AnalysisResult<()> {
        match states.get(&id) {
            Some(State::Done) => return Ok(()),
            Some(State::OnStack) => {
                return Err(AnalysisError::Cycle {
                    class: graph.name_of(id).to_string(),
                })
            }
            None => {}
        }
        states.insert(id, State::OnStack);
        for spec in graph.bases_of(id) {
            visit(graph, spec.class, states)?;
        }
        states.insert(id, State::Done);
        Ok(())
    }

    visit(graph, root, &mut HashMap::new())
}
