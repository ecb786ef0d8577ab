// Tue Jan 20 2026 - Alex

use crate::analysis::dispatch;
use crate::hierarchy::{ClassId, HierarchyGraph};
use std::collections::HashMap;
use std::fmt;

/// Summary statistics over a hierarchy graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyStats {
    pub total_classes: usize,
    pub root_classes: usize,
    pub leaf_classes: usize,
    pub abstract_classes: usize,
    pub polymorphic_classes: usize,
    pub multiple_inheritance_count: usize,
    pub virtual_inheritance_count: usize,
    pub max_depth: usize,
}

impl HierarchyStats {
    pub fn from_graph(graph: &HierarchyGraph) -> Self {
        let total_classes = graph.class_count();
        let mut children: HashMap<ClassId, usize> = HashMap::new();
        for (_, decl) in graph.iter() {
            for spec in &decl.bases {
                *children.entry(spec.class).or_default() += 1;
            }
        }

        let root_classes = graph
            .iter()
            .filter(|(_, decl)| decl.bases.is_empty())
            .count();
        let leaf_classes = graph
            .ids()
            .filter(|id| children.get(id).copied().unwrap_or(0) == 0)
            .count();
        let multiple_inheritance_count = graph
            .iter()
            .filter(|(_, decl)| decl.bases.len() > 1)
            .count();
        let virtual_inheritance_count = graph
            .iter()
            .filter(|(_, decl)| decl.bases.iter().any(|b| b.is_virtual))
            .count();

        // Abstract status is derived from the dispatch table, never a
        // hand-maintained flag. Classes whose table cannot be built
        // (ambiguous overriders, cycles) are not counted.
        let abstract_classes = graph
            .ids()
            .filter(|&id| {
                dispatch::dispatch_table(graph, id)
                    .map(|t| t.is_abstract())
                    .unwrap_or(false)
            })
            .count();
        let polymorphic_classes = graph
            .ids()
            .filter(|&id| crate::analysis::layout::is_polymorphic(graph, id))
            .count();

        let mut depths: HashMap<ClassId, Option<usize>> = HashMap::new();
        let max_depth = graph
            .ids()
            .map(|id| Self::depth(graph, id, &mut depths))
            .max()
            .unwrap_or(0);

        Self {
            total_classes,
            root_classes,
            leaf_classes,
            abstract_classes,
            polymorphic_classes,
            multiple_inheritance_count,
            virtual_inheritance_count,
            max_depth,
        }
    }

    /// Longest base chain below `id`, memoized per class. `None` in the
    /// memo marks a class still on the walk stack; a back edge into one
    /// contributes no depth, so a cyclic graph (which every analysis
    /// pass rejects with `Cycle`) still yields a finite answer here.
    fn depth(
        graph: &HierarchyGraph,
        id: ClassId,
        memo: &mut HashMap<ClassId, Option<usize>>,
    ) -> usize {
        match memo.get(&id) {
            Some(Some(depth)) => return *depth,
            Some(None) => return 0,
            None => {}
        }
        memo.insert(id, None);
        let depth = graph
            .bases_of(id)
            .iter()
            .map(|spec| 1 + Self::depth(graph, spec.class, memo))
            .max()
            .unwrap_or(0);
        memo.insert(id, Some(depth));
        depth
    }
}

impl fmt::Display for HierarchyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hierarchy Statistics:")?;
        writeln!(f, "  Total classes: {}", self.total_classes)?;
        writeln!(f, "  Root classes: {}", self.root_classes)?;
        writeln!(f, "  Leaf classes: {}", self.leaf_classes)?;
        writeln!(f, "  Abstract classes: {}", self.abstract_classes)?;
        writeln!(f, "  Polymorphic classes: {}", self.polymorphic_classes)?;
        writeln!(f, "  Multiple inheritance: {}", self.multiple_inheritance_count)?;
        writeln!(f, "  Virtual inheritance: {}", self.virtual_inheritance_count)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        Ok(())
    }
}
