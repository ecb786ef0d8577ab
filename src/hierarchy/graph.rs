// Tue Jan 20 2026 - Alex

use crate::hierarchy::{BaseSpec, ClassDecl};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Stable handle for a class inside one `HierarchyGraph`. Identity, not
/// name, is what deduplicates shared base subobjects, so everything
/// downstream is keyed by this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable description of a set of classes and their inheritance
/// relations. Built once by the caller, then only read during analysis.
#[derive(Debug, Clone, Default)]
pub struct HierarchyGraph {
    classes: Vec<ClassDecl>,
    by_name: HashMap<String, ClassId>,
}

impl HierarchyGraph {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Add a class and return its handle. Class names are expected to
    /// be unique; a duplicate shadows the earlier name binding.
    pub fn add_class(&mut self, decl: ClassDecl) -> ClassId {
        let id = ClassId::from_index(self.classes.len());
        if self.by_name.insert(decl.name.clone(), id).is_some() {
            log::warn!("duplicate class name '{}', name now binds to {}", decl.name, id);
        }
        self.classes.push(decl);
        id
    }

    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.index()]
    }

    pub fn try_class(&self, id: ClassId) -> Option<&ClassDecl> {
        self.classes.get(id.index())
    }

    pub fn name_of(&self, id: ClassId) -> &str {
        &self.class(id).name
    }

    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDecl)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId::from_index(i), c))
    }

    pub fn bases_of(&self, id: ClassId) -> &[BaseSpec] {
        &self.class(id).bases
    }

    /// Transitive inheritance check over every kind of base edge.
    /// A class does not derive from itself.
    pub fn derives_from(&self, derived: ClassId, base: ClassId) -> bool {
        if derived == base {
            return false;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![derived];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            for spec in self.bases_of(current) {
                if spec.class == base {
                    return true;
                }
                stack.push(spec.class);
            }
        }
        false
    }

    /// All classes reachable from `id` through any base edge, `id`
    /// included, deduplicated by identity in depth-first left-to-right
    /// first-reach order.
    pub fn ancestry(&self, id: ClassId) -> Vec<ClassId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.ancestry_walk(id, &mut order, &mut seen);
        order
    }

    fn ancestry_walk(&self, id: ClassId, order: &mut Vec<ClassId>, seen: &mut HashSet<ClassId>) {
        if !seen.insert(id) {
            return;
        }
        order.push(id);
        for spec in self.bases_of(id) {
            self.ancestry_walk(spec.class, order, seen);
        }
    }
}

impl fmt::Display for HierarchyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hierarchy ({} classes)", self.class_count())?;
        for (id, decl) in self.iter() {
            write!(f, "  {} {}", id, decl.name)?;
            if !decl.bases.is_empty() {
                let bases: Vec<String> = decl
                    .bases
                    .iter()
                    .map(|b| {
                        let v = if b.is_virtual { "virtual " } else { "" };
                        format!("{}{}", v, self.name_of(b.class))
                    })
                    .collect();
                write!(f, " : {}", bases.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::FieldDecl;

    #[test]
    fn test_add_and_lookup() {
        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(ClassDecl::new("Vehicle").with_field(FieldDecl::int("maxSpeed")));
        let car = graph.add_class(ClassDecl::new("Car").with_base(vehicle));

        assert_eq!(graph.class_count(), 2);
        assert_eq!(graph.id_of("Vehicle"), Some(vehicle));
        assert_eq!(graph.name_of(car), "Car");
    }

    #[test]
    fn test_derives_from_is_transitive() {
        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(ClassDecl::new("Vehicle"));
        let car = graph.add_class(ClassDecl::new("Car").with_base(vehicle));
        let tesla = graph.add_class(ClassDecl::new("Tesla").with_base(car));

        assert!(graph.derives_from(tesla, vehicle));
        assert!(graph.derives_from(tesla, car));
        assert!(!graph.derives_from(vehicle, tesla));
        assert!(!graph.derives_from(tesla, tesla));
    }

    #[test]
    fn test_ancestry_dedups_diamond() {
        let mut graph = HierarchyGraph::new();
        let a = graph.add_class(ClassDecl::new("A"));
        let b = graph.add_class(ClassDecl::new("B").with_base(a));
        let c = graph.add_class(ClassDecl::new("C").with_base(a));
        let d = graph.add_class(ClassDecl::new("D").with_base(b).with_base(c));

        assert_eq!(graph.ancestry(d), vec![d, b, a, c]);
    }
}
