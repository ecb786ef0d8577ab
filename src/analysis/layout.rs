// Thu Jan 22 2026 - Alex

use crate::analysis::dispatch;
use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::linearize;
use crate::hierarchy::{ClassId, HierarchyGraph};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// Pointers (dispatch pointer, shared-base locator) are one machine
/// word. The model is 64-bit throughout.
pub const POINTER_SIZE: usize = 8;

/// Which subobject a layout record belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubobjectRef {
    /// Set when the record lives inside a shared (virtual) base block
    /// appended at the end of the most derived object
    pub shared_root: Option<ClassId>,
    /// Non-virtual inheritance path below the block root; empty for
    /// the block root's own members
    pub path: Vec<ClassId>,
}

impl SubobjectRef {
    pub fn describe(&self, graph: &HierarchyGraph) -> String {
        let path = self.path.iter().map(|&id| graph.name_of(id)).join("::");
        match (self.shared_root, path.is_empty()) {
            (Some(root), true) => format!("virtual {}", graph.name_of(root)),
            (Some(root), false) => format!("virtual {}::{}", graph.name_of(root), path),
            (None, true) => String::new(),
            (None, false) => path,
        }
    }
}

/// One placed entry in a layout plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutKind {
    /// Pointer to the owning class's dispatch table
    DispatchPtr,
    /// Pointer-sized field locating a shared base subobject; only
    /// present when no dispatch pointer exists to fold it into
    BaseLocator { base: ClassId },
    Field { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRecord {
    pub kind: LayoutKind,
    pub subobject: SubobjectRef,
    pub offset: usize,
    pub size: usize,
}

impl LayoutRecord {
    pub fn end_offset(&self) -> usize {
        self.offset + self.size
    }
}

/// Complete layout of one most derived class. Produced fresh per
/// query, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub class: ClassId,
    pub records: Vec<LayoutRecord>,
    pub size: usize,
    pub alignment: usize,
    /// Padding holes as (offset, size), tail padding included
    pub padding: Vec<(usize, usize)>,
}

impl LayoutPlan {
    pub fn dispatch_ptr_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.kind, LayoutKind::DispatchPtr))
            .count()
    }

    pub fn locator_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.kind, LayoutKind::BaseLocator { .. }))
            .count()
    }

    pub fn pointer_overhead(&self) -> usize {
        (self.dispatch_ptr_count() + self.locator_count()) * POINTER_SIZE
    }

    /// Records for fields with the given name, across all subobjects
    pub fn field_records(&self, name: &str) -> Vec<&LayoutRecord> {
        self.records
            .iter()
            .filter(|r| matches!(&r.kind, LayoutKind::Field { name: n } if n == name))
            .collect()
    }

    pub fn total_padding(&self) -> usize {
        self.padding.iter().map(|(_, size)| size).sum()
    }

    pub fn display<'a>(&'a self, graph: &'a HierarchyGraph) -> LayoutPlanDisplay<'a> {
        LayoutPlanDisplay { plan: self, graph }
    }
}

pub struct LayoutPlanDisplay<'a> {
    plan: &'a LayoutPlan,
    graph: &'a HierarchyGraph,
}

impl fmt::Display for LayoutPlanDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {} {{", self.graph.name_of(self.plan.class))?;
        writeln!(
            f,
            "  // size {} bytes, alignment {}",
            self.plan.size, self.plan.alignment
        )?;
        for record in &self.plan.records {
            let owner = record.subobject.describe(self.graph);
            let label = match &record.kind {
                LayoutKind::DispatchPtr => "<dispatch ptr>".to_string(),
                LayoutKind::BaseLocator { base } => {
                    format!("<locator for {}>", self.graph.name_of(*base))
                }
                LayoutKind::Field { name } => name.clone(),
            };
            if owner.is_empty() {
                writeln!(f, "  {:>4}  {} ({})", record.offset, label, record.size)?;
            } else {
                writeln!(
                    f,
                    "  {:>4}  {}::{} ({})",
                    record.offset, owner, label, record.size
                )?;
            }
        }
        if !self.plan.padding.is_empty() {
            writeln!(f, "  // padding: {} bytes", self.plan.total_padding())?;
        }
        writeln!(f, "}}")
    }
}

/// A class is polymorphic if it declares a virtual method slot or
/// inherits one through any base, virtual bases included.
pub fn is_polymorphic(graph: &HierarchyGraph, id: ClassId) -> bool {
    fn inner(graph: &HierarchyGraph, id: ClassId, seen: &mut HashSet<ClassId>) -> bool {
        if !seen.insert(id) {
            return false;
        }
        graph.class(id).declares_virtual()
            || graph
                .bases_of(id)
                .iter()
                .any(|spec| inner(graph, spec.class, seen))
    }
    inner(graph, id, &mut HashSet::new())
}

/// A polymorphic class introduces its own dispatch pointer unless a
/// non-virtual polymorphic base already carries one it can reuse. Two
/// unrelated polymorphic bases each keep their own; the class adds no
/// third.
pub fn introduces_dispatch_ptr(graph: &HierarchyGraph, id: ClassId) -> bool {
    is_polymorphic(graph, id)
        && !graph
            .bases_of(id)
            .iter()
            .any(|spec| !spec.is_virtual && is_polymorphic(graph, spec.class))
}

fn align_to(offset: usize, align: usize) -> usize {
    let align = align.max(1);
    (offset + align - 1) & !(align - 1)
}

/// Alignment of a class block laid out in isolation
fn block_alignment(graph: &HierarchyGraph, id: ClassId) -> usize {
    let mut align = 1;
    if introduces_dispatch_ptr(graph, id) {
        align = POINTER_SIZE;
    }
    let decl = graph.class(id);
    if !is_polymorphic(graph, id) && decl.bases.iter().any(|b| b.is_virtual) {
        align = align.max(POINTER_SIZE);
    }
    for spec in &decl.bases {
        if !spec.is_virtual {
            align = align.max(block_alignment(graph, spec.class));
        }
    }
    for field in &decl.fields {
        align = align.max(field.align);
    }
    align
}

/// Compute the full layout plan for `class`.
///
/// Fails with `AbstractClass` when the class has an unimplemented pure
/// slot (layout of an uninstantiable class is rejected), and
/// propagates linearization and dispatch errors.
pub fn layout(graph: &HierarchyGraph, class: ClassId) -> AnalysisResult<LayoutPlan> {
    let table = dispatch::dispatch_table(graph, class)?;
    if let Some(slot) = table.unimplemented_slots().first() {
        return Err(AnalysisError::AbstractClass {
            class: graph.name_of(class).to_string(),
            slot: slot.to_string(),
        });
    }

    let lin = linearize::linearize(graph, class)?;
    let mut records = Vec::new();

    let (mut offset, mut alignment) = place_block(graph, class, None, &[], 0, &mut records);

    // Shared base blocks land at the very end of the most derived
    // object, in linearizer order, each laid out in isolation.
    for &shared in &lin.shared_bases {
        let block_align = block_alignment(graph, shared);
        offset = align_to(offset, block_align);
        let (end, a) = place_block(graph, shared, Some(shared), &[], offset, &mut records);
        offset = end;
        alignment = alignment.max(a);
    }

    let size = align_to(offset, alignment);
    let padding = find_padding(&records, size);

    log::debug!(
        "laid out {}: {} bytes, {} record(s), {} padding byte(s)",
        graph.name_of(class),
        size,
        records.len(),
        padding.iter().map(|(_, s)| s).sum::<usize>()
    );

    Ok(LayoutPlan {
        class,
        records,
        size,
        alignment,
        padding,
    })
}

/// Lay out one class block (without its shared bases) starting at
/// `start`. Returns the end offset and the block's max alignment.
fn place_block(
    graph: &HierarchyGraph,
    id: ClassId,
    shared_root: Option<ClassId>,
    path: &[ClassId],
    start: usize,
    records: &mut Vec<LayoutRecord>,
) -> (usize, usize) {
    let mut offset = start;
    let mut alignment = 1;
    let subobject = SubobjectRef {
        shared_root,
        path: path.to_vec(),
    };
    let decl = graph.class(id);

    if introduces_dispatch_ptr(graph, id) {
        offset = align_to(offset, POINTER_SIZE);
        records.push(LayoutRecord {
            kind: LayoutKind::DispatchPtr,
            subobject: subobject.clone(),
            offset,
            size: POINTER_SIZE,
        });
        offset += POINTER_SIZE;
        alignment = POINTER_SIZE;
    }

    for spec in &decl.bases {
        if spec.is_virtual {
            continue;
        }
        let child_align = block_alignment(graph, spec.class);
        offset = align_to(offset, child_align);
        let mut child_path = path.to_vec();
        child_path.push(spec.class);
        let (end, a) = place_block(graph, spec.class, shared_root, &child_path, offset, records);
        // Each embedded block is padded out to its own alignment
        offset = align_to(end, child_align);
        alignment = alignment.max(a);
    }

    // Explicit locator fields only exist when there is no dispatch
    // pointer to encode the shared-base offset in
    if !is_polymorphic(graph, id) {
        for spec in &decl.bases {
            if !spec.is_virtual {
                continue;
            }
            offset = align_to(offset, POINTER_SIZE);
            records.push(LayoutRecord {
                kind: LayoutKind::BaseLocator { base: spec.class },
                subobject: subobject.clone(),
                offset,
                size: POINTER_SIZE,
            });
            offset += POINTER_SIZE;
            alignment = alignment.max(POINTER_SIZE);
        }
    }

    for field in &decl.fields {
        offset = align_to(offset, field.align);
        records.push(LayoutRecord {
            kind: LayoutKind::Field {
                name: field.name.clone(),
            },
            subobject: subobject.clone(),
            offset,
            size: field.size,
        });
        offset += field.size;
        alignment = alignment.max(field.align);
    }

    (offset, alignment)
}

fn find_padding(records: &[LayoutRecord], size: usize) -> Vec<(usize, usize)> {
    let mut sorted: Vec<&LayoutRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.offset);

    let mut padding = Vec::new();
    let mut expected = 0;
    for record in sorted {
        if record.offset > expected {
            padding.push((expected, record.offset - expected));
        }
        expected = expected.max(record.end_offset());
    }
    if expected < size {
        padding.push((expected, size - expected));
    }
    padding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{ClassDecl, FieldDecl, HierarchyGraph, MethodSlot};

    #[test]
    fn test_plain_struct_has_no_overhead() {
        let mut graph = HierarchyGraph::new();
        let no_virtual = graph.add_class(
            ClassDecl::new("NoVirtual")
                .with_field(FieldDecl::int("x"))
                .with_field(FieldDecl::int("y")),
        );

        let plan = layout(&graph, no_virtual).unwrap();
        assert_eq!(plan.size, 8);
        assert_eq!(plan.pointer_overhead(), 0);
        assert!(plan.padding.is_empty());
    }

    #[test]
    fn test_virtual_method_adds_one_dispatch_ptr() {
        let mut graph = HierarchyGraph::new();
        let one = graph.add_class(
            ClassDecl::new("OneVirtual")
                .with_method(MethodSlot::virtual_method("f"))
                .with_field(FieldDecl::int("x")),
        );
        let plan = layout(&graph, one).unwrap();
        assert_eq!(plan.size, 16);
        assert_eq!(plan.dispatch_ptr_count(), 1);

        // More virtual methods grow the table, not the object
        let ten = graph.add_class(
            ClassDecl::new("TenVirtuals")
                .with_method(MethodSlot::virtual_method("a"))
                .with_method(MethodSlot::virtual_method("b"))
                .with_method(MethodSlot::virtual_method("c"))
                .with_field(FieldDecl::int("x")),
        );
        let plan = layout(&graph, ten).unwrap();
        assert_eq!(plan.size, 16);
        assert_eq!(plan.dispatch_ptr_count(), 1);
    }

    #[test]
    fn test_single_inheritance_is_base_plus_fields() {
        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(
            ClassDecl::new("Vehicle")
                .with_field(FieldDecl::int("maxSpeed"))
                .with_field(FieldDecl::int("numTyres"))
                .with_field(FieldDecl::ptr("color")),
        );
        let car = graph.add_class(
            ClassDecl::new("Car")
                .with_base(vehicle)
                .with_field(FieldDecl::int("numGears")),
        );

        let base_plan = layout(&graph, vehicle).unwrap();
        let plan = layout(&graph, car).unwrap();

        assert_eq!(base_plan.size, 16);
        // base + own field + tail padding, zero pointer overhead
        assert_eq!(plan.size, 24);
        assert_eq!(plan.pointer_overhead(), 0);
        assert_eq!(plan.total_padding(), 4);
    }

    #[test]
    fn test_primary_base_dispatch_ptr_is_reused() {
        let mut graph = HierarchyGraph::new();
        let base = graph.add_class(
            ClassDecl::new("Base")
                .with_method(MethodSlot::virtual_method("speak"))
                .with_field(FieldDecl::int("base_data")),
        );
        let derived = graph.add_class(
            ClassDecl::new("Derived")
                .with_base(base)
                .with_method(MethodSlot::virtual_method("speak"))
                .with_field(FieldDecl::int("derived_data")),
        );

        let plan = layout(&graph, derived).unwrap();
        assert_eq!(plan.dispatch_ptr_count(), 1);
        assert_eq!(plan.size, 24);
    }

    #[test]
    fn test_unrelated_polymorphic_bases_keep_their_own_ptrs() {
        let mut graph = HierarchyGraph::new();
        let a = graph.add_class(
            ClassDecl::new("A")
                .with_method(MethodSlot::virtual_method("fa"))
                .with_field(FieldDecl::int("a_data")),
        );
        let b = graph.add_class(
            ClassDecl::new("B")
                .with_method(MethodSlot::virtual_method("fb"))
                .with_field(FieldDecl::int("b_data")),
        );
        let c = graph.add_class(
            ClassDecl::new("C")
                .with_base(a)
                .with_base(b)
                .with_field(FieldDecl::int("c_data")),
        );

        let plan = layout(&graph, c).unwrap();
        assert_eq!(plan.dispatch_ptr_count(), 2);
        assert_eq!(plan.size, 40);
    }

    #[test]
    fn test_nonvirtual_diamond_has_two_copies() {
        let mut graph = HierarchyGraph::new();
        let animal = graph.add_class(ClassDecl::new("Animal_NV").with_field(FieldDecl::int("age")));
        let lion = graph.add_class(
            ClassDecl::new("Lion_NV")
                .with_base(animal)
                .with_field(FieldDecl::int("lion_data")),
        );
        let tiger = graph.add_class(
            ClassDecl::new("Tiger_NV")
                .with_base(animal)
                .with_field(FieldDecl::int("tiger_data")),
        );
        let liger = graph.add_class(
            ClassDecl::new("Liger_NV")
                .with_base(lion)
                .with_base(tiger)
                .with_field(FieldDecl::int("liger_data")),
        );

        let plan = layout(&graph, liger).unwrap();
        assert_eq!(plan.size, 20);
        assert_eq!(plan.pointer_overhead(), 0);
        // Two independent Animal::age copies at different offsets
        let ages = plan.field_records("age");
        assert_eq!(ages.len(), 2);
        assert_ne!(ages[0].offset, ages[1].offset);
    }

    #[test]
    fn test_virtual_diamond_has_one_shared_copy() {
        let mut graph = HierarchyGraph::new();
        let animal = graph.add_class(ClassDecl::new("Animal").with_field(FieldDecl::int("age")));
        let lion = graph.add_class(
            ClassDecl::new("Lion")
                .with_virtual_base(animal)
                .with_field(FieldDecl::int("lion_data")),
        );
        let tiger = graph.add_class(
            ClassDecl::new("Tiger")
                .with_virtual_base(animal)
                .with_field(FieldDecl::int("tiger_data")),
        );
        let liger = graph.add_class(
            ClassDecl::new("Liger")
                .with_base(lion)
                .with_base(tiger)
                .with_field(FieldDecl::int("liger_data")),
        );

        let plan = layout(&graph, liger).unwrap();
        // One shared Animal at the end, located through two locators
        let ages = plan.field_records("age");
        assert_eq!(ages.len(), 1);
        assert_eq!(ages[0].subobject.shared_root, Some(animal));
        assert_eq!(plan.locator_count(), 2);
        assert_eq!(plan.size, 40);

        // The shared block sits after every non-shared record
        let shared_start = ages[0].offset;
        for record in plan
            .records
            .iter()
            .filter(|r| r.subobject.shared_root.is_none())
        {
            assert!(record.end_offset() <= shared_start);
        }
    }

    #[test]
    fn test_locator_folds_into_dispatch_ptr() {
        // Non-polymorphic Lion carries an explicit locator; a
        // polymorphic Left folds the offset into its dispatch table.
        let mut graph = HierarchyGraph::new();
        let base = graph.add_class(
            ClassDecl::new("Base")
                .with_method(MethodSlot::virtual_method("speak"))
                .with_field(FieldDecl::int("base_data")),
        );
        let left = graph.add_class(
            ClassDecl::new("Left")
                .with_virtual_base(base)
                .with_method(MethodSlot::virtual_method("speak"))
                .with_field(FieldDecl::int("left_data")),
        );

        let plan = layout(&graph, left).unwrap();
        assert_eq!(plan.locator_count(), 0);
        // Left's own ptr plus the shared Base block's
        assert_eq!(plan.dispatch_ptr_count(), 2);
        assert_eq!(plan.size, 32);
    }

    #[test]
    fn test_abstract_class_cannot_be_laid_out() {
        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(
            ClassDecl::new("Vehicle").with_method(MethodSlot::pure_virtual("print")),
        );
        let err = layout(&graph, vehicle).unwrap_err();
        assert!(matches!(err, AnalysisError::AbstractClass { .. }));
    }

    #[test]
    fn test_empty_class_is_empty() {
        let mut graph = HierarchyGraph::new();
        let empty = graph.add_class(ClassDecl::new("Empty"));
        let plan = layout(&graph, empty).unwrap();
        assert_eq!(plan.size, 0);
        assert!(plan.records.is_empty());
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut graph = HierarchyGraph::new();
        let base = graph.add_class(
            ClassDecl::new("Base").with_method(MethodSlot::virtual_method("f")),
        );
        let derived = graph.add_class(
            ClassDecl::new("Derived")
                .with_virtual_base(base)
                .with_field(FieldDecl::int("x")),
        );
        assert_eq!(layout(&graph, derived).unwrap(), layout(&graph, derived).unwrap());
    }
}
