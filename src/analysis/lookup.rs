// Thu Jan 22 2026 - Alex

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::linearize;
use crate::hierarchy::{AccessSpecifier, ClassId, FieldDecl, HierarchyGraph, MethodSlot};
use itertools::Itertools;

/// The member declaration a lookup resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodSlot),
}

impl MemberDecl {
    pub fn declared_access(&self) -> AccessSpecifier {
        match self {
            MemberDecl::Field(f) => f.access,
            MemberDecl::Method(m) => m.access,
        }
    }
}

/// Which subobject the resolved declaration lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSubobject {
    /// Declared by the most derived class itself
    Complete,
    /// The single shared virtual-base subobject of this class
    Shared(ClassId),
    /// A non-virtual subobject, identified by its path
    Embedded(Vec<ClassId>),
}

/// Result of an unqualified name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameBinding {
    pub declaring_class: ClassId,
    pub subobject: LookupSubobject,
    pub member: MemberDecl,
    /// Access after applying the inheritance-edge demotions along the
    /// path (public preserves, protected and private demote)
    pub effective_access: AccessSpecifier,
}

/// Resolve a plain member name against a most derived class.
///
/// Hiding is scoped to the subobject lattice: a declaration hides the
/// same name further down its own non-virtual path, and a declaration
/// in any class derived from a shared base dominates that base's
/// declaration. Declarations in unrelated sibling subobjects never
/// hide each other. More than one survivor is a hard `AmbiguousName`
/// and the caller must qualify which base subobject it means.
pub fn resolve_name(
    graph: &HierarchyGraph,
    class: ClassId,
    name: &str,
) -> AnalysisResult<NameBinding> {
    // The most derived class's own declaration hides everything
    if let Some(member) = member_of(graph, class, name) {
        return Ok(NameBinding {
            declaring_class: class,
            subobject: LookupSubobject::Complete,
            effective_access: member.declared_access(),
            member,
        });
    }

    let lin = linearize::linearize(graph, class)?;

    let mut candidates = Vec::new();
    for sub in &lin.subobjects {
        if let Some(member) = member_of(graph, sub.class, name) {
            candidates.push(Candidate {
                class: sub.class,
                subobject: LookupSubobject::Embedded(sub.path.clone()),
                path: sub.path.clone(),
                member,
            });
        }
    }
    for &shared in &lin.shared_bases {
        if let Some(member) = member_of(graph, shared, name) {
            candidates.push(Candidate {
                class: shared,
                subobject: LookupSubobject::Shared(shared),
                path: vec![shared],
                member,
            });
        }
    }

    let keep: Vec<bool> = candidates
        .iter()
        .map(|c| !candidates.iter().any(|d| hides(graph, d, c)))
        .collect();
    let mut keep = keep.into_iter();
    candidates.retain(|_| keep.next().unwrap_or(false));

    match candidates.len() {
        0 => Err(AnalysisError::NameNotFound {
            class: graph.name_of(class).to_string(),
            name: name.to_string(),
        }),
        1 => {
            let candidate = &candidates[0];
            Ok(NameBinding {
                declaring_class: candidate.class,
                effective_access: effective_access(graph, class, candidate, &candidate.member),
                subobject: candidate.subobject.clone(),
                member: candidate.member.clone(),
            })
        }
        _ => Err(AnalysisError::AmbiguousName {
            class: graph.name_of(class).to_string(),
            name: name.to_string(),
            subobjects: candidates
                .iter()
                .map(|c| match &c.subobject {
                    LookupSubobject::Shared(id) => format!("virtual {}", graph.name_of(*id)),
                    _ => c.path.iter().map(|&id| graph.name_of(id)).join("::"),
                })
                .collect(),
        }),
    }
}

/// Whether `hider`'s declaration hides `hidden`'s. Only two shapes do:
/// a shallower declaration on the same non-virtual path, and any
/// derived class dominating a shared base.
fn hides(graph: &HierarchyGraph, hider: &Candidate, hidden: &Candidate) -> bool {
    match &hidden.subobject {
        LookupSubobject::Shared(base) => {
            hider.class != *base && graph.derives_from(hider.class, *base)
        }
        LookupSubobject::Embedded(_) => {
            matches!(hider.subobject, LookupSubobject::Embedded(_))
                && hider.path.len() < hidden.path.len()
                && hidden.path.starts_with(&hider.path)
        }
        LookupSubobject::Complete => false,
    }
}

fn member_of(graph: &HierarchyGraph, class: ClassId, name: &str) -> Option<MemberDecl> {
    let decl = graph.class(class);
    if let Some(field) = decl.find_field(name) {
        return Some(MemberDecl::Field(field.clone()));
    }
    decl.methods
        .iter()
        .find(|m| m.id.name == name)
        .map(|m| MemberDecl::Method(m.clone()))
}

fn effective_access(
    graph: &HierarchyGraph,
    most_derived: ClassId,
    candidate: &Candidate,
    member: &MemberDecl,
) -> AccessSpecifier {
    let mut access = member.declared_access();
    // Walk the inheritance edges from the most derived class down the
    // recorded path, applying each base spec's demotion
    let mut owner = most_derived;
    for &step in &candidate.path {
        let edge = graph
            .bases_of(owner)
            .iter()
            .find(|spec| spec.class == step)
            .map(|spec| spec.access)
            .unwrap_or(AccessSpecifier::Public);
        access = access.through_edge(edge);
        owner = step;
    }
    access
}

struct Candidate {
    class: ClassId,
    subobject: LookupSubobject,
    path: Vec<ClassId>,
    member: MemberDecl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{BaseSpec, ClassDecl, HierarchyGraph};

    #[test]
    fn test_simple_inherited_field() {
        let mut graph = HierarchyGraph::new();
        let vehicle =
            graph.add_class(ClassDecl::new("Vehicle").with_field(FieldDecl::ptr("color")));
        let car = graph.add_class(ClassDecl::new("Car").with_base(vehicle));

        let binding = resolve_name(&graph, car, "color").unwrap();
        assert_eq!(binding.declaring_class, vehicle);
        assert_eq!(binding.subobject, LookupSubobject::Embedded(vec![vehicle]));
    }

    #[test]
    fn test_own_declaration_hides_base() {
        let mut graph = HierarchyGraph::new();
        let base = graph.add_class(ClassDecl::new("Base").with_field(FieldDecl::int("x")));
        let derived = graph.add_class(
            ClassDecl::new("Derived")
                .with_base(base)
                .with_field(FieldDecl::int("x")),
        );

        let binding = resolve_name(&graph, derived, "x").unwrap();
        assert_eq!(binding.declaring_class, derived);
        assert_eq!(binding.subobject, LookupSubobject::Complete);
    }

    #[test]
    fn test_intermediate_declaration_hides_base() {
        let mut graph = HierarchyGraph::new();
        let a = graph.add_class(ClassDecl::new("A").with_field(FieldDecl::int("x")));
        let b = graph.add_class(
            ClassDecl::new("B")
                .with_base(a)
                .with_field(FieldDecl::int("x")),
        );
        let c = graph.add_class(ClassDecl::new("C").with_base(b));

        let binding = resolve_name(&graph, c, "x").unwrap();
        assert_eq!(binding.declaring_class, b);
    }

    #[test]
    fn test_nonvirtual_diamond_is_ambiguous() {
        let mut graph = HierarchyGraph::new();
        let animal = graph.add_class(ClassDecl::new("Animal_NV").with_field(FieldDecl::int("age")));
        let lion = graph.add_class(ClassDecl::new("Lion_NV").with_base(animal));
        let tiger = graph.add_class(ClassDecl::new("Tiger_NV").with_base(animal));
        let liger = graph.add_class(ClassDecl::new("Liger_NV").with_base(lion).with_base(tiger));

        let err = resolve_name(&graph, liger, "age").unwrap_err();
        match err {
            AnalysisError::AmbiguousName { subobjects, .. } => {
                assert_eq!(
                    subobjects,
                    vec!["Lion_NV::Animal_NV".to_string(), "Tiger_NV::Animal_NV".to_string()]
                );
            }
            other => panic!("expected AmbiguousName, got {:?}", other),
        }
    }

    #[test]
    fn test_split_path_redeclaration_is_ambiguous() {
        // D : B, C where B : A redeclares x and C : A does not. B's
        // declaration hides A only inside B's own subobject; C::A is a
        // sibling subobject and its x survives, so the lookup splits.
        let mut graph = HierarchyGraph::new();
        let a = graph.add_class(ClassDecl::new("A").with_field(FieldDecl::int("x")));
        let b = graph.add_class(
            ClassDecl::new("B")
                .with_base(a)
                .with_field(FieldDecl::int("x")),
        );
        let c = graph.add_class(ClassDecl::new("C").with_base(a));
        let d = graph.add_class(ClassDecl::new("D").with_base(b).with_base(c));

        let err = resolve_name(&graph, d, "x").unwrap_err();
        match err {
            AnalysisError::AmbiguousName { subobjects, .. } => {
                assert_eq!(subobjects, vec!["B".to_string(), "C::A".to_string()]);
            }
            other => panic!("expected AmbiguousName, got {:?}", other),
        }
    }

    #[test]
    fn test_derived_class_dominates_shared_base() {
        // Left redeclares x over a shared Base; dominance through the
        // virtual base makes Left's declaration win for Child.
        let mut graph = HierarchyGraph::new();
        let base = graph.add_class(ClassDecl::new("Base").with_field(FieldDecl::int("x")));
        let left = graph.add_class(
            ClassDecl::new("Left")
                .with_virtual_base(base)
                .with_field(FieldDecl::int("x")),
        );
        let right = graph.add_class(ClassDecl::new("Right").with_virtual_base(base));
        let child = graph.add_class(ClassDecl::new("Child").with_base(left).with_base(right));

        let binding = resolve_name(&graph, child, "x").unwrap();
        assert_eq!(binding.declaring_class, left);
        assert_eq!(binding.subobject, LookupSubobject::Embedded(vec![left]));
    }

    #[test]
    fn test_virtual_diamond_is_unambiguous() {
        let mut graph = HierarchyGraph::new();
        let animal = graph.add_class(ClassDecl::new("Animal").with_field(FieldDecl::int("age")));
        let lion = graph.add_class(ClassDecl::new("Lion").with_virtual_base(animal));
        let tiger = graph.add_class(ClassDecl::new("Tiger").with_virtual_base(animal));
        let liger = graph.add_class(ClassDecl::new("Liger").with_base(lion).with_base(tiger));

        let binding = resolve_name(&graph, liger, "age").unwrap();
        assert_eq!(binding.declaring_class, animal);
        assert_eq!(binding.subobject, LookupSubobject::Shared(animal));
    }

    #[test]
    fn test_unknown_name() {
        let mut graph = HierarchyGraph::new();
        let lone = graph.add_class(ClassDecl::new("Lone"));
        let err = resolve_name(&graph, lone, "ghost").unwrap_err();
        assert!(matches!(err, AnalysisError::NameNotFound { .. }));
    }

    #[test]
    fn test_private_inheritance_demotes_access() {
        let mut graph = HierarchyGraph::new();
        let vehicle =
            graph.add_class(ClassDecl::new("Vehicle").with_field(FieldDecl::ptr("color")));
        let car = graph.add_class(
            ClassDecl::new("Car").with_base_spec(
                BaseSpec::new(vehicle).with_access(AccessSpecifier::Private),
            ),
        );

        let binding = resolve_name(&graph, car, "color").unwrap();
        assert_eq!(binding.member.declared_access(), AccessSpecifier::Public);
        assert_eq!(binding.effective_access, AccessSpecifier::Private);
    }

    #[test]
    fn test_method_binding_carries_its_declaration() {
        use crate::hierarchy::MethodSlot;

        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(
            ClassDecl::new("Vehicle").with_method(
                MethodSlot::plain("max_speed")
                    .with_return("int")
                    .with_access(AccessSpecifier::Protected),
            ),
        );
        let car = graph.add_class(ClassDecl::new("Car").with_base(vehicle));

        let binding = resolve_name(&graph, car, "max_speed").unwrap();
        match binding.member {
            MemberDecl::Method(m) => {
                assert_eq!(m.id.ret, "int");
                assert_eq!(m.access, AccessSpecifier::Protected);
            }
            other => panic!("expected a method, got {:?}", other),
        }
    }

    #[test]
    fn test_private_member_is_never_inherited_accessible() {
        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(
            ClassDecl::new("Vehicle")
                .with_field(FieldDecl::int("maxSpeed").with_access(AccessSpecifier::Private)),
        );
        let car = graph.add_class(ClassDecl::new("Car").with_base(vehicle));

        let binding = resolve_name(&graph, car, "maxSpeed").unwrap();
        assert_eq!(binding.effective_access, AccessSpecifier::Private);
        assert!(!binding.effective_access.is_accessible_in_derived());
    }
}
