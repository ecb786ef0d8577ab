// Fri Jan 23 2026 - Alex

use crate::analysis::dispatch;
use crate::hierarchy::HierarchyGraph;

/// Export a hierarchy as DOT for visualization. Abstract classes are
/// drawn dashed; virtual inheritance edges are labeled.
pub fn hierarchy_dot(graph: &HierarchyGraph) -> String {
    let mut dot = String::from("digraph ClassHierarchy {\n");
    dot.push_str("  rankdir=BT;\n");
    dot.push_str("  node [shape=box];\n\n");

    for (id, decl) in graph.iter() {
        let is_abstract = dispatch::dispatch_table(graph, id)
            .map(|t| t.is_abstract())
            .unwrap_or(false);
        if is_abstract {
            dot.push_str(&format!("  \"{}\" [style=dashed];\n", decl.name));
        } else {
            dot.push_str(&format!("  \"{}\";\n", decl.name));
        }

        for spec in &decl.bases {
            let base = graph.name_of(spec.class);
            if spec.is_virtual {
                dot.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"virtual\", style=dotted];\n",
                    decl.name, base
                ));
            } else {
                dot.push_str(&format!("  \"{}\" -> \"{}\";\n", decl.name, base));
            }
        }
    }

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{ClassDecl, MethodSlot};

    #[test]
    fn test_dot_marks_virtual_edges_and_abstract_nodes() {
        let mut graph = HierarchyGraph::new();
        let vehicle = graph.add_class(
            ClassDecl::new("Vehicle").with_method(MethodSlot::pure_virtual("print")),
        );
        let _car = graph.add_class(
            ClassDecl::new("Car")
                .with_virtual_base(vehicle)
                .with_method(MethodSlot::virtual_method("print")),
        );

        let dot = hierarchy_dot(&graph);
        assert!(dot.contains("\"Vehicle\" [style=dashed];"));
        assert!(dot.contains("\"Car\" -> \"Vehicle\" [label=\"virtual\""));
    }
}
