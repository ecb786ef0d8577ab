// Thu Jan 22 2026 - Alex

use crate::analysis::dispatch::{self, DispatchTable};
use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::layout::{self, LayoutPlan};
use crate::analysis::linearize::{self, Linearization};
use crate::analysis::lookup::{self, NameBinding};
use crate::analysis::sequence::{self, ConstructionPlan, DestructionPlan, SuppliedInitializers};
use crate::hierarchy::{ClassId, HierarchyGraph, SlotId};
use ahash::AHashMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::sync::Arc;

/// Memoizing front end over the analysis passes.
///
/// Per-class artifacts are computed at most once and shared through
/// `Arc`. The registry is explicit, passed-in state: independent
/// hierarchies get independent registries and never interfere.
pub struct AnalysisRegistry {
    graph: Arc<HierarchyGraph>,
    linearizations: RwLock<AHashMap<ClassId, Arc<Linearization>>>,
    layouts: RwLock<AHashMap<ClassId, Arc<LayoutPlan>>>,
    tables: RwLock<AHashMap<ClassId, Arc<DispatchTable>>>,
}

impl AnalysisRegistry {
    pub fn new(graph: Arc<HierarchyGraph>) -> Self {
        Self {
            graph,
            linearizations: RwLock::new(AHashMap::new()),
            layouts: RwLock::new(AHashMap::new()),
            tables: RwLock::new(AHashMap::new()),
        }
    }

    pub fn graph(&self) -> &HierarchyGraph {
        &self.graph
    }

    pub fn linearization(&self, class: ClassId) -> AnalysisResult<Arc<Linearization>> {
        if let Some(found) = self.linearizations.read().get(&class) {
            return Ok(found.clone());
        }
        // Recheck under the write lock so the computation runs at most
        // once per class even under concurrent lookups
        let mut cache = self.linearizations.write();
        if let Some(found) = cache.get(&class) {
            return Ok(found.clone());
        }
        let computed = Arc::new(linearize::linearize(&self.graph, class)?);
        cache.insert(class, computed.clone());
        Ok(computed)
    }

    pub fn layout(&self, class: ClassId) -> AnalysisResult<Arc<LayoutPlan>> {
        if let Some(found) = self.layouts.read().get(&class) {
            return Ok(found.clone());
        }
        let mut cache = self.layouts.write();
        if let Some(found) = cache.get(&class) {
            return Ok(found.clone());
        }
        let computed = Arc::new(layout::layout(&self.graph, class)?);
        cache.insert(class, computed.clone());
        Ok(computed)
    }

    pub fn dispatch_table(&self, class: ClassId) -> AnalysisResult<Arc<DispatchTable>> {
        if let Some(found) = self.tables.read().get(&class) {
            return Ok(found.clone());
        }
        let mut cache = self.tables.write();
        if let Some(found) = cache.get(&class) {
            return Ok(found.clone());
        }
        let computed = Arc::new(dispatch::dispatch_table(&self.graph, class)?);
        cache.insert(class, computed.clone());
        Ok(computed)
    }

    pub fn resolve_override(&self, class: ClassId, slot: &SlotId) -> AnalysisResult<ClassId> {
        dispatch::resolve_override(&self.graph, class, slot)
    }

    pub fn resolve_name(&self, class: ClassId, name: &str) -> AnalysisResult<NameBinding> {
        lookup::resolve_name(&self.graph, class, name)
    }

    pub fn plan_construction(
        &self,
        class: ClassId,
        supplied: &SuppliedInitializers,
    ) -> AnalysisResult<ConstructionPlan> {
        sequence::plan_construction(&self.graph, class, supplied)
    }

    pub fn plan_destruction(&self, class: ClassId) -> AnalysisResult<DestructionPlan> {
        sequence::plan_destruction(&self.graph, class)
    }

    pub fn by_name(&self, name: &str) -> AnalysisResult<ClassId> {
        self.graph
            .id_of(name)
            .ok_or_else(|| AnalysisError::UnknownClass(name.to_string()))
    }

    pub fn cached_layouts(&self) -> usize {
        self.layouts.read().len()
    }

    /// Warm every per-class cache in parallel. Classes are independent
    /// given the immutable graph, so this needs no coordination.
    ///
    /// Abstract classes have no layout by definition; their
    /// `AbstractClass` rejection is expected and skipped. Any other
    /// failure aborts the sweep.
    pub fn precompute_all(&self) -> AnalysisResult<()> {
        let ids: Vec<ClassId> = self.graph.ids().collect();
        ids.par_iter().try_for_each(|&id| {
            self.linearization(id)?;
            self.dispatch_table(id)?;
            match self.layout(id) {
                Ok(_) => Ok(()),
                Err(AnalysisError::AbstractClass { class, slot }) => {
                    log::debug!("skipping layout of abstract class {} (pure slot {})", class, slot);
                    Ok(())
                }
                Err(other) => Err(other),
            }
        })
    }
}
