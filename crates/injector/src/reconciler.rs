use crate::config::InjectorConfig;
use crate::control::build_control;
use crate::dom_store::{DomPatchError, DomStore};
use core_types::Location;
use document::Value;
use html::{DomPatch, PatchKey};
use resolver::{ComponentRegistry, LocationResolver, ResolveContext, plan_pass};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcilerState {
    /// Not yet activated.
    Idle,
    Observing,
    /// Torn down; every later event is ignored.
    Deactivated,
}

/// What one pass reads. Fixed for the whole pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassInput<'a> {
    pub document: Option<&'a Value>,
    pub loading: bool,
    pub components: Option<&'a ComponentRegistry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub removed: usize,
    pub installed: usize,
    /// Values were unavailable, so only teardown ran.
    pub skipped: bool,
}

/// Keeps exactly one duplicate control on every eligible row of the live tree.
///
/// Each pass tears down every marked control and rebuilds from scratch; no control survives
/// a pass, so a captured location is never older than the last structural change. The
/// store is disconnected for the whole pass, so the pass's own writes never schedule
/// another one.
pub struct Reconciler {
    state: ReconcilerState,
    config: InjectorConfig,
    label: String,
    resolver: LocationResolver,
    controls: HashMap<PatchKey, Location>,
    passes: u64,
}

impl Reconciler {
    pub fn new(config: InjectorConfig, label: impl Into<String>) -> Self {
        Self::with_resolver(config, label, LocationResolver::new())
    }

    pub fn with_resolver(
        config: InjectorConfig,
        label: impl Into<String>,
        resolver: LocationResolver,
    ) -> Self {
        Self {
            state: ReconcilerState::Idle,
            config,
            label: label.into(),
            resolver,
            controls: HashMap::new(),
            passes: 0,
        }
    }

    pub fn state(&self) -> ReconcilerState {
        self.state
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Installed controls and the locations they were built for.
    pub fn controls(&self) -> impl Iterator<Item = (PatchKey, &Location)> {
        self.controls.iter().map(|(key, location)| (*key, location))
    }

    /// Idle -> Observing, then a first pass.
    pub fn activate(
        &mut self,
        store: &mut DomStore,
        input: PassInput<'_>,
    ) -> Result<Option<PassReport>, DomPatchError> {
        if self.state != ReconcilerState::Idle {
            return Ok(None);
        }
        self.state = ReconcilerState::Observing;
        self.pass(store, input).map(Some)
    }

    /// Run a pass if the store recorded structural changes since the last one.
    pub fn on_mutations(
        &mut self,
        store: &mut DomStore,
        input: PassInput<'_>,
    ) -> Result<Option<PassReport>, DomPatchError> {
        let records = store.take_records();
        if self.state != ReconcilerState::Observing || records.is_empty() {
            return Ok(None);
        }
        log::trace!(target: "dz.reconcile", "{} structural changes observed", records.len());
        self.pass(store, input).map(Some)
    }

    /// Run a pass because values, loading state or the registry changed.
    pub fn refresh(
        &mut self,
        store: &mut DomStore,
        input: PassInput<'_>,
    ) -> Result<Option<PassReport>, DomPatchError> {
        if self.state != ReconcilerState::Observing {
            return Ok(None);
        }
        self.pass(store, input).map(Some)
    }

    /// Remove every control and stop observing for good.
    pub fn deactivate(&mut self, store: &mut DomStore) -> Result<usize, DomPatchError> {
        if self.state == ReconcilerState::Deactivated {
            return Ok(0);
        }
        self.state = ReconcilerState::Deactivated;
        store.disconnect();
        let removed = self.teardown(store)?;
        log::debug!(target: "dz.reconcile", "deactivated, removed {removed} controls");
        Ok(removed)
    }

    /// Location captured by the control that contains `target`, if any.
    pub fn control_location(&self, store: &DomStore, target: PatchKey) -> Option<&Location> {
        if self.state != ReconcilerState::Observing {
            return None;
        }
        let control = store.closest_with_attribute(target, &self.config.marker_attribute)?;
        self.controls.get(&control)
    }

    fn pass(
        &mut self,
        store: &mut DomStore,
        input: PassInput<'_>,
    ) -> Result<PassReport, DomPatchError> {
        store.disconnect();
        let result = self.rebuild(store, input);
        store.observe();
        self.passes += 1;
        match &result {
            Ok(report) => log::debug!(
                target: "dz.reconcile",
                "pass {}: removed {}, installed {}{}",
                self.passes,
                report.removed,
                report.installed,
                if report.skipped { " (values unavailable)" } else { "" }
            ),
            Err(err) => log::warn!(target: "dz.reconcile", "pass {} aborted: {err}", self.passes),
        }
        result
    }

    fn teardown(&mut self, store: &mut DomStore) -> Result<usize, DomPatchError> {
        self.controls.clear();
        let marked = store.elements_with_attribute(&self.config.marker_attribute);
        let mut removed = 0;
        for key in marked {
            // A marked node inside another marked node is already gone.
            if store.contains(key) {
                store.apply(&[DomPatch::RemoveNode { key }])?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn rebuild(
        &mut self,
        store: &mut DomStore,
        input: PassInput<'_>,
    ) -> Result<PassReport, DomPatchError> {
        let removed = self.teardown(store)?;
        let skipped = PassReport {
            removed,
            installed: 0,
            skipped: true,
        };
        let Some(document) = input.document.filter(|_| !input.loading) else {
            return Ok(skipped);
        };
        let snapshot = match store.materialize() {
            Ok(snapshot) => snapshot,
            Err(DomPatchError::MissingRoot) => return Ok(skipped),
            Err(err) => return Err(err),
        };

        let cx = ResolveContext {
            document,
            schema: &self.config.schema,
            selectors: &self.config.selectors,
            components: input.components,
        };
        let planned = plan_pass(&snapshot, &cx, &self.resolver);

        let mut installed = 0;
        for control in planned {
            let built = build_control(
                store,
                &control.anchor,
                &self.config.marker_attribute,
                &self.label,
            )?;
            store.apply(&built.patches)?;
            self.controls.insert(built.key, control.location);
            installed += 1;
        }
        Ok(PassReport {
            removed,
            installed,
            skipped: false,
        })
    }
}
