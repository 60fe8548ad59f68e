use crate::config::InjectorConfig;
use crate::dom_store::{DomPatchError, DomStore};
use crate::duplicate::{DuplicateOutcome, duplicate_element};
use crate::host::ContentHost;
use crate::reconciler::{PassInput, PassReport, Reconciler};
use bus::HostEvent;
use document::Value;
use html::PatchKey;
use resolver::ComponentRegistry;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// One mounted injector: the live tree, the reconciler, and the latest host state.
///
/// Events are handled strictly one after another. Without a store (no rendering
/// environment) every event is accepted and ignored.
pub struct InjectorRuntime<H: ContentHost> {
    host: H,
    store: Option<DomStore>,
    reconciler: Reconciler,
    values: Option<Arc<Value>>,
    loading: bool,
    components: Option<ComponentRegistry>,
}

impl<H: ContentHost> InjectorRuntime<H> {
    pub fn new(config: InjectorConfig, host: H, store: Option<DomStore>) -> Self {
        let label = {
            let descriptor = &config.messages.duplicate_label;
            host.format_message(&descriptor.id, &descriptor.default_message)
        };
        Self {
            host,
            store,
            reconciler: Reconciler::new(config, label),
            values: None,
            loading: false,
            components: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> Option<&DomStore> {
        self.store.as_ref()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Process one event. Breaks once the injector has been unmounted.
    pub fn handle(&mut self, event: HostEvent) -> ControlFlow<()> {
        match event {
            HostEvent::Mount => {
                self.reconcile(|reconciler, store, input| reconciler.activate(store, input));
            }
            HostEvent::DomPatches(patches) => {
                if let Some(store) = self.store.as_mut()
                    && let Err(err) = store.apply(&patches)
                {
                    log::warn!(target: "dz.dom", "host patch batch rejected: {err}");
                }
                self.reconcile(|reconciler, store, input| reconciler.on_mutations(store, input));
            }
            HostEvent::ValuesChanged(values) => {
                self.values = values.map(Arc::new);
                self.reconcile(|reconciler, store, input| reconciler.refresh(store, input));
            }
            HostEvent::LoadingChanged(loading) => {
                self.loading = loading;
                self.reconcile(|reconciler, store, input| reconciler.refresh(store, input));
            }
            HostEvent::ComponentsChanged(components) => {
                self.components = Some(components);
                self.reconcile(|reconciler, store, input| reconciler.refresh(store, input));
            }
            HostEvent::Activate(target) => {
                self.activate(target);
            }
            HostEvent::Unmount => {
                if let Some(store) = self.store.as_mut()
                    && let Err(err) = self.reconciler.deactivate(store)
                {
                    log::warn!(target: "dz.reconcile", "teardown on unmount failed: {err}");
                }
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Drain `events` until unmount or until every sender is gone.
    pub fn run(&mut self, events: Receiver<HostEvent>) {
        while let Ok(event) = events.recv() {
            if self.handle(event).is_break() {
                break;
            }
        }
    }

    /// Duplicate through the control containing `target`, if there is one.
    pub fn activate(&mut self, target: PatchKey) -> Option<DuplicateOutcome> {
        let store = self.store.as_ref()?;
        let location = self.reconciler.control_location(store, target)?.clone();
        let config = self.reconciler.config();
        Some(duplicate_element(
            &mut self.host,
            self.values.as_deref(),
            &location,
            &config.schema,
            &config.messages,
        ))
    }

    fn reconcile<F>(&mut self, step: F) -> Option<PassReport>
    where
        F: FnOnce(
            &mut Reconciler,
            &mut DomStore,
            PassInput<'_>,
        ) -> Result<Option<PassReport>, DomPatchError>,
    {
        let Self {
            store,
            reconciler,
            values,
            loading,
            components,
            ..
        } = self;
        let store = store.as_mut()?;
        let input = PassInput {
            document: values.as_deref(),
            loading: *loading,
            components: components.as_ref(),
        };
        match step(reconciler, store, input) {
            Ok(report) => report,
            Err(err) => {
                log::warn!(target: "dz.reconcile", "pass failed: {err}");
                None
            }
        }
    }
}
