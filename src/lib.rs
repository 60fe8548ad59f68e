//! Admin plugin entry points.
//!
//! `register` announces the plugin; `bootstrap` installs the dynamic-zone injector into the
//! content manager's edit view once. The host then mounts the installed component per edit
//! view and streams events into the returned runtime.

use injector::{ConfigError, ContentHost, DomStore, InjectorConfig, InjectorRuntime};
use serde_json::Value;

pub use injector;

pub const PLUGIN_ID: &str = "strapi-dz-component-duplicator";
pub const CONTENT_MANAGER: &str = "content-manager";
pub const EDIT_VIEW: &str = "editView";
pub const INJECTION_ZONE: &str = "right-links";

pub fn injector_name() -> String {
    format!("{PLUGIN_ID}-dynamic-zone-action-injector")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginRegistration {
    pub id: String,
    pub name: String,
}

/// A component installed into an injection zone of the content manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectedComponent {
    pub name: String,
    pub config: InjectorConfig,
}

impl InjectedComponent {
    /// Start an injector for one edit view. `store` is `None` when nothing is rendered.
    pub fn mount<H: ContentHost>(&self, host: H, store: Option<DomStore>) -> InjectorRuntime<H> {
        InjectorRuntime::new(self.config.clone(), host, store)
    }
}

/// The content manager's injection zones.
pub trait InjectionZones {
    /// Names of the components already installed in `zone` of `view`.
    fn injected_components(&self, view: &str, zone: &str) -> Vec<String>;

    fn inject_component(&mut self, view: &str, zone: &str, component: InjectedComponent);
}

/// The admin application, as far as this plugin needs it.
pub trait AdminApp {
    fn register_plugin(&mut self, registration: PluginRegistration);

    /// A registered plugin that exposes injection zones.
    fn injection_zones(&mut self, plugin_id: &str) -> Option<&mut dyn InjectionZones>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Installed,
    AlreadyInstalled,
    NoContentManager,
}

pub struct Plugin {
    config: InjectorConfig,
}

impl Plugin {
    pub fn new(config: InjectorConfig) -> Self {
        Self { config }
    }

    /// Build from the host's plugin config; `null` means all defaults.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        InjectorConfig::from_json(value).map(Self::new)
    }

    pub fn register(&self, app: &mut impl AdminApp) {
        log::debug!(target: "dz.plugin", "registering {PLUGIN_ID}");
        app.register_plugin(PluginRegistration {
            id: PLUGIN_ID.to_string(),
            name: PLUGIN_ID.to_string(),
        });
    }

    pub fn bootstrap(&self, app: &mut impl AdminApp) -> BootstrapOutcome {
        let Some(zones) = app.injection_zones(CONTENT_MANAGER) else {
            log::debug!(target: "dz.plugin", "no content manager, nothing to install");
            return BootstrapOutcome::NoContentManager;
        };
        let name = injector_name();
        if zones
            .injected_components(EDIT_VIEW, INJECTION_ZONE)
            .iter()
            .any(|existing| *existing == name)
        {
            return BootstrapOutcome::AlreadyInstalled;
        }
        zones.inject_component(
            EDIT_VIEW,
            INJECTION_ZONE,
            InjectedComponent {
                name,
                config: self.config.clone(),
            },
        );
        log::debug!(target: "dz.plugin", "installed into {EDIT_VIEW}/{INJECTION_ZONE}");
        BootstrapOutcome::Installed
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new(InjectorConfig::default())
    }
}
