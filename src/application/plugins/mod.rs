//! Plugin hook pipeline
//!
//! Plugins contribute units or side effects at fixed points of a run:
//!
//! ```text
//! on_init -> per environment { before_generate -> after_generate
//!            -> before_deploy -> after_deploy } -> on_finish
//! ```
//!
//! Every hook runs for all plugins, in registration order, before the run
//! moves on. The first hook error aborts the run. The checksum record is not
//! a plugin: the orchestrator appends it after every contribution is in.

mod cert_manager;
mod prometheus;

pub use cert_manager::CertManagerPlugin;
pub use prometheus::PrometheusPlugin;

use tracing::debug;

use crate::config::NopeusConfig;
use crate::domain::entities::{DeployableUnit, UnitList};
use crate::domain::ports::WorkloadManager;
use crate::error::NopeusResult;

/// What a hook may look at while one environment is processed
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub config: &'a NopeusConfig,
    pub environment: &'a str,
    pub dry_run: bool,
    /// Set once the cluster is connected
    pub kube_context: Option<&'a str>,
}

impl<'a> HookContext<'a> {
    pub fn new(config: &'a NopeusConfig, environment: &'a str, dry_run: bool) -> Self {
        Self {
            config,
            environment,
            dry_run,
            kube_context: None,
        }
    }

    pub fn with_kube_context(mut self, context: &'a str) -> Self {
        self.kube_context = Some(context);
        self
    }

    /// Origin label used when a plugin's unit collides with another
    pub fn origin(plugin: &dyn Plugin) -> String {
        format!("plugin '{}'", plugin.name())
    }
}

/// Extension invoked at fixed points of a deploy run
///
/// All hooks default to doing nothing.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn on_init(&self, _config: &NopeusConfig, _workloads: &dyn WorkloadManager) -> NopeusResult<()> {
        Ok(())
    }

    /// Add units to the environment's list
    fn before_generate(&self, _ctx: &HookContext<'_>, _units: &mut UnitList) -> NopeusResult<()> {
        Ok(())
    }

    /// Inspect the final unit list, checksum record included
    fn after_generate(&self, _ctx: &HookContext<'_>, _units: &[DeployableUnit]) -> NopeusResult<()> {
        Ok(())
    }

    fn before_deploy(
        &self,
        _ctx: &HookContext<'_>,
        _workloads: &dyn WorkloadManager,
    ) -> NopeusResult<()> {
        Ok(())
    }

    fn after_deploy(&self, _ctx: &HookContext<'_>) -> NopeusResult<()> {
        Ok(())
    }

    fn on_finish(&self, _config: &NopeusConfig) -> NopeusResult<()> {
        Ok(())
    }
}

/// Plugins in registration order
#[derive(Default)]
pub struct PluginPipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plugins every run gets
    pub fn builtin() -> Self {
        Self::new()
            .with(CertManagerPlugin::new())
            .with(PrometheusPlugin::new())
    }

    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.register(Box::new(plugin));
        self
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        debug!(plugin = plugin.name(), "registering plugin");
        self.plugins.push(plugin);
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn on_init(&self, config: &NopeusConfig, workloads: &dyn WorkloadManager) -> NopeusResult<()> {
        self.plugins
            .iter()
            .try_for_each(|p| p.on_init(config, workloads))
    }

    pub fn before_generate(&self, ctx: &HookContext<'_>, units: &mut UnitList) -> NopeusResult<()> {
        self.plugins
            .iter()
            .try_for_each(|p| p.before_generate(ctx, units))
    }

    pub fn after_generate(&self, ctx: &HookContext<'_>, units: &[DeployableUnit]) -> NopeusResult<()> {
        self.plugins
            .iter()
            .try_for_each(|p| p.after_generate(ctx, units))
    }

    pub fn before_deploy(
        &self,
        ctx: &HookContext<'_>,
        workloads: &dyn WorkloadManager,
    ) -> NopeusResult<()> {
        self.plugins
            .iter()
            .try_for_each(|p| p.before_deploy(ctx, workloads))
    }

    pub fn after_deploy(&self, ctx: &HookContext<'_>) -> NopeusResult<()> {
        self.plugins.iter().try_for_each(|p| p.after_deploy(ctx))
    }

    pub fn on_finish(&self, config: &NopeusConfig) -> NopeusResult<()> {
        self.plugins.iter().try_for_each(|p| p.on_finish(config))
    }
}

impl std::fmt::Debug for PluginPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every hook call as `<plugin>:<hook>[:<env>]`
    pub struct TracePlugin {
        pub name: String,
        pub trace: Arc<Mutex<Vec<String>>>,
        pub fail_on: Option<&'static str>,
    }

    impl TracePlugin {
        pub fn new(name: &str, trace: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name: name.to_string(),
                trace,
                fail_on: None,
            }
        }

        pub fn failing_on(mut self, hook: &'static str) -> Self {
            self.fail_on = Some(hook);
            self
        }

        fn record(&self, hook: &'static str, env: Option<&str>) -> NopeusResult<()> {
            let entry = match env {
                Some(env) => format!("{}:{hook}:{env}", self.name),
                None => format!("{}:{hook}", self.name),
            };
            self.trace.lock().unwrap().push(entry);
            if self.fail_on == Some(hook) {
                return Err(crate::error::NopeusError::InvalidConfig {
                    file: std::path::PathBuf::from(&self.name),
                    message: format!("{hook} failed"),
                });
            }
            Ok(())
        }
    }

    impl Plugin for TracePlugin {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_init(&self, _: &NopeusConfig, _: &dyn WorkloadManager) -> NopeusResult<()> {
            self.record("init", None)
        }

        fn before_generate(&self, ctx: &HookContext<'_>, _: &mut UnitList) -> NopeusResult<()> {
            self.record("before_generate", Some(ctx.environment))
        }

        fn after_generate(&self, ctx: &HookContext<'_>, _: &[DeployableUnit]) -> NopeusResult<()> {
            self.record("after_generate", Some(ctx.environment))
        }

        fn before_deploy(&self, ctx: &HookContext<'_>, _: &dyn WorkloadManager) -> NopeusResult<()> {
            self.record("before_deploy", Some(ctx.environment))
        }

        fn after_deploy(&self, ctx: &HookContext<'_>) -> NopeusResult<()> {
            self.record("after_deploy", Some(ctx.environment))
        }

        fn on_finish(&self, _: &NopeusConfig) -> NopeusResult<()> {
            self.record("finish", None)
        }
    }
}
