//! Deploy Use Case
//!
//! Runs the per-environment pipeline, one environment after another:
//!
//! ```text
//! LOAD_ENV_FILE -> GENERATE -> FETCH_REMOTE_CACHE -> UNFOLD_STATE
//!   -> PROVISION_INFRA -> CONNECT_CLUSTER -> LOAD_CHECKSUMS
//!   -> REGISTRY_SECRET -> APPLY_UNITS -> PERSIST_STATE -> PUSH_REMOTE_CACHE
//! ```
//!
//! Any failure stops the run. Environments that already finished stay
//! deployed with their state persisted; nothing is rolled back or retried.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::plugins::{HookContext, PluginPipeline};
use crate::application::state_cache::{create_snapshot, unfold};
use crate::config::{load_env_file, NopeusConfig};
use crate::domain::entities::{
    ApplyOutcome, DeployableUnit, DeploymentSnapshot, EnvVars, Environment, CHECKSUM_NAMESPACE,
    CHECKSUM_RELEASE, ENVIRONMENT_OUTPUT,
};
use crate::domain::ports::{
    ClusterApi, ClusterConnector, DeployEvent, DeployEventSink, DeployPhase, FileSystem,
    InfrastructureTool, NoopEventSink, RemoteCache, StateRepository, WorkloadManager,
    DRY_RUN_CONTEXT,
};
use crate::domain::services::{checksum_map_from_values, should_skip, SkipReason};
use crate::domain::value_objects::{CloudVendor, RegistryCredentials};
use crate::error::{NopeusError, NopeusResult};

use super::generate::Generation;
use super::options::DeployOptions;
use super::result::{DeployResult, EnvironmentReport};

/// Deploy use case - orchestrates the deployment flow
///
/// This use case is parameterized by its dependencies (ports),
/// allowing for easy testing and different implementations.
pub struct DeployUseCase<IT, WM, SR>
where
    IT: InfrastructureTool,
    WM: WorkloadManager,
    SR: StateRepository,
{
    infra: IT,
    workloads: WM,
    state_repo: SR,
    cluster: Box<dyn ClusterApi>,
    connector: Box<dyn ClusterConnector>,
    file_system: Box<dyn FileSystem>,
    remote: Option<Box<dyn RemoteCache>>,
    plugins: PluginPipeline,
}

/// Per-environment view shared by the pipeline steps
struct Run<'a> {
    config: &'a NopeusConfig,
    vendor: &'a CloudVendor,
    options: &'a DeployOptions,
    sink: &'a dyn DeployEventSink,
}

impl Run<'_> {
    fn phase(&self, environment: &str, phase: DeployPhase) {
        debug!(environment, phase = %phase, "phase started");
        if self.sink.wants_detailed_events() {
            self.sink.on_event(DeployEvent::PhaseStarted {
                environment: environment.to_string(),
                phase,
            });
        }
    }

    fn emit(&self, event: DeployEvent) {
        self.sink.on_event(event);
    }
}

impl<IT, WM, SR> DeployUseCase<IT, WM, SR>
where
    IT: InfrastructureTool,
    WM: WorkloadManager,
    SR: StateRepository,
{
    pub fn new(
        infra: IT,
        workloads: WM,
        state_repo: SR,
        cluster: Box<dyn ClusterApi>,
        connector: Box<dyn ClusterConnector>,
        file_system: Box<dyn FileSystem>,
    ) -> Self {
        Self {
            infra,
            workloads,
            state_repo,
            cluster,
            connector,
            file_system,
            remote: None,
            plugins: PluginPipeline::builtin(),
        }
    }

    /// Share snapshots through an authenticated remote cache
    pub fn with_remote(mut self, remote: Box<dyn RemoteCache>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Replace the plugin pipeline
    pub fn with_plugins(mut self, plugins: PluginPipeline) -> Self {
        self.plugins = plugins;
        self
    }

    /// Execute the deploy use case
    pub fn execute(
        &self,
        config: &NopeusConfig,
        options: &DeployOptions,
    ) -> NopeusResult<DeployResult> {
        self.execute_with_events(config, options, Arc::new(NoopEventSink))
    }

    /// Execute the deploy use case with event reporting
    pub fn execute_with_events(
        &self,
        config: &NopeusConfig,
        options: &DeployOptions,
        event_sink: Arc<dyn DeployEventSink>,
    ) -> NopeusResult<DeployResult> {
        config.validate()?;
        let vendor = config.cloud_vendor()?;
        let environments = select_environments(config, options)?;

        let run = Run {
            config,
            vendor: &vendor,
            options,
            sink: event_sink.as_ref(),
        };
        run.emit(DeployEvent::Started {
            config: config.runtime.config_path.clone(),
            environments: environments.clone(),
            dry_run: options.dry_run,
        });

        for repository in &config.runtime.chart_repositories {
            self.workloads
                .add_repository(&repository.name, &repository.url)?;
        }
        self.plugins.on_init(config, &self.workloads)?;

        let mut result = DeployResult::new();
        result.dry_run = options.dry_run;
        for name in &environments {
            let report = self.deploy_environment(&run, name)?;
            result.environments.push(report);
        }

        self.plugins.on_finish(config)?;

        info!(
            environments = result.environments.len(),
            applied = result.applied_count(),
            skipped = result.skipped_count(),
            "deploy finished"
        );
        run.emit(DeployEvent::Completed {
            environments: result.environments.len(),
            applied: result.applied_count(),
            skipped: result.skipped_count(),
        });
        Ok(result)
    }

    fn deploy_environment(&self, run: &Run<'_>, name: &str) -> NopeusResult<EnvironmentReport> {
        let config = run.config;
        let dry_run = run.options.dry_run;
        let workspace = config.runtime.workspace(run.vendor, name);
        let state_path = config.runtime.state_path(name);
        let cache_key = DeploymentSnapshot::cache_key(&config.stack_name(), name);
        let mut report = EnvironmentReport::new(name);

        info!(environment = name, "deploying environment");
        run.emit(DeployEvent::EnvironmentStarted {
            environment: name.to_string(),
        });

        run.phase(name, DeployPhase::LoadEnvFile);
        let env_file = config
            .app
            .environments
            .get(name)
            .and_then(|e| e.env_file.as_ref())
            .map(|path| config.runtime.config_dir().join(path));
        let mut environment = Environment::new(name, env_file);
        if let Some(path) = environment.env_file() {
            let entries = load_env_file(self.file_system.as_ref(), path)?;
            environment.set_vars(EnvVars::new(entries));
        }

        run.phase(name, DeployPhase::Generate);
        let hook = HookContext::new(config, name, dry_run);
        let units = Generation {
            fs: self.file_system.as_ref(),
            plugins: &self.plugins,
            config,
            vendor: run.vendor,
            vars: environment.vars(),
            workspace: &workspace,
            hook,
            image_version: run.options.image_version.as_deref(),
        }
        .run()?;
        self.plugins.after_generate(&hook, &units)?;

        run.phase(name, DeployPhase::FetchRemoteCache);
        if let Some(remote) = &self.remote {
            remote.lock(&cache_key)?;
            let pulled = remote.pull(&cache_key)?;
            run.emit(DeployEvent::RemoteCachePulled {
                environment: name.to_string(),
                found: pulled.is_some(),
            });
            if let Some(snapshot) = pulled {
                self.state_repo.persist(&snapshot, &state_path)?;
            }
        }

        run.phase(name, DeployPhase::UnfoldState);
        if let Some(snapshot) = self.state_repo.restore(&state_path)? {
            unfold(self.file_system.as_ref(), &snapshot, &workspace)?;
        }

        run.phase(name, DeployPhase::ProvisionInfra);
        let infra_dir = workspace.infra_dir();
        self.infra.init(&infra_dir)?;
        let has_changes = self.infra.plan(&infra_dir)?;
        report.infrastructure_changed = has_changes;
        run.emit(DeployEvent::InfrastructurePlanned {
            environment: name.to_string(),
            has_changes,
        });
        if has_changes && !dry_run {
            info!(environment = name, "applying infrastructure changes");
            self.infra.apply(&infra_dir)?;
        }
        environment.set_outputs(self.infra.output(&infra_dir)?);
        if !dry_run {
            environment.output_string(ENVIRONMENT_OUTPUT)?;
        }

        run.phase(name, DeployPhase::ConnectCluster);
        let context = if dry_run {
            DRY_RUN_CONTEXT.to_string()
        } else {
            self.connector.connect(config, &environment)?
        };
        environment.set_kube_context(&context);

        run.phase(name, DeployPhase::LoadChecksums);
        if !dry_run {
            let recorded = self
                .workloads
                .release_values(&context, CHECKSUM_RELEASE, CHECKSUM_NAMESPACE)?
                .map(|values| checksum_map_from_values(&values))
                .unwrap_or_default();
            debug!(environment = name, entries = recorded.len(), "loaded checksum record");
            environment.set_checksums(recorded);
        }

        run.phase(name, DeployPhase::RegistrySecret);
        if !dry_run {
            let namespace = &config.runtime.default_namespace;
            self.cluster.ensure_namespace(&context, namespace)?;
            match RegistryCredentials::from_lookup(|key| environment.vars().get(key)) {
                Some(credentials) => {
                    let created =
                        self.cluster
                            .ensure_registry_secret(&context, namespace, &credentials)?;
                    debug!(environment = name, created, "registry secret ensured");
                }
                None => debug!(environment = name, "no registry credentials, skipping secret"),
            }
        }

        let hook = hook.with_kube_context(&context);
        self.plugins.before_deploy(&hook, &self.workloads)?;

        run.phase(name, DeployPhase::ApplyUnits);
        for unit in &units {
            match self.apply_unit(unit, &environment)? {
                None => {
                    report.applied.push(unit.name().to_string());
                    run.emit(DeployEvent::UnitApplied {
                        environment: name.to_string(),
                        unit: unit.name().to_string(),
                    });
                }
                Some(reason) => {
                    report
                        .skipped
                        .push((unit.name().to_string(), reason.as_str().to_string()));
                    run.emit(DeployEvent::UnitSkipped {
                        environment: name.to_string(),
                        unit: unit.name().to_string(),
                        reason: reason.as_str().to_string(),
                    });
                }
            }
        }

        self.plugins.after_deploy(&hook)?;

        run.phase(name, DeployPhase::PersistState);
        let snapshot = create_snapshot(
            self.file_system.as_ref(),
            config,
            run.vendor,
            name,
            &workspace,
        )?;
        self.state_repo.persist(&snapshot, &state_path)?;
        report.state_path = state_path.clone();
        run.emit(DeployEvent::StatePersisted {
            environment: name.to_string(),
            path: state_path,
        });

        run.phase(name, DeployPhase::PushRemoteCache);
        if let Some(remote) = &self.remote {
            if !dry_run {
                remote.push(&snapshot)?;
                report.remote_pushed = true;
                run.emit(DeployEvent::RemoteCachePushed {
                    environment: name.to_string(),
                });
            }
            remote.unlock(&cache_key)?;
        }

        run.emit(DeployEvent::EnvironmentCompleted {
            environment: name.to_string(),
            applied: report.applied.len(),
            skipped: report.skipped.len(),
        });
        Ok(report)
    }

    /// Apply one unit unless the checksum gate lets it be skipped
    fn apply_unit(
        &self,
        unit: &DeployableUnit,
        environment: &Environment,
    ) -> NopeusResult<Option<SkipReason>> {
        if should_skip(unit, environment.checksums())? {
            debug!(unit = unit.name(), "unchanged since last run");
            return Ok(Some(SkipReason::Unchanged));
        }
        let context = environment.kube_context().unwrap_or(DRY_RUN_CONTEXT);
        match unit.apply(&self.workloads, context)? {
            ApplyOutcome::Applied => {
                info!(unit = unit.name(), kind = unit.kind().label(), "applied unit");
                Ok(None)
            }
            ApplyOutcome::AlreadyPresent => Ok(Some(SkipReason::AlreadyPresent)),
        }
    }
}

/// Environments to deploy, in configuration order
fn select_environments(
    config: &NopeusConfig,
    options: &DeployOptions,
) -> NopeusResult<Vec<String>> {
    if let Some(unknown) = options
        .environments
        .iter()
        .find(|name| !config.app.environments.contains_key(*name))
    {
        return Err(NopeusError::UnknownEnvironment {
            name: unknown.clone(),
        });
    }
    Ok(config
        .app
        .environments
        .keys()
        .filter(|name| options.includes(name))
        .cloned()
        .collect())
}
