//! Generation phase
//!
//! Two independent tasks run side by side: rendering the infrastructure
//! files and assembling the unit list with its values files. They write to
//! disjoint subtrees of the workspace and share nothing mutable; the phase
//! waits for both and reports the first failure.

use std::collections::BTreeMap;
use std::thread;

use serde_json::json;
use tracing::{debug, warn};

use crate::application::plugins::{HookContext, PluginPipeline};
use crate::config::{database_image, DatabaseConfig, NopeusConfig, ServiceConfig};
use crate::domain::entities::{
    Aggregate, DeployableUnit, EnvVars, UnitKind, UnitList, ValuesPayload, CHECKSUM_NAMESPACE,
    CHECKSUM_RELEASE,
};
use crate::domain::ports::FileSystem;
use crate::domain::services::build_checksum_map;
use crate::domain::value_objects::{CloudVendor, Workspace, REGISTRY_SECRET_NAME};
use crate::error::{NopeusError, NopeusResult};
use crate::infrastructure::templates::{render_infrastructure, template_vars};

pub const SERVICE_CHART: &str = "salfatigroup/default-microservice";
pub const STORAGE_CHART: &str = "salfatigroup/database";
pub const INGRESS_CHART: &str = "salfatigroup/ingress";
pub const CHECKSUM_CHART: &str = "salfatigroup/checksum";
pub const INGRESS_UNIT: &str = "nopeus-ingress";

const DEFAULT_ROUTE_PORT: u16 = 80;

/// Everything the generation phase reads
pub struct Generation<'a> {
    pub fs: &'a dyn FileSystem,
    pub plugins: &'a PluginPipeline,
    pub config: &'a NopeusConfig,
    pub vendor: &'a CloudVendor,
    pub vars: &'a EnvVars,
    pub workspace: &'a Workspace,
    pub hook: HookContext<'a>,
    pub image_version: Option<&'a str>,
}

impl Generation<'_> {
    /// Run both generation tasks and return the final unit list
    pub fn run(&self) -> NopeusResult<Vec<DeployableUnit>> {
        thread::scope(|scope| {
            let infra = scope.spawn(|| self.render_infrastructure());
            let units = scope.spawn(|| self.render_units());

            let infra = infra.join().map_err(|_| NopeusError::GenerationPanicked {
                task: "infrastructure",
            });
            let units = units
                .join()
                .map_err(|_| NopeusError::GenerationPanicked { task: "units" });

            infra??;
            units?
        })
    }

    fn render_infrastructure(&self) -> NopeusResult<()> {
        let vars = template_vars(
            &self.config.stack_name(),
            self.hook.environment,
            self.vendor,
        );
        render_infrastructure(self.fs, self.vendor, &vars, &self.workspace.infra_dir())?;
        Ok(())
    }

    fn render_units(&self) -> NopeusResult<Vec<DeployableUnit>> {
        let units = self.assemble()?;
        self.fs.create_dir_all(&self.workspace.values_dir())?;
        for unit in &units {
            self.fs.write(unit.values_path(), &unit.render_values()?)?;
        }
        debug!(
            environment = self.hook.environment,
            count = units.len(),
            "rendered values files"
        );
        Ok(units)
    }

    /// Storage, services, ingress, plugin contributions, then the checksum record
    pub fn assemble(&self) -> NopeusResult<Vec<DeployableUnit>> {
        let config = self.config;
        let mut list = UnitList::new();

        if let Some(storage) = &config.app.storage {
            for db in &storage.database {
                list.push(storage_unit(config, db)?, format!("storage '{}'", db.name))?;
            }
        }

        for (name, service) in &config.app.services {
            let unit = service_unit(config, name, service, self.vars, self.image_version)?;
            list.push(unit, format!("service '{name}'"))?;
        }

        if let Some(ingress) = ingress_unit(config, self.vars) {
            list.push(ingress, "the ingress aggregate")?;
        }

        self.plugins.before_generate(&self.hook, &mut list)?;

        let mut units: Vec<DeployableUnit> = list
            .into_vec()
            .into_iter()
            .map(|unit| self.place(unit))
            .collect();
        let record = checksum_record(&units)?;
        units.push(self.place(record));
        Ok(units)
    }

    fn place(&self, unit: DeployableUnit) -> DeployableUnit {
        let path = self.workspace.values_file(unit.name());
        unit.with_values_path(path).with_dry_run(self.hook.dry_run)
    }
}

/// Install-once database release
pub fn storage_unit(config: &NopeusConfig, db: &DatabaseConfig) -> NopeusResult<DeployableUnit> {
    let image = database_image(&db.kind).ok_or_else(|| NopeusError::UnsupportedDatabase {
        name: db.name.clone(),
        kind: db.kind.clone(),
    })?;
    let values = ValuesPayload::named(&db.name).with_image(image, &db.version);
    Ok(DeployableUnit::new(
        UnitKind::Storage,
        &db.name,
        STORAGE_CHART,
        &config.runtime.default_namespace,
        values,
    )
    .with_values_template("storage.values.yaml"))
}

/// Microservice release with its resolved environment
pub fn service_unit(
    config: &NopeusConfig,
    name: &str,
    service: &ServiceConfig,
    vars: &EnvVars,
    image_version: Option<&str>,
) -> NopeusResult<DeployableUnit> {
    let environment = service
        .environment
        .iter()
        .map(|(key, value)| {
            vars.resolve(value)
                .map(|resolved| (key.clone(), resolved))
                .map_err(|variable| NopeusError::UnsetVariable {
                    service: name.to_string(),
                    variable,
                })
        })
        .collect::<NopeusResult<BTreeMap<_, _>>>()?;

    let version = image_version.unwrap_or(&service.version);
    let mut values = ValuesPayload::named(name)
        .with_image(&service.image, version)
        .with_environment(environment)
        .with_custom("imagePullSecret", REGISTRY_SECRET_NAME)
        .with_custom("replicas", service.replicas);
    if let Some(url) = &service.health_url {
        values = values.with_custom("healthCheckUrl", url.as_str());
    }
    for (key, value) in &service.extend {
        if ValuesPayload::RESERVED_KEYS.contains(&key.as_str()) {
            warn!(service = name, key = %key, "ignoring reserved key in extend");
            continue;
        }
        values = values.with_custom(key, value.clone());
    }

    Ok(DeployableUnit::new(
        UnitKind::Default,
        name,
        SERVICE_CHART,
        &config.runtime.default_namespace,
        values,
    )
    .with_values_template("service.values.yaml"))
}

/// One proxy routing to every service that declares ingress
pub fn ingress_unit(config: &NopeusConfig, vars: &EnvVars) -> Option<DeployableUnit> {
    let namespace = &config.runtime.default_namespace;
    let routes: Vec<serde_json::Value> = config
        .app
        .services
        .iter()
        .filter_map(|(name, service)| {
            let ingress = service.ingress.as_ref()?;
            let paths: Vec<serde_json::Value> = ingress
                .paths
                .iter()
                .map(|p| json!({ "path": p.path, "strip": p.strip }))
                .collect();
            Some(json!({
                "service": name,
                "namespace": namespace,
                "port": route_port(service, vars),
                "host": ingress.host,
                "paths": paths,
            }))
        })
        .collect();

    if routes.is_empty() {
        return None;
    }

    let values = ValuesPayload::named(INGRESS_UNIT)
        .with_custom("hosts", config.app.hosts.clone())
        .with_custom("routes", routes);
    Some(
        DeployableUnit::new(
            UnitKind::Aggregate(Aggregate::Ingress),
            INGRESS_UNIT,
            INGRESS_CHART,
            namespace,
            values,
        )
        .with_values_template("ingress.values.yaml"),
    )
}

/// `PORT` from the service environment when it is a number
fn route_port(service: &ServiceConfig, vars: &EnvVars) -> u16 {
    service
        .environment
        .get("PORT")
        .and_then(|raw| vars.resolve(raw).ok())
        .and_then(|port| port.trim().parse().ok())
        .unwrap_or(DEFAULT_ROUTE_PORT)
}

/// The name -> checksum record of every unit that precedes it
pub fn checksum_record(units: &[DeployableUnit]) -> NopeusResult<DeployableUnit> {
    let map = build_checksum_map(units)?;
    let values =
        ValuesPayload::named(CHECKSUM_RELEASE).with_custom("checksum", serde_json::to_value(&map)?);
    Ok(DeployableUnit::new(
        UnitKind::Aggregate(Aggregate::ChecksumRecord(map)),
        CHECKSUM_RELEASE,
        CHECKSUM_CHART,
        CHECKSUM_NAMESPACE,
        values,
    )
    .with_values_template("checksum.values.yaml"))
}
