//! TLS certificates through cert-manager

use tracing::{debug, info};

use super::{HookContext, Plugin};
use crate::config::NopeusConfig;
use crate::domain::entities::{DeployableUnit, UnitKind, UnitList, ValuesPayload};
use crate::domain::ports::{ApplySpec, WorkloadManager, DRY_RUN_CONTEXT};
use crate::error::NopeusResult;

const REPOSITORY: (&str, &str) = ("jetstack", "https://charts.jetstack.io");
const RELEASE: &str = "cert-manager";
const UPSTREAM_CHART: &str = "jetstack/cert-manager";
const ISSUER_UNIT: &str = "cert-manager-nopeus";
const ISSUER_CHART: &str = "salfatigroup/cert-manager";
const ACME_EMAIL: &str = "certificates@salfati.group";

/// Installs cert-manager once per cluster and contributes the issuer unit
#[derive(Debug, Clone, Copy, Default)]
pub struct CertManagerPlugin;

impl CertManagerPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for CertManagerPlugin {
    fn name(&self) -> &str {
        "nopeus-cert-manager"
    }

    fn on_init(&self, _config: &NopeusConfig, workloads: &dyn WorkloadManager) -> NopeusResult<()> {
        workloads.add_repository(REPOSITORY.0, REPOSITORY.1)
    }

    fn before_generate(&self, ctx: &HookContext<'_>, units: &mut UnitList) -> NopeusResult<()> {
        let values = ValuesPayload::named("cert-manager")
            .with_custom("email", ACME_EMAIL)
            .with_custom("staging", ctx.environment.contains("staging"));
        let unit = DeployableUnit::new(
            UnitKind::Default,
            ISSUER_UNIT,
            ISSUER_CHART,
            &ctx.config.runtime.default_namespace,
            values,
        )
        .with_values_template("cert-manager.values.yaml");
        units.push(unit, HookContext::origin(self))
    }

    fn before_deploy(&self, ctx: &HookContext<'_>, workloads: &dyn WorkloadManager) -> NopeusResult<()> {
        let context = ctx.kube_context.unwrap_or(DRY_RUN_CONTEXT);
        if !ctx.dry_run && workloads.release_exists(context, RELEASE, RELEASE)? {
            debug!("cert-manager already installed");
            return Ok(());
        }

        info!(environment = ctx.environment, "installing cert-manager");
        let spec = ApplySpec::new(RELEASE, UPSTREAM_CHART, RELEASE)
            .with_set_value("installCRDs", "true")
            .with_dry_run(ctx.dry_run);
        workloads.install_or_upgrade(context, &spec)
    }
}
