//! Cluster metrics through kube-prometheus-stack

use super::{HookContext, Plugin};
use crate::config::NopeusConfig;
use crate::domain::entities::{DeployableUnit, UnitKind, UnitList, ValuesPayload, CHECKSUM_NAMESPACE};
use crate::domain::ports::WorkloadManager;
use crate::error::NopeusResult;

const REPOSITORY: (&str, &str) = (
    "prometheus-community",
    "https://prometheus-community.github.io/helm-charts",
);

#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusPlugin;

impl PrometheusPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for PrometheusPlugin {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn on_init(&self, _config: &NopeusConfig, workloads: &dyn WorkloadManager) -> NopeusResult<()> {
        workloads.add_repository(REPOSITORY.0, REPOSITORY.1)
    }

    fn before_generate(&self, _ctx: &HookContext<'_>, units: &mut UnitList) -> NopeusResult<()> {
        let unit = DeployableUnit::new(
            UnitKind::Default,
            "prometheus",
            "prometheus-community/kube-prometheus-stack",
            CHECKSUM_NAMESPACE,
            ValuesPayload::named("prometheus"),
        );
        units.push(unit, HookContext::origin(self))
    }
}
