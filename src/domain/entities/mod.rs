//! Domain Entities

mod environment;
mod snapshot;
mod unit;
mod unit_list;

pub use environment::{EnvVars, Environment, OutputValue, ENVIRONMENT_OUTPUT};
pub use snapshot::DeploymentSnapshot;
pub use unit::{
    Aggregate, ApplyOutcome, ChecksumMap, DeployableUnit, UnitKind, ValuesPayload,
    CHECKSUM_NAMESPACE, CHECKSUM_RELEASE,
};
pub use unit_list::UnitList;
