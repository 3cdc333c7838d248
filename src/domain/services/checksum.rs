//! Checksum gate
//!
//! Decides per unit whether the apply step can be skipped because the cluster
//! already runs exactly this content. The recorded map is only read here; it
//! is rewritten by applying the checksum record unit at the end of a run.

use crate::domain::entities::{Aggregate, ChecksumMap, DeployableUnit, UnitKind};
use crate::domain::value_objects::ContentHash;
use crate::error::NopeusResult;

/// Why a unit was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unchanged,
    /// Install-once unit already on the cluster
    AlreadyPresent,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::AlreadyPresent => "already present",
        }
    }
}

/// Whether `unit` matches what was recorded by the previous run
///
/// An absent entry never matches, so everything is applied on a first run
/// or when the record could not be found. The checksum record itself is
/// skipped only when the whole recorded map equals the new one.
pub fn should_skip(unit: &DeployableUnit, recorded: &ChecksumMap) -> NopeusResult<bool> {
    if let UnitKind::Aggregate(Aggregate::ChecksumRecord(map)) = unit.kind() {
        return Ok(!recorded.is_empty() && map == recorded);
    }
    let Some(previous) = recorded.get(unit.name()) else {
        return Ok(false);
    };
    Ok(unit.checksum()? == *previous)
}

/// Name -> checksum for every unit in the list
pub fn build_checksum_map(units: &[DeployableUnit]) -> NopeusResult<ChecksumMap> {
    units
        .iter()
        .map(|unit| Ok((unit.name().to_string(), unit.checksum()?)))
        .collect()
}

/// Extract the checksum map from the values of an installed checksum record
///
/// Entries that are not strings are ignored; they cannot have been written
/// by this tool.
pub fn checksum_map_from_values(values: &serde_json::Value) -> ChecksumMap {
    values
        .get("checksum")
        .and_then(|c| c.as_object())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(name, hash)| {
                    hash.as_str()
                        .map(|h| (name.clone(), ContentHash::new(h)))
                })
                .collect()
        })
        .unwrap_or_default()
}
