//! Ordered unit list for one environment.

use std::collections::BTreeMap;

use crate::domain::entities::{DeployableUnit, CHECKSUM_RELEASE};
use crate::error::{NopeusError, NopeusResult};

/// Deployable units in apply order, unique by name
///
/// Every insertion records where the unit came from so a collision can name
/// both parties. The checksum record's name is reserved up front.
#[derive(Debug, Clone)]
pub struct UnitList {
    units: Vec<DeployableUnit>,
    origins: BTreeMap<String, String>,
}

impl UnitList {
    pub fn new() -> Self {
        let mut origins = BTreeMap::new();
        origins.insert(CHECKSUM_RELEASE.to_string(), "the checksum record".to_string());
        Self {
            units: Vec::new(),
            origins,
        }
    }

    /// Append a unit; the first unit to claim a name keeps it.
    pub fn push(&mut self, unit: DeployableUnit, origin: impl Into<String>) -> NopeusResult<()> {
        let origin = origin.into();
        if let Some(first) = self.origins.get(unit.name()) {
            return Err(NopeusError::DuplicateUnit {
                name: unit.name().to_string(),
                first: first.clone(),
                second: origin,
            });
        }
        self.origins.insert(unit.name().to_string(), origin);
        self.units.push(unit);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.iter().any(|u| u.name() == name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeployableUnit> {
        self.units.iter()
    }

    pub fn into_vec(self) -> Vec<DeployableUnit> {
        self.units
    }
}

impl Default for UnitList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{UnitKind, ValuesPayload};

    fn unit(name: &str) -> DeployableUnit {
        DeployableUnit::new(
            UnitKind::Default,
            name,
            "salfatigroup/default-microservice",
            "nopeus-app",
            ValuesPayload::named(name),
        )
    }

    #[test]
    fn keeps_insertion_order() {
        let mut list = UnitList::new();
        list.push(unit("b"), "service 'b'").unwrap();
        list.push(unit("a"), "service 'a'").unwrap();
        let names: Vec<_> = list.iter().map(|u| u.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn rejects_second_unit_with_same_name() {
        let mut list = UnitList::new();
        list.push(unit("api"), "service 'api'").unwrap();
        let err = list.push(unit("api"), "plugin 'prometheus'").unwrap_err();
        match err {
            NopeusError::DuplicateUnit { name, first, second } => {
                assert_eq!(name, "api");
                assert_eq!(first, "service 'api'");
                assert_eq!(second, "plugin 'prometheus'");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn checksum_name_is_reserved() {
        let mut list = UnitList::new();
        assert!(list.push(unit("checksum"), "service 'checksum'").is_err());
        assert!(list.is_empty());
    }
}
