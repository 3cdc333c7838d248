//! Infrastructure tool port - declarative provisioning (terraform)

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::entities::OutputValue;
use crate::error::NopeusResult;

/// Declarative infrastructure tool operating on a working directory
pub trait InfrastructureTool {
    /// Prepare the working directory (providers, modules, backend)
    fn init(&self, work_dir: &Path) -> NopeusResult<()>;

    /// Compute a plan; `true` if it contains changes
    fn plan(&self, work_dir: &Path) -> NopeusResult<bool>;

    fn apply(&self, work_dir: &Path) -> NopeusResult<()>;

    fn output(&self, work_dir: &Path) -> NopeusResult<BTreeMap<String, OutputValue>>;
}
