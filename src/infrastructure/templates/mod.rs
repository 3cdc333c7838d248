//! Embedded infrastructure templates
//!
//! Each vendor ships a fixed set of terraform files compiled into the binary.
//! Rendering substitutes `{{ environment }}`, `{{ name }}` and `{{ vendor }}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::ports::FileSystem;
use crate::domain::services::render_placeholders;
use crate::domain::value_objects::CloudVendor;
use crate::error::NopeusResult;

/// Embedded template: file name and contents
pub type Template = (&'static str, &'static str);

const AWS_TEMPLATES: &[Template] = &[
    ("main.tf", include_str!("aws/main.tf")),
    ("outputs.tf", include_str!("aws/outputs.tf")),
    ("variables.tf", include_str!("aws/variables.tf")),
];

/// Templates shipped for `vendor`; empty for vendors without support
pub fn templates_for(vendor: &CloudVendor) -> &'static [Template] {
    match vendor {
        CloudVendor::Aws => AWS_TEMPLATES,
        CloudVendor::Other(_) => &[],
    }
}

/// Placeholder values for one environment
pub fn template_vars(
    stack: &str,
    environment: &str,
    vendor: &CloudVendor,
) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();
    vars.insert("environment", environment.to_string());
    vars.insert("name", stack.to_string());
    vars.insert("vendor", vendor.to_string());
    vars
}

/// Render the vendor's templates into `dir`, returning the written paths
pub fn render_infrastructure(
    fs: &dyn FileSystem,
    vendor: &CloudVendor,
    vars: &BTreeMap<&'static str, String>,
    dir: &Path,
) -> NopeusResult<Vec<PathBuf>> {
    let templates = templates_for(vendor);
    if templates.is_empty() {
        warn!(vendor = %vendor, "no infrastructure templates for vendor");
    }

    fs.create_dir_all(dir)?;
    let mut written = Vec::with_capacity(templates.len());
    for (name, content) in templates {
        let rendered = render_placeholders(name, content, vars)?;
        let path = dir.join(name);
        fs.write(&path, &rendered)?;
        debug!(path = %path.display(), "rendered infrastructure file");
        written.push(path);
    }
    Ok(written)
}
