//! Placeholder substitution for embedded infrastructure templates.
//!
//! Templates use `{{ name }}` placeholders so they never clash with the
//! `${...}` interpolation of the infrastructure language itself.

use std::collections::BTreeMap;

use crate::error::{NopeusError, NopeusResult};

/// Substitute every `{{ name }}` in `content`
///
/// # Errors
///
/// Returns `NopeusError::Template` if a placeholder is unclosed, has an
/// invalid name, or names a variable that was not provided.
pub fn render_placeholders(
    template: &str,
    content: &str,
    vars: &BTreeMap<&str, String>,
) -> NopeusResult<String> {
    let fail = |message: String| NopeusError::Template {
        template: template.to_string(),
        message,
    };

    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| fail("unclosed placeholder".to_string()))?;
        let name = after[..end].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(fail(format!("invalid placeholder name '{name}'")));
        }
        let value = vars
            .get(name)
            .ok_or_else(|| fail(format!("unknown placeholder '{name}'")))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<&'static str, String> {
        let mut vars = BTreeMap::new();
        vars.insert("environment", "prod".to_string());
        vars.insert("name", "shop".to_string());
        vars
    }

    #[test]
    fn substitutes_known_placeholders() {
        let out = render_placeholders("main.tf", "cluster = \"{{ name }}-{{environment}}\"", &vars())
            .unwrap();
        assert_eq!(out, "cluster = \"shop-prod\"");
    }

    #[test]
    fn leaves_terraform_interpolation_alone() {
        let out = render_placeholders("main.tf", "region = ${var.region}", &vars()).unwrap();
        assert_eq!(out, "region = ${var.region}");
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = render_placeholders("main.tf", "{{ region }}", &vars()).unwrap_err();
        assert!(err.to_string().contains("unknown placeholder 'region'"));
    }

    #[test]
    fn unclosed_placeholder_is_an_error() {
        assert!(render_placeholders("main.tf", "name = {{ name", &vars()).is_err());
    }

    #[test]
    fn invalid_name_is_an_error() {
        assert!(render_placeholders("main.tf", "{{ a-b }}", &vars()).is_err());
    }
}
