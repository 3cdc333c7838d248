//! Liftoff command - deploy every environment in the config

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use nopeus::config::{load_with_warnings, ConfigWarning};
use nopeus::domain::ports::DeployEventSink;
use nopeus::infrastructure::kubeconfig::kubeconfig_path;
use nopeus::infrastructure::{
    ConsoleEventSink, HelmCli, HttpRemoteCache, JsonEventSink, JsonStateRepository,
    KubectlCli, LocalFs, RemoteSession, TerraformCli, VendorConnector,
};
use nopeus::{DeployOptions, DeployResult, DeployUseCase};

/// Flags accepted by `nopeus liftoff`
#[derive(Debug, Clone, Default)]
pub struct LiftoffArgs {
    pub dry_run: bool,
    pub token: Option<String>,
    pub environments: Vec<String>,
    pub image_version: Option<String>,
}

pub fn cmd_liftoff(config_path: &Path, args: LiftoffArgs, json: bool, verbose: u8) -> Result<()> {
    match run(config_path, args, json, verbose) {
        Ok(result) => {
            debug!(
                environments = result.environments.len(),
                applied = result.applied_count(),
                "liftoff finished"
            );
            Ok(())
        }
        Err(err) => {
            if json {
                let _ = write_event(
                    &mut io::stdout().lock(),
                    &serde_json::json!({
                        "event": "error",
                        "command": "liftoff",
                        "message": format!("{err:#}"),
                    }),
                );
            }
            Err(err)
        }
    }
}

fn run(config_path: &Path, args: LiftoffArgs, json: bool, verbose: u8) -> Result<DeployResult> {
    let (mut config, warnings) = load_with_warnings(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    report_warnings(&warnings, json);
    config.validate()?;

    if let Some(token) = args.token.filter(|t| !t.is_empty()) {
        config.runtime.cloud_token = Some(token);
    }

    let kubeconfig = kubeconfig_path();
    debug!(kubeconfig = ?kubeconfig, "resolved kubeconfig");

    let mut use_case = DeployUseCase::new(
        TerraformCli::new(&config.runtime.terraform_path),
        HelmCli::new(&config.runtime.helm_path, kubeconfig.clone()),
        JsonStateRepository::new(),
        Box::new(KubectlCli::new(&config.runtime.kubectl_path, kubeconfig.clone())),
        Box::new(VendorConnector::new(&config.runtime.kubectl_path, kubeconfig)),
        Box::new(LocalFs::new()),
    );

    if let Some(token) = config.runtime.token() {
        let session = RemoteSession::authenticate(&config.runtime.cloud_url, token)
            .context("remote cache authentication failed")?;
        info!(url = session.base_url(), "remote cache enabled");
        use_case = use_case.with_remote(Box::new(HttpRemoteCache::new(session)));
    }

    let mut options = DeployOptions::new()
        .with_dry_run(args.dry_run)
        .with_environments(args.environments);
    if let Some(version) = args.image_version {
        options = options.with_image_version(version);
    }

    let sink: Arc<dyn DeployEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout(verbose > 0))
    };

    Ok(use_case.execute_with_events(&config, &options, sink)?)
}

fn report_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            let _ = write_event(
                &mut io::stderr().lock(),
                &serde_json::json!({
                    "event": "warning",
                    "command": "liftoff",
                    "key": warning.key,
                    "file": warning.file.display().to_string(),
                    "line": warning.line,
                    "suggestion": warning.suggestion,
                }),
            );
            continue;
        }

        let location = match warning.line {
            Some(line) => format!("{}:{}", warning.file.display(), line),
            None => warning.file.display().to_string(),
        };
        match &warning.suggestion {
            Some(suggestion) => eprintln!(
                "warning: unknown key '{}' in {} (did you mean '{}'?)",
                warning.key, location, suggestion
            ),
            None => eprintln!("warning: unknown key '{}' in {}", warning.key, location),
        }
    }
}

/// Write a single NDJSON event (one JSON object per line).
fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_event_emits_one_line() {
        let mut out = Vec::new();
        write_event(&mut out, &serde_json::json!({"event": "error", "message": "boom"})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["event"], "error");
    }

    #[test]
    fn missing_config_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nopeus.yaml");
        let err = run(&path, LiftoffArgs::default(), false, 0).unwrap_err();
        assert!(format!("{err:#}").contains("nopeus.yaml"));
    }

    #[test]
    fn invalid_config_fails_before_touching_tools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nopeus.yaml");
        std::fs::write(&path, "name: shop\nservices:\n  api:\n    image: shop/api\n").unwrap();

        let err = run(&path, LiftoffArgs::default(), false, 0).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("vendor"), "unexpected error: {message}");
        assert!(!dir.path().join(".nopeus").exists());
    }
}
