//! Tests for the config module

use super::*;
use crate::error::NopeusError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLE: &str = r#"
version: "1"
name: shop
vendor: aws
hosts:
  - shop.example.com
environments:
  staging:
    env_file: .env.staging
  prod: {}
services:
  api:
    image: ghcr.io/acme/api
    version: "1.4.0"
    environment:
      PORT: 8080
      DEBUG: false
      API_KEY: ${API_KEY}
    health_url: /healthz
    replicas: 2
    ingress:
      host: api.shop.example.com
      paths:
        - path: /v1
          strip: true
  web:
    image: ghcr.io/acme/web
    extend:
      resources:
        limits:
          cpu: 500m
storage:
  database:
    - name: orders
      type: postgres
      version: "15"
"#;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("nopeus.yaml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_full_config() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(config.app.name, "shop");
    assert_eq!(config.app.hosts, vec!["shop.example.com"]);
    assert_eq!(
        config.app.environments["staging"].env_file.as_deref(),
        Some(Path::new(".env.staging"))
    );
    assert!(config.app.environments["prod"].env_file.is_none());

    let api = &config.app.services["api"];
    assert_eq!(api.environment["PORT"], "8080");
    assert_eq!(api.environment["DEBUG"], "false");
    assert_eq!(api.environment["API_KEY"], "${API_KEY}");
    assert_eq!(api.replicas, 2);
    let ingress = api.ingress.as_ref().unwrap();
    assert!(ingress.paths[0].strip);

    let web = &config.app.services["web"];
    assert_eq!(web.version, "latest");
    assert_eq!(web.replicas, 1);
    assert_eq!(web.extend["resources"]["limits"]["cpu"], "500m");

    let storage = config.app.storage.as_ref().unwrap();
    assert_eq!(storage.database[0].kind, "postgres");
    assert!(config.validate().is_ok());
}

#[test]
fn test_runtime_paths_follow_config_location() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);
    let config = load(&path).unwrap();

    assert_eq!(config.runtime.root_dir, dir.path().join(".nopeus"));
    assert_eq!(
        config.runtime.state_path("prod"),
        dir.path().join(".nopeus/state/prod.nopeus.state")
    );
    let vendor = config.cloud_vendor().unwrap();
    assert_eq!(
        config.runtime.workspace(&vendor, "prod").root(),
        dir.path().join(".nopeus/session/aws/prod")
    );
}

#[test]
fn test_unknown_keys_become_warnings() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "vendor: aws\nservices:\n  api:\n    image: x\n    replica: 3\nenvironments:\n  dev: {}\n",
    );

    let (_, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "services.api.replica");
    assert_eq!(warnings[0].line, Some(5));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("replicas"));
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "services: [unclosed");
    assert!(matches!(
        load(&path),
        Err(NopeusError::InvalidConfig { .. })
    ));
}

#[test]
fn test_validation_failures() {
    let runtime = RuntimeConfig::for_config_path("nopeus.yaml");
    let parse = |yaml: &str| {
        let app: AppConfig = serde_yaml_ng::from_str(yaml).unwrap();
        NopeusConfig::new(runtime.clone(), app)
    };

    assert!(matches!(
        parse("services:\n  a:\n    image: x\nenvironments:\n  dev: {}\n").validate(),
        Err(NopeusError::MissingCloudVendor)
    ));
    assert!(matches!(
        parse("vendor: aws\nenvironments:\n  dev: {}\n").validate(),
        Err(NopeusError::MissingServices)
    ));
    assert!(matches!(
        parse("vendor: aws\nservices:\n  a:\n    image: x\n").validate(),
        Err(NopeusError::NoEnvironments)
    ));
    assert!(matches!(
        parse(
            "vendor: aws\nservices:\n  a:\n    image: x\nenvironments:\n  dev: {}\nstorage:\n  database:\n    - name: x\n      type: oracle\n"
        )
        .validate(),
        Err(NopeusError::UnsupportedDatabase { .. })
    ));
}

#[test]
fn test_database_images() {
    assert_eq!(database_image("postgres"), Some("postgres"));
    assert_eq!(database_image("MongoDB"), Some("mongo"));
    assert_eq!(database_image("oracle"), None);
}

#[test]
fn test_stack_name_falls_back_to_directory() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("billing");
    fs::create_dir_all(&project).unwrap();
    let path = write_config(&project, "vendor: aws\n");
    let config = load(&path).unwrap();
    assert_eq!(config.stack_name(), "billing");
}

#[test]
fn test_env_override_terraform_path() {
    let runtime = RuntimeConfig::for_config_path("nopeus.yaml");
    let config = NopeusConfig::new(runtime, AppConfig::default());

    std::env::set_var("NOPEUS_TERRAFORM_PATH", "/opt/bin/terraform");
    let config = with_env_overrides(config);
    std::env::remove_var("NOPEUS_TERRAFORM_PATH");

    assert_eq!(
        config.runtime.terraform_path,
        std::path::PathBuf::from("/opt/bin/terraform")
    );
}

#[test]
fn test_runtime_defaults() {
    let runtime = RuntimeConfig::for_config_path("nopeus.yaml");
    assert_eq!(runtime.root_dir, std::path::PathBuf::from("./.nopeus"));
    assert_eq!(runtime.cloud_url, DEFAULT_CLOUD_URL);
    assert!(runtime.token().is_none());
    let names: Vec<_> = runtime
        .chart_repositories
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["salfatigroup", "kong", "bitnami"]);
}

#[test]
fn test_declaration_order_is_preserved() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
vendor: aws
environments:
  staging: {}
  prod: {}
  dev: {}
services:
  web:
    image: acme/web
  api:
    image: acme/api
"#,
    );

    let config = load(&path).unwrap();

    let environments: Vec<&str> = config.app.environments.keys().map(String::as_str).collect();
    assert_eq!(environments, ["staging", "prod", "dev"]);
    let services: Vec<&str> = config.app.services.keys().map(String::as_str).collect();
    assert_eq!(services, ["web", "api"]);
}
