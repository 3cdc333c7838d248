//! Reusable `nopeus.yaml` fixtures.

/// Env files referenced by `SHOP_CONFIG`
pub const SHOP_ENV_FILES: [(&str, &str); 2] = [
    ("staging.env", "DATABASE_URL=postgres://orders.staging:5432/orders\n"),
    ("prod.env", "DATABASE_URL=postgres://orders.prod:5432/orders\n"),
];

/// Two services, one with ingress, a database and two environments
pub const SHOP_CONFIG: &str = r#"version: "1"
name: shop
vendor: aws
hosts:
  - shop.example.com
environments:
  staging:
    env_file: staging.env
  prod:
    env_file: prod.env
services:
  api:
    image: acme/api
    version: 1.0.0
    environment:
      PORT: 8080
      DATABASE_URL: ${DATABASE_URL}
    ingress:
      host: api.shop.example.com
      paths:
        - path: /
  web:
    image: acme/web
    version: 2.1.0
storage:
  database:
    - name: orders
      type: postgres
      version: "15"
"#;

/// Valid YAML that cannot be deployed: no vendor
pub const NO_VENDOR_CONFIG: &str = r#"name: shop
environments:
  prod: {}
services:
  api:
    image: acme/api
"#;
