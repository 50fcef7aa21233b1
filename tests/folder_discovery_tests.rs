#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::temp_files::{create_route_folder, write_file};
use oasforge::spec::{RouteModule, SecurityConfig, SecurityEntry};
use oasforge::{FileDiscovery, RouteDescriptor, RouteDiscovery, Spec, SpecInfo};
use serde_json::json;
use std::path::Path;

const USERS_YAML: &str = r#"
routes:
  - method: GET
    url: /users/:id
    schema:
      params:
        type: object
        properties:
          id: { type: string }
        required: [id]
      response:
        "200": { ref: models/user }
    config:
      description: Fetch a user
      security: apiKey
      models:
        user:
          type: object
          properties:
            name: { type: string }
      securitySchemes:
        bearer: { type: http, scheme: bearer, bearerFormat: JWT }
  - method: DELETE
    url: /users/:id
    config:
      hide: true
"#;

const HEALTH_JSON: &str = r#"{
  "route": { "method": "GET", "url": "/health", "config": { "description": "Liveness check" } }
}"#;

const NOT_A_ROUTE: &str = r#"{ "name": "fixtures", "version": 1 }"#;

fn quiet_spec() -> Spec {
    Spec::new(SpecInfo {
        skip_default_errors: true,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_add_folder_discovers_routes() {
    common::tracing_util::init();

    let dir = create_route_folder(&[
        ("users.yaml", USERS_YAML),
        ("nested/health.json", HEALTH_JSON),
        ("package.json", NOT_A_ROUTE),
        ("README.md", "# not scanned"),
    ]);

    let mut spec = quiet_spec();
    assert_eq!(spec.add_folder(dir.path()).unwrap(), 3);

    let mut paths: Vec<&str> = spec.paths().keys().map(String::as_str).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["/health", "/users/{id}"]);
    assert_eq!(spec.paths()["/users/{id}"].len(), 1);

    let doc = spec.to_json().unwrap();
    assert_eq!(
        doc["components"]["schemas"]["models.user"],
        json!({ "type": "object", "properties": { "name": { "type": "string" } } })
    );
    assert_eq!(
        doc["components"]["securitySchemes"]["bearer"],
        json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" })
    );
    assert_eq!(
        doc["paths"]["/users/{id}"]["get"]["security"],
        json!([{ "apiKey": [] }, { "bearer": [] }])
    );
    assert_eq!(doc["paths"]["/health"]["get"]["summary"], json!("Liveness check"));
}

#[test]
fn test_folder_from_constructor() {
    let dir = create_route_folder(&[("health.json", HEALTH_JSON)]);

    let spec = Spec::new(SpecInfo {
        folder: Some(dir.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();

    assert!(spec.paths().contains_key("/health"));
}

#[test]
fn test_discovery_order_follows_file_names() {
    let dir = create_route_folder(&[
        ("b.json", r#"{ "route": { "method": "GET", "url": "/b" } }"#),
        ("a.yml", "route: { method: GET, url: /a }\n"),
        ("c/z.yaml", "route: { method: GET, url: /c }\n"),
    ]);

    let modules = FileDiscovery.discover(dir.path()).unwrap();
    let names: Vec<String> = modules
        .iter()
        .map(|m| m.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.yml", "b.json", "z.yaml"]);

    let mut spec = quiet_spec();
    spec.add_folder(dir.path()).unwrap();
    let paths: Vec<&str> = spec.paths().keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/a", "/b", "/c"]);
}

#[test]
fn test_scheme_backfill_creates_security_list() {
    let dir = create_route_folder(&[(
        "admin.yaml",
        r#"
route:
  method: POST
  url: /admin/reindex
  config:
    securitySchemes:
      adminKey: { type: apiKey, name: X-Admin-Key, in: header }
"#,
    )]);

    let mut spec = quiet_spec();
    spec.add_folder(dir.path()).unwrap();

    let operation = &spec.paths()["/admin/reindex"]["post"];
    assert_eq!(
        serde_json::to_value(&operation.security).unwrap(),
        json!([{ "adminKey": [] }])
    );
}

#[test]
fn test_invalid_route_file_is_an_error() {
    let dir = create_route_folder(&[("broken.json", r#"{ "route": { "method": "GET", "#)]);

    let mut spec = quiet_spec();
    let err = spec.add_folder(dir.path()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_missing_folder_is_an_error() {
    let mut spec = quiet_spec();
    assert!(spec.add_folder("/definitely/not/a/route/folder").is_err());
    assert!(spec.paths().is_empty());
}

struct StaticDiscovery(Vec<RouteModule>);

impl RouteDiscovery for StaticDiscovery {
    fn discover(&self, _folder: &Path) -> anyhow::Result<Vec<RouteModule>> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_custom_discovery() {
    let discovery = StaticDiscovery(vec![RouteModule {
        route: Some(RouteDescriptor::new("patch", "/settings")),
        ..Default::default()
    }]);

    let mut spec = quiet_spec();
    assert_eq!(spec.add_discovered("unused", &discovery).unwrap(), 1);
    assert!(spec.paths()["/settings"].contains_key("patch"));
}

#[test]
fn test_spec_info_load_resolves_folder() {
    let dir = create_route_folder(&[("routes/health.json", HEALTH_JSON)]);
    write_file(
        dir.path(),
        "openapi.yaml",
        r#"
title: Health API
version: 0.1.0
license: BSD-3-Clause
servers:
  - url: https://health.example.com
tags:
  - name: ops
securitySchemes:
  bearer: { type: http, scheme: bearer }
folder: routes
"#,
    );

    let info = SpecInfo::load(dir.path().join("openapi.yaml")).unwrap();
    assert_eq!(info.folder.as_deref(), Some(dir.path().join("routes").as_path()));

    let spec = Spec::new(info).unwrap();
    let doc = spec.to_json().unwrap();
    assert_eq!(doc["info"]["title"], json!("Health API"));
    assert_eq!(doc["info"]["license"]["name"], json!("BSD-3-CLAUSE"));
    assert_eq!(doc["tags"], json!([{ "name": "ops" }]));
    assert!(doc["paths"]["/health"]["get"].is_object());
}

#[test]
fn test_spec_info_load_json() {
    let dir = create_route_folder(&[(
        "info.json",
        r#"{ "title": "Json API", "authorName": "Ops", "skipDefaultErrors": true }"#,
    )]);

    let info = SpecInfo::load(dir.path().join("info.json")).unwrap();
    assert_eq!(info.author_name.as_deref(), Some("Ops"));
    assert!(info.skip_default_errors);
    assert!(info.folder.is_none());

    assert!(SpecInfo::load(dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_single_security_becomes_list() {
    let mut security = SecurityConfig::from("apiKey");
    security.push_name("bearer");
    assert_eq!(
        security.entries(),
        vec![
            &SecurityEntry::Name("apiKey".to_string()),
            &SecurityEntry::Name("bearer".to_string())
        ]
    );
}
