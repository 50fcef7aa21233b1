#![allow(dead_code)]

pub mod temp_files {
    use std::path::Path;
    use tempfile::TempDir;

    /// Creates a temporary folder holding the given `(relative path, content)` files.
    pub fn create_route_folder(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            write_file(dir.path(), name, content);
        }
        dir
    }

    /// Writes `content` to `base/name`, creating parent folders as needed.
    pub fn write_file(base: &Path, name: &str, content: &str) {
        let path = base.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}

pub mod fixtures {
    use oasforge::{RouteDescriptor, Spec, SpecInfo};
    use serde_json::json;

    pub fn info() -> SpecInfo {
        SpecInfo {
            title: Some("Users API".to_string()),
            description: Some("Manages users".to_string()),
            author_name: Some("API Team".to_string()),
            author_url: Some("https://example.com".to_string()),
            author_email: Some("api@example.com".to_string()),
            version: Some("1.2.3".to_string()),
            ..Default::default()
        }
    }

    pub fn spec() -> Spec {
        Spec::new(info()).unwrap()
    }

    /// A small user resource: fetch, update and search.
    pub fn user_routes() -> Vec<RouteDescriptor> {
        serde_json::from_value(json!([
            {
                "method": "PUT",
                "url": "/users/:id",
                "schema": {
                    "params": {
                        "type": "object",
                        "properties": { "id": { "type": "string", "description": "The user id" } },
                        "required": ["id"]
                    },
                    "body": { "ref": "models/user", "description": "The new user" },
                    "response": {
                        "200": { "ref": "models/user", "description": "The updated user" },
                        "404": { "ref": "errors/404", "description": "Not found" }
                    }
                },
                "config": { "description": "Update a user", "tags": ["users"], "security": "bearer" }
            },
            {
                "method": "GET",
                "url": "/users/:id",
                "schema": {
                    "params": {
                        "type": "object",
                        "properties": { "id": { "type": "string" } },
                        "required": ["id"]
                    },
                    "body": { "type": "object" },
                    "response": { "200": { "ref": "models/user" } }
                },
                "config": { "description": "Fetch a user", "tags": ["users"] }
            },
            {
                "method": "GET",
                "url": "/users",
                "schema": {
                    "headers": {
                        "type": "object",
                        "properties": { "x-tenant": { "type": "string" } }
                    },
                    "querystring": {
                        "type": "object",
                        "properties": {
                            "limit": { "type": "integer", "minimum": 1, "description": "Page size" },
                            "owner": { "$ref": "#/components/schemas/models.user" }
                        },
                        "required": ["limit"]
                    }
                }
            }
        ]))
        .unwrap()
    }
}

pub mod tracing_util {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Installs a fmt subscriber writing through the test harness.
    pub fn init() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
                )
                .with_test_writer()
                .try_init();
        });
    }
}
