//! Route discovery and metadata loading.
//!
//! Route files are JSON or YAML documents whose top-level object carries a
//! `route` (one descriptor) or `routes` (a list). Anything else found in the
//! folder is ignored.
//!
//! ```yaml
//! routes:
//!   - method: GET
//!     url: /users/:id
//!     config:
//!       description: Fetch a user
//!       security: bearer
//!       securitySchemes:
//!         bearer: { type: http, scheme: bearer, bearerFormat: JWT }
//! ```

use super::types::{RouteDescriptor, SecurityConfig, SpecInfo};
use super::Spec;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const ROUTE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Anything that can hand route descriptors to a [`Spec`].
pub trait RouteProvider {
    fn routes(&self) -> Vec<RouteDescriptor>;
}

impl RouteProvider for RouteDescriptor {
    fn routes(&self) -> Vec<RouteDescriptor> {
        vec![self.clone()]
    }
}

impl RouteProvider for Vec<RouteDescriptor> {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.clone()
    }
}

/// One discovered unit exporting `route` or `routes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteModule {
    /// File the module was read from
    #[serde(skip)]
    pub source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteDescriptor>>,
}

impl RouteProvider for RouteModule {
    /// `routes` wins over `route` when both are present.
    fn routes(&self) -> Vec<RouteDescriptor> {
        match (&self.routes, &self.route) {
            (Some(routes), _) => routes.clone(),
            (None, Some(route)) => vec![route.clone()],
            (None, None) => Vec::new(),
        }
    }
}

/// Strategy for finding route modules under a folder.
pub trait RouteDiscovery {
    fn discover(&self, folder: &Path) -> anyhow::Result<Vec<RouteModule>>;
}

/// Recursive scan of `*.json`, `*.yaml` and `*.yml` files, in file name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDiscovery;

impl FileDiscovery {
    /// Read one file; `None` when it parses but exports no routes.
    fn read_module(path: &Path) -> anyhow::Result<Option<RouteModule>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route file {}", path.display()))?;
        let value: Value = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse YAML route file {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse JSON route file {}", path.display()))?
        };

        let exports_routes = value
            .as_object()
            .is_some_and(|obj| obj.contains_key("route") || obj.contains_key("routes"));
        if !exports_routes {
            debug!(file = %path.display(), "no route exported, skipping");
            return Ok(None);
        }

        let mut module: RouteModule = serde_json::from_value(value)
            .with_context(|| format!("invalid route descriptor in {}", path.display()))?;
        module.source = path.to_path_buf();
        Ok(Some(module))
    }
}

impl RouteDiscovery for FileDiscovery {
    fn discover(&self, folder: &Path) -> anyhow::Result<Vec<RouteModule>> {
        if !folder.is_dir() {
            anyhow::bail!("route folder {} is not a directory", folder.display());
        }

        let mut modules = Vec::new();
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to walk {}", folder.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_route_extension(path) {
                continue;
            }

            if let Some(module) = Self::read_module(path)? {
                modules.push(module);
            }
        }

        Ok(modules)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn is_yaml(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("yaml") | Some("yml"))
}

fn has_route_extension(path: &Path) -> bool {
    extension(path).is_some_and(|e| ROUTE_EXTENSIONS.contains(&e.as_str()))
}

impl SpecInfo {
    /// Load metadata from a YAML (`.yaml`/`.yml`) or JSON file.
    ///
    /// A relative `folder` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<SpecInfo> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read spec info {}", path.display()))?;

        let mut info: SpecInfo = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse YAML spec info {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse JSON spec info {}", path.display()))?
        };

        if let (Some(folder), Some(base)) = (info.folder.as_mut(), path.parent()) {
            if folder.is_relative() {
                *folder = base.join(&*folder);
            }
        }

        Ok(info)
    }
}

impl Spec {
    /// Scan `folder` for route files and add every route found.
    ///
    /// Returns the number of routes ingested (hidden ones included).
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be walked or a route file cannot be
    /// read or parsed. Routes from files read before the failure are kept.
    pub fn add_folder(&mut self, folder: impl AsRef<Path>) -> anyhow::Result<usize> {
        self.add_discovered(folder, &FileDiscovery)
    }

    /// Like [`add_folder`](Spec::add_folder) with a custom discovery strategy.
    pub fn add_discovered(
        &mut self,
        folder: impl AsRef<Path>,
        discovery: &dyn RouteDiscovery,
    ) -> anyhow::Result<usize> {
        let folder = folder.as_ref();
        let modules = discovery.discover(folder)?;

        let mut count = 0;
        for module in &modules {
            count += self.add_provider(module);
        }

        info!(
            folder = %folder.display(),
            modules = modules.len(),
            routes = count,
            "loaded route folder"
        );
        Ok(count)
    }

    /// Ingest the routes of one provider.
    ///
    /// Models and security schemes attached to a route's config are
    /// registered first, and the names of the attached schemes are appended
    /// to that route's own `security` list. Returns the number of routes
    /// handed over.
    pub fn add_provider(&mut self, provider: &dyn RouteProvider) -> usize {
        let routes = provider.routes();
        let count = routes.len();

        for mut route in routes {
            if let Some(config) = route.config.as_mut() {
                if let Some(models) = config.models.clone() {
                    self.add_models(models);
                }

                if let Some(schemes) = config.security_schemes.clone() {
                    let security = config
                        .security
                        .get_or_insert_with(|| SecurityConfig::Many(Vec::new()));
                    for name in schemes.keys() {
                        security.push_name(name.clone());
                    }
                    self.add_security_schemes(schemes);
                }
            }

            self.add_route(route);
        }

        count
    }
}
