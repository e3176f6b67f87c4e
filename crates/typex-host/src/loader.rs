//! Package loading - resolve `(package path, name)` to a declaration.
//!
//! The engine never reads packages from disk; it asks a [`Loader`]. The
//! [`MemoryLoader`] registry is what tests and embedders populate directly.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use tracing::debug;
use typex_types::Error;

use crate::statics::{universe_error, NamedDecl};

/// Produces packages by import path.
pub trait Loader: Send + Sync {
    fn load(&self, path: &str) -> Result<Arc<Package>>;
}

/// A package: local names mapped to declarations.
#[derive(Debug)]
pub struct Package {
    path: String,
    decls: RwLock<HashMap<String, Arc<NamedDecl>>>,
}

impl Package {
    pub fn new(path: impl Into<String>) -> Arc<Self> {
        Arc::new(Package {
            path: path.into(),
            decls: RwLock::new(HashMap::new()),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declare a type in this package. The body is defined on the returned
    /// declaration.
    pub fn declare(&self, name: &str, type_params: Vec<String>) -> typex_types::Result<Arc<NamedDecl>> {
        let mut decls = self.decls.write();
        if decls.contains_key(name) {
            return Err(Error::Redefined(format!("{}.{}", self.path, name)));
        }
        let decl = NamedDecl::new(self.path.clone(), name, type_params);
        decls.insert(name.to_string(), decl.clone());
        Ok(decl)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<NamedDecl>> {
        self.decls.read().get(name).cloned()
    }

    /// Declared names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.decls.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// In-memory package registry.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    packages: RwLock<HashMap<String, Arc<Package>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the package at `path`.
    pub fn package(&self, path: &str) -> Arc<Package> {
        if let Some(pkg) = self.packages.read().get(path) {
            return pkg.clone();
        }
        self.packages
            .write()
            .entry(path.to_string())
            .or_insert_with(|| Package::new(path))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.packages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.read().is_empty()
    }
}

impl Loader for MemoryLoader {
    fn load(&self, path: &str) -> Result<Arc<Package>> {
        self.packages
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("package {:?} is not loaded", path))
    }
}

/// Resolve a declaration, failing loudly.
///
/// The predeclared `error` (empty path) resolves without consulting the
/// loader.
pub fn lookup_named(loader: &dyn Loader, path: &str, name: &str) -> typex_types::Result<Arc<NamedDecl>> {
    if path.is_empty() && name == "error" {
        return Ok(universe_error());
    }
    let pkg = loader.load(path).map_err(|e| {
        debug!(path, name, error = %e, "package load failed");
        Error::lookup(path, name, format!("{:#}", e))
    })?;
    pkg.lookup(name)
        .ok_or_else(|| Error::lookup(path, name, "no such type in package"))
}
