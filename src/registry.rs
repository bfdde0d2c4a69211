//! Static registry of upstream sub-graph services.
//!
//! The list is built once at startup and shared immutably. Order is kept as
//! declared since composition order can matter to the gateway.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An upstream GraphQL service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ServiceDescriptor {
    /// Unique identifier of the service.
    pub name: String,
    /// GraphQL endpoint URL.
    pub url: String,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("service list is empty")]
    Empty,
    #[error("duplicate service name '{0}'")]
    DuplicateName(String),
}

/// Ordered, immutable list of services.
///
/// Clones share the same allocation; there is no way to mutate the entries
/// once the list exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceList {
    services: Arc<[ServiceDescriptor]>,
}

impl ServiceList {
    pub fn new(services: Vec<ServiceDescriptor>) -> Result<Self, RegistryError> {
        if services.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(services.len());
        for service in &services {
            if !seen.insert(service.name.as_str()) {
                return Err(RegistryError::DuplicateName(service.name.clone()));
            }
        }

        Ok(Self {
            services: services.into(),
        })
    }

    /// The first declared service. Operations are routed here.
    pub fn primary(&self) -> &ServiceDescriptor {
        // Non-empty by construction.
        &self.services[0]
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.services.iter()
    }

    pub fn as_slice(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl<'a> IntoIterator for &'a ServiceList {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
