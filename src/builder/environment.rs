//! Per-stage environment composition.

use crate::core::{Environment, PlatformEnvironment};

/// Builds the full environment handed to each subprocess.
///
/// Layers, lowest first: the ambient process environment, the platform base
/// environment, then the stage's own overrides. Later layers win on key
/// collision and no layer removes a key. A fresh mapping is produced per
/// stage; the orchestrator's own environment is never modified.
#[derive(Debug, Clone)]
pub struct EnvironmentComposer {
    inherited: Environment,
}

impl EnvironmentComposer {
    /// Compose over explicit ambient and base layers.
    pub fn new(ambient: &Environment, base: &Environment) -> Self {
        EnvironmentComposer {
            inherited: ambient.layered(base),
        }
    }

    /// Compose over a snapshot of this process's environment.
    pub fn for_host(platform: &PlatformEnvironment) -> Self {
        Self::new(&Environment::ambient(), &platform.base_env())
    }

    /// The mapping for a stage with the given overrides.
    pub fn compose(&self, overrides: &Environment) -> Environment {
        self.inherited.layered(overrides)
    }
}
