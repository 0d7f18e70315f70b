//! Arbitration between this system and cooperating drop-management systems.
//!
//! Other systems may take over aircraft and drops (custom drop sizes,
//! precision drops). When they do, they own the announcements and we stay
//! quiet. Every question here fails open: a missing or failing provider
//! counts as "not managing" and "not active".

use super::error::ProviderError;
use super::model::{CalledDrop, EntityId};

/// Capability exposed by a cooperating drop-management system.
pub trait ManagedDropProvider {
    fn name(&self) -> &str;

    /// Whether the provider currently manages this aircraft or drop.
    fn is_managed(&self, entity: EntityId) -> Result<bool, ProviderError>;

    /// Whether the provider is globally active.
    fn is_active(&self) -> Result<bool, ProviderError>;
}

/// Stand-in for a provider that is not installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProvider;

impl ManagedDropProvider for NoProvider {
    fn name(&self) -> &str {
        "none"
    }

    fn is_managed(&self, _entity: EntityId) -> Result<bool, ProviderError> {
        Ok(false)
    }

    fn is_active(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }
}

#[derive(Default)]
pub struct OwnershipArbiter {
    providers: Vec<Box<dyn ManagedDropProvider>>,
}

impl OwnershipArbiter {
    pub fn new(providers: Vec<Box<dyn ManagedDropProvider>>) -> Self {
        Self { providers }
    }

    pub fn with_provider(mut self, provider: Box<dyn ManagedDropProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// True if any provider manages this entity. Stops at the first yes.
    pub fn is_externally_managed(&self, entity: EntityId) -> bool {
        self.providers
            .iter()
            .any(|p| answer(p.as_ref(), "is_managed", p.is_managed(entity)))
    }

    /// True if any provider reports being active. Stops at the first yes.
    pub fn is_external_system_active(&self) -> bool {
        self.providers
            .iter()
            .any(|p| answer(p.as_ref(), "is_active", p.is_active()))
    }

    /// Whether a landed alert belongs to an external system and should be
    /// hidden. `called` is the call entry for the drop, if it was called.
    pub fn should_hide_landed_alert(
        &self,
        called: Option<&CalledDrop>,
        hide_called: bool,
        hide_random: bool,
    ) -> bool {
        let player_called = called.is_some();
        let policy_hides = (player_called && hide_called) || (!player_called && hide_random);
        policy_hides && self.is_external_system_active()
    }
}

fn answer(
    provider: &dyn ManagedDropProvider,
    query: &str,
    result: Result<bool, ProviderError>,
) -> bool {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::debug!("{} {} failed, assuming false: {}", provider.name(), query, e);
            false
        }
    }
}
