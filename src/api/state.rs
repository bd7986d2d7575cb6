//! Console configuration and the shared handler state.

use crate::idp::{EnrichFailurePolicy, ProviderClient, RoleSyncStrategy};

pub const DEFAULT_ENRICH_CONCURRENCY: usize = 8;

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    cookie_secure: bool,
    enrich_concurrency: usize,
    enrich_failure_policy: EnrichFailurePolicy,
    role_sync: RoleSyncStrategy,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cookie_secure: false,
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            enrich_failure_policy: EnrichFailurePolicy::default(),
            role_sync: RoleSyncStrategy::default(),
        }
    }

    /// Mark session cookies `Secure`; enable when served over HTTPS.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_enrich_concurrency(mut self, concurrency: usize) -> Self {
        self.enrich_concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_enrich_failure_policy(mut self, policy: EnrichFailurePolicy) -> Self {
        self.enrich_failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_role_sync(mut self, strategy: RoleSyncStrategy) -> Self {
        self.role_sync = strategy;
        self
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn enrich_concurrency(&self) -> usize {
        self.enrich_concurrency
    }

    #[must_use]
    pub fn enrich_failure_policy(&self) -> EnrichFailurePolicy {
        self.enrich_failure_policy
    }

    #[must_use]
    pub fn role_sync(&self) -> RoleSyncStrategy {
        self.role_sync
    }
}

/// Everything a handler needs, shared behind an `Arc` extension.
#[derive(Debug)]
pub struct ConsoleState {
    provider: ProviderClient,
    config: ConsoleConfig,
}

impl ConsoleState {
    #[must_use]
    pub fn new(provider: ProviderClient, config: ConsoleConfig) -> Self {
        Self { provider, config }
    }

    #[must_use]
    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConsoleConfig::new();
        assert!(!config.cookie_secure());
        assert_eq!(config.enrich_concurrency(), DEFAULT_ENRICH_CONCURRENCY);
        assert_eq!(config.enrich_failure_policy(), EnrichFailurePolicy::Degrade);
        assert_eq!(config.role_sync(), RoleSyncStrategy::Replace);
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let config = ConsoleConfig::new().with_enrich_concurrency(0);
        assert_eq!(config.enrich_concurrency(), 1);
    }
}
