use crate::plan::DEFAULT_MAX_PLAN_QUANTITY;
use crate::store::LicenseStore;
use std::sync::Arc;

/// Tunables for [`LicenseService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseConfig {
    /// Ignore device binding when activating.
    pub multi_device: bool,
    /// Largest accepted plan quantity.
    pub max_plan_quantity: u32,
    /// Code generation attempts before giving up on collisions.
    pub max_code_attempts: u32,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            multi_device: false,
            max_plan_quantity: DEFAULT_MAX_PLAN_QUANTITY,
            max_code_attempts: 5,
        }
    }
}

/// License lifecycle operations over a shared store.
///
/// Cheap to share behind an `Arc`; all mutable state lives in the store.
pub struct LicenseService {
    pub(crate) store: Arc<dyn LicenseStore>,
    pub(crate) config: LicenseConfig,
}

impl LicenseService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LicenseStore>, config: LicenseConfig) -> Self {
        Self { store, config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &LicenseConfig {
        &self.config
    }
}
