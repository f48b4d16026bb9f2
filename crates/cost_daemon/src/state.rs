use cost_core::PricingConstants;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Fixed for the lifetime of the process.
    pub constants: Arc<PricingConstants>,
    pub requests_served: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(constants: PricingConstants) -> Self {
        Self {
            constants: Arc::new(constants),
            requests_served: Arc::new(AtomicU64::new(0)),
        }
    }
}
