use std::time::Duration;

/// Default time allowed for each dependency call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings the order placement pipeline needs from its environment.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Deadline applied to every awaited dependency call.
    pub timeout: Duration,
    /// Payment authorisation endpoint.
    pub payment_uri: String,
    /// Shipment creation endpoint.
    pub shipping_uri: String,
}

impl OrchestratorConfig {
    pub fn new(
        timeout: Duration,
        payment_uri: impl Into<String>,
        shipping_uri: impl Into<String>,
    ) -> Self {
        Self {
            timeout,
            payment_uri: payment_uri.into(),
            shipping_uri: shipping_uri.into(),
        }
    }

    /// Returns a copy with a different per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            payment_uri: "http://payment/paymentAuth".to_string(),
            shipping_uri: "http://shipping/shipping".to_string(),
        }
    }
}
