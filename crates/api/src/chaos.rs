//! Fault injection for resilience experiments.
//!
//! Each toggle is read once at startup. The middleware is layered onto the
//! order routes only and never touches the placement pipeline itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Size of the block retained per request when leaking.
pub const LEAK_BLOCK_BYTES: usize = 10 * 1024 * 1024;

/// Successful orders after which the error toggle starts failing requests.
pub const ERROR_AFTER_ORDERS: u64 = 5;

/// Which faults to inject.
#[derive(Debug, Clone)]
pub struct ChaosConfig {
    pub latency: bool,
    pub cpu: bool,
    pub leak: bool,
    pub error: bool,
    /// Delay added when `latency` is on.
    pub latency_delay: Duration,
    /// Time spent spinning when `cpu` is on.
    pub cpu_burn: Duration,
}

impl ChaosConfig {
    pub fn any_enabled(&self) -> bool {
        self.latency || self.cpu || self.leak || self.error
    }
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            latency: false,
            cpu: false,
            leak: false,
            error: false,
            latency_delay: Duration::from_secs(3),
            cpu_burn: Duration::from_millis(500),
        }
    }
}

/// Shared fault-injection state.
#[derive(Debug, Clone, Default)]
pub struct Chaos {
    config: ChaosConfig,
    successful_orders: Arc<AtomicU64>,
    leaked: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Chaos {
    pub fn new(config: ChaosConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    /// Number of orders created through the API since startup.
    pub fn successful_orders(&self) -> u64 {
        self.successful_orders.load(Ordering::SeqCst)
    }

    fn leak_block(&self) {
        if let Ok(mut blocks) = self.leaked.lock() {
            blocks.push(vec![1u8; LEAK_BLOCK_BYTES]);
            tracing::warn!(blocks = blocks.len(), "simulated memory leak");
        }
    }
}

fn burn_cpu(duration: Duration) -> u64 {
    let started = Instant::now();
    let mut acc: u64 = 0;
    while started.elapsed() < duration {
        for i in 0..10_000u64 {
            acc = acc.wrapping_mul(31).wrapping_add(i);
        }
    }
    acc
}

/// Runs `work` on the blocking pool, logging instead of failing the request if it dies.
async fn run_blocking<T, F>(label: &'static str, work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(task = label, error = %e, "simulated fault task failed");
            None
        }
    }
}

/// Middleware applying the enabled faults to a request.
pub async fn simulate_faults(State(chaos): State<Chaos>, request: Request, next: Next) -> Response {
    let config = chaos.config();
    let is_placement = request.method() == Method::POST && request.uri().path() == "/orders";

    if config.error && chaos.successful_orders() >= ERROR_AFTER_ORDERS {
        tracing::warn!(
            orders = chaos.successful_orders(),
            "simulated failure after order threshold"
        );
        let body = serde_json::json!({ "error": "simulated failure" });
        return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
    }

    if config.latency {
        tracing::warn!(delay = ?config.latency_delay, "simulated latency");
        tokio::time::sleep(config.latency_delay).await;
    }

    if config.cpu {
        let burn = config.cpu_burn;
        tracing::warn!(duration = ?burn, "simulated cpu load");
        run_blocking("cpu burn", move || burn_cpu(burn)).await;
    }

    if config.leak {
        chaos.leak_block();
    }

    let response = next.run(request).await;

    if is_placement && response.status() == StatusCode::CREATED {
        chaos.successful_orders.fetch_add(1, Ordering::SeqCst);
    }

    response
}
