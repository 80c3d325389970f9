//! Clients for the services that own order dependencies.
//!
//! Every call is issued as its own task and handed back as a
//! [`PendingCall`], which the caller awaits with an explicit deadline.

pub mod http;
pub mod memory;

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::{
    Address, Card, Customer, Dependency, Item, OrderError, PaymentRequest, PaymentResponse,
    Shipment,
};
use tokio::task::JoinHandle;

pub use http::HttpResourceClient;
pub use memory::InMemoryResourceClient;

/// Typed access to the dependency services.
#[async_trait]
pub trait ResourceClient: Send + Sync + 'static {
    /// Fetches the address behind `reference`.
    async fn fetch_address(&self, reference: &str) -> Result<Address, OrderError>;

    /// Fetches the customer behind `reference`.
    async fn fetch_customer(&self, reference: &str) -> Result<Customer, OrderError>;

    /// Fetches the payment card behind `reference`.
    async fn fetch_card(&self, reference: &str) -> Result<Card, OrderError>;

    /// Fetches the cart items collection behind `reference`.
    async fn fetch_items(&self, reference: &str) -> Result<Vec<Item>, OrderError>;

    /// Asks the payment service to authorise a charge.
    async fn post_payment(
        &self,
        endpoint: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, OrderError>;

    /// Asks the shipping service to create a shipment and returns the confirmed one.
    async fn post_shipment(&self, endpoint: &str, shipment: &Shipment)
    -> Result<Shipment, OrderError>;
}

/// A dependency call running in the background.
///
/// Dropping the handle, including when [`PendingCall::wait`] times out,
/// detaches the call rather than aborting it. Its result is discarded.
#[derive(Debug)]
pub struct PendingCall<T> {
    dependency: Dependency,
    endpoint: String,
    handle: JoinHandle<Result<T, OrderError>>,
}

impl<T: Send + 'static> PendingCall<T> {
    /// Spawns `call` onto the runtime and returns a handle to its result.
    pub fn spawn<F>(dependency: Dependency, endpoint: impl Into<String>, call: F) -> Self
    where
        F: Future<Output = Result<T, OrderError>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let result = call.await;
            metrics::histogram!(
                "dependency_call_duration_seconds",
                "dependency" => dependency.as_str()
            )
            .record(started.elapsed().as_secs_f64());
            result
        });

        Self {
            dependency,
            endpoint: endpoint.into(),
            handle,
        }
    }

    /// Returns the dependency this call targets.
    pub fn dependency(&self) -> Dependency {
        self.dependency
    }

    /// Waits at most `timeout` for the call to finish.
    pub async fn wait(self, timeout: Duration) -> Result<T, OrderError> {
        let PendingCall {
            dependency,
            endpoint,
            handle,
        } = self;

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(OrderError::dependency(dependency, endpoint, join_error)),
            Err(_) => {
                metrics::counter!(
                    "dependency_timeouts_total",
                    "dependency" => dependency.as_str()
                )
                .increment(1);
                tracing::warn!(%dependency, %endpoint, ?timeout, "dependency call timed out");
                Err(OrderError::DependencyTimeout {
                    dependency,
                    timeout,
                })
            }
        }
    }
}
