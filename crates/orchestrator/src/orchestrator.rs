//! Order placement pipeline.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use domain::{
    CustomerOrder, Dependency, NewOrderRequest, OrderError, PaymentRequest, Shipment,
    compute_total, extract_id,
};
use order_store::{OrderId, OrderRepository};

use crate::client::{PendingCall, ResourceClient};
use crate::config::OrchestratorConfig;
use crate::state::PlacementState;

/// Places orders by coordinating the dependency services and the order store.
///
/// Invocations share the client and repository but nothing else, so one
/// orchestrator can serve any number of concurrent requests.
pub struct OrderOrchestrator<C, R>
where
    C: ResourceClient,
    R: OrderRepository,
{
    client: Arc<C>,
    repository: R,
    config: OrchestratorConfig,
}

/// Tracks the state of a single placement.
struct Placement {
    state: PlacementState,
}

impl Placement {
    fn new() -> Self {
        Self {
            state: PlacementState::default(),
        }
    }

    fn advance(&mut self, next: PlacementState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid placement transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "placement state changed");
        self.state = next;
    }
}

impl<C, R> OrderOrchestrator<C, R>
where
    C: ResourceClient,
    R: OrderRepository,
{
    /// Creates a new orchestrator.
    pub fn new(client: C, repository: R, config: OrchestratorConfig) -> Self {
        Self {
            client: Arc::new(client),
            repository,
            config,
        }
    }

    /// Places an order.
    ///
    /// Payment is only requested once every dependency has resolved, and the
    /// shipment is only requested once payment was explicitly authorised.
    /// The stored order is returned on success.
    #[tracing::instrument(skip(self, request), fields(customer = ?request.customer))]
    pub async fn place_order(&self, request: NewOrderRequest) -> Result<CustomerOrder, OrderError> {
        metrics::counter!("order_placements_total").increment(1);
        let started = Instant::now();
        let mut placement = Placement::new();

        let result = self.run(&request, &mut placement).await;

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("order_placement_duration_seconds").record(duration);

        match &result {
            Ok(order) => {
                placement.advance(PlacementState::Completed);
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    order_id = ?order.id,
                    customer_id = %order.customer_id,
                    total = order.total,
                    duration,
                    "order placed"
                );
            }
            Err(e) => {
                let failed_in = placement.state;
                placement.advance(PlacementState::Failed);
                metrics::counter!("orders_failed_total", "reason" => e.kind()).increment(1);
                tracing::warn!(state = %failed_in, error = %e, duration, "order placement failed");
            }
        }

        result
    }

    async fn run(
        &self,
        request: &NewOrderRequest,
        placement: &mut Placement,
    ) -> Result<CustomerOrder, OrderError> {
        let timeout = self.config.timeout;
        let refs = request.validate()?;

        // Fan out: all four fetches are in flight before any is awaited.
        placement.advance(PlacementState::FetchingDependencies);
        let address = self.spawn(Dependency::Address, &refs.address, |c, r| async move {
            c.fetch_address(&r).await
        });
        let customer = self.spawn(Dependency::Customer, &refs.customer, |c, r| async move {
            c.fetch_customer(&r).await
        });
        let card = self.spawn(Dependency::Card, &refs.card, |c, r| async move {
            c.fetch_card(&r).await
        });
        let items = self.spawn(Dependency::Items, &refs.items, |c, r| async move {
            c.fetch_items(&r).await
        });

        let (address, customer, card, items) = tokio::try_join!(
            address.wait(timeout),
            customer.wait(timeout),
            card.wait(timeout),
            items.wait(timeout),
        )?;

        let total = compute_total(&items);
        tracing::debug!(items = items.len(), total, "dependencies resolved");

        placement.advance(PlacementState::Authorizing);
        let payment_request = PaymentRequest::new(address.clone(), card.clone(), customer.clone(), total);
        let payment = self.spawn(
            Dependency::Payment,
            &self.config.payment_uri,
            move |c, endpoint| async move { c.post_payment(&endpoint, &payment_request).await },
        );
        let authorisation = payment.wait(timeout).await?;
        if !authorisation.authorised {
            return Err(OrderError::PaymentDeclined(
                authorisation
                    .message
                    .unwrap_or_else(|| "payment not authorised".to_string()),
            ));
        }
        tracing::info!(total, "payment authorised");

        placement.advance(PlacementState::Shipping);
        let customer_id = extract_id(&customer.id)?;
        let shipment = Shipment::for_customer(customer_id.clone());
        let shipping = self.spawn(
            Dependency::Shipping,
            &self.config.shipping_uri,
            move |c, endpoint| async move { c.post_shipment(&endpoint, &shipment).await },
        );
        let shipment = shipping.wait(timeout).await.inspect_err(|e| {
            // No compensation exists; the authorised amount needs manual reconciliation.
            tracing::warn!(%customer_id, total, error = %e, "shipment failed after payment was authorised");
        })?;

        placement.advance(PlacementState::Persisting);
        let order = CustomerOrder {
            id: None,
            customer_id,
            customer,
            address,
            card,
            items,
            shipment,
            date: Utc::now(),
            total,
        };

        self.repository
            .save(order)
            .await
            .map_err(|e| OrderError::Persistence(e.to_string()))
    }

    /// Issues one dependency call in the background.
    fn spawn<T, F, Fut>(&self, dependency: Dependency, target: &str, call: F) -> PendingCall<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<C>, String) -> Fut,
        Fut: std::future::Future<Output = Result<T, OrderError>> + Send + 'static,
    {
        let future = call(self.client.clone(), target.to_string());
        PendingCall::spawn(dependency, target, future)
    }

    /// Returns every stored order.
    pub async fn list_orders(&self) -> Result<Vec<CustomerOrder>, OrderError> {
        self.repository
            .find_all()
            .await
            .map_err(|e| OrderError::Persistence(e.to_string()))
    }

    /// Returns the stored orders of one customer.
    pub async fn orders_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerOrder>, OrderError> {
        self.repository
            .find_by_customer_id(customer_id)
            .await
            .map_err(|e| OrderError::Persistence(e.to_string()))
    }

    /// Looks up one stored order.
    pub async fn find_order(&self, id: OrderId) -> Result<Option<CustomerOrder>, OrderError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| OrderError::Persistence(e.to_string()))
    }
}
