//! In-memory resource client for tests and benchmarks.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::{
    Address, Card, Customer, Dependency, Item, OrderError, PaymentRequest, PaymentResponse,
    Shipment,
};

use super::ResourceClient;

#[derive(Debug)]
struct InMemoryClientState {
    address: Address,
    customer: Customer,
    card: Card,
    items: Vec<Item>,
    payment_response: PaymentResponse,
    delays: HashMap<Dependency, Duration>,
    failures: HashMap<Dependency, String>,
    calls: HashMap<Dependency, usize>,
    payment_requests: Vec<PaymentRequest>,
    shipments: Vec<Shipment>,
}

impl Default for InMemoryClientState {
    fn default() -> Self {
        Self {
            address: Address {
                id: "579f21ae98684924944651bd".to_string(),
                number: "69".to_string(),
                street: "Wilson Street".to_string(),
                city: "Hartlepool".to_string(),
                postcode: "TS26 8JU".to_string(),
                country: "United Kingdom".to_string(),
            },
            customer: Customer {
                id: "579f21ae98684924944651bf".to_string(),
                first_name: "Eve".to_string(),
                last_name: "Berger".to_string(),
                username: "Eve_Berger".to_string(),
                addresses: Vec::new(),
                cards: Vec::new(),
            },
            card: Card {
                id: "579f21ae98684924944651be".to_string(),
                long_num: "8575776807334952".to_string(),
                expires: "08/19".to_string(),
                ccv: "014".to_string(),
            },
            items: Vec::new(),
            payment_response: PaymentResponse::authorised(),
            delays: HashMap::new(),
            failures: HashMap::new(),
            calls: HashMap::new(),
            payment_requests: Vec::new(),
            shipments: Vec::new(),
        }
    }
}

/// Resource client that serves canned snapshots.
///
/// Each dependency can be given an artificial delay or a failure, and every
/// call is counted so tests can assert which services were contacted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceClient {
    state: Arc<RwLock<InMemoryClientState>>,
}

impl InMemoryResourceClient {
    /// Creates a client serving a sample customer with an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cart contents.
    pub fn set_items(&self, items: Vec<Item>) {
        self.state.write().unwrap().items = items;
    }

    /// Replaces the customer snapshot.
    pub fn set_customer(&self, customer: Customer) {
        self.state.write().unwrap().customer = customer;
    }

    /// Sets the payment service's answer.
    pub fn set_payment_response(&self, response: PaymentResponse) {
        self.state.write().unwrap().payment_response = response;
    }

    /// Delays every call to `dependency` by `delay`.
    pub fn set_delay(&self, dependency: Dependency, delay: Duration) {
        self.state.write().unwrap().delays.insert(dependency, delay);
    }

    /// Makes every call to `dependency` fail with `message`.
    pub fn set_failure(&self, dependency: Dependency, message: impl Into<String>) {
        self.state
            .write()
            .unwrap()
            .failures
            .insert(dependency, message.into());
    }

    /// Returns how many times `dependency` was called.
    pub fn call_count(&self, dependency: Dependency) -> usize {
        self.state
            .read()
            .unwrap()
            .calls
            .get(&dependency)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the number of calls made to any dependency.
    pub fn total_calls(&self) -> usize {
        self.state.read().unwrap().calls.values().sum()
    }

    /// Returns the payment requests received so far.
    pub fn payment_requests(&self) -> Vec<PaymentRequest> {
        self.state.read().unwrap().payment_requests.clone()
    }

    /// Returns the shipments created so far.
    pub fn shipments(&self) -> Vec<Shipment> {
        self.state.read().unwrap().shipments.clone()
    }

    /// Records the call, then applies the configured delay and failure.
    async fn call(&self, dependency: Dependency, endpoint: &str) -> Result<(), OrderError> {
        let (delay, failure) = {
            let mut state = self.state.write().unwrap();
            *state.calls.entry(dependency).or_default() += 1;
            (
                state.delays.get(&dependency).copied(),
                state.failures.get(&dependency).cloned(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match failure {
            Some(message) => Err(OrderError::dependency(dependency, endpoint, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceClient for InMemoryResourceClient {
    async fn fetch_address(&self, reference: &str) -> Result<Address, OrderError> {
        self.call(Dependency::Address, reference).await?;
        Ok(self.state.read().unwrap().address.clone())
    }

    async fn fetch_customer(&self, reference: &str) -> Result<Customer, OrderError> {
        self.call(Dependency::Customer, reference).await?;
        Ok(self.state.read().unwrap().customer.clone())
    }

    async fn fetch_card(&self, reference: &str) -> Result<Card, OrderError> {
        self.call(Dependency::Card, reference).await?;
        Ok(self.state.read().unwrap().card.clone())
    }

    async fn fetch_items(&self, reference: &str) -> Result<Vec<Item>, OrderError> {
        self.call(Dependency::Items, reference).await?;
        Ok(self.state.read().unwrap().items.clone())
    }

    async fn post_payment(
        &self,
        endpoint: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, OrderError> {
        self.call(Dependency::Payment, endpoint).await?;
        let mut state = self.state.write().unwrap();
        state.payment_requests.push(request.clone());
        Ok(state.payment_response.clone())
    }

    async fn post_shipment(
        &self,
        endpoint: &str,
        shipment: &Shipment,
    ) -> Result<Shipment, OrderError> {
        self.call(Dependency::Shipping, endpoint).await?;
        self.state.write().unwrap().shipments.push(shipment.clone());
        Ok(shipment.clone())
    }
}
