//! Order placement data model and pure helpers.

mod customer_order;
mod payment;
mod reference;
mod request;
mod total;
mod value_objects;

pub use customer_order::CustomerOrder;
pub use payment::{PaymentRequest, PaymentResponse};
pub use reference::extract_id;
pub use request::{NewOrderRequest, ValidatedOrderRequest};
pub use total::{SHIPPING_SURCHARGE, compute_total};
pub use value_objects::{Address, Card, Customer, Item, Shipment, Snapshot};
