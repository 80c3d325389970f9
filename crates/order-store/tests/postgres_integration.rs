//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::Utc;
use domain::{Address, Card, Customer, CustomerOrder, Item, Shipment, compute_total};
use order_store::{OrderId, OrderRepository, PostgresOrderRepository};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresOrderRepository::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and an empty table
async fn get_test_repository() -> PostgresOrderRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE customer_orders")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderRepository::new(pool)
}

fn create_test_order(customer_id: &str) -> CustomerOrder {
    let items = vec![Item::new("A", 2, 10.0), Item::new("B", 1, 5.0)];
    CustomerOrder {
        id: None,
        customer_id: customer_id.to_string(),
        customer: Customer {
            id: customer_id.to_string(),
            first_name: "Eve".to_string(),
            last_name: "Berger".to_string(),
            username: "Eve_Berger".to_string(),
            ..Customer::default()
        },
        address: Address {
            number: "69".to_string(),
            street: "Wilson Street".to_string(),
            city: "Hartlepool".to_string(),
            ..Address::default()
        },
        card: Card {
            long_num: "8575776807334952".to_string(),
            ..Card::default()
        },
        total: compute_total(&items),
        items,
        shipment: Shipment::for_customer(customer_id),
        date: Utc::now(),
    }
}

#[tokio::test]
async fn save_assigns_id_and_reads_back() {
    let repo = get_test_repository().await;

    let saved = repo.save(create_test_order("c1")).await.unwrap();
    let id = saved.id.expect("store assigns an id");

    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.customer_id, "c1");
    assert_eq!(found.items.len(), 2);
    assert_eq!(found.total, saved.total);
    assert_eq!(found.shipment, saved.shipment);
    assert_eq!(found.address.city, "Hartlepool");
}

#[tokio::test]
async fn save_with_existing_id_replaces_document() {
    let repo = get_test_repository().await;
    let id = OrderId::new();

    repo.save(create_test_order("c1").with_id(id)).await.unwrap();

    let mut updated = create_test_order("c1").with_id(id);
    updated.total = 1.0;
    repo.save(updated).await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].total, 1.0);
}

#[tokio::test]
async fn find_all_in_insertion_order() {
    let repo = get_test_repository().await;

    let first = repo.save(create_test_order("c1")).await.unwrap();
    let second = repo.save(create_test_order("c2")).await.unwrap();
    let third = repo.save(create_test_order("c3")).await.unwrap();

    let ids: Vec<_> = repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

#[tokio::test]
async fn find_by_customer_id_filters() {
    let repo = get_test_repository().await;

    repo.save(create_test_order("c1")).await.unwrap();
    repo.save(create_test_order("c2")).await.unwrap();
    repo.save(create_test_order("c1")).await.unwrap();

    let orders = repo.find_by_customer_id("c1").await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.customer_id == "c1"));

    assert!(repo.find_by_customer_id("c9").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_unknown_id_returns_none() {
    let repo = get_test_repository().await;
    assert!(repo.find_by_id(OrderId::new()).await.unwrap().is_none());
}
