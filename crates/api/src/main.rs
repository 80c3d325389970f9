//! API server entry point.

use api::chaos::Chaos;
use api::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::HttpResourceClient;
use order_store::{InMemoryOrderRepository, OrderRepository, PostgresOrderRepository};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let (plain, json) = if config.json_logs {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

async fn serve<R: OrderRepository + 'static>(
    config: Config,
    client: HttpResourceClient,
    repository: R,
    metrics_handle: PrometheusHandle,
) {
    let chaos = Chaos::new(config.chaos.clone());
    if chaos.config().any_enabled() {
        tracing::warn!(chaos = ?chaos.config(), "fault injection enabled");
    }

    let state = api::create_state(client, repository, config.orchestrator());
    let app = api::create_app(state, metrics_handle, chaos);

    let addr = config.addr();
    tracing::info!(
        %addr,
        payment = %config.payment_uri,
        shipping = %config.shipping_uri,
        timeout = ?config.http_timeout,
        "starting order service"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Build the outbound HTTP client
    let proxy = config.proxy_url();
    if let Some(proxy) = &proxy {
        tracing::info!(%proxy, "routing dependency calls through proxy");
    }
    let client =
        HttpResourceClient::with_proxy(proxy.as_deref()).expect("failed to build HTTP client");

    // 4. Pick the order store and serve
    match config.database_url.clone() {
        Some(url) => {
            let repository = PostgresOrderRepository::connect(&url)
                .await
                .expect("failed to connect to PostgreSQL");
            repository
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("storing orders in PostgreSQL");
            serve(config, client, repository, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, storing orders in memory");
            serve(config, client, InMemoryOrderRepository::new(), metrics_handle).await;
        }
    }
}
