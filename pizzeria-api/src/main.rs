use anyhow::Context;
use pizzeria_api::{app, AppState};
use pizzeria_core::{AddressValidator, LocalAddressValidator};
use pizzeria_order::{DeliveryEstimate, OrderService, ServiceConfig};
use pizzeria_store::app_config::{Config, ValidationProvider};
use pizzeria_store::{DbClient, NominatimValidator, PgInventoryRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pizzeria_api=debug,pizzeria_order=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Pizzeria API on port {}", config.server.port);

    let validation = &config.address_validation;
    let timeout = Duration::from_millis(validation.timeout_ms);
    let zone = LocalAddressValidator::new(validation.city.clone(), validation.postal_codes.clone());
    let validator: Arc<dyn AddressValidator> = match validation.provider {
        ValidationProvider::Local => Arc::new(zone),
        ValidationProvider::Nominatim => {
            Arc::new(NominatimValidator::new(validation.nominatim_url.clone(), zone, timeout))
        }
    };
    tracing::info!("Address validation provider: {:?}", validation.provider);

    let service_config = ServiceConfig {
        delivery: DeliveryEstimate {
            base_minutes: config.delivery.base_minutes,
            per_pizza_minutes: config.delivery.per_pizza_minutes,
        },
        address_timeout: timeout,
        ..ServiceConfig::default()
    };
    let mut service = OrderService::new(validator, service_config);

    if let Some(url) = &config.database.url {
        let db = DbClient::new(url, config.database.max_connections)
            .await
            .context("Failed to connect to Postgres")?;
        db.migrate().await.context("Failed to run migrations")?;

        service = service.with_stock_repository(Arc::new(PgInventoryRepository::new(db.pool)));
        service
            .restore_stock()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to restore inventory: {}", e))?;
    } else {
        tracing::info!("No database configured, inventory is kept in memory");
    }

    let app = app(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
