use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::events::{EventBus, ServiceProvider};
use service::fleet::{FleetService, SeaOrmBusRepository};
use service::menu::{self, MenuService, MenuStore, SeaOrmMenuStore};

use crate::errors::StartupError;
use crate::routes;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub fleet: Arc<FleetService<SeaOrmBusRepository>>,
    pub menu: Arc<MenuService>,
}

/// The process-wide bus with every consumer subscribed. The menu store is
/// the only dependency handlers resolve from it.
pub fn build_event_bus(menu_store: Arc<dyn MenuStore>) -> Arc<EventBus> {
    let provider = ServiceProvider::builder().singleton(menu_store).build();
    let bus = EventBus::new(provider);
    menu::handlers::register(&bus);
    Arc::new(bus)
}

pub fn build_state(db: DatabaseConnection) -> AppState {
    let menu_store: Arc<dyn MenuStore> = Arc::new(SeaOrmMenuStore::new(db.clone()));
    let events = build_event_bus(Arc::clone(&menu_store));
    AppState {
        fleet: Arc::new(FleetService::new(Arc::new(SeaOrmBusRepository::new(db)), Arc::clone(&events))),
        menu: Arc::new(MenuService::new(menu_store, events)),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` (or `CONFIG_PATH`), or the environment alone when that file
/// does not exist. A broken config file stops startup.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(format!("{:#}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Serve with an already loaded configuration.
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::migrate(&db).await?;

    let app: Router = routes::build_router(build_state(db), build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
