use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

use pos_api::{
    config::AppConfig,
    db,
    entities::{customer, product, product_variant, stock_location},
    events::{self, EventSender},
    handlers::AppServices,
    logging, AppState,
};

/// Helper harness for spinning up an application state backed by a
/// throwaway SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("pos_test.db");

        // Minimal configuration suitable for tests.
        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let base_logger = logging::setup_logger(logging::LoggerConfig::new(64, false));
        let services = AppServices::new(
            db_arc.clone(),
            Arc::new(event_sender.clone()),
            &base_logger,
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", pos_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Seed a product straight through the catalog service.
    #[allow(dead_code)]
    pub async fn seed_product(
        &self,
        name: &str,
        price: Decimal,
        cost: Decimal,
        stock: i32,
    ) -> product::Model {
        self.state
            .services
            .catalog
            .create_product(name.to_string(), price, Some(cost), Some(stock), None)
            .await
            .expect("seed product for tests")
    }

    /// Seed a standalone product variant.
    #[allow(dead_code)]
    pub async fn seed_variant(&self, name: &str) -> product_variant::Model {
        self.state
            .services
            .catalog
            .create_variant(name.to_string(), None, None)
            .await
            .expect("seed product variant for tests")
    }

    /// Seed a customer.
    #[allow(dead_code)]
    pub async fn seed_customer(&self, name: &str, email: Option<&str>) -> customer::Model {
        self.state
            .services
            .customers
            .create_customer(name.to_string(), email.map(str::to_string), None)
            .await
            .expect("seed customer for tests")
    }

    /// Seed a stock location.
    #[allow(dead_code)]
    pub async fn seed_location(
        &self,
        name: &str,
        is_supplier_location: bool,
    ) -> stock_location::Model {
        self.state
            .services
            .inventory
            .create_location(name.to_string(), is_supplier_location)
            .await
            .expect("seed stock location for tests")
    }

    /// Point the default warehouse setting at the given location name.
    #[allow(dead_code)]
    pub async fn set_default_warehouse(&self, name: &str) {
        self.state
            .services
            .inventory
            .upsert_settings(Some(name.to_string()))
            .await
            .expect("save inventory settings for tests");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
