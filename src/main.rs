use std::{process::exit, sync::Arc};
use dotenv::dotenv;
use log::{error, info, warn};
use config::Config;
use db::DBClient;
use error::ErrorPayload;
use modules::comment::{
    memory::InMemoryCommentStore,
    model::{CommentRepository, StoreError},
};

mod dto;
mod error;
mod config;
mod router;
mod db;
mod modules;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub comment_store: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Diagnostic detail for a 500 body, only when the deployment opts in.
    pub fn error_detail(&self, err: &StoreError) -> Option<ErrorPayload> {
        self.env.expose_error_details.then(|| ErrorPayload::Message(err.to_string()))
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 Invalid configuration: {}", err);
            exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let comment_store: Arc<dyn CommentRepository> = match &config.database_url {
        Some(database_url) => match DBClient::connect(&config, database_url).await {
            Ok(db_client) => {
                info!("✅  Connection to the database is successful!");
                Arc::new(db_client)
            }
            Err(err) => {
                error!("🔥 Failed to connect to the database: {:?}", err);
                exit(1);
            }
        },
        None => {
            warn!("DATABASE_URL is not set, comments are kept in memory and lost on restart");
            Arc::new(InMemoryCommentStore::new())
        }
    };
    let app_state = AppState {
        env: config.clone(),
        comment_store,
    };
    let app = router::create_router(Arc::new(app_state));
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("🔥 Failed to bind port {}: {}", &config.port, err);
            exit(1);
        }
    };
    info!("🚀 Server is running on http://localhost:{}", &config.port);
    if let Err(err) = axum::serve(listener, app).await {
        error!("🔥 Server stopped: {}", err);
        exit(1);
    }
}
