use technotes_api::{config, db::Db, routes};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting TechNotes API in {:?} mode", config.environment);

    let db = Db::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));
    db.migrate()
        .await
        .unwrap_or_else(|e| panic!("failed to run schema migration: {}", e));

    let app = routes::app(db.clone());

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("TechNotes API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");

    db.close().await;
}
