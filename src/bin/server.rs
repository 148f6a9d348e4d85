use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use rebar_combinator::solver::Solver;
use rebar_combinator::types::{DiameterResult, StockItem};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    groups: Vec<DiameterGroup>,
}

#[derive(Deserialize, Serialize)]
struct DiameterGroup {
    diameter: f64,
    stock: Vec<StockItem>,
    targets: Vec<f64>,
}

fn default_tolerance() -> f64 {
    0.1
}

#[derive(Serialize)]
struct OptimizeResponse {
    results: Vec<DiameterResult>,
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    // Diameters are independent, so fan out one blocking task per group
    // and join in request order.
    let tolerance = req.tolerance;
    let handles: Vec<_> = req
        .groups
        .into_iter()
        .map(|group| {
            tokio::task::spawn_blocking(move || {
                Solver::new(group.diameter, tolerance, group.stock, group.targets).solve()
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        results.push(outcome.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?);
    }

    Ok(Json(OptimizeResponse { results }))
}

async fn serve() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}

fn main() {
    // Sentry wants to be initialized before the async runtime starts.
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
        .block_on(serve());
}
