mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::server::handlers::{locations, routes, users};

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/locations/search", post(locations::search))
        .route("/routes", post(routes::create).get(routes::list))
        .route("/routes/claim", post(routes::claim))
        .route("/routes/:id", get(routes::find).patch(routes::update))
        .route("/routes/:id/gpx", get(routes::download_gpx))
        .route("/login", post(users::login))
        .layer(Extension(api));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
