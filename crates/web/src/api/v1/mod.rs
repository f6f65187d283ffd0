use axum::{
    routing::{get, on},
    Json, Router,
};
use serde_json::{json, Value};

use model::train::Train;

use crate::{
    common::{route_not_found, schema, METHOD_FILTER_ALL},
    middleware::base_url::base_url_middleware,
    WebState,
};

mod seats;
mod trains;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/schema/train", get(schema::<Train>))
        .nest_service("/trains", trains::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn index() -> Json<Value> {
    Json(json!({
        "trains": resource!("/trains"),
        "trainSchema": resource!("/schema/train"),
    }))
}
