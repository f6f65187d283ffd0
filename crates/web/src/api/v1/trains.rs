use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{delete, get, on, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use model::{train::Train, WithId};
use railway::{client::parse_train_id, RequestError};
use serde::Deserialize;
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, HateoasResult, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::seats;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/trains{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/:number", get(get_train).delete(delete_train))
        .route("/:number/seats", get(seats::get_seats))
        .route("/:number/seats/summary", get(seats::get_seat_summary))
        .route("/:number/bookings", post(seats::post_booking))
        .route(
            "/:number/seats/:seat_number/booking",
            delete(seats::delete_booking),
        )
        .route("/", get(get_trains).post(post_train))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    start: Option<String>,
    end: Option<String>,
}

/// Lists every train, or only those running from `start` to `end` if either
/// is given.
async fn get_trains(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { railway_client, .. }): State<WebState>,
    Query(params): Query<RouteQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Train>>>> {
    let trains = match (params.start, params.end) {
        (None, None) => railway_client.get_trains().await,
        (start, end) => {
            railway_client
                .search_trains_by_route(
                    start.as_deref().unwrap_or_default(),
                    end.as_deref().unwrap_or_default(),
                )
                .await
        }
    };
    trains
        .map(|trains| {
            trains
                .into_iter()
                .map(|train| train_hateoas(train, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewTrainDto {
    id: String,
    #[serde(flatten)]
    train: Train,
    #[serde(default)]
    total_seats: Option<u32>,
}

async fn post_train(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { railway_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(dto): Json<NewTrainDto>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<Train>>>)> {
    let created = match dto.total_seats {
        Some(total_seats) => {
            railway_client
                .add_train_with_seats(&dto.id, dto.train, total_seats)
                .await
        }
        None => railway_client.add_train(&dto.id, dto.train).await,
    };
    created
        .map(|train| (StatusCode::CREATED, train_hateoas(train, base_url).json()))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn get_train(
    OriginalUri(original_uri): OriginalUri,
    Path(number): Path<String>,
    State(WebState { railway_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Train>> {
    let train = railway_client.search_train(&number).await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    match train {
        Some(train) => Ok(train_hateoas(train, base_url).json()),
        None => Err(RouteErrorResponse::not_found(&Method::GET, original_uri.path())
            .with_message(format!("No train found with the number {}.", number.trim()))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteQuery {
    departure_date: Option<NaiveDate>,
}

async fn delete_train(
    OriginalUri(original_uri): OriginalUri,
    Path(number): Path<String>,
    State(WebState { railway_client, .. }): State<WebState>,
    Query(params): Query<DeleteQuery>,
) -> RouteResult<StatusCode> {
    let to_route_error = |why: RequestError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::DELETE)
            .with_uri(original_uri.path())
    };
    let id = parse_train_id(&number).map_err(to_route_error)?;
    railway_client
        .delete_train(&id, params.departure_date)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(to_route_error)
}

pub(crate) fn train_hateoas(
    train: WithId<Train>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Train>> {
    let number = train.id.raw();
    hateoas::Response::builder(train, base_url)
        .link("self", resource!("/{}", number))
        .link("seats", resource!("/{}/seats", number))
        .link("summary", resource!("/{}/seats/summary", number))
        .link("bookings", resource!("/{}/bookings", number))
        .build()
}
