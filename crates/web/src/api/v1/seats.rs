use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    Extension, Json,
};
use model::seat::{Passenger, Seat, SeatSummary, SeatType};
use railway::{client::parse_train_id, RequestError};
use serde::Deserialize;

use crate::{
    common::{HateoasResult, RouteErrorResponse, RouteResult, VecResponse},
    hateoas,
    middleware::base_url::BaseUrl,
    WebState,
};

use super::trains::resource;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookingDto {
    seat_type: SeatType,
    #[serde(flatten)]
    passenger: Passenger,
}

pub(crate) async fn get_seats(
    OriginalUri(original_uri): OriginalUri,
    Path(number): Path<String>,
    State(WebState { railway_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<Seat>> {
    let to_route_error = |why: RequestError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };
    let id = parse_train_id(&number).map_err(to_route_error)?;
    let seats = railway_client.get_seats(&id).await.map_err(to_route_error)?;

    Ok(hateoas::Response::builder(VecResponse::new(seats), base_url)
        .link("self", resource!("/{}/seats", id))
        .link("train", resource!("/{}", id))
        .link("summary", resource!("/{}/seats/summary", id))
        .build()
        .json())
}

pub(crate) async fn get_seat_summary(
    OriginalUri(original_uri): OriginalUri,
    Path(number): Path<String>,
    State(WebState { railway_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<SeatSummary> {
    let to_route_error = |why: RequestError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };
    let id = parse_train_id(&number).map_err(to_route_error)?;
    let summary = railway_client
        .seat_summary(&id)
        .await
        .map_err(to_route_error)?;

    Ok(hateoas::Response::builder(summary, base_url)
        .link("self", resource!("/{}/seats/summary", id))
        .link("train", resource!("/{}", id))
        .link("seats", resource!("/{}/seats", id))
        .build()
        .json())
}

/// Books the lowest numbered free seat of the requested type.
pub(crate) async fn post_booking(
    OriginalUri(original_uri): OriginalUri,
    Path(number): Path<String>,
    State(WebState { railway_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(dto): Json<BookingDto>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<Seat>>)> {
    let to_route_error = |why: RequestError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };
    let id = parse_train_id(&number).map_err(to_route_error)?;
    let seat = railway_client
        .book_seat(&id, dto.seat_type, dto.passenger)
        .await
        .map_err(to_route_error)?;

    let response = hateoas::Response::builder(seat, base_url)
        .link("train", resource!("/{}", id))
        .link("seats", resource!("/{}/seats", id));
    let cancel = resource!("/{}/seats/{}/booking", id, response.response.content.seat_number);
    Ok((StatusCode::CREATED, response.link("cancel", cancel).build().json()))
}

pub(crate) async fn delete_booking(
    OriginalUri(original_uri): OriginalUri,
    Path((number, seat_number)): Path<(String, u32)>,
    State(WebState { railway_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Seat> {
    let to_route_error = |why: RequestError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::DELETE)
            .with_uri(original_uri.path())
    };
    let id = parse_train_id(&number).map_err(to_route_error)?;
    let seat = railway_client
        .cancel_seat(&id, seat_number)
        .await
        .map_err(to_route_error)?;

    Ok(hateoas::Response::builder(seat, base_url)
        .link("train", resource!("/{}", id))
        .link("seats", resource!("/{}/seats", id))
        .build()
        .json())
}
