use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::{DirectionsAPI, PlacesAPI, SessionAPI};
use crate::entities::{Category, LocationInput, Session};
use crate::error::Error;
use crate::server::extract::{JsonBody, SessionId};
use crate::server::DynAPI;
use crate::view::View;

#[derive(Serialize, Deserialize)]
pub struct UpdateInputsParams {
    start: Option<LocationInput>,
    end: Option<LocationInput>,
}

#[derive(Serialize, Deserialize)]
pub struct RequestDirectionsParams {
    start: LocationInput,
    end: LocationInput,
}

#[derive(Serialize, Deserialize)]
pub struct SelectCategoryParams {
    category: Category,
}

pub async fn create(Extension(api): Extension<DynAPI>) -> Result<Json<Session>, Error> {
    let session = api.create_session().await?;

    Ok(session.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    SessionId(id): SessionId,
) -> Result<Json<Session>, Error> {
    let session = api.find_session(id).await?;

    Ok(session.into())
}

pub async fn close(
    Extension(api): Extension<DynAPI>,
    SessionId(id): SessionId,
) -> Result<Json<()>, Error> {
    api.close_session(id).await?;

    Ok(().into())
}

pub async fn update_inputs(
    Extension(api): Extension<DynAPI>,
    SessionId(id): SessionId,
    JsonBody(params): JsonBody<UpdateInputsParams>,
) -> Result<Json<Session>, Error> {
    let session = api.update_inputs(id, params.start, params.end).await?;

    Ok(session.into())
}

pub async fn request_directions(
    Extension(api): Extension<DynAPI>,
    SessionId(id): SessionId,
    JsonBody(params): JsonBody<RequestDirectionsParams>,
) -> Result<Json<Session>, Error> {
    let session = api.request_directions(id, params.start, params.end).await?;

    Ok(session.into())
}

pub async fn select_category(
    Extension(api): Extension<DynAPI>,
    SessionId(id): SessionId,
    JsonBody(params): JsonBody<SelectCategoryParams>,
) -> Result<Json<Session>, Error> {
    let session = api.select_category(id, params.category).await?;

    Ok(session.into())
}

pub async fn render(
    Extension(api): Extension<DynAPI>,
    SessionId(id): SessionId,
) -> Result<Json<View>, Error> {
    let view = api.render_session(id).await?;

    Ok(view.into())
}
