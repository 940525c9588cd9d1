//! Extractors that reject in the same `{code, error}` shape as every other
//! failure, instead of axum's plain-text rejections.

use axum::{
    async_trait,
    body::HttpBody,
    extract::{FromRequest, Json, Path, RequestParts},
    BoxError,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{invalid_request_error, Error};

pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    B: HttpBody + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected request body");
                Err(invalid_request_error(rejection))
            }
        }
    }
}

/// The `:id` segment of a session route.
pub struct SessionId(pub Uuid);

#[async_trait]
impl<B: Send> FromRequest<B> for SessionId {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request(req).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected session id");
                Err(invalid_request_error(rejection))
            }
        }
    }
}
