// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON request/response plumbing shared by all handlers.

use crate::error::AppError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

/// Success envelope: `{"status": 200, "message": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: T,
}

/// Handler return type that wraps its payload in the success envelope.
#[derive(Debug)]
pub struct Success<T>(pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        let body = SuccessResponse {
            status: StatusCode::OK.as_u16(),
            message: "success",
            data: self.0,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejections use the error envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::BadRequest(rejection.body_text()))
            }
        }
    }
}

/// `Query` extractor whose rejections use the error envelope.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => Err(query_error(rejection)),
        }
    }
}

fn query_error(rejection: QueryRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected query string");
    AppError::BadRequest(rejection.body_text())
}
