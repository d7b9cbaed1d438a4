//! `Path` and `Query` extractors whose rejections use the [`AppError`]
//! JSON envelope instead of axum's plain-text bodies.

use axum::extract::FromRequestParts;

use crate::error::AppError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
