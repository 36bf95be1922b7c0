use super::error::*;
use crate::application_port::*;
use crate::domain_model::Identity;
use crate::logger::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueResponse {
    pub access_token: String,
}

pub async fn reissue(
    body: ReissueRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let access_token = auth_service
        .reissue(&body.refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response = ReissueResponse {
        access_token: access_token.0,
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}

pub async fn logout(
    identity: Identity,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(&identity.subject)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    info!(subject = %identity.subject, "logout completed");

    Ok(StatusCode::OK)
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub role: String,
}

pub async fn me(identity: Identity) -> Result<impl warp::Reply, warp::Rejection> {
    let response = MeResponse {
        subject: identity.subject,
        role: identity.role,
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}
