use crate::domain::errors::OtpError;
use crate::interface_adapters::protocol::{
    ErrorResponse, HealthResponse, SendOtpRequest, SendOtpResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};
use crate::interface_adapters::state::{AppState, RandomCodeGenerator, SystemClock};
use crate::use_cases::send_otp::SendOtpUseCase;
use crate::use_cases::verify_otp::VerifyOtpUseCase;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

// Handler for issuing a one-time code.
#[tracing::instrument(name = "send_otp", skip_all)]
pub async fn send_otp(
    State(state): State<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<SendOtpResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(payload) = payload.map_err(map_rejection)?;
    let phone_number = payload.phone_number.unwrap_or_default();

    let use_case = SendOtpUseCase {
        clock: SystemClock,
        store: state.store(),
        gateway: state.gateway.clone(),
        generator: RandomCodeGenerator,
        ttl_millis: state.ttl_millis,
    };

    let result = use_case
        .execute(&phone_number)
        .await
        .map_err(map_otp_error)?;

    tracing::info!(request_id = ?result.request_id, "otp dispatched");

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        request_id: result.request_id,
        development_mode: state.dev_mode.then_some(true),
        otp: state.dev_mode.then_some(result.otp),
    }))
}

// Handler for checking a one-time code.
#[tracing::instrument(name = "verify_otp", skip_all)]
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<VerifyOtpResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(payload) = payload.map_err(map_rejection)?;
    let phone_number = payload.phone_number.unwrap_or_default();
    let otp = payload.otp.unwrap_or_default();

    let use_case = VerifyOtpUseCase {
        clock: SystemClock,
        store: state.store(),
    };

    use_case
        .execute(&phone_number, &otp)
        .await
        .map_err(map_otp_error)?;

    tracing::info!("otp verified");

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}

// Liveness check used by clients before sending.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// Helper to build a JSON error response.
fn error_response(
    status: StatusCode,
    message: &str,
    error: Option<Value>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message: message.to_string(),
            error,
        }),
    )
}

// Undecodable bodies get the same JSON envelope as every other failure.
fn map_rejection(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    tracing::warn!(error = %rejection.body_text(), "rejected request body");
    error_response(
        StatusCode::BAD_REQUEST,
        "Invalid request body",
        Some(Value::String(rejection.body_text())),
    )
}

fn map_otp_error(err: OtpError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        OtpError::MissingPhoneNumber => {
            error_response(StatusCode::BAD_REQUEST, "Phone number is required", None)
        }
        OtpError::MissingFields => error_response(
            StatusCode::BAD_REQUEST,
            "Phone number and OTP are required",
            None,
        ),
        OtpError::NotFound => {
            error_response(StatusCode::BAD_REQUEST, "OTP not found or expired", None)
        }
        OtpError::Expired => error_response(StatusCode::BAD_REQUEST, "OTP has expired", None),
        OtpError::Mismatch => error_response(StatusCode::BAD_REQUEST, "Invalid OTP", None),
        OtpError::GatewayRejected(raw) => {
            tracing::warn!(response = %raw, "sms gateway rejected message");
            error_response(StatusCode::BAD_REQUEST, "Failed to send OTP", Some(raw))
        }
        OtpError::GatewayUnavailable(gateway_err) => {
            tracing::error!(error = %gateway_err, "sms gateway error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                Some(gateway_err.detail()),
            )
        }
        OtpError::StorageFailure => {
            tracing::error!("otp store failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                None,
            )
        }
    }
}
