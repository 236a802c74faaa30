use axum::{
    http::{header, HeaderMap, StatusCode},
    Json,
};
use tracing::debug;

use crate::{
    libraries::validator,
    models::{requests::RejectedRow, ValidateDataResponse},
    services::loader::{self, SourceFormat},
};

/// Check an uploaded CSV or JSON body without touching the served dataset.
///
/// The format follows the `Content-Type` header when it names JSON or CSV,
/// and is sniffed from the body otherwise.
pub async fn validate_data(
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<ValidateDataResponse>) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let format = if content_type.contains("json") {
        SourceFormat::Json
    } else if content_type.contains("csv") {
        SourceFormat::Csv
    } else {
        SourceFormat::detect("", &body)
    };

    let records = match loader::parse_records(&body, format) {
        Ok(records) => records,
        Err(e) => {
            debug!("Rejected uploaded data: {:#}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidateDataResponse::error(e.to_string())),
            );
        }
    };

    let report = validator::validate_with_report(records);
    debug!(
        "Validated upload: {} valid, {} rejected",
        report.valid.len(),
        report.rejected.len()
    );

    (
        StatusCode::OK,
        Json(ValidateDataResponse {
            success: true,
            valid: report.valid,
            rejected: report
                .rejected
                .iter()
                .map(|r| RejectedRow {
                    row: r.row,
                    reason: r.to_string(),
                })
                .collect(),
            error: None,
        }),
    )
}
