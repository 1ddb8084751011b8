//! Error reporting and exit codes

use h2site_api_client::ApiError;
use h2site_core::exit_codes;
use h2site_geo::GeoError;
use h2site_report::ReportError;
use h2site_scoring::ScoringError;
use owo_colors::OwoColorize;
use std::process::ExitCode;

/// Print the error chain and map it to an exit code.
pub fn report(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {err:#}", "Error:".red().bold());
    if let Some(ApiError::ApiResponse { status: 401 | 403, .. }) = err.downcast_ref::<ApiError>() {
        eprintln!("  Suggestion: set H2SITE_ID_TOKEN to a fresh ID token");
    }
    ExitCode::from(exit_code(err) as u8)
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<h2site_core::Error>() {
        return e.exit_code();
    }
    if err.downcast_ref::<GeoError>().is_some()
        || err.downcast_ref::<ScoringError>().is_some()
        || err.downcast_ref::<ReportError>().is_some()
    {
        return exit_codes::VALIDATION_ERROR;
    }
    if let Some(e) = err.downcast_ref::<ApiError>() {
        return match e {
            ApiError::Validation(_) => exit_codes::VALIDATION_ERROR,
            ApiError::Config(_) | ApiError::MissingEnvVar(_) => exit_codes::CONFIG_ERROR,
            ApiError::Timeout(_) => exit_codes::TIMEOUT,
            _ => exit_codes::NETWORK_ERROR,
        };
    }
    exit_codes::FAILURE
}
