pub mod list;
pub mod show_config;

use std::process::ExitCode;

use crate::client::LifelogFailure;

/// Exit status for a failure of any kind other than rate limiting.
pub const EXIT_API_ERROR: u8 = 1;
/// Exit status when the API answered 429.
pub const EXIT_RATE_LIMITED: u8 = 2;
/// Exit status for invocation mistakes such as a missing API key. Matches
/// the status clap uses for its own usage errors.
pub const EXIT_USAGE: u8 = 2;

/// Print a failure to stderr and pick the matching exit code.
pub fn report_failure(failure: &LifelogFailure) -> ExitCode {
    eprintln!("{}", failure_line(failure));
    ExitCode::from(exit_code_for(failure))
}

pub fn exit_code_for(failure: &LifelogFailure) -> u8 {
    if failure.is_rate_limited() {
        EXIT_RATE_LIMITED
    } else {
        EXIT_API_ERROR
    }
}

pub fn failure_line(failure: &LifelogFailure) -> String {
    match failure {
        LifelogFailure::RateLimited {
            message,
            retry_after,
            ..
        } => {
            let hint = retry_after.map_or_else(|| "none".to_owned(), |s| s.to_string());
            format!("Rate limited: {message} (retryAfter={hint})")
        }
        LifelogFailure::ApiFailure {
            status, message, ..
        } => format!("API error ({status}): {message}"),
        other => format!("Error: {other}"),
    }
}

/// Mask all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}
