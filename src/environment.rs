//! Where the prediction service lives.

/// The service's own default: Flask on port 5000 of this machine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Environment variable overriding the default service URL.
pub const BASE_URL_VAR: &str = "RISK_BASE_URL";

/// Reads `RISK_BASE_URL`, ignoring it when unset or blank.
pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Picks the service URL: explicit flag, then config file, then `RISK_BASE_URL`, then the default.
pub fn resolve_base_url(
    flag: Option<&str>,
    configured: Option<&str>,
    from_env: Option<&str>,
) -> String {
    flag.or(configured)
        .or(from_env)
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}
