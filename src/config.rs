use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Parkinsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name under the app data directory holding the saved-results list.
///
/// This is the single namespaced storage key: everything the user has saved
/// lives in this one file as a JSON array.
pub const SAVED_RESULTS_FILE: &str = "parkinsight-saved-results.json";

/// Default base URL of the external prediction service.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout for prediction calls, in seconds.
///
/// The transport never relies on an implicit library default; callers can
/// override per client but always get an explicit bound.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Get the application data directory
/// ~/Parkinsight/ on all platforms, overridable via PARKINSIGHT_DATA_DIR
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARKINSIGHT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Full path of the saved-results file.
pub fn saved_results_path() -> PathBuf {
    app_data_dir().join(SAVED_RESULTS_FILE)
}

/// Base URL of the prediction service, overridable via PARKINSIGHT_API_URL.
pub fn api_base_url() -> String {
    std::env::var("PARKINSIGHT_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "parkinsight=debug,info"
    } else {
        "parkinsight=info,warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_results_path_under_data_dir() {
        let path = saved_results_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with(SAVED_RESULTS_FILE));
    }

    #[test]
    fn app_name_is_parkinsight() {
        assert_eq!(APP_NAME, "Parkinsight");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_base_url_is_local() {
        assert!(DEFAULT_API_BASE_URL.starts_with("http://127.0.0.1"));
    }

    #[test]
    fn default_log_filter_scopes_crate() {
        assert!(default_log_filter().starts_with("parkinsight="));
    }
}
