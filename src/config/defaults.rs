//! Default configuration values

/// Debounce window between a keystroke and the search request (milliseconds).
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

/// Keyring service name used when an instance stores its API token in the
/// OS keychain instead of the preferences file.
pub const KEYRING_SERVICE: &str = "zendesk-palette";

/// Preferences file location, relative to the home directory.
pub const PREFERENCES_RELATIVE_PATH: &str = ".zendesk-palette/preferences.json";

/// Environment variable that overrides the preferences file location.
pub const PREFERENCES_PATH_ENV: &str = "ZENDESK_PALETTE_CONFIG";
