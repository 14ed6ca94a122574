//! Configuration loader — merges env vars, .env file, and config.toml.

use common::config::BoardConfig;
use common::Error;
use std::path::Path;
use themeparks_client::park_id;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_request_budget(raw: &str) -> Result<u32, Error> {
    const NAME: &str = "WAIT_BOARD_MAX_REQUESTS_PER_SEC";
    let parsed = parse_positive_u64(raw, NAME)?;
    u32::try_from(parsed).map_err(|_| Error::Config(format!("{NAME} is too large")))
}

/// True when `park` names a known short park or is a raw entity id.
pub fn is_park_reference(park: &str) -> bool {
    park_id(park).is_some() || uuid::Uuid::parse_str(park.trim()).is_ok()
}

fn validate_config(config: &BoardConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    match url::Url::parse(&config.base_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => issues.push(format!(
            "base_url must use http or https (got {})",
            parsed.scheme()
        )),
        Err(e) => issues.push(format!("base_url is not a valid URL: {e}")),
    }

    if config.cache_ttl_secs == 0 {
        issues.push("cache_ttl_secs must be > 0".into());
    }
    if config.request_timeout_secs == Some(0) {
        issues.push("request_timeout_secs must be > 0 when set".into());
    }
    if config.refresh_interval_secs == 0 {
        issues.push("refresh_interval_secs must be > 0".into());
    }
    if config.board_size == 0 {
        issues.push("board_size must be > 0".into());
    }
    if config.max_requests_per_sec == 0 {
        issues.push("max_requests_per_sec must be > 0".into());
    }
    if !is_park_reference(&config.default_park) {
        issues.push(format!(
            "default_park '{}' is neither a known park nor an entity id",
            config.default_park
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load board configuration from environment and optional config file.
pub fn load_config() -> Result<BoardConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = BoardConfig::default();

    // 3. Try loading the config file if it exists.
    let config_path = std::env::var("WAIT_BOARD_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config_path = Path::new(&config_path);
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(raw) = std::env::var("THEMEPARKS_API_BASE_URL") {
        let normalized = normalize_base_url(&raw);
        if normalized.is_empty() {
            tracing::warn!("Ignoring empty THEMEPARKS_API_BASE_URL override");
        } else {
            tracing::info!("Using THEMEPARKS_API_BASE_URL override: {}", normalized);
            config.base_url = normalized;
        }
    }
    if let Ok(raw) = std::env::var("WAIT_BOARD_CACHE_TTL_SECS") {
        config.cache_ttl_secs = parse_positive_u64(&raw, "WAIT_BOARD_CACHE_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("WAIT_BOARD_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = Some(parse_positive_u64(
            &raw,
            "WAIT_BOARD_REQUEST_TIMEOUT_SECS",
        )?);
    }
    if let Ok(raw) = std::env::var("WAIT_BOARD_REFRESH_SECS") {
        config.refresh_interval_secs = parse_positive_u64(&raw, "WAIT_BOARD_REFRESH_SECS")?;
    }
    if let Ok(raw) = std::env::var("WAIT_BOARD_MAX_REQUESTS_PER_SEC") {
        config.max_requests_per_sec = parse_request_budget(&raw)?;
    }
    if let Ok(park) = std::env::var("WAIT_BOARD_DEFAULT_PARK") {
        config.default_park = park.trim().to_string();
    }

    config.base_url = normalize_base_url(&config.base_url);
    validate_config(&config)?;

    Ok(config)
}
