//! Tests for configuration loading
//!
//! These tests cover provider lookups, `WB_*` defaults and validation.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;
    use std::time::Duration;

    use crate::config::{
        ConfigProvider, ConfigProviderExt, EnvConfigProvider, Environment, LogLevel,
        MemoryConfigProvider, SellerApiConfig,
    };
    use crate::core::ApiSurface;
    use crate::error::SdkError;
    use crate::tests::support::SELLER_KEY;

    fn provider(values: &[(&str, &str)]) -> MemoryConfigProvider {
        MemoryConfigProvider::with_values(
            values
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("max_retries", 5);
        provider.set("timeout", "45s");

        assert_eq!(provider.get_int("max_retries").unwrap(), 5);
        assert_eq!(provider.get_duration("timeout").unwrap(), Duration::from_secs(45));
        assert!(provider.get_string("missing").is_err());
        assert_eq!(provider.get_string_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_env_config_provider_uses_prefix() {
        env::set_var("SELLERSDKCFG_MAX_RETRIES", "7");
        env::set_var("SELLERSDKCFG_RETRY_BASE_DELAY", "250ms");

        let provider = EnvConfigProvider::new().with_prefix("SELLERSDKCFG");
        assert_eq!(provider.get_int("max_retries").unwrap(), 7);
        assert_eq!(provider.get_int("max-retries").unwrap(), 7);
        assert_eq!(
            provider.get_duration("retry_base_delay").unwrap(),
            Duration::from_millis(250)
        );
        assert!(provider.get_string("not_set_anywhere").is_err());

        env::remove_var("SELLERSDKCFG_MAX_RETRIES");
        env::remove_var("SELLERSDKCFG_RETRY_BASE_DELAY");
    }

    #[test]
    fn test_defaults() {
        let config = SellerApiConfig::from_provider(&provider(&[("api_token", SELLER_KEY)])).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay, Duration::from_millis(1000));
        assert_eq!(config.retry.max_delay, Duration::from_secs(30));
        assert_eq!(config.timeouts.default, Duration::from_secs(30));
        assert_eq!(config.timeouts.upload, Duration::from_secs(120));
        for surface in ApiSurface::ALL {
            assert_eq!(config.endpoints.url_for(surface), surface.default_base_url());
        }
    }

    #[test]
    fn test_overrides() {
        let config = SellerApiConfig::from_provider(&provider(&[
            ("api_token", SELLER_KEY),
            ("environment", "production"),
            ("log_level", "debug"),
            ("log_dir", "/var/log/seller"),
            ("content_api_base_url", "http://localhost:9000"),
            ("rate_limit_max_requests", "10"),
            ("rate_limit_window", "1m"),
            ("max_retries", "5"),
            ("retry_base_delay", "500ms"),
            ("retry_max_delay", "10s"),
            ("upload_timeout", "5m"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.endpoints.content, "http://localhost:9000");
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(500));
        assert_eq!(config.timeouts.upload, Duration::from_secs(300));

        let logging = config.logging_config();
        assert!(logging.json_format);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.log_dir.as_deref(), Some("/var/log/seller"));
    }

    #[test]
    fn test_token_required() {
        let err = SellerApiConfig::from_provider(&provider(&[])).unwrap_err();
        assert!(err.to_string().contains("WB_API_TOKEN"));

        let err = SellerApiConfig::from_provider(&provider(&[("api_token", "  ")])).unwrap_err();
        assert!(matches!(err, SdkError::Configuration(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases: [&[(&str, &str)]; 5] = [
            &[("api_token", SELLER_KEY), ("environment", "staging")],
            &[("api_token", SELLER_KEY), ("max_retries", "many")],
            &[("api_token", SELLER_KEY), ("rate_limit_window", "0s")],
            &[("api_token", SELLER_KEY), ("retry_base_delay", "1m"), ("retry_max_delay", "1s")],
            &[("api_token", SELLER_KEY), ("api_base_url", "not a url")],
        ];

        for values in cases {
            let result = SellerApiConfig::from_provider(&provider(values));
            assert!(matches!(result, Err(SdkError::Configuration(_))), "{:?}", values);
        }
    }

    #[test]
    fn test_debug_hides_token() {
        let config = SellerApiConfig::new(SELLER_KEY);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(SELLER_KEY));
        assert!(rendered.contains("REDACTED"));
    }
}
