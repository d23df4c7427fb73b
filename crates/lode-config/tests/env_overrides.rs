use figment::Jail;
use lode_config::{ConfigError, LodeConfig};

#[test]
fn env_overrides_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("LODESTAR_RETRIEVAL__API_KEY", "sk_from_env");
        jail.set_env("LODESTAR_PIPELINE__ESCALATION_BUDGET", "1");
        jail.set_env("LODESTAR_CACHE__MAX_PAYLOAD_BYTES", "1024");

        let config = LodeConfig::load().expect("config loads");
        assert_eq!(config.retrieval.api_key, "sk_from_env");
        assert_eq!(config.pipeline.escalation_budget, 1);
        assert_eq!(config.cache.max_payload_bytes, 1024);
        Ok(())
    });
}

#[test]
fn project_toml_is_layered_under_env() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(jail.directory().join(".lodestar")).expect("create .lodestar");
        jail.create_file(
            ".lodestar/config.toml",
            r#"
            [retrieval]
            model = "from-toml"
            timeout_secs = 30

            [sanity]
            strength_sentinels = [7.5, 5.0]
            "#,
        )?;
        jail.set_env("LODESTAR_RETRIEVAL__TIMEOUT_SECS", "45");

        let config = LodeConfig::load().expect("config loads");
        assert_eq!(config.retrieval.model, "from-toml");
        assert_eq!(config.retrieval.timeout_secs, 45);
        assert_eq!(config.sanity.strength_sentinels, vec![7.5, 5.0]);
        Ok(())
    });
}

#[test]
fn out_of_range_budget_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.set_env("LODESTAR_PIPELINE__ESCALATION_BUDGET", "50");
        let err = LodeConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

#[test]
fn absurd_cache_ttl_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.set_env("LODESTAR_CACHE__TTL_SECS", "999999999999");
        let err = LodeConfig::load().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "cache.ttl_secs")
        );
        Ok(())
    });
}
