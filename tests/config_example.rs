//! The shipped example configuration must always load and validate.

use std::path::Path;

use faq_relay::config::load_config;

#[test]
fn example_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/faqr.example.toml");
    let config = load_config(&path).expect("example config should load");

    assert_eq!(config.matching.threshold, 0.7);
    assert_eq!(config.matching.token_metric, "overlap");
    assert_eq!(config.fallback.provider, "disabled");
    assert_eq!(config.provenance.persist_generated, "append");
    assert_eq!(config.server.bind, "127.0.0.1:7307");

    // defaults fill in what the example omits
    assert_eq!(config.store.base_url, "https://sheets.googleapis.com");
}

#[test]
fn example_config_builds_engine_options() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/faqr.example.toml");
    let config = load_config(&path).expect("example config should load");
    let opts = config
        .engine_options()
        .expect("example config should build engine options");
    assert_eq!(opts.threshold, 0.7);
}
