mod e2e_utils;

use std::sync::Arc;

use e2e_utils::{multi_thread_runtime, temp_path, PacServer};
use proxyselect::domain::ProxyError;
use proxyselect::{Config, ProxyResolver, Resolution};

const PAC: &str = r#"
function FindProxyForURL(url, host) {
    if (isPlainHostName(host)) {
        return "DIRECT";
    }
    if (shExpMatch(host, "*.socks.test")) {
        return "SOCKS5 socks.example.com:1081";
    }
    return "DIRECT; PROXY proxy.example.com:8080";
}
"#;

fn resolver_for(config: Config) -> ProxyResolver {
    let runtime = multi_thread_runtime();
    let selector = runtime
        .block_on(config.build_selector())
        .expect("Selector should build");
    ProxyResolver::new(Arc::new(selector))
}

fn pac_resolver() -> ProxyResolver {
    let runtime = multi_thread_runtime();
    let selector = runtime
        .block_on(async {
            let server = PacServer::start(200, PAC).await.expect("Failed to start PAC server");
            let config = Config {
                use_environment: false,
                pac_url: Some(server.url()),
                no_proxy: vec!["bypass.example.com".into()],
                ..Config::default()
            };
            config.build_selector().await
        })
        .expect("Selector should build");
    ProxyResolver::new(Arc::new(selector))
}

#[test]
fn test_pac_skip_direct_then_select_proxy() {
    let resolver = pac_resolver();

    assert_eq!(
        resolver.resolve("https://example.com/path?q=1").as_deref(),
        Some("HTTP://proxy.example.com:8080")
    );
    assert_eq!(
        resolver.resolve("https://api.socks.test/").as_deref(),
        Some("SOCKS://socks.example.com:1081")
    );
}

#[test]
fn test_pac_direct_only_and_no_proxy_are_absent() {
    let resolver = pac_resolver();

    assert_eq!(resolver.resolve("http://intranet/"), None);
    assert_eq!(resolver.resolve("https://www.bypass.example.com/"), None);
    assert_eq!(
        resolver.resolve_detailed("http://intranet/"),
        Resolution::Unavailable(ProxyError::NoAddressedCandidate)
    );
}

#[test]
fn test_malformed_uri_is_absent() {
    let resolver = pac_resolver();

    assert_eq!(resolver.resolve("ht!tp://"), None);
    assert_eq!(resolver.resolve(""), None);
}

#[test]
fn test_repeated_resolution_is_identical() {
    let resolver = pac_resolver();

    let first = resolver.resolve("https://example.com/");
    let second = resolver.resolve("https://example.com/");

    assert_eq!(first, second);
    assert!(first.is_some());
}

#[test]
fn test_manual_proxy_from_config_file() {
    let path = temp_path("toml");
    std::fs::write(
        &path,
        "use_environment = false\nproxy = \"http://manual.example.com:3128\"\nno_proxy = [\"localhost\"]\n",
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).expect("Config should load");
    let resolver = resolver_for(config);

    assert_eq!(
        resolver.resolve("https://example.com/").as_deref(),
        Some("HTTP://manual.example.com:3128")
    );
    assert_eq!(resolver.resolve("http://localhost:8080/"), None);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_nothing_configured_is_absent() {
    let resolver = resolver_for(Config {
        use_environment: false,
        ..Config::default()
    });

    assert_eq!(resolver.resolve("https://example.com/"), None);
}

#[test]
fn test_unreachable_pac_keeps_manual_proxy() {
    let runtime = multi_thread_runtime();
    let config = Config {
        use_environment: false,
        proxy: Some("socks5://fallback.example.com:1080".into()),
        pac_url: Some("/nonexistent/proxyselect/proxy.pac".into()),
        ..Config::default()
    };

    let selector = runtime.block_on(config.build_selector()).expect("Selector should build");
    assert!(!selector.is_complete());

    let resolver = ProxyResolver::new(Arc::new(selector));
    assert_eq!(
        resolver.resolve("https://example.com/").as_deref(),
        Some("SOCKS://fallback.example.com:1080")
    );
}
