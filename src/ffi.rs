//! C ABI used by native HTTP client plugins.
//!
//! ```c
//! char *proxy = proxyselect_resolve("https://example.com/");
//! if (proxy != NULL) {
//!     /* "HTTP://proxy.example.com:8080" */
//!     proxyselect_string_free(proxy);
//! }
//! ```
//!
//! The process-wide resolver is built on first use from the default
//! configuration and kept once every configured source has loaded. Calls
//! block while the configured sources are queried.

use std::ffi::{c_char, CStr, CString};
use std::panic;
use std::ptr;
use std::sync::{Arc, Once, OnceLock};
use std::thread;

use log::{debug, warn};

use crate::adapters::{EnvProxySelector, SystemProxySelector};
use crate::config::Config;
use crate::domain::{ProxyError, ProxyResolver, Result};
use crate::logging;

static RESOLVER: OnceLock<ProxyResolver> = OnceLock::new();
static LOGGING: Once = Once::new();

/// Run `f` with the cached resolver, building one first when needed.
///
/// Only a complete selector is cached: after a degraded build the next call
/// builds again.
fn with_resolver<T>(
    slot: &OnceLock<ProxyResolver>,
    build: impl FnOnce() -> SystemProxySelector,
    f: impl FnOnce(&ProxyResolver) -> T,
) -> T {
    if let Some(resolver) = slot.get() {
        return f(resolver);
    }

    let selector = build();
    if selector.is_complete() {
        f(slot.get_or_init(|| ProxyResolver::new(Arc::new(selector))))
    } else {
        debug!("Proxy sources incomplete, rebuilding on next call");
        f(&ProxyResolver::new(Arc::new(selector)))
    }
}

fn default_selector() -> SystemProxySelector {
    match Config::load(None).and_then(build_selector_blocking) {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Falling back to environment proxies: {}", e);
            SystemProxySelector::new()
                .with_source("environment", Arc::new(EnvProxySelector::from_env()))
                .with_missing_source("configuration")
        }
    }
}

fn build_selector_blocking(config: Config) -> Result<SystemProxySelector> {
    // The caller may itself be running inside an async runtime.
    thread::spawn(move || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProxyError::ConfigError(format!("runtime: {}", e)))?
            .block_on(config.build_selector())
    })
    .join()
    .map_err(|_| ProxyError::ConfigError("selector initialisation panicked".into()))?
}

/// # Safety
///
/// `uri` must be NULL or point to a NUL-terminated string that outlives `'a`.
unsafe fn uri_arg<'a>(uri: *const c_char) -> Option<&'a str> {
    if uri.is_null() {
        return None;
    }

    match unsafe { CStr::from_ptr(uri) }.to_str() {
        Ok(uri) => Some(uri),
        Err(e) => {
            debug!("Ignoring non UTF-8 URI: {}", e);
            None
        }
    }
}

fn resolve_to_c(resolver: &ProxyResolver, uri: &str) -> *mut c_char {
    match resolver.resolve(uri).map(CString::new) {
        Some(Ok(proxy)) => proxy.into_raw(),
        _ => ptr::null_mut(),
    }
}

/// Send logs to stderr, filtered by `RUST_LOG` (default `proxyselect=warn`).
///
/// Returns false when the process already installed its own `tracing`
/// subscriber; records then go there. [`proxyselect_resolve`] calls this
/// on first use.
#[no_mangle]
pub extern "C" fn proxyselect_init_logging() -> bool {
    let mut installed = false;
    LOGGING.call_once(|| installed = logging::init("warn"));
    installed
}

/// Resolve the proxy for `uri`.
///
/// Returns a string to release with [`proxyselect_string_free`], or NULL
/// when no proxy applies or resolution failed.
///
/// # Safety
///
/// `uri` must be NULL or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn proxyselect_resolve(uri: *const c_char) -> *mut c_char {
    proxyselect_init_logging();

    let Some(uri) = (unsafe { uri_arg(uri) }) else {
        return ptr::null_mut();
    };

    panic::catch_unwind(|| with_resolver(&RESOLVER, default_selector, |resolver| resolve_to_c(resolver, uri)))
        .unwrap_or_else(|_| {
            warn!("Proxy resolution panicked");
            ptr::null_mut()
        })
}

/// Release a string returned by [`proxyselect_resolve`]. NULL is ignored.
///
/// # Safety
///
/// `proxy` must come from [`proxyselect_resolve`] and not have been freed yet.
#[no_mangle]
pub unsafe extern "C" fn proxyselect_string_free(proxy: *mut c_char) {
    if !proxy.is_null() {
        drop(unsafe { CString::from_raw(proxy) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProxyCandidate;
    use crate::ports::ProxySelectorPort;
    use std::cell::Cell;
    use url::Url;
    use uuid::Uuid;

    struct MockSelector(Vec<ProxyCandidate>);

    impl ProxySelectorPort for MockSelector {
        fn select(&self, _: &Url) -> Result<Vec<ProxyCandidate>> {
            Ok(self.0.clone())
        }
    }

    fn take(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let value = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        unsafe { proxyselect_string_free(ptr) };
        Some(value)
    }

    #[test]
    fn test_resolve_to_c_returns_owned_string() {
        let resolver = ProxyResolver::new(Arc::new(MockSelector(vec![
            ProxyCandidate::direct(),
            ProxyCandidate::http("proxy.example.com", 8080),
        ])));

        let proxy = take(resolve_to_c(&resolver, "https://example.com/"));

        assert_eq!(proxy.as_deref(), Some("HTTP://proxy.example.com:8080"));
    }

    #[test]
    fn test_resolve_to_c_absent_is_null() {
        let resolver = ProxyResolver::new(Arc::new(MockSelector(vec![ProxyCandidate::direct()])));

        assert!(resolve_to_c(&resolver, "https://example.com/").is_null());
        assert!(resolve_to_c(&resolver, "ht!tp://").is_null());
    }

    #[test]
    fn test_uri_arg_rejects_bad_input() {
        let invalid_utf8 = [0xffu8, 0xfe, 0x00];
        let valid = CString::new("https://example.com/").unwrap();

        assert_eq!(unsafe { uri_arg(ptr::null()) }, None);
        assert_eq!(unsafe { uri_arg(invalid_utf8.as_ptr() as *const c_char) }, None);
        assert_eq!(unsafe { uri_arg(valid.as_ptr()) }, Some("https://example.com/"));
    }

    #[test]
    fn test_public_entry_points_accept_null() {
        assert!(unsafe { proxyselect_resolve(ptr::null()) }.is_null());
        unsafe { proxyselect_string_free(ptr::null_mut()) };
    }

    #[test]
    fn test_complete_selector_is_cached() {
        let slot = OnceLock::new();
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            SystemProxySelector::new().with_source("manual", Arc::new(MockSelector(vec![ProxyCandidate::http("p", 1)])))
        };

        for _ in 0..3 {
            let proxy = with_resolver(&slot, build, |resolver| resolver.resolve("http://example.com/"));
            assert_eq!(proxy.as_deref(), Some("HTTP://p:1"));
        }

        assert_eq!(builds.get(), 1);
        assert!(slot.get().is_some());
    }

    #[test]
    fn test_unavailable_pac_is_retried() {
        let path = std::env::temp_dir().join(format!("proxyselect-{}.pac", Uuid::new_v4()));
        let config = Config {
            use_environment: false,
            proxy: None,
            pac_url: Some(path.to_string_lossy().into_owned()),
            no_proxy: vec!["localhost".into()],
        };
        let slot = OnceLock::new();
        let resolve = |uri: &str| {
            with_resolver(
                &slot,
                || build_selector_blocking(config.clone()).unwrap(),
                |resolver| resolver.resolve(uri),
            )
        };

        assert_eq!(resolve("http://example.com/"), None);
        assert!(slot.get().is_none());

        std::fs::write(&path, r#"function FindProxyForURL(url, host) { return "PROXY pac.example.com:3128"; }"#).unwrap();

        assert_eq!(resolve("http://example.com/").as_deref(), Some("HTTP://pac.example.com:3128"));
        assert_eq!(resolve("http://localhost/"), None);
        assert!(slot.get().is_some());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_logging_is_installed_once() {
        proxyselect_init_logging();

        assert!(!proxyselect_init_logging());
    }
}
