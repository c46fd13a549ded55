//! Process-wide system proxy detection switch.
//!
//! Until detection is enabled, [`SystemProxySelector`](crate::adapters::SystemProxySelector)
//! ignores every configured source and answers `DIRECT`. Enabling is one-way:
//! there is no call to turn detection back off.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static DETECTION_INIT: Once = Once::new();
static DETECTION_ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn on system proxy detection for the whole process. Idempotent.
pub fn enable_system_proxies() {
    DETECTION_INIT.call_once(|| {
        DETECTION_ENABLED.store(true, Ordering::SeqCst);
        log::debug!("System proxy detection enabled");
    });
}

pub fn system_proxies_enabled() -> bool {
    DETECTION_ENABLED.load(Ordering::SeqCst)
}
