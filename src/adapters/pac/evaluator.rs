use crate::domain::{ProxyCandidate, ProxyError, ProxyType, Result, SocketAddress};
use boa_engine::{js_string, Context, JsString, JsValue, Source};
use log::warn;
use url::Url;

const PAC_UTILS: &str = include_str!("pac_utils.js");

/// Evaluate a PAC file to get the ordered proxy candidates for a target URL
pub fn evaluate_pac(pac_file: &str, url: &Url) -> Result<Vec<ProxyCandidate>> {
    let host = url
        .host_str()
        .ok_or_else(|| ProxyError::InvalidUri(format!("Missing host in {}", url)))?;

    let directives = run_find_proxy(pac_file, url.as_str(), host)?;
    Ok(parse_pac_result(&directives))
}

fn run_find_proxy(pac_file: &str, url: &str, host: &str) -> Result<String> {
    let mut context = Context::default();
    let pac_payload = format!("{}\n{}", PAC_UTILS, pac_file);

    context
        .eval(Source::from_bytes(pac_payload.as_bytes()))
        .map_err(|e| ProxyError::PacEvaluationFailed(format!("PAC script error: {}", e)))?;

    let find_proxy = context
        .global_object()
        .get(js_string!("FindProxyForURL"), &mut context)
        .map_err(|e| ProxyError::PacEvaluationFailed(format!("PAC script error: {}", e)))?;
    let find_proxy = find_proxy
        .as_callable()
        .ok_or_else(|| ProxyError::PacEvaluationFailed("FindProxyForURL is not a function".into()))?;

    let args = [JsValue::from(JsString::from(url)), JsValue::from(JsString::from(host))];
    let result = find_proxy
        .call(&JsValue::undefined(), &args, &mut context)
        .map_err(|e| ProxyError::PacEvaluationFailed(format!("PAC execution error: {}", e)))?;

    if result.is_null_or_undefined() {
        return Ok(String::new());
    }

    let directives = result
        .to_string(&mut context)
        .map_err(|e| ProxyError::PacEvaluationFailed(format!("PAC result error: {}", e)))?;
    Ok(directives.to_std_string().unwrap_or_default())
}

/// Turn a `FindProxyForURL` answer such as `PROXY a:8080; SOCKS b:1080; DIRECT`
/// into candidates, keeping the order.
pub fn parse_pac_result(directives: &str) -> Vec<ProxyCandidate> {
    let candidates: Vec<ProxyCandidate> = directives
        .split(';')
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .filter_map(|v| match parse_directive(v) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!("Skipping PAC directive {:?}: {}", v, e);
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        vec![ProxyCandidate::direct()]
    } else {
        candidates
    }
}

fn parse_directive(directive: &str) -> Result<ProxyCandidate> {
    let parts: Vec<&str> = directive.split_whitespace().collect();
    let keyword = parts.first().map(|k| k.to_ascii_uppercase()).unwrap_or_default();

    let (kind, default_port) = match keyword.as_str() {
        "DIRECT" => return Ok(ProxyCandidate::direct()),
        "PROXY" | "HTTP" => (ProxyType::Http, 80),
        "HTTPS" => (ProxyType::Http, 443),
        "SOCKS" | "SOCKS4" | "SOCKS5" => (ProxyType::Socks, 1080),
        other => return Err(ProxyError::InvalidProxy(format!("Unknown PAC directive {}", other))),
    };

    let authority = parts
        .get(1)
        .ok_or_else(|| ProxyError::InvalidProxy(format!("{} without an address", keyword)))?;

    Ok(ProxyCandidate::with_address(kind, SocketAddress::parse(authority, default_port)?))
}
