/// The scheme marker of a TLS endpoint.
const TLS_SCHEME: &str = "ssl://";

/// Separates the scheme from the rest of an endpoint.
const SCHEME_SEPARATOR: &str = "://";

/// Resolves a node endpoint descriptor into a base URL usable for plain HTTP calls.
///
/// - `ssl://host:port` becomes `https://host:port`.
/// - An endpoint without a scheme is prefixed with `http://`.
/// - Any other scheme (`tcp://`, `http://`, ...) is replaced by `http`.
///
/// The endpoint is not validated: a malformed descriptor yields an unusable URL instead of an
/// error.
pub fn resolve_base_url(endpoint: &str) -> String {
    if let Some(rest) = endpoint.strip_prefix(TLS_SCHEME) {
        return format!("https://{rest}")
    }

    match endpoint.find(SCHEME_SEPARATOR) {
        Some(pos) => format!("http{}", &endpoint[pos..]),
        None => format!("http://{endpoint}"),
    }
}
