use url::Url;

/// Extracts the (unsanitized) domain from a URL string
///
/// The URL is lower-cased before parsing, so the returned host is always
/// lowercase. The port is not part of the returned domain.
///
/// # Arguments
///
/// * `raw_url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain/host
/// * `None` - If the URL cannot be parsed or has no host
///
/// # Examples
///
/// ```
/// use favicon_collector::url::extract_domain;
///
/// assert_eq!(extract_domain("https://EXAMPLE.com/a"), Some("example.com".to_string()));
/// assert_eq!(extract_domain("https://www2.example.com:8080/"), Some("www2.example.com".to_string()));
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(raw_url: &str) -> Option<String> {
    let lowered = raw_url.trim().to_lowercase();
    let parsed = Url::parse(&lowered).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_string()),
        _ => None,
    }
}

/// Strips one leading `www` / `www<digits>` label from a domain
///
/// Only the first label is inspected, and only when something is left after
/// removing it. Labels such as `shop` or `wwwx` are kept.
///
/// # Examples
///
/// ```
/// use favicon_collector::url::sanitize_domain;
///
/// assert_eq!(sanitize_domain("www.example.com"), "example.com");
/// assert_eq!(sanitize_domain("www2.example.com"), "example.com");
/// assert_eq!(sanitize_domain("shop.example.com"), "shop.example.com");
/// ```
pub fn sanitize_domain(domain: &str) -> String {
    let Some((label, rest)) = domain.split_once('.') else {
        return domain.to_string();
    };

    let is_www_label = label
        .strip_prefix("www")
        .is_some_and(|suffix| suffix.bytes().all(|b| b.is_ascii_digit()));

    if is_www_label && !rest.is_empty() {
        rest.to_string()
    } else {
        domain.to_string()
    }
}

/// Extracts the sanitized domain used as deduplication and storage key
pub fn extract_sanitized_domain(raw_url: &str) -> Option<String> {
    extract_domain(raw_url).map(|domain| sanitize_domain(&domain))
}
