use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// All key-value pairs of one storage namespace.
pub type Bucket = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Header names the client knows about. Any other name can still be used as
/// a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownHeader {
    ContentType,
    Authorization,
    AcceptLanguage,
    UserAgent,
    AcceptEncoding,
    CacheControl,
    Pragma,
    Expire,
    KeepAlive,
    IfModifiedSince,
    IfNoneMatch,
    Connection,
    Date,
    TransferEncoding,
    Upgrade,
    Via,
    Warning,
    WwwAuthenticate,
    AccessControlAllowOrigin,
    AccessControlAllowCredentials,
    AccessControlExposeHeaders,
    AccessControlMaxAge,
    AccessControlAllowMethods,
    AccessControlAllowHeaders,
    Origin,
    AcceptCharset,
    XFrameOptions,
    XXssProtection,
    ContentSecurityPolicy,
    StrictTransportSecurity,
    XContentTypeOptions,
    ReferrerPolicy,
}

impl KnownHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownHeader::ContentType => "Content-Type",
            KnownHeader::Authorization => "Authorization",
            KnownHeader::AcceptLanguage => "Accept-Language",
            KnownHeader::UserAgent => "User-Agent",
            KnownHeader::AcceptEncoding => "Accept-Encoding",
            KnownHeader::CacheControl => "Cache-Control",
            KnownHeader::Pragma => "Pragma",
            KnownHeader::Expire => "Expire",
            KnownHeader::KeepAlive => "Keep-Alive",
            KnownHeader::IfModifiedSince => "If-Modified-Since",
            KnownHeader::IfNoneMatch => "If-None-Match",
            KnownHeader::Connection => "Connection",
            KnownHeader::Date => "Date",
            KnownHeader::TransferEncoding => "Transfer-Encoding",
            KnownHeader::Upgrade => "Upgrade",
            KnownHeader::Via => "Via",
            KnownHeader::Warning => "Warning",
            KnownHeader::WwwAuthenticate => "WWW-Authenticate",
            KnownHeader::AccessControlAllowOrigin => "Access-Control-Allow-Origin",
            KnownHeader::AccessControlAllowCredentials => "Access-Control-Allow-Credentials",
            KnownHeader::AccessControlExposeHeaders => "Access-Control-Expose-Headers",
            KnownHeader::AccessControlMaxAge => "Access-Control-Max-Age",
            KnownHeader::AccessControlAllowMethods => "Access-Control-Allow-Methods",
            KnownHeader::AccessControlAllowHeaders => "Access-Control-Allow-Headers",
            KnownHeader::Origin => "Origin",
            KnownHeader::AcceptCharset => "Accept-Charset",
            KnownHeader::XFrameOptions => "X-Frame-Options",
            KnownHeader::XXssProtection => "X-XSS-Protection",
            KnownHeader::ContentSecurityPolicy => "Content-Security-Policy",
            KnownHeader::StrictTransportSecurity => "Strict-Transport-Security",
            KnownHeader::XContentTypeOptions => "X-Content-Type-Options",
            KnownHeader::ReferrerPolicy => "Referrer-Policy",
        }
    }
}

impl AsRef<str> for KnownHeader {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    MultipartFormData,
    ApplicationJson,
    TextHtml,
    TextPlain,
    ApplicationXhtmlXml,
    ApplicationXml,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::MultipartFormData => "multipart/form-data",
            ContentType::ApplicationJson => "application/json",
            ContentType::TextHtml => "text/html",
            ContentType::TextPlain => "text/plain",
            ContentType::ApplicationXhtmlXml => "application/xhtml+xml",
            ContentType::ApplicationXml => "application/xml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheControl {
    NoCache,
    NoStore,
    MaxAge,
    MustRevalidate,
}

impl CacheControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheControl::NoCache => "no-cache",
            CacheControl::NoStore => "no-store",
            CacheControl::MaxAge => "max-age",
            CacheControl::MustRevalidate => "must-revalidate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Close,
    KeepAlive,
}

impl Connection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connection::Close => "close",
            Connection::KeepAlive => "keep-alive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    Chunked,
}

impl TransferEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferEncoding::Chunked => "chunked",
        }
    }
}

/// A header value is either text or a boolean flag (e.g. `Keep-Alive = true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Text(String),
    Flag(bool),
}

impl HeaderValue {
    pub fn to_wire(&self) -> String {
        match self {
            HeaderValue::Text(text) => text.clone(),
            HeaderValue::Flag(flag) => flag.to_string(),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Flag(value)
    }
}

impl From<ContentType> for HeaderValue {
    fn from(value: ContentType) -> Self {
        HeaderValue::Text(value.as_str().to_string())
    }
}

impl From<CacheControl> for HeaderValue {
    fn from(value: CacheControl) -> Self {
        HeaderValue::Text(value.as_str().to_string())
    }
}

impl From<Connection> for HeaderValue {
    fn from(value: Connection) -> Self {
        HeaderValue::Text(value.as_str().to_string())
    }
}

impl From<TransferEncoding> for HeaderValue {
    fn from(value: TransferEncoding) -> Self {
        HeaderValue::Text(value.as_str().to_string())
    }
}

/// Header mapping. Names keep the spelling they were last written with but
/// compare ignoring ASCII case, as on the wire: writing `authorization`
/// replaces an existing `Authorization`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, HeaderValue>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<HeaderValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<HeaderValue>) {
        let name = name.as_ref();
        self.0.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        let name = name.as_ref();
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<HeaderValue> {
        let name = name.as_ref();
        let key = self
            .0
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(name))?
            .clone();
        self.0.remove(&key)
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.get(name).is_some()
    }

    /// Overlays `other` on top of `self`; entries in `other` win by name.
    pub fn extend_from(&mut self, other: &Headers) {
        for (name, value) in &other.0 {
            self.insert(name, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HeaderValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, HeaderValue>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl<N: AsRef<str>, V: Into<HeaderValue>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_ignore_ascii_case() {
        let headers = Headers::new()
            .with("x-token", "lower")
            .with("X-Token", "upper");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-token"), Some(&HeaderValue::from("upper")));
        let (name, _) = headers.iter().next().unwrap();
        assert_eq!(name, "X-Token");
    }

    #[test]
    fn test_extend_from_overrides_other_spelling() {
        let mut base = Headers::new().with("authorization", "client");
        base.extend_from(&Headers::new().with(KnownHeader::Authorization, "call"));

        assert_eq!(base.len(), 1);
        assert_eq!(base.get("AUTHORIZATION"), Some(&HeaderValue::from("call")));
    }

    #[test]
    fn test_remove_matches_any_spelling() {
        let mut headers = Headers::new().with("content-type", "application/json");
        assert!(headers.contains(KnownHeader::ContentType));
        assert_eq!(
            headers.remove(KnownHeader::ContentType),
            Some(HeaderValue::from("application/json"))
        );
        assert!(headers.is_empty());
    }

    #[test]
    fn test_extend_from_overrides_by_name() {
        let mut base = Headers::new()
            .with(KnownHeader::ContentType, ContentType::ApplicationJson)
            .with(KnownHeader::Authorization, "Bearer old");
        let overlay = Headers::new()
            .with(KnownHeader::Authorization, "Bearer new")
            .with(KnownHeader::KeepAlive, true);

        base.extend_from(&overlay);

        assert_eq!(
            base.get("Content-Type"),
            Some(&HeaderValue::from("application/json"))
        );
        assert_eq!(
            base.get("Authorization"),
            Some(&HeaderValue::from("Bearer new"))
        );
        assert_eq!(base.get("Keep-Alive"), Some(&HeaderValue::Flag(true)));
    }

    #[test]
    fn test_header_value_wire_format() {
        assert_eq!(HeaderValue::Flag(false).to_wire(), "false");
        assert_eq!(HeaderValue::from(CacheControl::NoStore).to_wire(), "no-store");
        assert_eq!(HeaderValue::from(Connection::KeepAlive).to_wire(), "keep-alive");
        assert_eq!(HeaderValue::from(TransferEncoding::Chunked).to_wire(), "chunked");
    }

    #[test]
    fn test_headers_deserialize_text_and_flags() {
        let headers: Headers =
            serde_json::from_value(serde_json::json!({"Authorization": "abc", "Keep-Alive": true}))
                .unwrap();

        assert_eq!(headers.get(KnownHeader::Authorization), Some(&HeaderValue::from("abc")));
        assert_eq!(headers.get(KnownHeader::KeepAlive), Some(&HeaderValue::Flag(true)));
    }

    #[test]
    fn test_http_method_names() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
    }
}
