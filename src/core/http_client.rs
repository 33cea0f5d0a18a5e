use crate::config::{ClientConfig, RequestConfig};
use crate::domain::model::{ContentType, Headers, HttpMethod, KnownHeader};
use crate::utils::error::{Result, StoreFetchError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue as WireValue};
use reqwest::multipart::Form;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Request data. `Form` is sent as `multipart/form-data` and lets the
/// transport pick the boundary; everything else is JSON.
#[derive(Debug)]
pub enum Payload {
    Json(serde_json::Value),
    Form(Form),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        Ok(Payload::Json(serde_json::to_value(data)?))
    }

    pub fn is_form_data(&self) -> bool {
        matches!(self, Payload::Form(_))
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

impl From<Form> for Payload {
    fn from(form: Form) -> Self {
        Payload::Form(form)
    }
}

#[derive(Debug)]
pub enum RequestBody {
    Json(String),
    Multipart(Form),
}

/// Everything needed to issue one request.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<RequestBody>,
}

impl RequestDescriptor {
    pub fn json_body(&self) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Json(text)) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    headers: Headers,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Uses a preconfigured `reqwest::Client` as the transport.
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
            headers: config.headers.unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        custom_config: Option<&RequestConfig>,
    ) -> Result<T> {
        self.request(HttpMethod::Get, endpoint, None, custom_config)
            .await
    }

    pub async fn post<T: DeserializeOwned, P: Into<Payload>>(
        &self,
        endpoint: &str,
        data: P,
        custom_config: Option<&RequestConfig>,
    ) -> Result<T> {
        self.request(HttpMethod::Post, endpoint, Some(data.into()), custom_config)
            .await
    }

    pub async fn put<T: DeserializeOwned, P: Into<Payload>>(
        &self,
        endpoint: &str,
        data: P,
        custom_config: Option<&RequestConfig>,
    ) -> Result<T> {
        self.request(HttpMethod::Put, endpoint, Some(data.into()), custom_config)
            .await
    }

    pub async fn remove<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        custom_config: Option<&RequestConfig>,
    ) -> Result<T> {
        self.request(HttpMethod::Delete, endpoint, None, custom_config)
            .await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Option<Payload>,
        custom_config: Option<&RequestConfig>,
    ) -> Result<T> {
        let descriptor = self.build_request(method, endpoint, data, custom_config)?;
        self.execute(descriptor).await
    }

    /// Resolves URL, headers and body for one call without touching the
    /// network.
    ///
    /// Headers are layered `Content-Type: application/json`, then the
    /// client's defaults, then the per-call headers; later layers win by
    /// name, ignoring ASCII case. A form payload drops `Content-Type` in any
    /// spelling.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Option<Payload>,
        custom_config: Option<&RequestConfig>,
    ) -> Result<RequestDescriptor> {
        let base_url = custom_config
            .and_then(|c| c.base_url.as_deref())
            .unwrap_or(&self.base_url);

        let mut headers =
            Headers::new().with(KnownHeader::ContentType, ContentType::ApplicationJson);
        headers.extend_from(&self.headers);
        if let Some(custom_headers) = custom_config.and_then(|c| c.headers.as_ref()) {
            headers.extend_from(custom_headers);
        }

        let body = match data {
            Some(Payload::Form(form)) => {
                headers.remove(KnownHeader::ContentType);
                Some(RequestBody::Multipart(form))
            }
            Some(Payload::Json(value)) => Some(RequestBody::Json(serde_json::to_string(&value)?)),
            None => None,
        };

        Ok(RequestDescriptor {
            method,
            url: format!("{}{}", base_url, endpoint),
            headers,
            body,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let RequestDescriptor {
            method,
            url,
            headers,
            body,
        } = descriptor;

        tracing::debug!("📡 {} {}", method, url);

        let mut request = self
            .client
            .request(method.into(), &url)
            .headers(to_header_map(&headers)?);

        request = match body {
            Some(RequestBody::Json(text)) => request.body(text),
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            None => request,
        };

        let response = request.send().await?;
        tracing::debug!("📡 {} {} -> {}", method, url, response.status());

        if !response.status().is_success() {
            return Err(StoreFetchError::StatusError(Box::new(response)));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(StoreFetchError::DecodeError)
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| StoreFetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value =
            WireValue::from_str(&value.to_wire()).map_err(|e| StoreFetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
