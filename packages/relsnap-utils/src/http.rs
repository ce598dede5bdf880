use bytes::{Bytes, BytesMut};
use http_body_util::{BodyExt, Empty};
use hyper::{header, StatusCode, Uri};
#[cfg(not(feature = "rustls-platform-verifier"))]
use hyper_rustls::ConfigBuilderExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use once_cell::sync::Lazy;
use rustls::ClientConfig;
#[cfg(feature = "rustls-platform-verifier")]
use rustls_platform_verifier::BuilderVerifierExt;
use serde_json::Value;
use std::{collections::HashMap, error::Error, time::Duration};
use thiserror::Error;

use crate::config::FetchConfig;

const MAX_REDIRECTS: usize = 10;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("too many redirects starting from {url}")]
    TooManyRedirects { url: String },
    #[error("response body from {url} is not valid UTF-8")]
    Body {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("response body from {url} is not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("TLS configuration failed: {0}")]
    Tls(#[source] BoxError),
}

#[derive(Debug)]
pub struct ResponseData {
    pub status: u16,
    pub location: Option<String>,
    pub body: Option<Bytes>,
}

/// Fetches `url` following redirects, bounded by `timeout` for the whole exchange.
pub async fn get(
    url: &str,
    header_map: &HashMap<String, String>,
    timeout: Duration,
) -> Result<ResponseData, HttpError> {
    match tokio::time::timeout(timeout, follow_redirects(url, header_map)).await {
        Ok(result) => result,
        Err(_) => Err(HttpError::Timeout {
            url: url.to_string(),
            timeout,
        }),
    }
}

async fn follow_redirects(
    url: &str,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, HttpError> {
    let mut current = parse_uri(url)?;
    for _ in 0..=MAX_REDIRECTS {
        let rsp = if current.scheme_str() == Some("https") {
            https_get(current.clone(), header_map).await?
        } else {
            http_get(current.clone(), header_map).await?
        };
        tracing::debug!("GET {} -> {}", current, rsp.status);
        let is_redirect = StatusCode::from_u16(rsp.status).is_ok_and(|s| s.is_redirection());
        match rsp.location.as_deref() {
            Some(location) if is_redirect => {
                current = parse_uri(&join_location(&current, location))?;
            }
            _ => return Ok(rsp),
        }
    }
    Err(HttpError::TooManyRedirects {
        url: url.to_string(),
    })
}

fn parse_uri(url: &str) -> Result<Uri, HttpError> {
    url.parse::<Uri>().map_err(|e| HttpError::InvalidUrl {
        url: url.to_string(),
        source: Box::new(e),
    })
}

fn join_location(base: &Uri, location: &str) -> String {
    if location.contains("://") {
        return location.to_string();
    }
    let scheme = base.scheme_str().unwrap_or("http");
    let authority = base.authority().map_or("", |a| a.as_str());
    if location.starts_with('/') {
        format!("{}://{}{}", scheme, authority, location)
    } else {
        let path = base.path();
        let dir = &path[..path.rfind('/').map_or(0, |i| i + 1)];
        format!("{}://{}{}{}", scheme, authority, dir, location)
    }
}

pub async fn http_get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, HttpError> {
    let http = HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(http);
    send(&client, url, header_map).await
}

static PROVIDER: Lazy<std::sync::Arc<rustls::crypto::CryptoProvider>> =
    Lazy::new(|| std::sync::Arc::new(rustls::crypto::ring::default_provider()));

fn https_config() -> Result<hyper_rustls::HttpsConnector<HttpConnector>, HttpError> {
    let provider = PROVIDER.clone();
    let tls: rustls::ClientConfig;
    #[cfg(feature = "rustls-platform-verifier")]
    {
        tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| HttpError::Tls(Box::new(e)))?
            .with_platform_verifier()
            .map_err(|e| HttpError::Tls(Box::new(e)))?
            .with_no_client_auth();
    }
    #[cfg(all(feature = "webpki-roots", not(feature = "rustls-platform-verifier")))]
    {
        tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| HttpError::Tls(Box::new(e)))?
            .with_webpki_roots()
            .with_no_client_auth();
    }
    #[cfg(all(
        feature = "native-tokio",
        not(feature = "webpki-roots"),
        not(feature = "rustls-platform-verifier")
    ))]
    {
        tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| HttpError::Tls(Box::new(e)))?
            .with_native_roots()
            .map_err(|e| HttpError::Tls(Box::new(e)))?
            .with_no_client_auth();
    }
    #[cfg(all(
        not(feature = "native-tokio"),
        not(feature = "webpki-roots"),
        not(feature = "rustls-platform-verifier")
    ))]
    {
        compile_error!("No TLS backend enabled");
    }
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build())
}

pub async fn https_get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, HttpError> {
    let https = https_config()?;
    let client = Client::builder(TokioExecutor::new()).build(https);
    send(&client, url, header_map).await
}

async fn send<C>(
    client: &Client<C, Empty<Bytes>>,
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, HttpError>
where
    C: hyper_util::client::legacy::connect::Connect + Clone + Send + Sync + 'static,
{
    let transport = |e: BoxError| HttpError::Transport {
        url: url.to_string(),
        source: e,
    };
    let mut req = hyper::Request::builder().method("GET").uri(url.clone());
    for (key, value) in header_map {
        req = req.header(key, value);
    }
    let req = req
        .body(Empty::<Bytes>::new())
        .map_err(|e| transport(Box::new(e)))?;

    let mut res = client
        .request(req)
        .await
        .map_err(|e| transport(Box::new(e)))?;
    let status = res.status();
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut body = BytesMut::new();
    while let Some(next) = res.frame().await {
        let frame = next.map_err(|e| transport(Box::new(e)))?;
        if let Some(chunk) = frame.data_ref() {
            body.extend_from_slice(chunk);
        }
    }
    Ok(ResponseData {
        status: status.as_u16(),
        location,
        body: Some(body.freeze()),
    })
}

pub fn http_status_is_ok(status: u16) -> bool {
    StatusCode::from_u16(status).is_ok_and(|status| status.is_success())
}

fn request_headers(config: &FetchConfig) -> HashMap<String, String> {
    HashMap::from([("User-Agent".to_string(), config.user_agent.clone())])
}

/// GETs `url` (after reverse-proxy rewriting) and returns the body as text.
///
/// Any non-2xx status is an error.
pub async fn get_text(config: &FetchConfig, url: &str) -> Result<String, HttpError> {
    let url = config.resolve_url(url);
    let rsp = get(&url, &request_headers(config), config.timeout).await?;
    if !http_status_is_ok(rsp.status) {
        return Err(HttpError::Status {
            url,
            status: rsp.status,
        });
    }
    let body = rsp.body.unwrap_or_default();
    String::from_utf8(body.to_vec()).map_err(|source| HttpError::Body { url, source })
}

pub async fn get_json(config: &FetchConfig, url: &str) -> Result<Value, HttpError> {
    let text = get_text(config, url).await?;
    serde_json::from_str(&text).map_err(|source| HttpError::Json {
        url: url.to_string(),
        source,
    })
}

pub async fn get_json_with_query(
    config: &FetchConfig,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Value, HttpError> {
    get_json(config, &with_query(url, query)).await
}

pub fn with_query(url: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let encoded = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, encoded)
}
