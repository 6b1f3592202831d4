use reqwest::{header::CONTENT_TYPE as CONTENT_TYPE_HEADER, Client};
use std::future::Future;
use tracing::{debug, warn};

use crate::errors::{Result, WebDavError};
use crate::models::XmlElement;
use crate::webdav_xml_parser::parse_document;
use super::config::WebDAVConfig;
use super::verbs::{is_accepted_status, overwrite_flag, ResponseKind, Verb, CONTENT_TYPE};

/// Response body as handed back to callers
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    /// Root element of a parsed XML response
    Xml(XmlElement),
}

impl Body {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Xml(_) => None,
        }
    }

    pub fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            Body::Xml(root) => Some(root),
            Body::Text(_) => None,
        }
    }
}

/// Per-call extras beyond the verb's fixed headers
#[derive(Debug, Default)]
pub struct RequestArgs {
    /// Destination URL and overwrite flag for MOVE / COPY
    pub destination: Option<(String, bool)>,
    pub body: Option<reqwest::Body>,
}

impl RequestArgs {
    pub fn destination(destination: impl Into<String>, overwrite: bool) -> Self {
        Self {
            destination: Some((destination.into(), overwrite)),
            body: None,
        }
    }

    pub fn body(data: impl Into<reqwest::Body>) -> Self {
        Self {
            destination: None,
            body: Some(data.into()),
        }
    }
}

/// Raw outcome of one HTTP exchange
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub reason: String,
    pub text: String,
}

impl Reply {
    pub fn is_accepted(&self) -> bool {
        is_accepted_status(self.status)
    }

    fn into_status_error(self) -> WebDavError {
        WebDavError::Status {
            code: self.status,
            message: self.reason,
            body: self.text,
        }
    }

    /// Decodes the body per the verb's response kind. Bodies that do not
    /// parse as XML stay text.
    pub fn into_body(self, kind: ResponseKind) -> Body {
        match kind {
            ResponseKind::Text => Body::Text(self.text),
            ResponseKind::Xml => match parse_document(&self.text) {
                Ok(root) => Body::Xml(root),
                Err(e) => {
                    debug!("Response is not an XML document: {}", e);
                    Body::Text(self.text)
                }
            },
        }
    }
}

/// Issues WebDAV requests. Every verb comes in an async form and a
/// `_blocking` form.
///
/// The async form reports statuses outside 200/201/207/102 as
/// [`WebDavError::Status`]. The blocking form returns the body whatever the
/// status was; only transport failures are errors there.
#[derive(Debug, Clone)]
pub struct WebDAVConnection {
    client: Client,
    config: WebDAVConfig,
}

impl WebDAVConnection {
    pub fn new(config: WebDAVConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(0);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WebDAVConfig {
        &self.config
    }

    /// Performs one HTTP exchange without judging the status
    pub async fn exchange(&self, verb: Verb, url: &str, args: RequestArgs) -> Result<Reply> {
        let spec = verb.spec();
        debug!("{} {}", verb, url);

        let mut request = self
            .client
            .request(verb.method()?, url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE);

        for (name, value) in spec.fixed_headers {
            request = request.header(*name, *value);
        }

        if spec.takes_destination {
            if let Some((destination, overwrite)) = args.destination {
                request = request
                    .header("Destination", destination)
                    .header("Overwrite", overwrite_flag(overwrite));
            }
        }

        if spec.sends_body {
            if let Some(body) = args.body {
                request = request.body(body);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        let text = response.text().await?;

        debug!("{} {} -> {}", verb, url, status.as_u16());

        Ok(Reply {
            status: status.as_u16(),
            reason,
            text,
        })
    }

    /// Generic async request: one exchange, status check, body decoding
    pub async fn request(&self, verb: Verb, url: &str, args: RequestArgs) -> Result<Body> {
        let reply = self.exchange(verb, url, args).await?;
        if !reply.is_accepted() {
            debug!("{} {} rejected with status {}", verb, url, reply.status);
            return Err(reply.into_status_error());
        }
        Ok(reply.into_body(verb.spec().response))
    }

    /// Generic blocking request. The status is not checked, so an error
    /// page comes back as an ordinary body.
    pub fn request_blocking(&self, verb: Verb, url: &str, args: RequestArgs) -> Result<Body> {
        let reply = block_on(self.exchange(verb, url, args))??;
        if !reply.is_accepted() {
            warn!(
                "{} {} returned status {} {}; blocking calls return the body anyway",
                verb, url, reply.status, reply.reason
            );
        }
        Ok(reply.into_body(verb.spec().response))
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.request(Verb::Get, url, RequestArgs::default()).await.map(into_text)
    }

    pub async fn propfind(&self, url: &str) -> Result<Body> {
        self.request(Verb::Propfind, url, RequestArgs::default()).await
    }

    pub async fn mkcol(&self, url: &str) -> Result<String> {
        self.request(Verb::Mkcol, url, RequestArgs::default()).await.map(into_text)
    }

    pub async fn delete(&self, url: &str) -> Result<String> {
        self.request(Verb::Delete, url, RequestArgs::default()).await.map(into_text)
    }

    pub async fn put(&self, url: &str, data: impl Into<reqwest::Body>) -> Result<String> {
        self.request(Verb::Put, url, RequestArgs::body(data)).await.map(into_text)
    }

    pub async fn move_to(&self, url: &str, destination: &str, overwrite: bool) -> Result<String> {
        self.request(Verb::Move, url, RequestArgs::destination(destination, overwrite))
            .await
            .map(into_text)
    }

    pub async fn copy_to(&self, url: &str, destination: &str, overwrite: bool) -> Result<String> {
        self.request(Verb::Copy, url, RequestArgs::destination(destination, overwrite))
            .await
            .map(into_text)
    }

    pub fn get_blocking(&self, url: &str) -> Result<String> {
        self.request_blocking(Verb::Get, url, RequestArgs::default()).map(into_text)
    }

    pub fn propfind_blocking(&self, url: &str) -> Result<Body> {
        self.request_blocking(Verb::Propfind, url, RequestArgs::default())
    }

    pub fn mkcol_blocking(&self, url: &str) -> Result<String> {
        self.request_blocking(Verb::Mkcol, url, RequestArgs::default()).map(into_text)
    }

    pub fn delete_blocking(&self, url: &str) -> Result<String> {
        self.request_blocking(Verb::Delete, url, RequestArgs::default()).map(into_text)
    }

    pub fn put_blocking(&self, url: &str, data: impl Into<reqwest::Body>) -> Result<String> {
        self.request_blocking(Verb::Put, url, RequestArgs::body(data)).map(into_text)
    }

    pub fn move_to_blocking(&self, url: &str, destination: &str, overwrite: bool) -> Result<String> {
        self.request_blocking(Verb::Move, url, RequestArgs::destination(destination, overwrite))
            .map(into_text)
    }

    pub fn copy_to_blocking(&self, url: &str, destination: &str, overwrite: bool) -> Result<String> {
        self.request_blocking(Verb::Copy, url, RequestArgs::destination(destination, overwrite))
            .map(into_text)
    }
}

// Text verbs always decode to Body::Text
fn into_text(body: Body) -> String {
    match body {
        Body::Text(text) => text,
        Body::Xml(_) => String::new(),
    }
}

/// Drives a future to completion on a throwaway current-thread runtime.
///
/// Refuses to run inside an existing runtime, where nesting would panic.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(WebDavError::Runtime(std::io::Error::other(
            "blocking WebDAV call made from inside an async runtime",
        )));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
