use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::{Result, WebDavError};
use crate::models::{parse_status_line, PropertyNode};
use crate::webdav_xml_parser::{parse_multistatus, PropfindEntry};
use super::config::WebDAVConfig;
use super::connection::{Body, WebDAVConnection};
use super::url_management::{name_for, WebDAVUrlManager};

/// Object view over a WebDAV server rooted at one URL.
///
/// Cheap to clone; every entity it hands out shares the same connection.
#[derive(Debug, Clone)]
pub struct WebDavFs {
    connection: Arc<WebDAVConnection>,
    urls: WebDAVUrlManager,
}

impl WebDavFs {
    pub fn new(root_url: impl Into<String>) -> Result<Self> {
        Self::with_config(WebDAVConfig::new(root_url))
    }

    pub fn with_config(config: WebDAVConfig) -> Result<Self> {
        let urls = WebDAVUrlManager::new(config.root_url.clone());
        let connection = Arc::new(WebDAVConnection::new(config)?);
        Ok(Self { connection, urls })
    }

    pub fn root_url(&self) -> &str {
        self.urls.root_url()
    }

    pub fn connection(&self) -> &WebDAVConnection {
        &self.connection
    }

    pub fn url_for(&self, href: &str) -> String {
        self.urls.url_for(href)
    }

    pub fn name_for<'a>(&self, url: &'a str) -> &'a str {
        name_for(url)
    }

    /// File handle with no cached properties
    pub fn file(&self, href: &str) -> File {
        File::new(self, href, PropertyNode::default(), None)
    }

    /// Directory handle with no cached properties
    pub fn dir(&self, href: &str) -> Directory {
        Directory::new(self, href, PropertyNode::default(), None)
    }

    pub fn root(&self) -> Directory {
        self.dir("")
    }

    fn resource_from_entry(&self, entry: PropfindEntry) -> Resource {
        if entry.is_collection {
            Resource::Directory(Directory::new(self, &entry.href, entry.properties, entry.status))
        } else {
            Resource::File(File::new(self, &entry.href, entry.properties, entry.status))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Directory,
}

/// State shared by files and directories
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInfo {
    pub url: String,
    pub name: String,
    pub properties: PropertyNode,
    pub status_code: Option<String>,
}

impl ResourceInfo {
    fn new(fs: &WebDavFs, href: &str, properties: PropertyNode, status_code: Option<String>) -> Self {
        let url = fs.url_for(href);
        let name = name_for(&url).to_string();
        Self {
            url,
            name,
            properties,
            status_code,
        }
    }
}

/// Serializable snapshot of a resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSummary {
    pub kind: ResourceKind,
    pub name: String,
    pub url: String,
    pub status: Option<String>,
    pub properties: PropertyNode,
}

/// Operations every remote resource supports
#[async_trait]
pub trait DavResource: Send + Sync {
    fn info(&self) -> &ResourceInfo;

    fn connection(&self) -> &WebDAVConnection;

    fn kind(&self) -> ResourceKind;

    fn url(&self) -> &str {
        &self.info().url
    }

    fn name(&self) -> &str {
        &self.info().name
    }

    fn properties(&self) -> &PropertyNode {
        &self.info().properties
    }

    /// Status line from the listing that produced this resource
    fn status_code(&self) -> Option<&str> {
        self.info().status_code.as_deref()
    }

    fn http_status(&self) -> Option<u16> {
        self.status_code().and_then(parse_status_line)
    }

    fn summary(&self) -> ResourceSummary {
        ResourceSummary {
            kind: self.kind(),
            name: self.name().to_string(),
            url: self.url().to_string(),
            status: self.info().status_code.clone(),
            properties: self.properties().clone(),
        }
    }

    async fn rm(&self) -> Result<String> {
        info!("Deleting {}", self.url());
        self.connection().delete(self.url()).await
    }

    fn rm_blocking(&self) -> Result<String> {
        info!("Deleting {}", self.url());
        self.connection().delete_blocking(self.url())
    }

    async fn move_to(&self, destination: &str, overwrite: bool) -> Result<String> {
        info!("Moving {} to {} (overwrite: {})", self.url(), destination, overwrite);
        self.connection().move_to(self.url(), destination, overwrite).await
    }

    fn move_to_blocking(&self, destination: &str, overwrite: bool) -> Result<String> {
        info!("Moving {} to {} (overwrite: {})", self.url(), destination, overwrite);
        self.connection().move_to_blocking(self.url(), destination, overwrite)
    }

    async fn copy_to(&self, destination: &str, overwrite: bool) -> Result<String> {
        info!("Copying {} to {} (overwrite: {})", self.url(), destination, overwrite);
        self.connection().copy_to(self.url(), destination, overwrite).await
    }

    fn copy_to_blocking(&self, destination: &str, overwrite: bool) -> Result<String> {
        info!("Copying {} to {} (overwrite: {})", self.url(), destination, overwrite);
        self.connection().copy_to_blocking(self.url(), destination, overwrite)
    }
}

/// A non-collection resource
#[derive(Debug, Clone)]
pub struct File {
    info: ResourceInfo,
    fs: WebDavFs,
}

impl File {
    pub fn new(fs: &WebDavFs, href: &str, properties: PropertyNode, status_code: Option<String>) -> Self {
        Self {
            info: ResourceInfo::new(fs, href, properties, status_code),
            fs: fs.clone(),
        }
    }

    pub async fn read(&self) -> Result<String> {
        self.fs.connection().get(self.url()).await
    }

    pub fn read_blocking(&self) -> Result<String> {
        self.fs.connection().get_blocking(self.url())
    }

    pub async fn write(&self, data: impl Into<reqwest::Body>) -> Result<String> {
        info!("Writing {}", self.url());
        self.fs.connection().put(self.url(), data).await
    }

    pub fn write_blocking(&self, data: impl Into<reqwest::Body>) -> Result<String> {
        info!("Writing {}", self.url());
        self.fs.connection().put_blocking(self.url(), data)
    }
}

impl DavResource for File {
    fn info(&self) -> &ResourceInfo {
        &self.info
    }

    fn connection(&self) -> &WebDAVConnection {
        self.fs.connection()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::File
    }
}

/// A collection resource. Children are fetched fresh on every call.
#[derive(Debug, Clone)]
pub struct Directory {
    info: ResourceInfo,
    fs: WebDavFs,
}

impl Directory {
    pub fn new(fs: &WebDavFs, href: &str, properties: PropertyNode, status_code: Option<String>) -> Self {
        Self {
            info: ResourceInfo::new(fs, href, properties, status_code),
            fs: fs.clone(),
        }
    }

    /// Lists the directory with a depth-1 PROPFIND. The directory's own
    /// entry is left out; order follows the server response.
    pub async fn children(&self) -> Result<Vec<Resource>> {
        let body = self.fs.connection().propfind(self.url()).await?;
        self.resources_from(body)
    }

    /// Blocking listing. HTTP errors are not reported here, so a missing
    /// directory usually surfaces as [`WebDavError::NoSuchDirectory`].
    pub fn children_blocking(&self) -> Result<Vec<Resource>> {
        let body = self.fs.connection().propfind_blocking(self.url())?;
        self.resources_from(body)
    }

    pub async fn mkdir(&self) -> Result<String> {
        info!("Creating collection {}", self.url());
        self.fs.connection().mkcol(self.url()).await
    }

    pub fn mkdir_blocking(&self) -> Result<String> {
        info!("Creating collection {}", self.url());
        self.fs.connection().mkcol_blocking(self.url())
    }

    fn resources_from(&self, body: Body) -> Result<Vec<Resource>> {
        let root = match body {
            Body::Xml(root) => root,
            Body::Text(_) => return Err(WebDavError::no_such_directory(self.url())),
        };

        let entries = parse_multistatus(&root, self.url())?;
        debug!("Listed {} children of {}", entries.len(), self.url());

        Ok(entries
            .into_iter()
            .map(|entry| self.fs.resource_from_entry(entry))
            .collect())
    }
}

impl DavResource for Directory {
    fn info(&self) -> &ResourceInfo {
        &self.info
    }

    fn connection(&self) -> &WebDAVConnection {
        self.fs.connection()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Directory
    }
}

/// Either kind of resource, as produced by a directory listing
#[derive(Debug, Clone)]
pub enum Resource {
    File(File),
    Directory(Directory),
}

impl Resource {
    pub fn is_dir(&self) -> bool {
        matches!(self, Resource::Directory(_))
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Resource::File(file) => Some(file),
            Resource::Directory(_) => None,
        }
    }

    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            Resource::Directory(dir) => Some(dir),
            Resource::File(_) => None,
        }
    }
}

impl DavResource for Resource {
    fn info(&self) -> &ResourceInfo {
        match self {
            Resource::File(file) => file.info(),
            Resource::Directory(dir) => dir.info(),
        }
    }

    fn connection(&self) -> &WebDAVConnection {
        match self {
            Resource::File(file) => DavResource::connection(file),
            Resource::Directory(dir) => DavResource::connection(dir),
        }
    }

    fn kind(&self) -> ResourceKind {
        match self {
            Resource::File(_) => ResourceKind::File,
            Resource::Directory(_) => ResourceKind::Directory,
        }
    }
}
