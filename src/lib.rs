pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod webdav_xml_parser;

pub use errors::{Result, WebDavError};
pub use models::{PropertyNode, XmlElement, XmlNode, XmlTree};
pub use services::webdav::{
    Body, DavResource, Directory, File, Resource, ResourceKind, WebDAVConfig, WebDAVConnection,
    WebDavFs,
};
