// WebDAV client modules organized by functionality

pub mod config;
pub mod connection;
pub mod fs;
pub mod url_management;
pub mod verbs;

// Re-export main types for convenience
pub use config::WebDAVConfig;
pub use connection::{Body, Reply, RequestArgs, WebDAVConnection};
pub use fs::{DavResource, Directory, File, Resource, ResourceInfo, ResourceKind, ResourceSummary, WebDavFs};
pub use url_management::{name_for, WebDAVUrlManager};
pub use verbs::{is_accepted_status, ResponseKind, Verb, VerbSpec, ACCEPTED_STATUSES, VERB_TABLE};
