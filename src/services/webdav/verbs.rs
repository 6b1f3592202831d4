use reqwest::Method;

use crate::errors::{Result, WebDavError};

/// Sent on every request regardless of verb
pub const CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// Statuses treated as success: OK, Created, Multi-Status and Processing
pub const ACCEPTED_STATUSES: [u16; 4] = [200, 201, 207, 102];

pub fn is_accepted_status(code: u16) -> bool {
    ACCEPTED_STATUSES.contains(&code)
}

/// The WebDAV verbs this client speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Propfind,
    Mkcol,
    Delete,
    Put,
    Move,
    Copy,
}

/// How a response body is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Text,
    Xml,
}

/// Static description of one verb: its wire name, fixed headers, whether it
/// carries a request body or a destination, and how its response is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerbSpec {
    pub verb: Verb,
    pub method: &'static str,
    pub fixed_headers: &'static [(&'static str, &'static str)],
    pub sends_body: bool,
    pub takes_destination: bool,
    pub response: ResponseKind,
}

pub const VERB_TABLE: [VerbSpec; 7] = [
    VerbSpec {
        verb: Verb::Get,
        method: "GET",
        fixed_headers: &[],
        sends_body: false,
        takes_destination: false,
        response: ResponseKind::Text,
    },
    VerbSpec {
        verb: Verb::Propfind,
        method: "PROPFIND",
        fixed_headers: &[("Depth", "1")],
        sends_body: false,
        takes_destination: false,
        response: ResponseKind::Xml,
    },
    VerbSpec {
        verb: Verb::Mkcol,
        method: "MKCOL",
        fixed_headers: &[],
        sends_body: false,
        takes_destination: false,
        response: ResponseKind::Text,
    },
    VerbSpec {
        verb: Verb::Delete,
        method: "DELETE",
        fixed_headers: &[],
        sends_body: false,
        takes_destination: false,
        response: ResponseKind::Text,
    },
    VerbSpec {
        verb: Verb::Put,
        method: "PUT",
        fixed_headers: &[],
        sends_body: true,
        takes_destination: false,
        response: ResponseKind::Text,
    },
    VerbSpec {
        verb: Verb::Move,
        method: "MOVE",
        fixed_headers: &[],
        sends_body: false,
        takes_destination: true,
        response: ResponseKind::Text,
    },
    VerbSpec {
        verb: Verb::Copy,
        method: "COPY",
        fixed_headers: &[],
        sends_body: false,
        takes_destination: true,
        response: ResponseKind::Text,
    },
];

impl Verb {
    pub fn spec(self) -> &'static VerbSpec {
        // Table order matches declaration order
        &VERB_TABLE[self as usize]
    }

    pub fn method(self) -> Result<Method> {
        let name = self.spec().method;
        Method::from_bytes(name.as_bytes()).map_err(|_| WebDavError::InvalidMethod {
            method: name.to_string(),
        })
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().method)
    }
}

/// `T` / `F` value of the Overwrite header
pub fn overwrite_flag(overwrite: bool) -> &'static str {
    if overwrite {
        "T"
    } else {
        "F"
    }
}
