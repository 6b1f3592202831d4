/// URL construction for the filesystem view.
///
/// Hrefs from multi-status responses are appended to the root URL exactly as
/// received; no slash normalization happens here. An href that already starts
/// with `http` is taken as fully qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDAVUrlManager {
    root_url: String,
}

impl WebDAVUrlManager {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Fully qualified URL for an href
    pub fn url_for(&self, href: &str) -> String {
        if is_absolute(href) {
            href.to_string()
        } else {
            format!("{}{}", self.root_url, href)
        }
    }
}

pub fn is_absolute(href: &str) -> bool {
    href.starts_with("http")
}

/// Final path segment: everything after the last `/`
pub fn name_for(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}
