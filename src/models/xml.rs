/// A node inside an XML element: either a child element or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode<E> {
    Element(E),
    Text(String),
}

/// Read-only view over an XML element tree.
///
/// Property parsing and multi-status walking only ever go through this trait,
/// so they can run over any DOM that can expose local names, namespaces and
/// ordered child nodes.
pub trait XmlTree: Sized {
    fn local_name(&self) -> &str;

    /// Resolved namespace URI, `None` when the element is unqualified
    fn namespace(&self) -> Option<&str>;

    /// Child nodes in document order. Whitespace-only text is not a node.
    fn nodes(&self) -> &[XmlNode<Self>];

    fn has_nodes(&self) -> bool {
        !self.nodes().is_empty()
    }

    /// Element children only, in document order
    fn elements(&self) -> impl Iterator<Item = &Self> {
        self.nodes().iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Text content of the first child node, if that node is text
    fn leading_text(&self) -> Option<&str> {
        match self.nodes().first() {
            Some(XmlNode::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name() == local_name && self.namespace() == Some(namespace)
    }

    /// First descendant (document order, self excluded) with the given
    /// namespace and local name.
    fn find_descendant(&self, namespace: &str, local_name: &str) -> Option<&Self> {
        for child in self.elements() {
            if child.is(namespace, local_name) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(namespace, local_name) {
                return Some(found);
            }
        }
        None
    }
}

/// Owned XML element built by [`crate::webdav_xml_parser::parse_document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub namespace: Option<String>,
    pub nodes: Vec<XmlNode<XmlElement>>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            nodes: Vec::new(),
        }
    }

    /// Builder-style helper, mostly useful for constructing trees in tests
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.nodes.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.nodes.push(XmlNode::Text(text.into()));
        self
    }
}

impl XmlTree for XmlElement {
    fn local_name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn nodes(&self) -> &[XmlNode<Self>] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dav(name: &str) -> XmlElement {
        XmlElement::new(name, Some("DAV:".to_string()))
    }

    #[test]
    fn test_find_descendant_is_depth_first() {
        let tree = dav("response")
            .with_child(dav("propstat").with_child(dav("prop").with_child(dav("href").with_text("/inner"))))
            .with_child(dav("href").with_text("/outer"));

        let href = tree.find_descendant("DAV:", "href").unwrap();
        assert_eq!(href.leading_text(), Some("/inner"));
    }

    #[test]
    fn test_find_descendant_respects_namespace() {
        let tree = dav("response")
            .with_child(XmlElement::new("href", Some("http://example.com/ns".to_string())).with_text("/wrong"))
            .with_child(dav("href").with_text("/right"));

        let href = tree.find_descendant("DAV:", "href").unwrap();
        assert_eq!(href.leading_text(), Some("/right"));
        assert!(tree.find_descendant("DAV:", "propstat").is_none());
    }

    #[test]
    fn test_elements_skip_text_nodes() {
        let tree = dav("prop").with_text("stray").with_child(dav("getetag"));
        let names: Vec<_> = tree.elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["getetag"]);
        assert_eq!(tree.leading_text(), Some("stray"));
    }
}
