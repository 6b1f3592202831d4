pub mod property;
pub mod xml;

pub use property::{parse_status_line, PropertyNode};
pub use xml::{XmlElement, XmlNode, XmlTree};
