//! Minimal namespaced XML element tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::GeoconvError;
use crate::format::gml::GML_NAMESPACE;

/// Node of the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Nested element.
    Element(XmlElement),
    /// Unescaped character data.
    Text(String),
}

/// XML element with its namespace resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Namespace URI of the element, if it is in a namespace.
    pub namespace: Option<String>,
    /// Local name of the element.
    pub name: String,
    /// Name as written in the document, with prefix.
    pub qualified_name: String,
    /// Attributes by local name, namespace declarations excluded.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Reads the root element of the document.
    ///
    /// Documents that use the `gml` prefix without declaring it are read as if the prefix were bound to the GML 3.2
    /// namespace.
    pub fn parse(text: &str) -> Result<Self, GeoconvError> {
        let mut reader = NsReader::from_str(text);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_resolved_event()? {
                (ns, Event::Start(start)) => stack.push(Self::from_start(ns, &start)?),
                (ns, Event::Empty(start)) => {
                    let element = Self::from_start(ns, &start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        GeoconvError::MalformedGml("unexpected closing tag".into())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::Text(text)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text.unescape()?.into_owned()));
                    }
                }
                (_, Event::CData(data)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent
                            .children
                            .push(XmlNode::Text(String::from_utf8_lossy(&data).into_owned()));
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if let Some(unclosed) = stack.last() {
            return Err(GeoconvError::MalformedGml(format!(
                "element {} is not closed",
                unclosed.qualified_name
            )));
        }

        root.ok_or_else(|| GeoconvError::MalformedGml("document has no root element".into()))
    }

    fn from_start(ns: ResolveResult, start: &BytesStart) -> Result<Self, GeoconvError> {
        let namespace = match ns {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            ResolveResult::Unknown(prefix) if prefix == b"gml" => Some(GML_NAMESPACE.to_string()),
            ResolveResult::Unknown(prefix) => {
                return Err(GeoconvError::MalformedGml(format!(
                    "namespace prefix {} is not declared",
                    String::from_utf8_lossy(&prefix)
                )))
            }
            ResolveResult::Unbound => None,
        };

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }

            attributes.push((
                String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned(),
                attribute.unescape_value()?.into_owned(),
            ));
        }

        Ok(Self {
            namespace,
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            qualified_name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        })
    }

    /// Value of the attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the element has the given namespace and local name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text of the element and all its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Element(element) => element.collect_text(text),
                XmlNode::Text(t) => text.push_str(t),
            }
        }
    }

    /// First descendant reached by `path` (`.//a/b/c` in XPath terms): a descendant named `path[0]` whose children
    /// lead through the rest of the path. All names are in `namespace`.
    pub fn find(&self, namespace: &str, path: &[&str]) -> Option<&XmlElement> {
        let (first, rest) = path.split_first()?;
        self.descendants()
            .filter(|candidate| candidate.is(namespace, first))
            .find_map(|candidate| candidate.follow(namespace, rest))
    }

    fn follow<'a>(&'a self, namespace: &str, path: &[&str]) -> Option<&'a XmlElement> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };

        self.child_elements()
            .filter(|child| child.is(namespace, first))
            .find_map(|child| child.follow(namespace, rest))
    }

    /// Descendants matching any of `names`, in document order. The subtree of a matching element is not searched, so
    /// nested matches are not returned twice.
    pub fn find_all<'a>(&'a self, namespace: &str, names: &[&str]) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_matching(namespace, names, &mut found);
        found
    }

    fn collect_matching<'a>(
        &'a self,
        namespace: &str,
        names: &[&str],
        found: &mut Vec<&'a XmlElement>,
    ) {
        for child in self.child_elements() {
            if names.iter().any(|name| child.is(namespace, name)) {
                found.push(child);
            } else {
                child.collect_matching(namespace, names, found);
            }
        }
    }

    /// All descendant elements in document order.
    fn descendants(&self) -> Box<dyn Iterator<Item = &XmlElement> + '_> {
        Box::new(
            self.child_elements()
                .flat_map(|child| std::iter::once(child).chain(child.descendants())),
        )
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), GeoconvError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(GeoconvError::MalformedGml(
            "document has more than one root element".into(),
        ));
    }

    *root = Some(element);
    Ok(())
}
