//! SVG element tree
//!
//! A small retained tree of SVG elements. The renderer builds it, the
//! container owns it, and it serializes to XML through `quick-xml`.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::RenderError;

/// One SVG element with attributes, children and optional text content
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
    pub text: Option<String>,
}

impl SvgNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Builder method: set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.push((name.into(), value.to_string()));
        self
    }

    /// Builder method: set a numeric attribute
    pub fn num(self, name: impl Into<String>, value: f64) -> Self {
        self.attr(name, fmt_num(value))
    }

    /// Builder method: append a child
    pub fn child(mut self, node: SvgNode) -> Self {
        self.children.push(node);
        self
    }

    /// Builder method: append several children
    pub fn children(mut self, nodes: impl IntoIterator<Item = SvgNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Builder method: set text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All descendants (including self) with the given tag, depth-first
    pub fn find_all<'a>(&'a self, tag: &str) -> Vec<&'a SvgNode> {
        let mut out = Vec::new();
        self.collect(&|n| n.tag == tag, &mut out);
        out
    }

    /// First descendant (including self) with the given id
    pub fn find_by_id(&self, id: &str) -> Option<&SvgNode> {
        let mut out = Vec::new();
        self.collect(&|n| n.attribute("id") == Some(id), &mut out);
        out.into_iter().next()
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&SvgNode) -> bool, out: &mut Vec<&'a SvgNode>) {
        if pred(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect(pred, out);
        }
    }

    /// Serialize to an XML string
    pub fn to_xml(&self) -> Result<String, RenderError> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| RenderError::Svg(e.to_string()))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), RenderError> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attrs {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| RenderError::Svg(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| RenderError::Svg(e.to_string()))?;

        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| RenderError::Svg(e.to_string()))?;
        }

        for child in &self.children {
            child.write(writer)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.tag.as_str())))
            .map_err(|e| RenderError::Svg(e.to_string()))
    }
}

/// Format a coordinate: at most 3 decimals, no trailing zeros
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(50.0), "50");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(f64::NAN), "0");
    }

    #[test]
    fn test_serialize_tree() {
        let node = SvgNode::new("svg")
            .num("width", 300.0)
            .child(SvgNode::new("rect").num("x", 1.5).attr("class", "bar"))
            .child(SvgNode::new("text").text("GDP < $1 & rising"));

        let xml = node.to_xml().unwrap();
        assert_eq!(
            xml,
            r#"<svg width="300"><rect x="1.5" class="bar"/><text>GDP &lt; $1 &amp; rising</text></svg>"#
        );
    }

    #[test]
    fn test_queries() {
        let node = SvgNode::new("svg")
            .child(SvgNode::new("g").attr("id", "bars").child(SvgNode::new("rect")))
            .child(SvgNode::new("rect"));

        assert_eq!(node.find_all("rect").len(), 2);
        assert_eq!(node.find_by_id("bars").map(|n| n.tag.as_str()), Some("g"));
        assert!(node.find_by_id("missing").is_none());
    }
}
