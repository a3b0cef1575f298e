//! Mount points a page exposes to its controllers.
//!
//! A [`Document`] holds one [`Region`] per container id. Controllers only act
//! when the regions they need exist, which lets one set of controllers serve
//! every page template.

use std::collections::BTreeMap;

use super::node::{Element, Node, escape_attribute};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub hidden: bool,
    /// `data-*` attributes keyed without the `data-` prefix.
    pub data: BTreeMap<String, String>,
    /// Current value for input regions.
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Region {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Elements anywhere under this region matching `predicate`.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        self.children
            .iter()
            .flat_map(|child| child.find_all(predicate))
            .collect()
    }

    /// Whether an element carrying `data-<attribute>="<value>"` is rendered here.
    pub fn has_data_target(&self, attribute: &str, value: &str) -> bool {
        let name = format!("data-{attribute}");
        !self
            .find_all(&|element| element.attribute(&name) == Some(value))
            .is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<div id=\"{}\"", escape_attribute(&self.id));
        for (key, value) in &self.data {
            html.push_str(&format!(
                " data-{}=\"{}\"",
                escape_attribute(key),
                escape_attribute(value)
            ));
        }
        if let Some(value) = &self.value {
            html.push_str(&format!(" data-value=\"{}\"", escape_attribute(value)));
        }
        if self.hidden {
            html.push_str(" hidden");
        }
        html.push('>');
        for child in &self.children {
            html.push_str(&child.to_html());
        }
        html.push_str("</div>");
        html
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    regions: BTreeMap<String, Region>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.mount(region);
        self
    }

    pub fn mount(&mut self, region: Region) {
        self.regions.insert(region.id.clone(), region);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn region_mut(&mut self, id: &str) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Replace the children of a region; missing regions are ignored.
    pub fn replace_children(&mut self, id: &str, children: Vec<Node>) {
        if let Some(region) = self.regions.get_mut(id) {
            region.children = children;
        }
    }

    pub fn append_child(&mut self, id: &str, child: Node) {
        if let Some(region) = self.regions.get_mut(id) {
            region.children.push(child);
        }
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        let text = text.into();
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::Text(text)]
        };
        self.replace_children(id, children);
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) {
        if let Some(region) = self.regions.get_mut(id) {
            region.hidden = hidden;
        }
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        if let Some(region) = self.regions.get_mut(id) {
            region.value = Some(value.into());
        }
    }

    pub fn to_html(&self) -> String {
        self.regions
            .values()
            .map(Region::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
