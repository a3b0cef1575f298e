//! Delegated click routing.
//!
//! One route per container instead of one listener per element: a click is
//! matched by the region it landed in and the `data-*` attribute of the
//! closest target, then checked against what is currently rendered. Regions
//! can be rebuilt freely without re-registering anything.

use std::collections::BTreeMap;

use crate::presentation::document::Document;

/// A click as seen by a delegated listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub region: String,
    /// `data-*` attributes of the closest matching target, without prefix.
    pub data: BTreeMap<String, String>,
}

impl ClickEvent {
    pub fn on(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

struct Route<A> {
    region: &'static str,
    attribute: Option<&'static str>,
    action: fn(String) -> A,
}

pub struct Dispatcher<A> {
    routes: Vec<Route<A>>,
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<A> Dispatcher<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route clicks on elements carrying `data-<attribute>` inside `region`.
    pub fn on_data(
        mut self,
        region: &'static str,
        attribute: &'static str,
        action: fn(String) -> A,
    ) -> Self {
        self.routes.push(Route {
            region,
            attribute: Some(attribute),
            action,
        });
        self
    }

    /// Route any click inside `region`.
    pub fn on_region(mut self, region: &'static str, action: fn(String) -> A) -> Self {
        self.routes.push(Route {
            region,
            attribute: None,
            action,
        });
        self
    }

    pub fn dispatch(&self, document: &Document, event: &ClickEvent) -> Option<A> {
        let region = document.region(&event.region)?;
        self.routes
            .iter()
            .filter(|route| route.region == event.region)
            .find_map(|route| match route.attribute {
                None => Some((route.action)(String::new())),
                Some(attribute) => {
                    let value = event.data.get(attribute)?;
                    if value.is_empty() || !region.has_data_target(attribute, value) {
                        return None;
                    }
                    Some((route.action)(value.clone()))
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{document::Region, node::Element};

    #[derive(Debug, PartialEq, Eq)]
    enum Action {
        Pick(String),
        Reset,
    }

    fn document() -> Document {
        Document::new()
            .with_region(
                Region::new("cloud")
                    .child(Element::new("button").attr("data-tag", "nmap").text("#nmap")),
            )
            .with_region(Region::new("clear"))
    }

    fn dispatcher() -> Dispatcher<Action> {
        Dispatcher::new()
            .on_data("cloud", "tag", Action::Pick)
            .on_region("clear", |_| Action::Reset)
    }

    #[test]
    fn routes_by_region_and_rendered_data_attribute() {
        let event = ClickEvent::on("cloud").with_data("tag", "nmap");
        assert_eq!(
            dispatcher().dispatch(&document(), &event),
            Some(Action::Pick("nmap".to_string()))
        );
        assert_eq!(
            dispatcher().dispatch(&document(), &ClickEvent::on("clear")),
            Some(Action::Reset)
        );
    }

    #[test]
    fn ignores_clicks_without_a_rendered_target() {
        let gap = ClickEvent::on("cloud");
        let stale = ClickEvent::on("cloud").with_data("tag", "rust");
        let elsewhere = ClickEvent::on("footer").with_data("tag", "nmap");

        assert_eq!(dispatcher().dispatch(&document(), &gap), None);
        assert_eq!(dispatcher().dispatch(&document(), &stale), None);
        assert_eq!(dispatcher().dispatch(&document(), &elsewhere), None);
    }
}
