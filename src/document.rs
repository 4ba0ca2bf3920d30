//! Parsed markup handle used by every extraction stage.
//!
//! Selection always walks the live tree from the root element, so nodes
//! removed with [`MarkupDocument::strip`] never show up in later queries.

use scraper::element_ref::Select;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

use crate::cascade::SelectorStrategy;

/// Elements that start a new line of visible text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Elements whose text is never visible.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct MarkupDocument {
    html: Html,
}

impl MarkupDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Clone `element` and its sub-tree into a standalone document.
    pub fn fragment(element: &ElementRef<'_>) -> Self {
        Self {
            html: Html::parse_fragment(&element.html()),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.root_element().select(selector)
    }

    /// Detach every element matched by any of `strategies`; returns how many
    /// elements were removed.
    pub fn strip(&mut self, strategies: &[SelectorStrategy]) -> usize {
        self.detach_matches(strategies, |_| true)
    }

    /// Like [`strip`](Self::strip), but keeps every match that is, or
    /// contains, an element matched by `keep`.
    pub fn strip_except(&mut self, strategies: &[SelectorStrategy], keep: &Selector) -> usize {
        self.detach_matches(strategies, |el| {
            !keep.matches(el) && el.select(keep).next().is_none()
        })
    }

    fn detach_matches(
        &mut self,
        strategies: &[SelectorStrategy],
        removable: impl Fn(&ElementRef<'_>) -> bool,
    ) -> usize {
        let mut seen = HashSet::new();
        let ids: Vec<_> = strategies
            .iter()
            .flat_map(|strategy| self.select(&strategy.selector))
            .filter(|el| removable(el))
            .map(|el| el.id())
            .filter(|id| seen.insert(*id))
            .collect();

        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
        removed
    }

    /// Visible text of the body, or of the whole tree for fragments.
    pub fn text(&self) -> String {
        let root = self.root();
        match root
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
        {
            Some(body) => element_text(&body),
            None => element_text(&root),
        }
    }
}

/// Visible text of `element`, one line per block element, whitespace
/// collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                    .is_some_and(|name| INVISIBLE_ELEMENTS.contains(&name));
                if !hidden {
                    raw.push_str(text);
                }
            }
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => raw.push('\n'),
            _ => {}
        }
    }
    normalize_whitespace(&raw)
}

/// [`element_text`] flattened onto a single line.
pub fn inline_text(element: &ElementRef<'_>) -> String {
    element_text(element).replace('\n', " ")
}

pub fn attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Collapse whitespace runs inside each line and drop blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
