//! Oldest-first article selection.

use std::cmp::Ordering;

use crate::entities::ArticleStub;
use crate::selection::dedupe::{dedupe, merge};

pub const DEFAULT_TARGET_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    target_count: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_COUNT)
    }
}

impl SelectionPolicy {
    /// A target of zero is treated as one.
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count: target_count.max(1),
        }
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Dedupe, order oldest first with undated stubs last, and keep at
    /// most `target_count`. Ties keep their listing order.
    pub fn select(&self, stubs: Vec<ArticleStub>) -> Vec<ArticleStub> {
        let mut stubs = dedupe(stubs);
        stubs.sort_by(oldest_first);
        stubs.truncate(self.target_count);
        stubs
    }

    pub fn is_short(&self, selected: &[ArticleStub]) -> bool {
        selected.len() < self.target_count
    }

    /// Select from `primary`; when that falls short and `backfill` is
    /// given, select again from both with `primary` winning URL clashes.
    pub fn select_with_backfill(
        &self,
        primary: Vec<ArticleStub>,
        backfill: Option<Vec<ArticleStub>>,
    ) -> Vec<ArticleStub> {
        let selected = self.select(primary.clone());
        match backfill {
            Some(extra) if self.is_short(&selected) => self.select(merge(primary, extra)),
            _ => selected,
        }
    }
}

fn oldest_first(a: &ArticleStub, b: &ArticleStub) -> Ordering {
    match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
