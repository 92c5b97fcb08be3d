use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// A retained visual node whose inline style can be mutated.
///
/// Property names are dash-case (`background-color`, `transition-duration`).
/// Implementations are free to reject a value; callers detect that by reading
/// the property back.
pub trait StyleNode {
    fn set_style(&self, property: &str, value: &str);
    fn style(&self, property: &str) -> Option<String>;
    /// Synchronous layout read. Forces the engine to observe every style
    /// written so far before anything else is applied.
    fn force_layout(&self);
}

/// In-memory node used by headless hosts and tests.
///
/// Keeps the current inline style in write order plus a full write history.
#[derive(Default)]
pub struct MemoryNode {
    style: RefCell<Vec<(String, String)>>,
    history: RefCell<Vec<(String, String)>>,
    rejected: HashSet<String>,
    layout_reads: Cell<usize>,
}

impl MemoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node with a pre-existing inline style.
    pub fn with_style<'a>(props: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let node = Self::new();
        {
            let mut style = node.style.borrow_mut();
            for (k, v) in props {
                style.push((k.to_owned(), v.to_owned()));
            }
        }
        node
    }

    /// Refuse writes to `property`, like an engine that does not know it.
    pub fn rejecting(mut self, property: &str) -> Self {
        self.rejected.insert(property.to_owned());
        self
    }

    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.style.borrow().clone()
    }

    pub fn history(&self) -> Vec<(String, String)> {
        self.history.borrow().clone()
    }

    pub fn layout_reads(&self) -> usize {
        self.layout_reads.get()
    }
}

impl StyleNode for MemoryNode {
    fn set_style(&self, property: &str, value: &str) {
        if self.rejected.contains(property) {
            log::debug!("MemoryNode: rejected write {property}={value}");
            return;
        }
        self.history
            .borrow_mut()
            .push((property.to_owned(), value.to_owned()));

        let mut style = self.style.borrow_mut();
        if value.is_empty() {
            style.retain(|(k, _)| k != property);
        } else if let Some(slot) = style.iter_mut().find(|(k, _)| k == property) {
            slot.1 = value.to_owned();
        } else {
            style.push((property.to_owned(), value.to_owned()));
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.style
            .borrow()
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    fn force_layout(&self) {
        self.layout_reads.set(self.layout_reads.get() + 1);
    }
}
