//! Synchronous change notification for form state.

use std::fmt;

use serde::Serialize;

/// What changed in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum FormChange {
    ProductSelected { product_id: String },
    FieldUpdated { key: String },
    CustomerChanged { customer_id: Option<String> },
    Validated { is_valid: bool },
    Cleared,
}

/// Handle returned by [`Listeners::add`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn Fn(&FormChange) + Send + Sync>;

/// Registration-ordered set of callbacks.
///
/// Callbacks run synchronously on [`emit`](Self::emit), in the order they
/// were added.
#[derive(Default)]
pub struct Listeners {
    callbacks: Vec<(ListenerId, Callback)>,
    next_id: u64,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, callback: impl Fn(&FormChange) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns whether a listener was removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn emit(&mut self, change: &FormChange) {
        for (_, callback) in &self.callbacks {
            callback(change);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
