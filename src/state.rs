use crate::db::Store;

/// Shared by every handler. The pool inside `Store` is the only shared state.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
