use std::cell::RefCell;

use fieldbill_domain::model::AppState;
use fieldbill_domain::repository::AppStateStore;
use fieldbill_types::Result;

/// In-memory AppStateStore for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryAppStateStore {
    state: RefCell<Option<AppState>>,
}

impl MemoryAppStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AppStateStore for MemoryAppStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryAppStateStore::new();
        assert!(store.load().unwrap().is_none());
        let mut state = AppState::default();
        state.sign_in("a@b.c");
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }
}
