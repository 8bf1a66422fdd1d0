//! Loading and updating the persisted application state

use tracing::debug;

use fieldbill_domain::model::AppState;
use fieldbill_domain::repository::AppStateStore;
use fieldbill_types::Result;

/// Saved state, or the default state on first run
pub fn load_app_state(store: &impl AppStateStore) -> Result<AppState> {
    Ok(store.load()?.unwrap_or_default())
}

/// Load, mutate and save the state in one step
pub fn update_app_state<F>(store: &impl AppStateStore, update: F) -> Result<AppState>
where
    F: FnOnce(&mut AppState),
{
    let mut state = load_app_state(store)?;
    update(&mut state);
    store.save(&state)?;
    debug!(theme = %state.theme, signed_in = state.auth.signed_in, "app state updated");
    Ok(state)
}
