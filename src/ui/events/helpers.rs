//! Helper functions for event handling
//!
//! - Action application
//! - Send validation

use crate::actions::{apply_action, AppAction};
use crate::state::AppState;
use crate::types::{ApiEndpoint, RequestConfig};

/// Apply multiple actions to state
pub fn apply_many(state: &mut AppState, actions: impl IntoIterator<Item = AppAction>) {
    for action in actions {
        apply_action(action, state);
    }
}

/// Check if endpoint can be executed (all required path params are filled)
pub fn can_execute_endpoint(
    endpoint: &ApiEndpoint,
    config: Option<&RequestConfig>,
) -> Result<(), String> {
    let path_params = endpoint.path_params();
    if path_params.is_empty() {
        return Ok(());
    }

    let Some(config) = config else {
        return Err(format!(
            "Please configure path parameter(s): {}",
            path_params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    };

    if !endpoint.has_all_required_path_params(config) {
        let missing = endpoint.missing_path_params(config);
        return Err(format!(
            "Missing required path parameter(s): {}",
            missing.join(", ")
        ));
    }

    Ok(())
}
