//! Data every full page renders around its content.

use crate::notifications::{AUTO_CLOSE_MS, Toast};
use crate::state::AppState;

/// Header badge and toast stack.
pub struct PageChrome {
    pub cart_count: usize,
    pub toasts: Vec<Toast>,
    pub toast_ms: u32,
}

impl PageChrome {
    /// Snapshot the cart size and take every pending toast.
    pub async fn load(state: &AppState) -> Self {
        Self {
            cart_count: state.cart().len().await,
            toasts: state.notifications().drain(),
            toast_ms: AUTO_CLOSE_MS,
        }
    }
}
