//! The device the user currently has selected, shared between whoever handles
//! clicks and whoever draws highlights.

use std::sync::{Arc, PoisonError, RwLock};

/// Cloneable handle to the selected device's IP address; empty means nothing is selected.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Arc<RwLock<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, ip_address: impl Into<String>) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = ip_address.into();
    }

    pub fn clear(&self) {
        self.selected
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// The selected IP address, or an empty string.
    pub fn get(&self) -> String {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_selected(&self, ip_address: &str) -> bool {
        let selected = self.selected.read().unwrap_or_else(PoisonError::into_inner);
        !selected.is_empty() && *selected == ip_address
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
