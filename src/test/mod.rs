//! Host-side test helpers
