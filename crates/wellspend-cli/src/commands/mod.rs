//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (input and config loading)
//! - `analysis` - Weeks, correlations, models, predictions, full report
//! - `simulate` - What-if scenarios

pub mod analysis;
pub mod core;
pub mod simulate;

// Re-export command functions for main.rs
pub use analysis::*;
pub use core::*;
pub use simulate::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
