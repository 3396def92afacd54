//! API Routes
//!
//! Route handlers organized by functionality.

pub mod analyze;
pub mod dashboard;
pub mod entries;
pub mod health;
