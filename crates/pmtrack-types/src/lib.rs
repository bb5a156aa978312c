//! Shared domain types for pmtrack
//!
//! This crate defines the vocabulary the whole workspace speaks:
//! - Zones and equipment
//! - The fixed PM stage checklist and stage results
//! - PM records
//! - Session status and views
//! - Policy settings (retention period, warning window)

mod record;
mod session;
mod settings;
mod stage;
mod zone;

pub use record::*;
pub use session::*;
pub use settings::*;
pub use stage::*;
pub use zone::*;
