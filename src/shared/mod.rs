//! Shared state between the application loop and the workbench views
//!
//! Views never touch the database session directly; they queue a
//! [`SessionCommand`] here and the app's update loop drains it.

pub mod state;

pub use state::{RuntimeState, SessionCommand, SharedAppState};
