//! Request handlers

pub mod agents;
pub mod health;
pub mod orchestrate;
pub mod registry;
