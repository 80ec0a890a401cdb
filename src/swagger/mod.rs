//! Spec loading and parsing. Produces typed [`crate::types::ApiSpec`] values
//! for the panels; nothing in here touches UI state.

pub mod fetch;
pub mod parse;

pub use fetch::load_spec_background;
