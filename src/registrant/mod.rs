//! Registrant lookup surface: the login form and profile view.

pub mod handlers;
pub mod model;

pub use model::{LoginForm, Registrant};
