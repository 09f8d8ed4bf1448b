//! Validated input types.
//!
//! These types reject bad input at construction time, before any request
//! reaches the network.

mod base_url;
mod email;

pub use base_url::BaseUrl;
pub use email::Email;
