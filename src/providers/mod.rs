//! Providers Module - External Collaborators
//!
//! HTTP clients for the geocoding service, the mail relay and the document
//! renderer, each behind a trait seam so the core never sees `reqwest`.

pub mod geocoder;
pub mod mailer;
pub mod renderer;

pub use geocoder::*;
pub use mailer::*;
pub use renderer::*;
