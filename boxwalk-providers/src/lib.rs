//! Remote folder sources for boxwalk
//!
//! Currently Box.com, plus the credential plumbing its client needs.

pub mod credentials;

#[cfg(feature = "box")]
pub mod box_com;

pub use credentials::{TokenSource, DEFAULT_TOKEN_ENV};

#[cfg(feature = "box")]
pub use box_com::{BoxClient, BoxConfig, BoxUser, BOX_API_URL};

pub use oauth2::AccessToken;
