//! REST client for the mentorship request endpoints.
//!
//! [`RequestDirectory`] is the read seam the notifier polls through;
//! [`HttpRequestDirectory`] implements it over `reqwest` and also exposes the
//! write operations (send, approve, reject, cancel) of the same API.

pub mod directory;
pub mod http;

pub use directory::RequestDirectory;
pub use http::HttpRequestDirectory;
