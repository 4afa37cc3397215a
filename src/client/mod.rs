//! Client-side wrappers: the auth API client with local session persistence,
//! and the read-only movie catalog client the browsing UI is built on.

pub mod auth;
pub mod session;
pub mod tmdb;
