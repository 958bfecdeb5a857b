//! Interactive OAuth authorization-code flow
//!
//! [`AuthenticationHandler`] drives one login attempt end to end: it binds a
//! [`CallbackListener`] on the redirect target, presents the authorization
//! URL through a [`UriOpener`], waits (bounded) for the redirect, checks the
//! returned state and exchanges the code at the token endpoint.

pub mod callback;
pub mod handler;
pub mod opener;

pub use callback::{redirect_binding, CallbackListener, CallbackParams};
pub use handler::AuthenticationHandler;
pub use opener::{SystemBrowser, UriOpener};
