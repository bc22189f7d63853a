//! Layout interpreter and query gate for a medical-spa assistant.
//!
//! - [`layout`]: layout AST, component registry, renderer with fallback
//! - [`store`]: per-markdown layout cache in front of a [`agent::LayoutSource`]
//! - [`query`]: classifier, first-message enhancer, and the patient gate
//! - [`routes`]: the HTTP host surface

pub mod agent;
pub mod config;
pub mod error;
pub mod layout;
pub mod query;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
