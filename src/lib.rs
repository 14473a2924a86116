//! Reusable entity-list state over a REST API.
//!
//! Two ways to consume a resource:
//! - [`store`]: a reducer-driven store holding normalized entities,
//!   paginated boards and request flags, fed by [`request::RequestHandler`].
//! - [`query`]: a keyed response cache invalidated on mutation.
//!
//! [`resources`] instantiates both for cats, dogs and todos.

pub mod api;
pub mod app;
pub mod config;
pub mod mvi;
pub mod query;
pub mod request;
pub mod resources;
pub mod store;
pub mod telemetry;
