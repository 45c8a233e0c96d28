//! Authentication: the Basic credential authorizer and the route guard built on it.

pub mod basic;
pub mod middleware;

pub use basic::{AuthorizerEvent, AuthorizerResponse, BasicAuthorizer, Decision, Effect};
