//! Portico Core: domain models, the permission evaluator, navigation
//! tree filtering and the endpoint traits the session layer consumes.

pub mod authorize;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod route_tree;

pub use authorize::{is_authorized, is_authorized_for};
pub use error::{PorticoError, PorticoResult};
pub use route_tree::{filter_route_tree, find_route, required_permission};
