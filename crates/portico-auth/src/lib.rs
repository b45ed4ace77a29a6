//! Portico Auth: credential store, single-flight credential refresh,
//! the session bootstrap gate and per-page route guarding.

pub mod config;
pub mod error;
pub mod gate;
pub mod guard;
pub mod refresher;
pub mod service;
pub mod store;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use gate::{GatePhase, GateView, Readiness, SessionContext, SessionGate};
pub use guard::{EffectScope, EffectTicket, GuardDecision, PageState, Redirect, RouteGuard};
pub use refresher::CredentialRefresher;
pub use service::SessionService;
pub use store::{CredentialStore, SessionSnapshot, SessionState};
