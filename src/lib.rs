#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

//! # topic-jail
//!
//! Per-client topic namespace isolation for publish/subscribe brokers.
//!
//! Ordinary ("jailed") clients are confined to a private subtree of the
//! topic space keyed by their client identifier; clients whose identifier
//! starts with the configured admin prefix are exempt and can address any
//! jailed client's subtree as `<clientid>/<topic>`. The jail is invisible to
//! jailed clients: their publishes and subscriptions get the identifier
//! prepended on the way in, and deliveries get it stripped on the way out,
//! so two jailed clients can never interact with each other.
//!
//! On top of the rewrite, an access decider keeps a fixed device-provisioning
//! handshake reachable for jailed clients: a response filter they may
//! subscribe to and two request topics they may publish to, matched as
//! literal prefixes. Everything else is denied, failing closed.
//!
//! ## Usage
//!
//! The host broker builds a [`JailEnforcer`] at startup, registers it with a
//! [`HookRegistry`], and dispatches every authorization check, publish,
//! delivery, subscribe, and unsubscribe through the registry:
//!
//! ```
//! use topic_jail::{
//!     AccessCheckEvent, AccessDecision, AccessKind, HookRegistry, JailEnforcer,
//!     MessageEvent, TopicRewrite,
//! };
//!
//! fn main() -> topic_jail::Result<()> {
//!     let registry = HookRegistry::new();
//!     JailEnforcer::from_options([("username", "admin")])?.register(&registry)?;
//!
//!     // A jailed client's publish lands under its own prefix
//!     let rewrite = registry.dispatch_message_in(&MessageEvent {
//!         client_id: "dev1",
//!         topic: "sensors/temp",
//!     })?;
//!     assert_eq!(rewrite, TopicRewrite::Replaced("dev1/sensors/temp".into()));
//!
//!     // The admin passes every check untouched
//!     let decision = registry.dispatch_acl_check(&AccessCheckEvent {
//!         client_id: "admin",
//!         topic: "dev1/sensors/temp",
//!         access: AccessKind::Read,
//!     })?;
//!     assert_eq!(decision, AccessDecision::Allowed);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: the four configuration values, defaults, overrides, TOML
//! - [`jail`]: identity classification, topic rewriting, access decisions
//! - [`hooks`]: the host-facing handler trait and dispatch registry
//! - [`enforcer`]: the [`JailEnforcer`] tying the pieces together
//! - [`error`]: error types and `Result` alias
//!
//! ## Ownership contract
//!
//! Handlers borrow the original topic and never mutate it. A
//! [`TopicRewrite::Replaced`] carries a freshly owned string whose lifetime
//! is the caller's responsibility; the original always remains owned by the
//! caller. Allocation failure surfaces as [`JailError::OutOfMemory`] and
//! aborts only the event in progress.

pub mod config;
pub mod enforcer;
pub mod error;
pub mod hooks;
pub mod jail;

pub use config::JailConfig;
pub use enforcer::{JailEnforcer, ENFORCER_NAME};
pub use error::{JailError, Result};
pub use hooks::{
    AccessCheckEvent, BrokerHooks, HookRegistry, MessageEvent, SubscriptionEvent,
};
pub use jail::{
    is_jailed, AccessDecider, AccessDecision, AccessKind, TopicRewrite, TopicRewriter,
};
