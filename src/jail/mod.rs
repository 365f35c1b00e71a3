//! Jail enforcement core: identity classification, topic rewriting, and
//! access decisions
//!
//! Jailed clients are confined to a private subtree of the topic space keyed
//! by their client identifier. The rewriter prepends the identifier on the
//! way in (publish, subscribe, unsubscribe) and strips it on the way out
//! (delivery), so a jailed client always sees topics relative to its own
//! root while the broker's namespace stays globally flat. The access decider
//! grants jailed clients a fixed provisioning handshake on literal topic
//! patterns that are not subject to the rewrite.

mod access;
mod identity;
mod rewrite;

pub use access::{AccessDecider, AccessDecision, AccessKind};
pub use identity::is_jailed;
pub use rewrite::{TopicRewrite, TopicRewriter};
