//! Topic rewriting for jailed clients
//!
//! The rewriter borrows the original topic and either leaves it alone or
//! returns a freshly owned replacement; it never mutates the input. Ownership
//! of a returned replacement transfers to the caller, ownership of the
//! original always stays with the caller.

use std::sync::Arc;

use crate::config::JailConfig;
use crate::error::Result;
use crate::jail::identity::is_jailed;

/// Outcome of a rewrite: keep the original topic or adopt a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicRewrite {
    /// The original topic stands unchanged
    Unchanged,
    /// A freshly owned replacement topic the caller must adopt
    Replaced(String),
}

impl TopicRewrite {
    /// Resolve against the original topic: the replacement if there is one,
    /// the original otherwise.
    pub fn resolve<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            TopicRewrite::Unchanged => original,
            TopicRewrite::Replaced(topic) => topic,
        }
    }
}

/// Rewrites topics so the jail is invisible to jailed clients.
///
/// Inbound publishes and (un)subscriptions get the client identifier
/// prepended as the leading path segment; outbound deliveries get one
/// matching layer stripped. Exempt clients pass through untouched.
#[derive(Debug, Clone)]
pub struct TopicRewriter {
    config: Arc<JailConfig>,
}

impl TopicRewriter {
    /// Create a rewriter sharing an already-validated configuration.
    pub fn new(config: Arc<JailConfig>) -> Self {
        Self { config }
    }

    /// Rewrite an inbound publish: jailed publishers get
    /// `<client_id>/<topic>`, exempt publishers pass through.
    pub fn message_in(&self, client_id: &str, topic: &str) -> Result<TopicRewrite> {
        if !is_jailed(&self.config, client_id) {
            return Ok(TopicRewrite::Unchanged);
        }
        Ok(TopicRewrite::Replaced(prefix_topic(client_id, topic)?))
    }

    /// Rewrite an outbound delivery: strip one `<client_id>/` layer from the
    /// front of the topic when present.
    ///
    /// Topics too short to carry the prefix, or not starting with it, pass
    /// through unchanged; that is normal for admin-sourced or broker-internal
    /// messages delivered to a jailed client, not an error.
    pub fn message_out(&self, client_id: &str, topic: &str) -> Result<TopicRewrite> {
        if !is_jailed(&self.config, client_id) {
            return Ok(TopicRewrite::Unchanged);
        }

        let id = client_id.as_bytes();
        let bytes = topic.as_bytes();
        if bytes.len() <= id.len() + 1 {
            // Not long enough to contain the client id plus '/'
            return Ok(TopicRewrite::Unchanged);
        }
        if !bytes.starts_with(id) || bytes[id.len()] != b'/' {
            return Ok(TopicRewrite::Unchanged);
        }

        let suffix = &topic[id.len() + 1..];
        let mut stripped = reserved(suffix.len())?;
        stripped.push_str(suffix);
        Ok(TopicRewrite::Replaced(stripped))
    }

    /// Rewrite a subscription filter: jailed subscribers get
    /// `<client_id>/<filter>` unconditionally.
    pub fn subscribe(&self, client_id: &str, filter: &str) -> Result<TopicRewrite> {
        if !is_jailed(&self.config, client_id) {
            return Ok(TopicRewrite::Unchanged);
        }
        Ok(TopicRewrite::Replaced(prefix_topic(client_id, filter)?))
    }

    /// Rewrite an unsubscribe filter with the same prepend rule as
    /// [`TopicRewriter::subscribe`], so the request resolves to the same
    /// stored filter the subscription was rewritten to.
    pub fn unsubscribe(&self, client_id: &str, filter: &str) -> Result<TopicRewrite> {
        self.subscribe(client_id, filter)
    }
}

/// Build `<client_id>/<topic>` in a single exact-size allocation.
fn prefix_topic(client_id: &str, topic: &str) -> Result<String> {
    let mut out = reserved(client_id.len() + 1 + topic.len())?;
    out.push_str(client_id);
    out.push('/');
    out.push_str(topic);
    Ok(out)
}

/// Fallibly allocate an empty string with exactly `capacity` bytes reserved.
/// Every rewrite path builds its replacement through this, so allocation
/// failure surfaces as [`crate::JailError::OutOfMemory`] instead of aborting
/// the process.
fn reserved(capacity: usize) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(capacity)?;
    Ok(out)
}
