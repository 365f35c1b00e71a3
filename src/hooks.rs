//! Host-facing hook interface and registry
//!
//! The broker drives the jail: it calls one handler per event kind for every
//! client action and adopts whatever the handler returns. Handlers borrow
//! their inputs and return either "unchanged" or a freshly owned replacement
//! topic; for authorization checks they return a decision. Handler failures
//! (allocation) are distinct from denials and abort the event.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{JailError, Result};
use crate::jail::{AccessDecision, AccessKind, TopicRewrite};

/// An inbound or outbound publish event
#[derive(Debug, Clone, Copy)]
pub struct MessageEvent<'a> {
    /// Identifier of the publishing or receiving client
    pub client_id: &'a str,
    /// Topic the message is published on / delivered under
    pub topic: &'a str,
}

/// A subscribe or unsubscribe event
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionEvent<'a> {
    /// Identifier of the subscribing client
    pub client_id: &'a str,
    /// Subscription filter as supplied by the client
    pub filter: &'a str,
}

/// An authorization check event
#[derive(Debug, Clone, Copy)]
pub struct AccessCheckEvent<'a> {
    /// Identifier of the acting client
    pub client_id: &'a str,
    /// Topic or filter the check applies to
    pub topic: &'a str,
    /// Operation class being authorized
    pub access: AccessKind,
}

/// Broker interception points, one method per event kind.
///
/// Defaults pass everything through, so a hook implements only the events it
/// cares about.
pub trait BrokerHooks: Send + Sync {
    /// Unique name for this hook
    fn name(&self) -> &str;

    /// Authorization check for a client action
    fn on_acl_check(&self, _event: &AccessCheckEvent<'_>) -> Result<AccessDecision> {
        Ok(AccessDecision::Allowed)
    }

    /// Called for every message published by a client
    fn on_message_in(&self, _event: &MessageEvent<'_>) -> Result<TopicRewrite> {
        Ok(TopicRewrite::Unchanged)
    }

    /// Called for every message delivered to a client
    fn on_message_out(&self, _event: &MessageEvent<'_>) -> Result<TopicRewrite> {
        Ok(TopicRewrite::Unchanged)
    }

    /// Called for every subscription request
    fn on_subscribe(&self, _event: &SubscriptionEvent<'_>) -> Result<TopicRewrite> {
        Ok(TopicRewrite::Unchanged)
    }

    /// Called for every unsubscribe request
    fn on_unsubscribe(&self, _event: &SubscriptionEvent<'_>) -> Result<TopicRewrite> {
        Ok(TopicRewrite::Unchanged)
    }
}

/// Registry the host dispatches broker events through.
///
/// Hooks run in registration order. Rewrite dispatches chain: each hook sees
/// the topic as rewritten by the hooks before it. The authorization dispatch
/// short-circuits on the first denial. Any hook error aborts the dispatch and
/// propagates; the event must be treated as not completed.
pub struct HookRegistry {
    names: RwLock<HashSet<String>>,
    hooks: RwLock<Vec<Arc<dyn BrokerHooks>>>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            names: RwLock::new(HashSet::new()),
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Register a hook for all event kinds.
    ///
    /// Fails with [`JailError::HookAlreadyRegistered`] if a hook with the
    /// same name is present; the registry is left unchanged in that case.
    pub fn register<T: BrokerHooks + 'static>(&self, hook: T) -> Result<()> {
        let name = hook.name().to_string();

        let mut names = self.names.write();
        if !names.insert(name.clone()) {
            return Err(JailError::HookAlreadyRegistered(name));
        }
        self.hooks.write().push(Arc::new(hook));

        Ok(())
    }

    /// Names of all registered hooks, in registration order
    pub fn hook_names(&self) -> Vec<String> {
        self.hooks
            .read()
            .iter()
            .map(|hook| hook.name().to_string())
            .collect()
    }

    /// Number of registered hooks
    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    /// Run an authorization check through all hooks. Denies on the first
    /// denial, allows when every hook allows.
    pub fn dispatch_acl_check(&self, event: &AccessCheckEvent<'_>) -> Result<AccessDecision> {
        for hook in self.hooks.read().iter() {
            if hook.on_acl_check(event)? == AccessDecision::Denied {
                return Ok(AccessDecision::Denied);
            }
        }
        Ok(AccessDecision::Allowed)
    }

    /// Run an inbound publish through all hooks, chaining replacements.
    pub fn dispatch_message_in(&self, event: &MessageEvent<'_>) -> Result<TopicRewrite> {
        self.dispatch_rewrite(event.topic, |hook, topic| {
            hook.on_message_in(&MessageEvent {
                client_id: event.client_id,
                topic,
            })
        })
    }

    /// Run an outbound delivery through all hooks, chaining replacements.
    pub fn dispatch_message_out(&self, event: &MessageEvent<'_>) -> Result<TopicRewrite> {
        self.dispatch_rewrite(event.topic, |hook, topic| {
            hook.on_message_out(&MessageEvent {
                client_id: event.client_id,
                topic,
            })
        })
    }

    /// Run a subscription request through all hooks, chaining replacements.
    pub fn dispatch_subscribe(&self, event: &SubscriptionEvent<'_>) -> Result<TopicRewrite> {
        self.dispatch_rewrite(event.filter, |hook, filter| {
            hook.on_subscribe(&SubscriptionEvent {
                client_id: event.client_id,
                filter,
            })
        })
    }

    /// Run an unsubscribe request through all hooks, chaining replacements.
    pub fn dispatch_unsubscribe(&self, event: &SubscriptionEvent<'_>) -> Result<TopicRewrite> {
        self.dispatch_rewrite(event.filter, |hook, filter| {
            hook.on_unsubscribe(&SubscriptionEvent {
                client_id: event.client_id,
                filter,
            })
        })
    }

    fn dispatch_rewrite(
        &self,
        original: &str,
        mut call: impl FnMut(&dyn BrokerHooks, &str) -> Result<TopicRewrite>,
    ) -> Result<TopicRewrite> {
        let mut current: Option<String> = None;
        for hook in self.hooks.read().iter() {
            let topic = current.as_deref().unwrap_or(original);
            if let TopicRewrite::Replaced(next) = call(hook.as_ref(), topic)? {
                current = Some(next);
            }
        }
        Ok(current.map_or(TopicRewrite::Unchanged, TopicRewrite::Replaced))
    }
}
