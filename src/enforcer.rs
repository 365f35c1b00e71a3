//! The jail enforcer: one hook implementing all five interception points

use std::sync::Arc;

use crate::config::JailConfig;
use crate::error::Result;
use crate::hooks::{AccessCheckEvent, BrokerHooks, HookRegistry, MessageEvent, SubscriptionEvent};
use crate::jail::{self, AccessDecider, AccessDecision, TopicRewrite, TopicRewriter};

/// Hook name the enforcer registers under
pub const ENFORCER_NAME: &str = "topic-jail";

/// Enforces per-client topic namespace isolation.
///
/// Holds the shared read-only configuration and implements [`BrokerHooks`]:
/// the rewriter makes the jail transparent to jailed clients, the decider
/// keeps the fixed provisioning handshake reachable. Stateless across calls;
/// safe to invoke concurrently from multiple connection threads.
#[derive(Debug, Clone)]
pub struct JailEnforcer {
    config: Arc<JailConfig>,
    rewriter: TopicRewriter,
    decider: AccessDecider,
}

impl JailEnforcer {
    /// Create an enforcer, validating the configuration and emitting the
    /// startup line listing the active values.
    pub fn new(config: JailConfig) -> Result<Self> {
        config.validate()?;
        config.log_active();

        let config = Arc::new(config);
        Ok(Self {
            rewriter: TopicRewriter::new(Arc::clone(&config)),
            decider: AccessDecider::new(Arc::clone(&config)),
            config,
        })
    }

    /// Create an enforcer from defaults plus host-supplied option overrides.
    pub fn from_options<'a, I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(JailConfig::from_options(options)?)
    }

    /// The active configuration
    pub fn config(&self) -> &JailConfig {
        &self.config
    }

    /// Whether a client identifier is jailed
    pub fn is_jailed(&self, client_id: &str) -> bool {
        jail::is_jailed(&self.config, client_id)
    }

    /// Register this enforcer with the host's registry. Registration covers
    /// all five event kinds at once; failure must abort startup.
    pub fn register(self, registry: &HookRegistry) -> Result<()> {
        registry.register(self)
    }
}

impl BrokerHooks for JailEnforcer {
    fn name(&self) -> &str {
        ENFORCER_NAME
    }

    fn on_acl_check(&self, event: &AccessCheckEvent<'_>) -> Result<AccessDecision> {
        self.decider.check(event.client_id, event.topic, event.access)
    }

    fn on_message_in(&self, event: &MessageEvent<'_>) -> Result<TopicRewrite> {
        self.rewriter.message_in(event.client_id, event.topic)
    }

    fn on_message_out(&self, event: &MessageEvent<'_>) -> Result<TopicRewrite> {
        self.rewriter.message_out(event.client_id, event.topic)
    }

    fn on_subscribe(&self, event: &SubscriptionEvent<'_>) -> Result<TopicRewrite> {
        self.rewriter.subscribe(event.client_id, event.filter)
    }

    fn on_unsubscribe(&self, event: &SubscriptionEvent<'_>) -> Result<TopicRewrite> {
        self.rewriter.unsubscribe(event.client_id, event.filter)
    }
}
