//! Access decisions for jailed clients
//!
//! Jailed clients are denied by default; the decider grants only the fixed
//! provisioning handshake topics, matched as literal prefixes independent of
//! the per-client rewrite. Exempt clients are always allowed.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::JailConfig;
use crate::error::Result;
use crate::jail::identity::is_jailed;

/// The operation class being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Message delivery to the client
    Read,
    /// Publish from the client
    Write,
    /// Subscription request
    Subscribe,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Read => write!(f, "Read"),
            AccessKind::Write => write!(f, "Write"),
            AccessKind::Subscribe => write!(f, "Subscribe"),
        }
    }
}

/// Access decision outcome. A denial is a normal decision, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is allowed
    Allowed,
    /// Access is denied
    Denied,
}

/// Evaluates authorization requests against the fixed provisioning exception
/// topics.
///
/// Rules are evaluated in order, allowing on first match and denying
/// otherwise:
///
/// 1. Exempt client: allowed, no further checks.
/// 2. `Subscribe` on the configured response filter (trailing `#` excluded
///    from the compared prefix).
/// 3. `Read` on the client's jailed copy of the response filter,
///    `<client_id>/<sub_topic>` (same wildcard trim). Deliveries reach a
///    jailed client under its own prefix, so the pattern is compared with
///    the client id prepended.
/// 4. `Write` on the registration or status topics.
/// 5. Denied.
#[derive(Debug, Clone)]
pub struct AccessDecider {
    config: Arc<JailConfig>,
}

impl AccessDecider {
    /// Create a decider sharing an already-validated configuration.
    pub fn new(config: Arc<JailConfig>) -> Self {
        Self { config }
    }

    /// Check whether `client_id` may perform `access` on `topic`.
    ///
    /// Only the `Read` rule allocates (to build the prefixed comparison
    /// pattern); allocation failure propagates as
    /// [`crate::JailError::OutOfMemory`] and must fail the whole operation,
    /// never degrade into a silent deny or allow.
    pub fn check(
        &self,
        client_id: &str,
        topic: &str,
        access: AccessKind,
    ) -> Result<AccessDecision> {
        if !is_jailed(&self.config, client_id) {
            return Ok(AccessDecision::Allowed);
        }

        let topic_bytes = topic.as_bytes();
        match access {
            AccessKind::Subscribe => {
                if topic_bytes.starts_with(trimmed(&self.config.sub_topic)) {
                    debug!(
                        client_id = %client_id,
                        topic = %topic,
                        "Subscribe allowed on provisioning response filter"
                    );
                    return Ok(AccessDecision::Allowed);
                }
            }
            AccessKind::Read => {
                let pattern = jailed_read_pattern(client_id, &self.config.sub_topic)?;
                if topic_bytes.starts_with(&pattern) {
                    debug!(
                        client_id = %client_id,
                        topic = %topic,
                        "Read allowed on jailed provisioning response topic"
                    );
                    return Ok(AccessDecision::Allowed);
                }
            }
            AccessKind::Write => {
                if topic_bytes.starts_with(trimmed(&self.config.put_topic))
                    || topic_bytes.starts_with(trimmed(&self.config.get_topic))
                {
                    debug!(
                        client_id = %client_id,
                        topic = %topic,
                        "Write allowed on provisioning request topic"
                    );
                    return Ok(AccessDecision::Allowed);
                }
            }
        }

        warn!(
            client_id = %client_id,
            topic = %topic,
            access = %access,
            "Access denied (outside jail exceptions)"
        );
        Ok(AccessDecision::Denied)
    }
}

/// The configured pattern minus its final byte.
///
/// The subscribe pattern ends in a `#` wildcard, which must not take part in
/// the literal prefix comparison. The same one-byte trim is applied to the
/// write patterns even though they carry no wildcard, preserving the original
/// broker plugin's comparison lengths (it very slightly under-matches those
/// patterns).
fn trimmed(pattern: &str) -> &[u8] {
    let bytes = pattern.as_bytes();
    &bytes[..bytes.len().saturating_sub(1)]
}

/// Build the jailed read pattern `<client_id>/<sub_topic minus wildcard>` in
/// a single exact-size fallible allocation.
fn jailed_read_pattern(client_id: &str, sub_topic: &str) -> Result<Vec<u8>> {
    let pattern = trimmed(sub_topic);
    let mut out = Vec::new();
    out.try_reserve_exact(client_id.len() + 1 + pattern.len())?;
    out.extend_from_slice(client_id.as_bytes());
    out.push(b'/');
    out.extend_from_slice(pattern);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decider() -> AccessDecider {
        AccessDecider::new(Arc::new(JailConfig::default()))
    }

    #[test]
    fn test_exempt_client_always_allowed() {
        let d = decider();

        for access in [AccessKind::Read, AccessKind::Write, AccessKind::Subscribe] {
            let decision = d.check("admin", "any/topic/at/all", access).unwrap();
            assert_eq!(decision, AccessDecision::Allowed);
        }
    }

    #[test]
    fn test_subscribe_to_provisioning_response_filter() {
        let decision = decider()
            .check("dev1", "$dps/registrations/res/#", AccessKind::Subscribe)
            .unwrap();

        assert_eq!(decision, AccessDecision::Allowed);
    }

    #[test]
    fn test_subscribe_elsewhere_denied() {
        let decision = decider()
            .check("dev1", "dev1/other/#", AccessKind::Subscribe)
            .unwrap();

        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn test_read_of_jailed_response_topic() {
        let decision = decider()
            .check("dev1", "dev1/$dps/registrations/res/abc", AccessKind::Read)
            .unwrap();

        assert_eq!(decision, AccessDecision::Allowed);
    }

    #[test]
    fn test_read_without_own_prefix_denied() {
        let d = decider();

        // The raw response topic is only readable under the client's prefix
        let decision = d
            .check("dev1", "$dps/registrations/res/abc", AccessKind::Read)
            .unwrap();
        assert_eq!(decision, AccessDecision::Denied);

        // Another client's copy is off limits
        let decision = d
            .check("dev1", "dev2/$dps/registrations/res/abc", AccessKind::Read)
            .unwrap();
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn test_write_to_registration_topic() {
        let decision = decider()
            .check(
                "dev1",
                "$dps/registrations/PUT/iotdps-register/x",
                AccessKind::Write,
            )
            .unwrap();

        assert_eq!(decision, AccessDecision::Allowed);
    }

    #[test]
    fn test_write_to_status_topic() {
        let decision = decider()
            .check(
                "dev1",
                "$dps/registrations/GET/iotdps-get-operationstatus/op1",
                AccessKind::Write,
            )
            .unwrap();

        assert_eq!(decision, AccessDecision::Allowed);
    }

    #[test]
    fn test_write_elsewhere_denied() {
        let decision = decider()
            .check("dev1", "dev1/something/else", AccessKind::Write)
            .unwrap();

        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn test_write_pattern_final_byte_excluded() {
        // The write patterns are compared minus their final character, so a
        // topic missing the trailing '/' of the configured pattern still
        // matches. Preserved from the original comparison arithmetic.
        let decision = decider()
            .check(
                "dev1",
                "$dps/registrations/PUT/iotdps-register",
                AccessKind::Write,
            )
            .unwrap();

        assert_eq!(decision, AccessDecision::Allowed);
    }

    #[test]
    fn test_access_kinds_do_not_cross_match() {
        let d = decider();

        // A write to the subscribe filter is not covered by any write rule
        let decision = d
            .check("dev1", "$dps/registrations/res/abc", AccessKind::Write)
            .unwrap();
        assert_eq!(decision, AccessDecision::Denied);

        // A subscription to the registration topic is not covered either
        let decision = d
            .check(
                "dev1",
                "$dps/registrations/PUT/iotdps-register/x",
                AccessKind::Subscribe,
            )
            .unwrap();
        assert_eq!(decision, AccessDecision::Denied);
    }
}
