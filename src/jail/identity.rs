//! Identity classification: jailed vs. exempt

use crate::config::JailConfig;

/// Return `true` if the client is jailed, `false` if it is exempt.
///
/// A client is exempt iff its identifier starts with the configured admin
/// identifier. This is a raw byte-prefix test, not an equality or
/// segment-boundary test: with the default config, `"admin2"` and
/// `"admin-backup"` are exempt as well. The empty identifier is jailed.
///
/// Pure and allocation-free; called on every intercepted event.
pub fn is_jailed(config: &JailConfig, client_id: &str) -> bool {
    !client_id
        .as_bytes()
        .starts_with(config.admin_id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_exempt() {
        let config = JailConfig::default();

        assert!(!is_jailed(&config, "admin"));
    }

    #[test]
    fn test_admin_prefix_is_exempt() {
        let config = JailConfig::default();

        // Raw prefix match, not a segment-boundary match
        assert!(!is_jailed(&config, "admin2"));
        assert!(!is_jailed(&config, "admin-backup"));
        assert!(!is_jailed(&config, "administrator"));
    }

    #[test]
    fn test_other_clients_are_jailed() {
        let config = JailConfig::default();

        assert!(is_jailed(&config, "dev1"));
        assert!(is_jailed(&config, "adm"));
        // Case-sensitive
        assert!(is_jailed(&config, "Admin"));
    }

    #[test]
    fn test_empty_identifier_is_jailed() {
        let config = JailConfig::default();

        assert!(is_jailed(&config, ""));
    }

    #[test]
    fn test_custom_admin_identifier() {
        let config = JailConfig::from_options([("username", "ops")]).unwrap();

        assert!(!is_jailed(&config, "ops-eu-1"));
        assert!(is_jailed(&config, "admin"));
    }
}
