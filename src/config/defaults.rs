//! Default constants for the jail configuration
//!
//! These constants define the built-in values used when the host supplies no
//! explicit option. The topic defaults target the Azure-style device
//! provisioning handshake the jail leaves reachable.

/// Default admin identifier prefix; clients whose identifier starts with this
/// prefix are exempt from jailing
pub const DEFAULT_ADMIN_ID: &str = "admin";

/// Default provisioning status topic, always writable by jailed clients
pub const DEFAULT_GET_TOPIC: &str = "$dps/registrations/GET/iotdps-get-operationstatus/";

/// Default provisioning registration topic, always writable by jailed clients
pub const DEFAULT_PUT_TOPIC: &str = "$dps/registrations/PUT/iotdps-register/";

/// Default provisioning response filter, always subscribable by jailed
/// clients; responses delivered under the client's own prefix are readable
pub const DEFAULT_SUB_TOPIC: &str = "$dps/registrations/res/#";
