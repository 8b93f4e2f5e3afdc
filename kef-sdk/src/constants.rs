//! Integration-wide constants

/// Integration domain, also the default coordinator name
pub const DOMAIN: &str = "kef";

/// Entity name used until the speaker has reported its own
pub const DEFAULT_NAME: &str = "KEF Speaker";

/// Key of the only configuration field
pub const CONF_HOST: &str = "host";

/// Polling interval in seconds
pub const UPDATE_INTERVAL: u64 = kef_coordinator::UPDATE_INTERVAL;

/// Models the integration has been used with
pub const SUPPORTED_MODELS: [&str; 3] = ["LS50 Wireless II", "LSX II", "LS60"];

/// Physical sources as `(connector key, display name)`, in presentation order
pub const KEF_SOURCES: [(&str, &str); 6] = [
    ("wifi", "WiFi"),
    ("bluetooth", "Bluetooth"),
    ("aux", "Aux"),
    ("optical", "Optical"),
    ("coaxial", "Coaxial"),
    ("usb", "USB"),
];

/// Display name for a connector source key
pub fn source_display_name(key: &str) -> Option<&'static str> {
    KEF_SOURCES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
}

/// Connector source key for a display name
pub fn source_key(display_name: &str) -> Option<&'static str> {
    KEF_SOURCES
        .iter()
        .find(|(_, name)| *name == display_name)
        .map(|(key, _)| *key)
}
