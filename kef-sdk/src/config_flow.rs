//! Interactive setup of a new speaker
//!
//! The flow has a single step: the user enters a host, the flow probes the
//! speaker for its name and either creates an entry titled after the
//! speaker, shows the form again with an error, or aborts because the host
//! is already configured.

use std::collections::{BTreeMap, HashSet};

use kef_api::{ClientConfig, SpeakerConnector};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::EntryData;
use crate::constants::CONF_HOST;
use crate::error::{Result, SdkError};
use crate::integration::ConnectorFactory;

pub const STEP_USER: &str = "user";
pub const ERROR_CANNOT_CONNECT: &str = "cannot_connect";
pub const ERROR_INVALID_HOST: &str = "invalid_host";
pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";

/// What the user typed into the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub host: String,
}

impl UserInput {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

/// Outcome of a flow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    /// Show the host form, with errors keyed by field (`base` for the whole form)
    ShowForm {
        step_id: &'static str,
        errors: BTreeMap<&'static str, &'static str>,
    },
    CreateEntry {
        title: String,
        data: EntryData,
    },
    Abort {
        reason: &'static str,
    },
}

impl FlowResult {
    fn form() -> Self {
        FlowResult::ShowForm {
            step_id: STEP_USER,
            errors: BTreeMap::new(),
        }
    }

    fn form_error(field: &'static str, error: &'static str) -> Self {
        FlowResult::ShowForm {
            step_id: STEP_USER,
            errors: BTreeMap::from([(field, error)]),
        }
    }
}

/// Probe a speaker and return its name
///
/// An unreachable speaker and one reporting an empty name are both treated
/// as a failed connection.
pub async fn validate_host(connector: &dyn SpeakerConnector) -> Result<String> {
    let host = connector.host();
    match connector.speaker_name().await {
        Ok(name) if !name.trim().is_empty() => {
            info!(host, name = %name, "Connected to KEF speaker");
            Ok(name)
        }
        Ok(_) => Err(SdkError::CannotConnect {
            host: host.to_string(),
            reason: "speaker reported an empty device name".to_string(),
        }),
        Err(e) => Err(SdkError::CannotConnect {
            host: host.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Setup flow for adding a speaker
///
/// Created through [`KefIntegration::config_flow`](crate::KefIntegration::config_flow)
/// so that it knows which hosts are already configured.
pub struct ConfigFlow {
    factory: ConnectorFactory,
    client: ClientConfig,
    configured: HashSet<String>,
}

impl ConfigFlow {
    pub fn new(
        factory: ConnectorFactory,
        client: ClientConfig,
        configured: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            factory,
            client,
            configured: configured.into_iter().collect(),
        }
    }

    /// Handle the user step
    pub async fn step_user(&self, input: Option<UserInput>) -> FlowResult {
        let Some(input) = input else {
            return FlowResult::form();
        };

        let host = input.host.trim();
        if host.is_empty() {
            return FlowResult::form_error(CONF_HOST, ERROR_INVALID_HOST);
        }

        let probe = match (self.factory)(host, &self.client) {
            Ok(connector) => validate_host(connector.as_ref()).await,
            Err(e) => Err(SdkError::CannotConnect {
                host: host.to_string(),
                reason: e.to_string(),
            }),
        };

        let name = match probe {
            Ok(name) => name,
            Err(e) => {
                error!(host, error = %e, "Error connecting to KEF speaker");
                return FlowResult::form_error("base", ERROR_CANNOT_CONNECT);
            }
        };

        if self.configured.contains(host) {
            return FlowResult::Abort {
                reason: ABORT_ALREADY_CONFIGURED,
            };
        }

        FlowResult::CreateEntry {
            title: name,
            data: EntryData {
                host: host.to_string(),
            },
        }
    }
}
