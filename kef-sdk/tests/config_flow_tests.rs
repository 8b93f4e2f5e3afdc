//! Setup flow outcomes

mod common;

use std::collections::BTreeMap;

use common::{MockSpeakers, RecordingConnector};
use kef_sdk::config_flow::{ABORT_ALREADY_CONFIGURED, ERROR_CANNOT_CONNECT, ERROR_INVALID_HOST, STEP_USER};
use kef_sdk::{
    validate_host, ApiError, ClientConfig, ConfigEntry, ConfigFlow, EntryData, FlowResult,
    IntegrationConfig, KefIntegration, SdkError, UserInput,
};
use rstest::rstest;

fn form_error(field: &'static str, error: &'static str) -> FlowResult {
    FlowResult::ShowForm {
        step_id: STEP_USER,
        errors: BTreeMap::from([(field, error)]),
    }
}

#[tokio::test]
async fn test_no_input_shows_empty_form() {
    let speakers = MockSpeakers::new();
    let flow = ConfigFlow::new(speakers.factory(), ClientConfig::default(), Vec::new());

    assert_eq!(
        flow.step_user(None).await,
        FlowResult::ShowForm {
            step_id: STEP_USER,
            errors: BTreeMap::new(),
        }
    );
    assert_eq!(speakers.factory_calls(), 0);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[tokio::test]
async fn test_blank_host_is_invalid(#[case] host: &str) {
    let speakers = MockSpeakers::new();
    let flow = ConfigFlow::new(speakers.factory(), ClientConfig::default(), Vec::new());

    let result = flow.step_user(Some(UserInput::new(host))).await;

    assert_eq!(result, form_error("host", ERROR_INVALID_HOST));
    assert_eq!(speakers.factory_calls(), 0);
}

#[tokio::test]
async fn test_reachable_speaker_creates_entry() {
    let speakers = MockSpeakers::new();
    speakers.add("192.168.1.50");
    let flow = ConfigFlow::new(speakers.factory(), ClientConfig::default(), Vec::new());

    let result = flow.step_user(Some(UserInput::new(" 192.168.1.50 "))).await;

    assert_eq!(
        result,
        FlowResult::CreateEntry {
            title: "Living Room".to_string(),
            data: EntryData {
                host: "192.168.1.50".to_string(),
            },
        }
    );
}

#[tokio::test]
async fn test_unreachable_speaker_cannot_connect() {
    let speakers = MockSpeakers::new();
    let flow = ConfigFlow::new(speakers.factory(), ClientConfig::default(), Vec::new());

    let result = flow.step_user(Some(UserInput::new("10.0.0.99"))).await;

    assert_eq!(result, form_error("base", ERROR_CANNOT_CONNECT));
}

#[rstest]
#[case::timeout(Some(ApiError::Timeout), "Living Room")]
#[case::empty_name(None, "")]
#[case::blank_name(None, "  ")]
#[tokio::test]
async fn test_failed_probe_cannot_connect(#[case] error: Option<ApiError>, #[case] name: &str) {
    let speakers = MockSpeakers::new();
    let speaker = speakers.add("speaker.local");
    speaker.update(|s| s.speaker_name = name.to_string());
    speaker.fail_reads(error);
    let flow = ConfigFlow::new(speakers.factory(), ClientConfig::default(), Vec::new());

    let result = flow.step_user(Some(UserInput::new("speaker.local"))).await;

    assert_eq!(result, form_error("base", ERROR_CANNOT_CONNECT));
    assert_eq!(speaker.name_reads(), 1);
}

#[tokio::test]
async fn test_configured_host_aborts() {
    let speakers = MockSpeakers::new();
    speakers.add("speaker.local");
    let flow = ConfigFlow::new(
        speakers.factory(),
        ClientConfig::default(),
        vec!["speaker.local".to_string()],
    );

    let result = flow.step_user(Some(UserInput::new("speaker.local"))).await;

    assert_eq!(
        result,
        FlowResult::Abort {
            reason: ABORT_ALREADY_CONFIGURED,
        }
    );
}

#[tokio::test]
async fn test_integration_flow_knows_set_up_entries() {
    let speakers = MockSpeakers::new();
    speakers.add("speaker.local");
    speakers.add("study.local");
    let integration =
        KefIntegration::with_connector_factory(IntegrationConfig::default(), speakers.factory()).unwrap();
    integration
        .setup_entry(ConfigEntry::new("1", "Living Room", "speaker.local"))
        .await
        .unwrap();

    let flow = integration.config_flow();

    assert!(matches!(
        flow.step_user(Some(UserInput::new("speaker.local"))).await,
        FlowResult::Abort { .. }
    ));
    assert!(matches!(
        flow.step_user(Some(UserInput::new("study.local"))).await,
        FlowResult::CreateEntry { .. }
    ));

    integration.shutdown().await;
}

#[tokio::test]
async fn test_validate_host_reports_cause() {
    let speaker = RecordingConnector::new("speaker.local");
    assert_eq!(validate_host(&speaker).await.unwrap(), "Living Room");

    speaker.fail_reads(Some(ApiError::HttpStatus(404)));
    let err = validate_host(&speaker).await.unwrap_err();
    match err {
        SdkError::CannotConnect { host, reason } => {
            assert_eq!(host, "speaker.local");
            assert!(reason.contains("404"), "reason: {}", reason);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_flow_result_serializes_tagged() {
    let json = serde_json::to_value(form_error("base", ERROR_CANNOT_CONNECT)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "show_form",
            "step_id": "user",
            "errors": { "base": "cannot_connect" }
        })
    );
}
