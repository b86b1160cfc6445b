mod common;

use common::setup_config_env;
use medipanel_core::{
    config::PanelConfig,
    entities::{EntityForm, PatientForm},
    wizard::Purpose,
};

#[test]
fn saved_config_survives_reload() {
    let manager = setup_config_env();
    let config = PanelConfig {
        locale: "en-US".into(),
        api_base_url: "https://clinic.example/api".into(),
        submit_timeout_secs: Some(20),
    };
    manager.save(&config).expect("save config");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.endpoint_url("patients/"), "https://clinic.example/api/patients/");
}

#[test]
fn malformed_config_is_an_error() {
    let manager = setup_config_env();
    std::fs::write(manager.path(), "{ not json").expect("write garbage");
    assert!(manager.load().is_err());
}

#[tokio::test]
async fn configured_deadline_bounds_submission() {
    use std::time::Duration;

    use medipanel_core::wizard::{finish_fn, FieldValue, FormData, SubmitOutcome, SubmitStatus};

    let manager = setup_config_env();
    manager
        .save(&PanelConfig {
            submit_timeout_secs: Some(1),
            ..PanelConfig::default()
        })
        .expect("save config");
    let config = manager.load().expect("load config");
    assert_eq!(config.submit_deadline(), Some(Duration::from_secs(1)));

    let mut wizard = PatientForm.wizard(Purpose::Create, &config);
    let data: FormData = [
        ("first_name", "José"),
        ("last_name", "Pérez"),
        ("document_id", "24123456"),
        ("birth_date", "1990-05-17"),
        ("gender", "male"),
        ("email", "jose@correo.ve"),
        ("phone", "04121234567"),
        ("address", "Valencia"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), FieldValue::from(value)))
    .collect();
    wizard.open(data);

    let slow = finish_fn(|_, _| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(SubmitOutcome::Success)
    });
    assert_eq!(wizard.submit(&slow).await, SubmitStatus::Failed);
    assert_eq!(
        wizard.server_error_message(),
        "The server took longer than 1s to answer"
    );
    assert!(!wizard.is_submitting());
    assert!(wizard.is_visible());
}
