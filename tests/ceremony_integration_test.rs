// End-to-end ceremonies against the stub authenticator
use std::error::Error as _;

use serde_json::Value;
use vouchrs_ceremony::testing::constants::{
    TEST_CHALLENGE, TEST_CREDENTIAL_ID, TEST_SIGNATURE, TEST_USER_HANDLE,
};
use vouchrs_ceremony::testing::{StubAuthenticator, TestFixtures};
use vouchrs_ceremony::webauthn::{
    base64url, AttestationConveyancePreference, AttestationStatement, ClientDataType,
    ClientExtensionOutput, Origin, TokenBindingStatus, SUPPORTED_EXTENSIONS,
};
use vouchrs_ceremony::{
    Aaguid, AuthenticatorError, CeremonyError, ClientPlatform, RegistrationEmulationOptions,
};

fn client_with(stub: StubAuthenticator) -> ClientPlatform {
    ClientPlatform::new(TestFixtures::origin(), stub)
}

#[test]
fn test_none_conveyance_strips_attestation() {
    let mut client = client_with(StubAuthenticator::new());
    let options =
        TestFixtures::creation_options_with_conveyance(AttestationConveyancePreference::None);

    let credential = client.create_with_defaults(&options).unwrap();
    let attestation_object = credential.response().decode_attestation_object().unwrap();

    assert_eq!(attestation_object.format(), "none");
    assert_eq!(attestation_object.attestation_statement, AttestationStatement::None);
    // Authenticator data survives the downgrade
    let attested = attestation_object
        .authenticator_data
        .attested_credential_data
        .unwrap();
    assert_eq!(attested.aaguid, Aaguid::ZERO);
    assert_eq!(attested.credential_id, TEST_CREDENTIAL_ID);
    assert_eq!(credential.raw_id(), TEST_CREDENTIAL_ID);
}

#[test]
fn test_unset_conveyance_behaves_like_none() {
    let mut client = client_with(StubAuthenticator::new());
    let credential = client
        .create_with_defaults(&TestFixtures::creation_options())
        .unwrap();

    let attestation_object = credential.response().decode_attestation_object().unwrap();
    assert!(attestation_object.attestation_statement.is_none());
}

#[test]
fn test_direct_conveyance_keeps_statement() {
    let mut client = client_with(
        StubAuthenticator::new().with_attestation_statement(TestFixtures::tpm_statement()),
    );
    let options =
        TestFixtures::creation_options_with_conveyance(AttestationConveyancePreference::Direct);

    let credential = client.create_with_defaults(&options).unwrap();
    let attestation_object = credential.response().decode_attestation_object().unwrap();
    assert_eq!(attestation_object.attestation_statement, TestFixtures::tpm_statement());
}

#[test]
fn test_unsupported_conveyance_is_not_implemented() {
    for preference in [
        AttestationConveyancePreference::Indirect,
        AttestationConveyancePreference::Enterprise,
        AttestationConveyancePreference::from("vendor-specific"),
    ] {
        let mut client = client_with(StubAuthenticator::new());
        let options = TestFixtures::creation_options_with_conveyance(preference);

        let err = client.create_with_defaults(&options).unwrap_err();
        assert!(err.is_not_implemented(), "unexpected error: {err}");
        assert!(!err.is_retryable());
    }
}

#[test]
fn test_get_assertion_without_authenticator() {
    let stub = StubAuthenticator::new();
    let counter = stub.call_counter();
    let mut client = client_with(stub);
    let _ = client.unbind_authenticator();

    let err = client
        .get_assertion(&TestFixtures::request_options())
        .unwrap_err();
    assert!(err.is_unbound_authenticator());
    assert_eq!(counter.total(), 0);

    let err = client
        .create_with_defaults(&TestFixtures::creation_options())
        .unwrap_err();
    assert!(matches!(err, CeremonyError::UnboundAuthenticator));
    assert_eq!(counter.total(), 0);
}

#[test]
fn test_validation_failure_is_aggregated() {
    let mut client = client_with(StubAuthenticator::new().failing_with(
        AuthenticatorError::Validation("unknown credential".to_string()),
    ));

    let err = client
        .get_assertion(&TestFixtures::request_options())
        .unwrap_err();

    assert!(matches!(err, CeremonyError::NoAuthenticatorSuccess(_)));
    assert!(err.is_authenticator_failure());
    assert_eq!(
        err.causes(),
        &[AuthenticatorError::Validation("unknown credential".to_string())]
    );
    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "Validation failed: unknown credential");
}

#[test]
fn test_non_validation_failure_propagates_unchanged() {
    let mut client = client_with(
        StubAuthenticator::new()
            .failing_with(AuthenticatorError::Internal("device unplugged".to_string())),
    );

    let err = client
        .get_assertion(&TestFixtures::request_options())
        .unwrap_err();
    assert!(matches!(
        err,
        CeremonyError::Authenticator(AuthenticatorError::Internal(_))
    ));
}

#[test]
fn test_unknown_allowed_credential_fails_validation() {
    let mut client = client_with(StubAuthenticator::new());
    let mut options = TestFixtures::request_options();
    options.allow_credentials = vec![TestFixtures::credential_descriptor(b"someone-else")];

    let err = client.get_assertion(&options).unwrap_err();
    assert_eq!(err.causes().len(), 1);
    assert!(err.causes()[0].is_validation());
}

#[test]
fn test_registration_reports_supported_extensions() {
    let mut client = client_with(StubAuthenticator::new());
    let credential = client
        .create_with_defaults(&TestFixtures::creation_options_with_extensions())
        .unwrap();

    assert_eq!(
        credential
            .client_extension_results()
            .get(SUPPORTED_EXTENSIONS),
        Some(&ClientExtensionOutput::Identifiers(vec![
            SUPPORTED_EXTENSIONS.to_string()
        ]))
    );
}

#[test]
fn test_authentication_drops_unhandled_extensions() {
    let mut client = client_with(StubAuthenticator::new());
    let mut options = TestFixtures::request_options();
    options.extensions = Some(
        vouchrs_ceremony::webauthn::ClientExtensionInputs::new().with_supported_extensions(true),
    );

    let credential = client.get_assertion(&options).unwrap();
    assert!(credential.client_extension_results().is_empty());
}

#[test]
fn test_client_data_matches_ceremony() {
    let mut client = client_with(StubAuthenticator::new());

    let registration = client
        .create_with_defaults(&TestFixtures::creation_options())
        .unwrap();
    let client_data = registration.response().decode_client_data().unwrap();
    assert_eq!(client_data.r#type, ClientDataType::Create);
    assert_eq!(client_data.challenge.as_bytes(), TEST_CHALLENGE);
    assert_eq!(client_data.origin, TestFixtures::origin());
    assert!(client_data.token_binding.is_none());

    let assertion = client
        .get_assertion(&TestFixtures::request_options())
        .unwrap();
    let client_data = assertion.response().decode_client_data().unwrap();
    assert_eq!(client_data.r#type, ClientDataType::Get);
    assert_eq!(client_data.challenge.as_bytes(), TEST_CHALLENGE);
    assert_eq!(assertion.response().signature, TEST_SIGNATURE);
    assert_eq!(
        assertion.response().user_handle.as_deref(),
        Some(TEST_USER_HANDLE)
    );
}

#[test]
fn test_token_binding_client_data() {
    let client = ClientPlatform::default();
    let client_data = client.create_collected_client_data_with_token_binding(
        ClientDataType::Get,
        TestFixtures::challenge(),
        b"tb-id".to_vec(),
    );

    let token_binding = client_data.token_binding.unwrap();
    assert_eq!(token_binding.status, TokenBindingStatus::Present);
    assert_eq!(token_binding.id.as_deref(), Some(&b"tb-id"[..]));
}

#[test]
fn test_client_data_override_is_used_verbatim() {
    let mut client = client_with(StubAuthenticator::new());
    let forged_origin = Origin::parse("https://evil.example").unwrap();
    let forged = vouchrs_ceremony::webauthn::CollectedClientData::new(
        ClientDataType::Get,
        TestFixtures::challenge(),
        forged_origin.clone(),
        None,
    );
    let emulation = RegistrationEmulationOptions::default().with_collected_client_data(forged);

    let credential = client
        .create(&TestFixtures::creation_options(), &emulation)
        .unwrap();
    let client_data = credential.response().decode_client_data().unwrap();
    assert_eq!(client_data.r#type, ClientDataType::Get);
    assert_eq!(client_data.origin, forged_origin);
}

#[test]
fn test_empty_challenge_is_rejected() {
    let stub = StubAuthenticator::new();
    let counter = stub.call_counter();
    let mut client = client_with(stub);

    let mut creation = TestFixtures::creation_options();
    creation.challenge = Vec::<u8>::new().into();
    assert!(matches!(
        client.create_with_defaults(&creation).unwrap_err(),
        CeremonyError::EmptyChallenge
    ));

    let mut request = TestFixtures::request_options();
    request.challenge = Vec::<u8>::new().into();
    assert!(matches!(
        client.get_assertion(&request).unwrap_err(),
        CeremonyError::EmptyChallenge
    ));
    assert_eq!(counter.total(), 0);
}

#[test]
fn test_rebinding_replaces_authenticator() {
    let first = StubAuthenticator::new();
    let first_calls = first.call_counter();
    let second = StubAuthenticator::new().with_credential_id(b"second".to_vec());
    let second_calls = second.call_counter();

    let mut client = client_with(first);
    client.set_authenticator(Box::new(second));
    assert_eq!(client.authenticator().map(|a| a.name()), Some("stub"));

    let mut options = TestFixtures::request_options();
    options.allow_credentials.clear();
    let credential = client.get_assertion(&options).unwrap();

    assert_eq!(credential.raw_id(), b"second");
    assert_eq!(first_calls.total(), 0);
    assert_eq!(second_calls.authentications(), 1);
}

#[test]
fn test_credential_json_shape() {
    let mut client = client_with(StubAuthenticator::new());
    let credential = client
        .create_with_defaults(&TestFixtures::creation_options_with_extensions())
        .unwrap();

    let json: Value = serde_json::to_value(&credential).unwrap();
    assert_eq!(json["type"], "public-key");
    assert_eq!(json["id"], base64url::encode(TEST_CREDENTIAL_ID));
    assert_eq!(json["rawId"], json["id"]);
    assert!(json["response"]["clientDataJSON"].is_string());
    assert!(json["response"]["attestationObject"].is_string());
    assert_eq!(json["clientExtensionResults"]["exts"], serde_json::json!(["exts"]));
}
