#![allow(clippy::unwrap_used)]
// Integration tests for `WirelessTagClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wtag_api::{Error, WirelessTagClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WirelessTagClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = WirelessTagClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn fault(message: &str, exception: &str) -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_json(json!({
        "Message": message,
        "StackTrace": "   at MyTagList.ethAccount.Check()",
        "ExceptionType": exception,
    }))
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_in_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/SignIn"))
        .and(body_json(json!({ "email": "me@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "d": null })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    client.sign_in("me@example.com", &secret).await.unwrap();
}

#[tokio::test]
async fn test_sign_in_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/SignIn"))
        .respond_with(fault(
            "Invalid email or password",
            "MyTagList.InvalidLoginException",
        ))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.sign_in("me@example.com", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "Invalid email or password"),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (server, client) = setup().await;
    let client = client.with_token("abc123".to_string().into());

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/IsSignedIn"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "d": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.has_token());
    assert!(client.is_signed_in().await.unwrap());
}

// ── Tag managers ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_tag_managers() {
    let (server, client) = setup().await;

    let body = json!({
        "d": [
            {
                "__type": "MyTagList.TagManagerEntry",
                "name": "Garage",
                "mac": "0A1B2C3D4E5F",
                "linkedToMac": null,
                "online": true,
                "selected": true,
                "radioId": 12
            },
            {
                "__type": "MyTagList.TagManagerEntry",
                "name": "Cabin",
                "mac": "665544332211",
                "online": false,
                "selected": false
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/GetTagManagers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let managers = client.get_tag_managers().await.unwrap();

    assert_eq!(managers.len(), 2);
    assert_eq!(managers[0].mac, "0A1B2C3D4E5F");
    assert_eq!(managers[0].name, "Garage");
    assert!(managers[0].online);
    assert_eq!(managers[0].extra.get("radioId"), Some(&json!(12)));
    assert_eq!(managers[1].name, "Cabin");
    assert!(!managers[1].online);
}

#[tokio::test]
async fn test_select_tag_manager_sends_mac() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/SelectTagManager"))
        .and(body_json(json!({ "mac": "0A1B2C3D4E5F" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "d": null })))
        .expect(1)
        .mount(&server)
        .await;

    client.select_tag_manager("0A1B2C3D4E5F").await.unwrap();
}

#[tokio::test]
async fn test_select_unknown_manager_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/SelectTagManager"))
        .respond_with(fault(
            "Tag manager not found",
            "System.ArgumentException",
        ))
        .mount(&server)
        .await;

    let result = client.select_tag_manager("FFFFFFFFFFFF").await;

    match result {
        Err(Error::Api { message, exception }) => {
            assert_eq!(message, "Tag manager not found");
            assert_eq!(exception.as_deref(), Some("System.ArgumentException"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Tags ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_tag_list_preserves_order() {
    let (server, client) = setup().await;

    let body = json!({
        "d": [
            {
                "__type": "MyTagList.Tag",
                "uuid": "6b1c2f4e-3c1a-4a57-9a55-0f4c0b6c8f01",
                "slaveId": 3,
                "name": "Freezer",
                "tagType": 13,
                "alive": true,
                "OutOfRange": false,
                "temperature": -18.25,
                "cap": 41.5,
                "batteryVolt": 2.98,
                "batteryRemaining": 0.87,
                "signaldBm": -79,
                "lastComm": 133_000_000_000_000_000_i64
            },
            {
                "__type": "MyTagList.Tag",
                "uuid": "f0e3b9c2-7d5e-4b8a-8f0e-2a1b3c4d5e6f",
                "slaveId": 0,
                "name": "Porch",
                "tagType": 21,
                "alive": false,
                "OutOfRange": true
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/ethClient.asmx/GetTagList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let tags = client.get_tag_list().await.unwrap();

    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "Freezer");
    assert_eq!(tags[0].slave_id, 3);
    assert_eq!(tags[0].temperature, Some(-18.25));
    assert_eq!(tags[0].signal_dbm, Some(-79));
    assert!(tags[0].alive);
    assert_eq!(tags[1].name, "Porch");
    assert!(tags[1].out_of_range);
    assert_eq!(tags[1].temperature, None);
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_fault_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethClient.asmx/GetTagList"))
        .respond_with(fault(
            "Authentication failed.",
            "System.UnauthorizedAccessException",
        ))
        .mount(&server)
        .await;

    let result = client.get_tag_list().await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
    assert!(result.unwrap_err().is_auth_expired());
}

#[tokio::test]
async fn test_http_401_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethAccount.asmx/GetTagManagers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_tag_managers().await;
    assert!(matches!(result, Err(Error::SessionExpired)));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethClient.asmx/GetTagList"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.get_tag_list().await;

    match result {
        Err(Error::Deserialization { body, .. }) => {
            assert_eq!(body, "<html>maintenance</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_fault_keeps_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ethClient.asmx/GetTagList"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let result = client.get_tag_list().await;

    match result {
        Err(Error::Api { message, exception }) => {
            assert!(message.contains("503"), "message was: {message}");
            assert!(exception.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
