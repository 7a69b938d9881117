//! End-to-end tests against a live registry server.

use degree_registry::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    fingerprint, FingerprintScheme, RegistryService,
};
use degree_registry_client::{
    legacy_fingerprint, ClientError, IssueRequest, IssueStatus, RegistryClient,
};
use tokio::net::TcpListener;

/// Serve a fresh in-memory registry on an ephemeral port.
async fn spawn_registry(scheme: FingerprintScheme) -> RegistryClient {
    let state = AppState::new(RegistryService::new(scheme));
    let app = create_router_with_rate_limit(state, RateLimitState::permissive());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RegistryClient::new(format!("http://{}", addr)).unwrap()
}

#[test]
fn test_client_and_server_fingerprints_agree() {
    let tuples = [
        ("Alice Smith", "S123", "BSc Computer Science", "2023"),
        ("José Álvarez", "ID-9", "MEng Ingeniería", "1999"),
        ("", "", "", ""),
    ];

    for (n, i, d, y) in tuples {
        assert_eq!(legacy_fingerprint(n, i, d, y), fingerprint(n, i, d, y));
    }
}

#[tokio::test]
async fn test_issue_verify_list_round_trip() {
    let client = spawn_registry(FingerprintScheme::Legacy).await;
    assert!(client.health_check().await);

    let request = IssueRequest::new("Alice Smith", "S123", "BSc Computer Science", 2023);
    let issued = client.issue(&request).await.unwrap();
    assert_eq!(issued.status, IssueStatus::Created);
    assert_eq!(Some(&issued.degree_hash), request.degree_hash.as_ref());

    let again = client.issue(&request).await.unwrap();
    assert_eq!(again.status, IssueStatus::AlreadyExists);
    assert_eq!(again.degree_hash, issued.degree_hash);

    let verified = client.verify(&issued.degree_hash).await.unwrap();
    assert!(verified.is_valid);
    let record = verified.record.unwrap();
    assert_eq!(record.student_name, "Alice Smith");
    assert_eq!(record.student_id, "S123");
    assert_eq!(record.degree_name, "BSc Computer Science");
    assert_eq!(record.year_of_passing, "2023");

    let missing = client.verify(&format!("0x{}", "0".repeat(64))).await.unwrap();
    assert!(!missing.is_valid);

    let listed = client.list().await.unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.degrees[0].fingerprint, issued.degree_hash);
}

#[tokio::test]
async fn test_server_rejects_stale_client_hash() {
    let client = spawn_registry(FingerprintScheme::LengthPrefixed).await;

    let request = IssueRequest::new("Alice Smith", "S123", "BSc Computer Science", 2023);
    let result = client.issue(&request).await;

    match result {
        Err(ClientError::Api { status, code, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(code, "FINGERPRINT_MISMATCH");
        }
        other => panic!("expected mismatch error, got {:?}", other),
    }

    let request = IssueRequest::without_hash("Alice Smith", "S123", "BSc Computer Science", 2023);
    let issued = client.issue(&request).await.unwrap();
    assert_eq!(issued.status, IssueStatus::Created);
    assert_ne!(
        issued.degree_hash,
        legacy_fingerprint("Alice Smith", "S123", "BSc Computer Science", "2023")
    );
}
