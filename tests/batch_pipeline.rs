//! End-to-end tests for ClassificationService against a mocked endpoint.

mod common;

use std::fs;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{generate_response, mount_answer, test_client, test_config};
use llm_sentiment::dataset::DatasetError;
use llm_sentiment::models::{ClassifiedReview, ErrorKind, ReviewRecord, Sentiment};
use llm_sentiment::services::{ClassificationEvent, ClassificationService};

fn service_for(server: &MockServer) -> ClassificationService {
    let (client, _) = test_client(test_config(&server.uri()));
    ClassificationService::new(client)
}

#[tokio::test]
async fn test_two_rows_all_neutral() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(generate_response("Neutral"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    let output = dir.path().join("out.csv");
    fs::write(
        &input,
        "ProductID,ReviewText,Stars\n\
         B-200,\"Arrived late, works fine\",3\n\
         A-100,It is a toaster.,4\n",
    )
    .unwrap();

    let (tx, _rx) = mpsc::channel(100);
    let outcome = service_for(&server)
        .run_batch(&input, &output, tx)
        .await
        .unwrap();

    assert!(outcome.written);
    assert!(outcome.write_error.is_none());
    assert_eq!(outcome.error_count(), 0);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["ProductID", "ReviewText", "Sentiment"]
    );
    let rows: Vec<ClassifiedReview> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_id, "B-200");
    assert_eq!(rows[0].review_text, "Arrived late, works fine");
    assert_eq!(rows[1].product_id, "A-100");
    assert_eq!(rows[1].review_text, "It is a toaster.");
    assert!(rows.iter().all(|r| r.sentiment == Sentiment::Neutral));
    assert_eq!(rows, outcome.results);
}

#[tokio::test]
async fn test_missing_review_text_column_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(generate_response("Positive"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "ProductID,Comment\nP1,Great\n").unwrap();

    let (tx, _rx) = mpsc::channel(100);
    let err = service_for(&server)
        .run_batch(&input, &output, tx)
        .await
        .unwrap_err();

    assert!(matches!(err, DatasetError::InputSchemaInvalid { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_input_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let (tx, _rx) = mpsc::channel(100);
    let err = service_for(&server)
        .run_batch(
            &dir.path().join("absent.csv"),
            &dir.path().join("out.csv"),
            tx,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DatasetError::InputNotFound(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_header_only_input_writes_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "ProductID,ReviewText\n").unwrap();

    let (tx, _rx) = mpsc::channel(100);
    let outcome = service_for(&server)
        .run_batch(&input, &output, tx)
        .await
        .unwrap();

    assert!(outcome.results.is_empty());
    assert!(!outcome.written);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_per_review_failures_do_not_stop_batch() {
    let server = MockServer::start().await;
    // First review gets an unusable answer, the rest a real label.
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(generate_response("Meh"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_answer(&server, "negative").await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "ProductID,ReviewText\nP1,Huh\nP2,Bad\nP3,Worse\n").unwrap();

    let (tx, mut rx) = mpsc::channel(100);
    let outcome = service_for(&server)
        .run_batch(&input, &output, tx)
        .await
        .unwrap();

    let sentiments: Vec<Sentiment> = outcome.results.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        sentiments,
        vec![
            Sentiment::Error(ErrorKind::ParseFailed),
            Sentiment::Negative,
            Sentiment::Negative,
        ]
    );
    assert_eq!(outcome.error_count(), 1);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("P1,Huh,Error: Parse Failed\n"));

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(
        events.first(),
        Some(&ClassificationEvent::Started { total_reviews: 3 })
    );
    assert_eq!(
        events.last(),
        Some(&ClassificationEvent::Complete {
            classified: 3,
            errors: 1
        })
    );
    assert_eq!(events.len(), 2 + 3 * 2);
}

#[tokio::test]
async fn test_unreachable_endpoint_labels_every_review() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(502))
        .expect(6)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "ProductID,ReviewText\nP1,One\nP2,Two\n").unwrap();

    let (tx, _rx) = mpsc::channel(100);
    let outcome = service_for(&server)
        .run_batch(&input, &output, tx)
        .await
        .unwrap();

    assert!(outcome
        .results
        .iter()
        .all(|r| r.sentiment == Sentiment::Error(ErrorKind::ApiFailed)));
    assert!(outcome.written);
}

#[tokio::test]
async fn test_write_failure_is_reported_not_fatal() {
    let server = MockServer::start().await;
    mount_answer(&server, "Positive").await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    let output = dir.path().join("no-such-dir").join("out.csv");
    fs::write(&input, "ProductID,ReviewText\nP1,Nice\n").unwrap();

    let (tx, _rx) = mpsc::channel(100);
    let outcome = service_for(&server)
        .run_batch(&input, &output, tx)
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert!(!outcome.written);
    assert!(matches!(
        outcome.write_error,
        Some(DatasetError::OutputWrite { .. })
    ));
}

async fn mount_tags(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bad_header_fails_before_availability_check() {
    let server = MockServer::start().await;
    mount_tags(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    fs::write(&input, "ProductID,Comment\nP1,Great\n").unwrap();

    let err = service_for(&server)
        .prepare(&input, true)
        .await
        .unwrap_err();

    assert!(matches!(err, DatasetError::InputSchemaInvalid { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_prepare_checks_endpoint_after_loading() {
    let server = MockServer::start().await;
    mount_tags(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews.csv");
    fs::write(&input, "ProductID,ReviewText\nP1,Nice\nP2,Awful\n").unwrap();

    let service = service_for(&server);
    let prepared = service.prepare(&input, true).await.unwrap();
    assert_eq!(prepared.records.len(), 2);
    assert_eq!(prepared.endpoint_available, Some(true));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let prepared = service.prepare(&input, false).await.unwrap();
    assert_eq!(prepared.endpoint_available, None);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_undrained_event_channel_does_not_block() {
    let server = MockServer::start().await;
    mount_answer(&server, "Positive").await;

    let records = vec![
        ReviewRecord::new("P1", "Good"),
        ReviewRecord::new("P2", "Great"),
        ReviewRecord::new("P3", "Superb"),
    ];

    // Receiver stays alive but is never read, so the channel fills after one event.
    let (tx, _rx) = mpsc::channel(1);
    let results = tokio::time::timeout(
        Duration::from_secs(10),
        service_for(&server).classify_all(records, tx),
    )
    .await
    .expect("classification blocked on a full event channel");

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.sentiment == Sentiment::Positive));
}
