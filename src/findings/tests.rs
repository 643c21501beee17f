//! Tests for the findings service bindings

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{PageRequest, Paginated, PagerPhase};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FindingsClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .max_retries(0)
        .build();
    FindingsClient::new(HttpClient::with_config(config), "acc-1")
}

fn note(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "kind": "FINDING",
        "short_description": format!("note {id}"),
        "long_description": "",
        "create_time": "2023-05-01T10:00:00Z",
        "reported_by": {"id": "scanner", "title": "Scanner"}
    })
}

fn occurrence(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "note_name": "acc-1/providers/p1/notes/n1",
        "kind": "FINDING",
        "finding": {"severity": "HIGH", "next_steps": [{"title": "patch"}]}
    })
}

// ============================================================================
// Models
// ============================================================================

#[test]
fn test_note_keeps_unknown_fields() {
    let parsed: ApiNote = serde_json::from_value(note("n1")).unwrap();

    assert_eq!(parsed.id, "n1");
    assert_eq!(parsed.kind, NoteKind::Finding);
    assert!(parsed.create_time.is_some());
    assert_eq!(parsed.extra["reported_by"]["id"], "scanner");

    let back = serde_json::to_value(&parsed).unwrap();
    assert_eq!(back["reported_by"]["title"], "Scanner");
}

#[test]
fn test_unrecognised_kind_is_unknown() {
    let parsed: ApiNote =
        serde_json::from_value(json!({"id": "n1", "kind": "SOMETHING_NEW"})).unwrap();
    assert_eq!(parsed.kind, NoteKind::Unknown);
}

#[test]
fn test_occurrence_finding_severity() {
    let parsed: ApiOccurrence = serde_json::from_value(occurrence("o1")).unwrap();
    let finding = parsed.finding.unwrap();
    assert_eq!(finding.severity, Some(Severity::High));
    assert!(finding.extra.contains_key("next_steps"));
}

#[test]
fn test_response_next_cursor() {
    let response: ListNotesResponse =
        serde_json::from_value(json!({"notes": [note("n1")], "next_page_token": "tok"})).unwrap();
    assert_eq!(response.next_cursor(), Some("tok".to_string()));

    let page = response.into_page();
    assert_eq!(page.items.len(), 1);
    assert!(page.has_more());

    let last: ListOccurrencesResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(last.next_cursor(), None);
    assert!(last.into_items().is_empty());
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_options_cursor_slot() {
    let options = ListNotesOptions::new("p1").page_size(5);
    assert_eq!(ListNotesOptions::CURSOR_FIELD, "page_token");
    assert_eq!(options.cursor(), None);

    let next = options.with_cursor("abc");
    assert_eq!(next.cursor(), Some("abc"));
    assert_eq!(next.provider_id, "p1");
    // the original is untouched
    assert_eq!(options.cursor(), None);
}

#[test]
fn test_pager_rejects_preset_page_token() {
    let client = FindingsClient::new(HttpClient::new(), "acc-1");
    let err = client
        .notes_pager(ListNotesOptions::new("p1").page_token("abc"))
        .unwrap_err();
    assert!(matches!(err, Error::CursorPreset { ref field } if field == "page_token"));
}

// ============================================================================
// Single Page Calls
// ============================================================================

#[tokio::test]
async fn test_list_notes_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/notes"))
        .and(query_param("page_size", "2"))
        .and(query_param("page_token", "abc"))
        .and(header("Transaction-Id", "tx-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [note("n1"), note("n2")],
            "next_page_token": "def"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .list_notes(
            &ListNotesOptions::new("p1")
                .page_size(2)
                .page_token("abc")
                .transaction_id("tx-1"),
        )
        .await
        .unwrap();

    assert_eq!(response.notes.len(), 2);
    assert_eq!(response.next_page_token.as_deref(), Some("def"));
}

#[tokio::test]
async fn test_list_note_occurrences_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/notes/n%2F1/occurrences"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "occurrences": [occurrence("o1")]
        })))
        .mount(&server)
        .await;

    let response = client(&server)
        .list_note_occurrences(&ListNoteOccurrencesOptions::new("p1", "n/1"))
        .await
        .unwrap();

    assert_eq!(response.occurrences[0].id, "o1");
}

#[tokio::test]
async fn test_empty_provider_id_is_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server)
        .list_occurrences(&ListOccurrencesOptions::new(""))
        .await;

    assert!(
        matches!(result, Err(Error::InvalidParameter { ref name, .. }) if name == "provider_id")
    );
}

// ============================================================================
// Pagers
// ============================================================================

#[tokio::test]
async fn test_notes_pager_follows_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/notes"))
        .and(query_param("page_token", "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [note("n3")],
            "next_page_token": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/notes"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [note("n1"), note("n2")],
            "next_page_token": "t2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut pager = client(&server)
        .notes_pager(ListNotesOptions::new("p1").page_size(2))
        .unwrap();

    let first = pager.get_next().await.unwrap();
    assert_eq!(
        first.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["n1", "n2"]
    );
    assert_eq!(pager.phase(), PagerPhase::InProgress);

    let second = pager.get_next().await.unwrap();
    assert_eq!(second[0].id, "n3");
    assert!(!pager.has_next());
}

#[tokio::test]
async fn test_notes_pager_omits_empty_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/notes"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [note("n1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut pager = client(&server)
        .notes_pager(ListNotesOptions::new("p1").page_token(""))
        .unwrap();

    assert_eq!(pager.request().cursor(), None);
    assert_eq!(pager.get_next().await.unwrap()[0].id, "n1");
    assert!(!pager.has_next());
}

#[tokio::test]
async fn test_occurrences_pager_get_all() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/occurrences"))
        .and(query_param("page_token", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "occurrences": [occurrence("o2")]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/occurrences"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "occurrences": [occurrence("o1")],
            "next_page_token": "next"
        })))
        .mount(&server)
        .await;

    let mut pager = client(&server)
        .occurrences_pager(ListOccurrencesOptions::new("p1"))
        .unwrap();
    let all = pager.get_all().await.unwrap();

    assert_eq!(
        all.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        vec!["o1", "o2"]
    );
    assert_eq!(pager.pages_fetched(), 2);
}

#[tokio::test]
async fn test_pager_http_error_keeps_position() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc-1/providers/p1/notes/n1/occurrences"))
        .respond_with(ResponseTemplate::new(404).set_body_string("note not found"))
        .expect(2)
        .mount(&server)
        .await;

    let mut pager = client(&server)
        .note_occurrences_pager(ListNoteOccurrencesOptions::new("p1", "n1"))
        .unwrap();

    for _ in 0..2 {
        let err = pager.get_next().await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
        assert_eq!(pager.phase(), PagerPhase::Fresh);
    }
}
