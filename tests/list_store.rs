mod common;

use common::mock_backend::{MockBackend, MockResponse};
use common::{client, client_with_session, LoadingSpy, RecordingNotifier};
use reusable_state::config::{SecureString, Session};
use reusable_state::request::Outcome;
use reusable_state::store::{
    build_list_store, EntityId, ListActions, ListConfig, QueryParams, Record, DELETE_FAILED,
    FETCH_FAILED, LIST_FAILED, SAVE_FAILED,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn items_store(base_url: &str, notifier: Arc<RecordingNotifier>) -> ListActions<Record> {
    let config = ListConfig::new("Item", &client(base_url), "/items").with_notifier(notifier);
    build_list_store(config).1
}

#[tokio::test]
async fn test_get_all_fills_board_and_map() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({
            "data": [{"id": 1, "name": "Abyssinian"}, {"id": 2, "name": "Aegean"}],
            "page": 1,
            "limit": 2,
            "totalItems": 67
        })))
        .await;
    let notifier = RecordingNotifier::new();
    let actions = items_store(&backend.base_url(), notifier.clone());
    let spy = LoadingSpy::default();

    let params = QueryParams::new().with_page(1).with_limit(2);
    let outcome = actions.get_all(params.clone(), Some(&spy.setter())).await;

    assert_eq!(outcome, Outcome::Succeeded);
    assert_eq!(spy.calls(), vec![true, false]);
    assert!(notifier.messages().is_empty());

    let state = actions.store().snapshot();
    let board = state.board(&params).unwrap();
    assert_eq!(board.page(1), &[EntityId::Int(1), EntityId::Int(2)]);
    assert_eq!(board.meta_data["totalItems"], json!(67));
    assert!(!board.meta_data.contains_key("data"));
    assert!(!board.loading);

    let names: Vec<_> = state
        .page_items(&params)
        .iter()
        .map(|r| r.get_str("name").unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Abyssinian", "Aegean"]);

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/items");
    assert_eq!(requests[0].query.as_deref(), Some("page=1&limit=2"));
}

#[tokio::test]
async fn test_get_all_failure_keeps_cached_pages() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"id": 1}]})))
        .await;
    backend
        .enqueue_response(MockResponse::error(500, "Database unavailable"))
        .await;
    let notifier = RecordingNotifier::new();
    let actions = items_store(&backend.base_url(), notifier.clone());

    let params = QueryParams::new();
    actions.get_all(params.clone(), None).await;
    let outcome = actions.get_all(params.clone(), None).await;

    assert_eq!(outcome, Outcome::Failed("Database unavailable".into()));
    assert_eq!(notifier.messages(), vec![LIST_FAILED.to_string()]);

    let state = actions.store().snapshot();
    let board = state.board(&params).unwrap();
    assert_eq!(board.error.as_deref(), Some("Database unavailable"));
    assert!(!board.loading);
    assert_eq!(board.page(1), &[EntityId::Int(1)]);
}

#[tokio::test]
async fn test_filters_select_separate_boards() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"_id": "a"}]})))
        .await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"_id": "b"}]})))
        .await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());

    let done = QueryParams::new().with("done", "true");
    let open = QueryParams::new().with("done", "false");
    actions.get_all(done.clone(), None).await;
    actions.get_all(open.clone(), None).await;

    let state = actions.store().snapshot();
    assert_eq!(state.boards.len(), 2);
    assert_eq!(state.board(&done).unwrap().page(1), &[EntityId::from("a")]);
    assert_eq!(state.board(&open).unwrap().page(1), &[EntityId::from("b")]);

    // Identity is normalized onto both fields.
    let a = state.entity(&EntityId::from("a")).unwrap();
    assert_eq!(a.get("id"), Some(&json!("a")));
}

#[tokio::test]
async fn test_slow_list_response_does_not_overwrite_newer() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"id": 1}]})).with_delay(300))
        .await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"id": 2}]})))
        .await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());
    let params = QueryParams::new().with_page(1);

    let slow = actions.get_all(params.clone(), None);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        actions.get_all(params.clone(), None).await
    };
    let (first, second) = tokio::join!(slow, fast);

    assert!(first.is_success());
    assert!(second.is_success());
    let state = actions.store().snapshot();
    assert_eq!(state.board(&params).unwrap().page(1), &[EntityId::Int(2)]);
}

#[tokio::test]
async fn test_pages_fetched_concurrently_are_both_cached() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(
            MockResponse::data(json!({"data": [{"id": 2}], "page": 2})).with_delay(300),
        )
        .await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"id": 1}], "page": 1})))
        .await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());
    let second_page = QueryParams::new().with_page(2);
    let first_page = QueryParams::new().with_page(1);

    let slow = actions.get_all(second_page.clone(), None);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        actions.get_all(first_page.clone(), None).await
    };
    let (second, first) = tokio::join!(slow, fast);

    assert!(second.is_success());
    assert!(first.is_success());
    let state = actions.store().snapshot();
    let board = state.board(&first_page).unwrap();
    assert_eq!(board.page(1), &[EntityId::Int(1)]);
    assert_eq!(board.page(2), &[EntityId::Int(2)]);
    // Metadata follows the most recently issued fetch.
    assert_eq!(board.meta_data["page"], json!(1));
}

#[tokio::test]
async fn test_fetch_answered_after_delete_does_not_restore_entity() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(
            MockResponse::data(json!({"id": 1, "name": "old"})).with_delay(300),
        )
        .await;
    backend.enqueue_response(MockResponse::data(json!({}))).await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());

    let fetch = actions.get_one(EntityId::Int(1), None);
    let delete = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        actions.delete_one(EntityId::Int(1), None).await
    };
    let (fetched, deleted) = tokio::join!(fetch, delete);

    assert!(fetched.is_success());
    assert!(deleted.is_success());
    let state = actions.store().snapshot();
    assert!(state.is_deleted(&EntityId::Int(1)));
    assert!(state.entity(&EntityId::Int(1)).is_none());
}

#[tokio::test]
async fn test_get_one_success_and_failure() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"id": 7, "name": "Bengal"})))
        .await;
    backend
        .enqueue_response(MockResponse::error(404, "Cat not found"))
        .await;
    let notifier = RecordingNotifier::new();
    let actions = items_store(&backend.base_url(), notifier.clone());

    assert!(actions.get_one(EntityId::Int(7), None).await.is_success());
    let state = actions.store().snapshot();
    let entry = state.entry(&EntityId::Int(7)).unwrap();
    assert_eq!(entry.data.as_ref().unwrap().get_str("name"), Some("Bengal"));
    assert!(!entry.flags.loading);

    let outcome = actions.get_one(EntityId::Int(99), None).await;
    assert_eq!(outcome.error(), Some("Cat not found"));
    assert_eq!(notifier.messages(), vec![FETCH_FAILED.to_string()]);

    let state = actions.store().snapshot();
    let missing = state.entry(&EntityId::Int(99)).unwrap();
    assert!(missing.data.is_none());
    assert!(!missing.flags.loading);
    assert_eq!(missing.flags.error.as_deref(), Some("Cat not found"));

    let paths: Vec<_> = backend
        .captured_requests()
        .await
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(paths, vec!["/items/7", "/items/99"]);
}

#[tokio::test]
async fn test_create_one_stores_created_entity() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"_id": "t1", "title": "Buy milk"})))
        .await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());

    let outcome = actions.create_one(json!({"title": "Buy milk"}), None).await;

    assert!(outcome.is_success());
    let state = actions.store().snapshot();
    assert!(state.new_item.is_none());
    let created = state.entity(&EntityId::from("t1")).unwrap();
    assert_eq!(created.get_str("title"), Some("Buy milk"));

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].json(), json!({"title": "Buy milk"}));
}

#[tokio::test]
async fn test_create_one_failure_keeps_draft() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(422, "Title is required"))
        .await;
    let notifier = RecordingNotifier::new();
    let actions = items_store(&backend.base_url(), notifier.clone());

    let outcome = actions.create_one(json!({"title": ""}), None).await;

    assert!(!outcome.is_success());
    assert_eq!(notifier.messages(), vec![SAVE_FAILED.to_string()]);
    let state = actions.store().snapshot();
    let draft = state.new_item.unwrap();
    assert_eq!(draft.draft, json!({"title": ""}));
    assert!(!draft.saving);
    assert_eq!(draft.error.as_deref(), Some("Title is required"));
}

#[tokio::test]
async fn test_update_one_replaces_entity() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"_id": "t1", "title": "old"}]})))
        .await;
    backend
        .enqueue_response(MockResponse::data(json!({"_id": "t1", "title": "new"})))
        .await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());
    let id = EntityId::from("t1");

    actions.get_all(QueryParams::new(), None).await;
    let outcome = actions
        .update_one(id.clone(), json!({"title": "new"}), None)
        .await;

    assert!(outcome.is_success());
    let state = actions.store().snapshot();
    let entry = state.entry(&id).unwrap();
    assert_eq!(entry.data.as_ref().unwrap().get_str("title"), Some("new"));
    assert!(!entry.flags.saving);

    let requests = backend.captured_requests().await;
    assert_eq!(requests[1].method, "PATCH");
    assert_eq!(requests[1].path, "/items/t1");
    assert_eq!(requests[1].json(), json!({"title": "new"}));
}

#[tokio::test]
async fn test_delete_one_removes_from_pages() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": [{"id": 1}, {"id": 2}]})))
        .await;
    backend.enqueue_response(MockResponse::data(json!({}))).await;
    backend
        .enqueue_response(MockResponse::error(500, "Delete failed"))
        .await;
    let notifier = RecordingNotifier::new();
    let actions = items_store(&backend.base_url(), notifier.clone());
    let params = QueryParams::new();

    actions.get_all(params.clone(), None).await;
    assert!(actions.delete_one(EntityId::Int(1), None).await.is_success());

    let state = actions.store().snapshot();
    assert!(state.is_deleted(&EntityId::Int(1)));
    assert_eq!(state.board(&params).unwrap().page(1), &[EntityId::Int(2)]);

    assert!(!actions.delete_one(EntityId::Int(2), None).await.is_success());
    let state = actions.store().snapshot();
    let entry = state.entry(&EntityId::Int(2)).unwrap();
    assert!(!entry.flags.deleting);
    assert_eq!(entry.flags.error.as_deref(), Some("Delete failed"));
    assert_eq!(notifier.messages(), vec![DELETE_FAILED.to_string()]);

    let requests = backend.captured_requests().await;
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[1].path, "/items/1");
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(401, "Token expired"))
        .await;
    let session = Session::in_memory();
    session.set_access_token(SecureString::new("tok-123")).unwrap();
    let client = client_with_session(&backend.base_url(), session.clone());
    let config = ListConfig::new("Item", &client, "/items").with_notifier(RecordingNotifier::new());
    let (_, actions) = build_list_store::<Record, ()>(config);

    let outcome = actions.get_all(QueryParams::new(), None).await;

    assert_eq!(outcome.error(), Some("Token expired"));
    assert!(session.access_token().is_none());
    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].header("authorization"), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_subscribers_see_loading_then_result() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::data(json!({"data": []})).with_delay(100))
        .await;
    let actions = items_store(&backend.base_url(), RecordingNotifier::new());
    let mut rx = actions.store().subscribe();
    let params = QueryParams::new();

    let fetch = tokio::spawn({
        let actions = actions.clone();
        let params = params.clone();
        async move { actions.get_all(params, None).await }
    });

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().board(&params).unwrap().loading);

    assert!(fetch.await.unwrap().is_success());
    assert!(!actions.store().snapshot().board(&params).unwrap().loading);
}
