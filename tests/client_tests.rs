use std::sync::Arc;

use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::json;
use todoust::api::TodoApi;
use todoust::client::HttpClient;
use todoust::models::{NewTask, Priority, TaskPatch};
use todoust::server::router;
use todoust::storage::Store;
use todoust::view_model::ViewModel;
use todoust::Error;

/// Serves `store` on an ephemeral port from a background runtime.
fn spawn_server(store: Arc<Store>) -> String {
    spawn_router(router(store))
}

fn spawn_router(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}/", addr)
}

#[test]
fn test_http_client_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("todos.json")));
    let client = HttpClient::new(spawn_server(Arc::clone(&store)));
    assert!(!client.base_url().ends_with('/'));

    assert!(client.list().unwrap().is_empty());

    let created = client
        .create(&NewTask {
            title: "over http".into(),
            due_date: None,
            priority: Some(Priority::High),
        })
        .unwrap();
    assert_eq!(store.list().unwrap(), vec![created.clone()]);

    let updated = client.update(&created.id, &TaskPatch::completed(true)).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, created.title);

    let deleted = client.delete(&created.id).unwrap();
    assert_eq!(deleted, Some(updated));

    assert!(matches!(client.delete(&created.id), Err(Error::NotFound(id)) if id == created.id));
    assert!(matches!(
        client.update(&created.id, &TaskPatch::completed(false)),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_view_model_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("todos.json")));
    let mut vm = ViewModel::new(HttpClient::new(spawn_server(Arc::clone(&store))));
    vm.load().unwrap();

    vm.form.title = "low".into();
    vm.form.priority = Priority::Low;
    vm.submit().unwrap();
    vm.form.title = "high".into();
    vm.form.priority = Priority::High;
    let high = vm.submit().unwrap();

    let titles: Vec<_> = vm.categorized().upcoming.iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, vec!["high", "low"]);

    vm.toggle_complete(&high).unwrap();
    assert_eq!(vm.categorized().completed.len(), 1);

    vm.remove(&high.id).unwrap();
    assert_eq!(vm.tasks().len(), 1);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_unreachable_server_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = HttpClient::new(format!("http://{}", addr));
    assert!(matches!(client.list(), Err(Error::Http(_))));
}

#[test]
fn test_remove_ignores_delete_payload() {
    let app = Router::new()
        .route(
            "/api/todos",
            get(|| async {
                Json(json!([{
                    "id": "a1",
                    "title": "only",
                    "priority": "High",
                    "completed": false,
                    "createdAt": "2025-01-01T00:00:00Z"
                }]))
            }),
        )
        .route("/api/todos/:id", delete(|| async { Json(json!({"ok": true})) }));
    let client = HttpClient::new(spawn_router(app));

    assert_eq!(client.delete("a1").unwrap(), None);

    let mut vm = ViewModel::new(client);
    vm.load().unwrap();
    assert_eq!(vm.tasks().len(), 1);
    vm.remove("a1").unwrap();
    assert!(vm.tasks().is_empty());
}

#[test]
fn test_remove_with_empty_delete_body() {
    let app = Router::new().route("/api/todos/:id", delete(|| async { axum::http::StatusCode::NO_CONTENT }));
    let client = HttpClient::new(spawn_router(app));
    assert_eq!(client.delete("a1").unwrap(), None);
}
