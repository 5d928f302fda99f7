//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container and need a running Docker
//! daemon. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use common::Namespaced;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use store::{Document, ListOptions, PostgresStore, Sort, StoreError, StoreExt};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_documents_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE documents")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Widget {
    id: String,
    parent: Option<String>,
    name: String,
    created: i64,
    updated: i64,
}

impl Namespaced for Widget {
    fn namespace(&self) -> &str {
        Self::NAMESPACE
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Widget {
    const NAMESPACE: &'static str = "widget";

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn created(&self) -> i64 {
        self.created
    }

    fn set_created(&mut self, created: i64) {
        self.created = created;
    }

    fn set_updated(&mut self, updated: i64) {
        self.updated = updated;
    }
}

fn widget(name: &str) -> Widget {
    Widget {
        name: name.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_and_load_document() {
    let store = get_test_store().await;
    let mut w = widget("sprocket");

    store.insert(&mut w).await.unwrap();
    let loaded: Widget = store.one(&w.id).await.unwrap();

    assert_eq!(loaded, w);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn missing_document_is_not_found() {
    let store = get_test_store().await;
    let err = store.one::<Widget>("nope").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn update_missing_document_is_not_found() {
    let store = get_test_store().await;
    let mut w = widget("ghost");
    w.id = "ghost".to_string();

    let err = store.update(&mut w).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn update_replaces_body() {
    let store = get_test_store().await;
    let mut w = widget("before");
    store.insert(&mut w).await.unwrap();

    w.name = "after".to_string();
    store.update(&mut w).await.unwrap();

    let loaded: Widget = store.one(&w.id).await.unwrap();
    assert_eq!(loaded.name, "after");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn list_sorted_and_paged() {
    let store = get_test_store().await;
    for (i, name) in ["a", "b", "c"].iter().enumerate() {
        let mut w = widget(name);
        w.created = 1_000 + i as i64;
        store.insert(&mut w).await.unwrap();
    }

    let opts = ListOptions::new().sort(Sort::parse("created").unwrap()).limit(2);
    let first: Vec<Widget> = store.list(&opts).await.unwrap();
    let second: Vec<Widget> = store.list(&opts.page(1)).await.unwrap();

    assert_eq!(
        first.iter().map(|w| w.name.as_str()).collect::<Vec<_>>(),
        ["a", "b"]
    );
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name, "c");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn list_parent_returns_children() {
    let store = get_test_store().await;
    for parent in ["p1", "p2", "p1"] {
        let mut w = widget("child");
        w.parent = Some(parent.to_string());
        store.insert(&mut w).await.unwrap();
    }

    let children: Vec<Widget> = store.list_parent("p1").await.unwrap();
    assert_eq!(children.len(), 2);
}
