//! Store tests against a live Postgres. They need `DATABASE_URL` and run with
//! `cargo test -- --ignored`.

use dotenv::dotenv;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use task_manager::{
    models::{NewTask, Priority},
    storage::{PgStorage, Storage, StorageError},
};

async fn storage() -> PgStorage {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let storage = PgStorage::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test DB");
    storage.migrate().await.expect("Failed to run migrations");
    storage
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[actix_rt::test]
#[ignore]
async fn test_user_round_trip_and_conflicts() {
    let store = storage().await;
    let name = unique("pg_user");
    let email = format!("{}@example.com", name);

    let id = store.save_user(&name, &email, "hash").await.unwrap();
    assert!(matches!(
        store.save_user(&unique("other"), &email, "hash").await,
        Err(StorageError::AlreadyExists)
    ));

    let user = store.user(&email).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.password_hash.as_deref(), Some("hash"));

    let renamed = unique("pg_renamed");
    let user = store.update_user_name(&name, &renamed).await.unwrap();
    assert_eq!(user.user_name, renamed);
    assert!(user.password_hash.is_none());

    store.delete_user(&renamed).await.unwrap();
    assert!(matches!(store.delete_user(&renamed).await, Err(StorageError::NotFound)));
}

#[actix_rt::test]
#[ignore]
async fn test_task_priority_codes() {
    let store = storage().await;
    let name = unique("pg_tasks");
    let user_id = store
        .save_user(&name, &format!("{}@example.com", name), "hash")
        .await
        .unwrap();

    let new_task = NewTask {
        user_id,
        title: "Тестовое задание".to_string(),
        description: String::new(),
        status: "open".to_string(),
        priority: Priority::parse_lenient("7"),
        deadline: None,
    };
    let id = store.save_task(&new_task).await.unwrap();

    let task = store.task(id).await.unwrap();
    assert_eq!(task.priority, Priority::Unknown(7));
    assert_eq!(task.title, "Тестовое задание");

    let task = store.update_task_fields(id, "done", Priority::High).await.unwrap();
    assert_eq!(task.status, "done");
    assert_eq!(task.priority, Priority::High);

    assert_eq!(store.list_tasks_by_user(user_id).await.unwrap().len(), 1);

    store.delete_user(&name).await.unwrap();
    assert!(matches!(store.task(id).await, Err(StorageError::NotFound)));
}

#[actix_rt::test]
#[ignore]
async fn test_ping() {
    storage().await.ping().await.unwrap();
}
