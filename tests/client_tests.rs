use notekeeper::cli::ServerArgs;
use notekeeper::clients::{
    ClientError, LoginCredentials, NoteInput, NotesClient, SignupCredentials,
};
use notekeeper::config::Config;
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

/// Serve the API on an ephemeral port with an in-memory session store.
async fn spawn_server() -> String {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = notekeeper::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = notekeeper::api::router(state, MemoryStore::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn alice() -> SignupCredentials {
    SignupCredentials {
        username: "alice".to_string(),
        email: "alice@x.com".to_string(),
        password: "secret".to_string(),
    }
}

#[tokio::test]
async fn test_client_note_workflow() {
    let base_url = spawn_server().await;
    let client = NotesClient::new(&base_url).unwrap();

    let err = client.get_logged_in_user().await.unwrap_err();
    assert!(err.is_unauthorized());

    let user = client.signup(&alice()).await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(client.get_logged_in_user().await.unwrap(), user);

    let created = client
        .create_note(&NoteInput {
            title: "Groceries".to_string(),
            text: Some("milk".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let notes = client.fetch_notes().await.unwrap();
    assert_eq!(notes, vec![created.clone()]);

    let updated = client
        .update_note(
            &created.id,
            &NoteInput {
                title: "Groceries".to_string(),
                text: Some("milk, bread".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.text.as_deref(), Some("milk, bread"));
    assert_eq!(client.fetch_note(&created.id).await.unwrap(), updated);

    client.delete_note(&created.id).await.unwrap();
    let err = client.fetch_note(&created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "Note not found");

    client.logout().await.unwrap();
    assert!(client.get_logged_in_user().await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_client_surfaces_server_messages() {
    let base_url = spawn_server().await;
    let client = NotesClient::new(&base_url).unwrap();
    client.signup(&alice()).await.unwrap();

    let other = NotesClient::new(&base_url).unwrap();
    let err = other.signup(&alice()).await.unwrap_err();
    assert!(err.is_conflict());

    let err = other
        .login(&LoginCredentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid credentials");

    let err = other.fetch_notes().await.unwrap_err();
    assert!(err.is_unauthorized());

    let user = other
        .login(&LoginCredentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.email, "alice@x.com");
    assert!(other.fetch_notes().await.unwrap().is_empty());
}

fn server_args(base_url: &str, username: &str, password: &str) -> ServerArgs {
    ServerArgs {
        server: base_url.to_string(),
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_cli_commands_fail_on_server_errors() {
    let base_url = spawn_server().await;

    let alice = server_args(&base_url, "alice", "secret");
    notekeeper::cli::cmd_signup(&alice, "alice@x.com").await.unwrap();
    notekeeper::cli::cmd_whoami(&alice).await.unwrap();

    let err = notekeeper::cli::cmd_signup(&alice, "alice@x.com")
        .await
        .unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().unwrap();
    assert!(client_err.is_conflict());

    let wrong_password = server_args(&base_url, "alice", "wrong");
    let err = notekeeper::cli::cmd_whoami(&wrong_password)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Invalid credentials"));
}
