use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::actress::ActressFileStore;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::{startup, AppState};

struct TestApp {
    base_url: String,
}

async fn start_server(data_file: &std::path::Path) -> anyhow::Result<TestApp> {
    let store = ActressFileStore::new(data_file).await?;
    let state = AppState::new(store, data_file.with_file_name("import.json"));
    let app = startup::build_app(state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_mutations_survive_restart() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("actress_e2e_{}", Uuid::new_v4()));
    let data_file = dir.join("actresses.json");
    let c = reqwest::Client::new();

    let app = start_server(&data_file).await?;
    let res = c.post(format!("{}/actresses", app.base_url))
        .json(&json!({"name": "Ada", "tags": ["a"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let res = c.post(format!("{}/actresses", app.base_url))
        .json(&json!({"name": "Bea"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let res = c.delete(format!("{}/actresses/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // a second server over the same file sees every acknowledged mutation
    let again = start_server(&data_file).await?;
    let list = c.get(format!("{}/actresses", again.base_url))
        .send().await?
        .json::<serde_json::Value>().await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["tags"], json!(["a"]));

    let res = c.post(format!("{}/actresses", again.base_url))
        .json(&json!({"name": "Cy"}))
        .send().await?;
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created["id"], 3);

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}
