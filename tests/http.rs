use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TaskView {
    id: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChallengeView {
    active: bool,
    days_passed: u32,
    days_left: u32,
}

#[derive(Debug, Deserialize)]
struct BoardView {
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TodayView {
    date: String,
    mode: String,
    toggle: String,
    mode_frozen: bool,
    tasks: Vec<TaskView>,
    completed: usize,
    total: usize,
    water_ml: u32,
    bonus: String,
    challenge: ChallengeView,
    board: Option<BoardView>,
    motivation: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("bike_quest_http_{}_{}", std::process::id(), nanos));
    path.push("health_data.json");
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_bike_quest"))
        .env("PORT", port.to_string())
        .env("QUEST_BIND", "127.0.0.1")
        .env("QUEST_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_today(client: &Client, server: &TestServer) -> TodayView {
    client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_json(
    client: &Client,
    server: &TestServer,
    path: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}{path}", server.base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_today_is_stable_across_reads() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first = get_today(&client, &server).await;
    let second = get_today(&client, &server).await;

    assert!(!first.date.is_empty());
    assert_eq!(first.date, second.date);
    assert_eq!(first.bonus, second.bonus);
    assert_eq!(first.total, second.total);
    assert!(first.total >= 3);
}

#[tokio::test]
async fn http_water_never_goes_below_zero() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_today(&client, &server).await;
    if before.water_ml > 0 {
        let reset = post_json(&client, &server, "/api/water", json!({ "delta_ml": -(before.water_ml as i64) })).await;
        assert!(reset.status().is_success());
    }

    post_json(&client, &server, "/api/water", json!({ "delta_ml": 100 })).await;
    for _ in 0..2 {
        let response = post_json(&client, &server, "/api/water", json!({ "delta_ml": -250 })).await;
        assert!(response.status().is_success());
    }

    let today = get_today(&client, &server).await;
    assert_eq!(today.water_ml, 0);

    let rejected = post_json(&client, &server, "/api/water", json!({ "delta_ml": 0 })).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_first_challenge_day_scenario() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let today = get_today(&client, &server).await;
    let response = post_json(&client, &server, "/api/challenge", json!({ "start_date": today.date })).await;
    assert!(response.status().is_success());

    for (task, done) in [("meditation", true), ("stationary-bike", false), ("sleep", true)] {
        let response = post_json(&client, &server, "/api/tasks/toggle", json!({ "task": task, "done": done })).await;
        assert!(response.status().is_success());
    }

    let view = get_today(&client, &server).await;
    assert_eq!(view.mode, "Light");
    assert_eq!((view.completed, view.total), (2, 3));
    assert!(view.tasks.iter().any(|task| task.id == "sleep" && task.done));
    assert!(view.challenge.active);
    assert_eq!(view.challenge.days_passed, 1);
    assert_eq!(view.challenge.days_left, 29);
    assert!(view.motivation.starts_with("The first days"));

    let board = view.board.expect("board while the challenge runs");
    assert_eq!(board.rows.len(), 5);
    assert_eq!(board.rows[0][0], "🚵");
    assert_eq!(board.rows[4][5], "🏰");

    let cleared = post_json(&client, &server, "/api/challenge", json!({ "start_date": null })).await;
    assert!(cleared.status().is_success());
    let view = get_today(&client, &server).await;
    assert!(!view.challenge.active);
    assert!(view.board.is_none());
}

#[tokio::test]
async fn http_hard_toggle_does_not_change_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_today(&client, &server).await;
    let response = post_json(&client, &server, "/api/mode", json!({ "hard": true })).await;
    assert!(response.status().is_success());

    let after = get_today(&client, &server).await;
    assert_eq!(after.mode, before.mode);
    assert_eq!(after.total, before.total);
    assert_eq!(after.toggle, "Hard");
    assert!(after.mode_frozen);

    post_json(&client, &server, "/api/mode", json!({ "hard": false })).await;
}

#[tokio::test]
async fn http_unknown_task_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = post_json(&client, &server, "/api/tasks/toggle", json!({ "task": "juggling" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(&client, &server, "/api/layout", json!({ "layout": "Grid" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
