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
struct ProductStat {
    total_for_day: i64,
    delivered: i64,
    confirmed: i64,
    cancelled_company: i64,
    no_answer: i64,
}

#[derive(Debug, Deserialize)]
struct DayView {
    date: String,
    product: Option<String>,
    stat: ProductStat,
    yesterday_no_answer: i64,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    products: Vec<String>,
    selected: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Totals {
    orders: i64,
    delivered: i64,
    confirmed: i64,
    cancelled: i64,
    no_answer: i64,
}

#[derive(Debug, Deserialize)]
struct Formatted {
    orders: String,
    success_rate: String,
}

#[derive(Debug, Deserialize)]
struct StatsSummary {
    filter: String,
    totals: Totals,
    formatted: Formatted,
}

#[derive(Debug, Deserialize)]
struct Toast {
    kind: String,
    message: String,
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
    path.push(format!("order_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/products")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_order_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

async fn add_product(client: &Client, base_url: &str, name: &str) -> StatusCode {
    client
        .post(format!("{base_url}/api/products"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap()
        .status()
}

async fn save(client: &Client, base_url: &str, date: &str, product: &str, stat: serde_json::Value) {
    let response = client
        .post(format!("{base_url}/api/day"))
        .json(&json!({ "date": date, "product": product, "stat": stat }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn stats(client: &Client, base_url: &str, query: &[(&str, &str)]) -> StatsSummary {
    client
        .get(format!("{base_url}/api/stats"))
        .query(query)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_save_merges_and_aggregates() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    assert!(add_product(&client, base, "merge-a").await.is_success());
    assert!(add_product(&client, base, "merge-b").await.is_success());

    save(&client, base, "2023-01-01", "merge-a", json!({
        "total_for_day": 10, "delivered": 8, "confirmed": 9, "cancelled_company": 1, "no_answer": 1
    }))
    .await;
    save(&client, base, "2023-01-02", "merge-a", json!({
        "total_for_day": 5, "delivered": 5, "confirmed": 5, "cancelled_company": 0, "no_answer": 0
    }))
    .await;
    save(&client, base, "2023-01-01", "merge-b", json!({ "total_for_day": 3 })).await;

    let day: DayView = client
        .get(format!("{base}/api/day"))
        .query(&[("date", "2023-01-01"), ("product", "merge-a")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(day.date, "2023-01-01");
    assert_eq!(day.product.as_deref(), Some("merge-a"));
    assert_eq!(day.stat.total_for_day, 10);
    assert_eq!(day.stat.cancelled_company, 1);

    let summary = stats(&client, base, &[("product", "merge-a")]).await;
    assert_eq!(summary.filter, "merge-a");
    assert_eq!(summary.totals.orders, 15);
    assert_eq!(summary.totals.delivered, 13);
    assert_eq!(summary.totals.confirmed, 14);
    assert_eq!(summary.totals.cancelled, 1);
    assert_eq!(summary.totals.no_answer, 1);
    assert_eq!(summary.formatted.success_rate, "86.7%");

    let sibling = stats(&client, base, &[("product", "merge-b")]).await;
    assert_eq!(sibling.totals.orders, 3);

    let ranged = stats(
        &client,
        base,
        &[("product", "merge-a"), ("start", "2023-01-02"), ("end", "2023-01-02")],
    )
    .await;
    assert_eq!(ranged.totals.orders, 5);

    let inverted = stats(
        &client,
        base,
        &[("product", "merge-a"), ("start", "2023-01-03"), ("end", "2023-01-01")],
    )
    .await;
    assert_eq!(inverted.totals.orders, 0);
    assert_eq!(inverted.formatted.success_rate, "0.0%");
}

#[tokio::test]
async fn http_previous_day_lookup_crosses_leap_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    assert!(add_product(&client, base, "leap").await.is_success());
    save(&client, base, "2024-02-29", "leap", json!({ "no_answer": 6 })).await;

    let day: DayView = client
        .get(format!("{base}/api/day"))
        .query(&[("date", "2024-03-01"), ("product", "leap")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(day.yesterday_no_answer, 6);
    assert_eq!(day.stat.no_answer, 0);
    assert_eq!(day.stat.delivered, 0);
    assert_eq!(day.stat.confirmed, 0);
}

#[tokio::test]
async fn http_removed_product_stays_in_history() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    assert!(add_product(&client, base, "retired").await.is_success());
    save(&client, base, "2023-05-05", "retired", json!({ "total_for_day": 2 })).await;

    let response = client
        .delete(format!("{base}/api/products/retired"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let catalog: CatalogResponse = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!catalog.products.contains(&"retired".to_string()));
    assert_ne!(catalog.selected.as_deref(), Some("retired"));

    let history: Vec<String> = client
        .get(format!("{base}/api/stats/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(history.contains(&"retired".to_string()));
    let mut sorted = history.clone();
    sorted.sort();
    assert_eq!(history, sorted);
}

#[tokio::test]
async fn http_rejects_invalid_input_with_warning() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    assert_eq!(add_product(&client, base, "   ").await, StatusCode::BAD_REQUEST);
    assert!(add_product(&client, base, "dupe").await.is_success());
    assert_eq!(add_product(&client, base, "dupe").await, StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{base}/api/stats"))
        .query(&[("start", "01/02/2024")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let toasts: Vec<Toast> = client
        .get(format!("{base}/api/notifications"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(toasts.iter().any(|toast| toast.kind == "warning" && toast.message.contains("dupe")));
    assert!(toasts.iter().any(|toast| toast.kind == "success"));
}

#[tokio::test]
async fn http_reset_keeps_catalog() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    assert!(add_product(&client, base, "kept").await.is_success());
    save(&client, base, "2023-07-01", "kept", json!({ "total_for_day": 1200 })).await;
    let before = stats(&client, base, &[]).await;
    assert!(before.totals.orders >= 1200);

    let response = client.delete(format!("{base}/api/stats")).send().await.unwrap();
    assert!(response.status().is_success());

    let after = stats(&client, base, &[("product", "all")]).await;
    assert_eq!(after.totals.orders, 0);
    assert_eq!(after.formatted.orders, "0");

    let catalog: CatalogResponse = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(catalog.products.contains(&"kept".to_string()));

    let page = client.get(format!("{base}/")).send().await.unwrap().text().await.unwrap();
    assert!(page.contains("Order Tracker"));
}

#[tokio::test]
async fn http_malformed_body_raises_warning() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    assert!(add_product(&client, base, "malformed").await.is_success());
    let response = client
        .post(format!("{base}/api/day"))
        .json(&json!({
            "date": "2023-09-09",
            "product": "malformed",
            "stat": { "total_for_day": "many" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let toasts: Vec<Toast> = client
        .get(format!("{base}/api/notifications"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(toasts.iter().any(|toast| toast.kind == "warning"));

    let summary = stats(&client, base, &[("product", "malformed")]).await;
    assert_eq!(summary.totals.orders, 0);
}
