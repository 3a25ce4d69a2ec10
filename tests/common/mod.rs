//! Shared MongoDB container for integration tests.
//!
//! One MongoDB 7.0 container serves the whole test binary; per-test
//! isolation comes from namespacing every database name with a short UUID
//! suffix. The container runs on a background thread with its own tokio
//! runtime so it outlives each test's teardown, and an `atexit` hook
//! removes it when the process exits.
//!
//! The crate under test exposes a synchronous API, so tests are plain
//! `#[test]` functions; async seeding steps go through [`block_on`].

#![allow(dead_code)]

use std::sync::OnceLock;

use mongodb::Client;
use mongodb::options::ClientOptions;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::runtime::Runtime;

static CONNECTION_STRING: OnceLock<String> = OnceLock::new();

/// Docker container ID, stored globally so the `atexit` handler can remove it.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

/// Runtime for async seeding steps issued from synchronous tests.
static SEED_RUNTIME: OnceLock<Runtime> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

/// Called by the C runtime on process exit. Forcibly removes the container.
extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Run an async seeding step on the shared test runtime.
pub fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    SEED_RUNTIME
        .get_or_init(|| Runtime::new().expect("Failed to create seed runtime"))
        .block_on(fut)
}

/// Start (once per binary) and return the shared container's URI.
fn connection_string() -> &'static str {
    CONNECTION_STRING.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let uri = format!("mongodb://{}:{}", host, port);

                // Readiness probe
                let opts = ClientOptions::parse(&uri).await.expect("Failed to parse URI");
                let probe = Client::with_options(opts).expect("Failed to create probe client");
                for _ in 0..30 {
                    if probe.list_database_names().await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                drop(probe);

                tx.send(uri).expect("Failed to send connection string");

                // Park forever; the container lives until the process exits.
                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("Failed to receive connection string")
    })
}

/// Handle to the shared cluster with a unique per-test database namespace.
pub struct TestCluster {
    pub uri: String,
    client: Client,
    test_id: String,
}

impl TestCluster {
    pub fn start() -> Self {
        let uri = connection_string().to_string();
        let client = block_on(async {
            let options = ClientOptions::parse(&uri).await.expect("Failed to parse URI");
            Client::with_options(options).expect("Failed to create client")
        });
        let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();

        Self { uri, client, test_id }
    }

    /// The namespaced database name for this test, as it appears on the
    /// server (and therefore in the exported script).
    pub fn db_name(&self, name: &str) -> String {
        format!("{}_{}", name, self.test_id)
    }

    /// A seeding handle to a namespaced database.
    pub fn database(&self, name: &str) -> mongodb::Database {
        self.client.database(&self.db_name(name))
    }
}
