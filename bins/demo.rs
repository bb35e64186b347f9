use configs::{AppConfig, LogFormat};
use docstore::AsyncDocumentStore;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    city: String,
    state: String,
    country: String,
    pincode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct User {
    name: String,
    age: u32,
    address: Address,
    company: String,
    contact: String,
}

fn user(name: &str, age: u32, city: &str, pincode: &str) -> User {
    User {
        name: name.into(),
        age,
        address: Address {
            city: city.into(),
            state: "North County".into(),
            country: "Spain".into(),
            pincode: pincode.into(),
        },
        company: "Myrl Tech".into(),
        contact: "987889".into(),
    }
}

fn seed_users() -> Vec<User> {
    vec![
        user("Max", 26, "Spa", "228967"),
        user("Checo", 33, "Mexico", "228967"),
        user("Charles", 27, "Monaco", "228967"),
        user("Carlos", 29, "Ibiza", "228967"),
        user("Lewis", 37, "Stevenage", "28967"),
        user("George", 28, "London", "28967"),
        user("Lando", 25, "Southhampton", "28967"),
        user("Oscar", 21, "Melbourne", "28967"),
        user("Alonso", 40, "Madrid", "28967"),
        user("Stroll", 28, "Vancouver", "28967"),
        user("Daniel", 30, "Sydney", "28967"),
        user("Alex", 26, "Bangkok", "28967"),
    ]
}

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let (root, options) = cfg.store_settings();
    let db = AsyncDocumentStore::open(root, options).await?;

    for u in seed_users() {
        let name = u.name.clone();
        db.write("users", &name, u).await?;
    }

    let records = db.read_all("users").await?;
    info!(service = "demo", event = "read_all", count = records.len(), "loaded raw user records");

    let mut all_users = Vec::with_capacity(records.len());
    for raw in &records {
        match serde_json::from_str::<User>(raw) {
            Ok(u) => all_users.push(u),
            Err(e) => error!(service = "demo", event = "decode_failed", error = %e, "skipping undecodable record"),
        }
    }
    for u in &all_users {
        info!(service = "demo", name = %u.name, age = u.age, city = %u.address.city, "user");
    }

    // empty resource name drops the whole collection
    db.delete("users", "").await?;
    info!(service = "demo", event = "collection_deleted", collection = "users", "demo data removed");
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "demo", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    let run_id = Uuid::new_v4();
    info!(
        service = "demo",
        event = "start",
        %run_id,
        version = docstore::VERSION,
        root = %cfg.store.root,
        "docstore demo starting"
    );

    match run(cfg).await {
        Ok(()) => {
            info!(service = "demo", event = "finished", %run_id, "docstore demo finished");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "demo", event = "run_failed", %run_id, error = %e, "docstore demo failed");
            std::process::ExitCode::FAILURE
        }
    }
}
