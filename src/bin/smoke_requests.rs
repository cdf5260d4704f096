//! Fires the sample requests from `data/test_requests_data.json` at a running server.

use anyhow::Context;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::task::JoinSet;

const DEFAULT_URL: &str = "http://127.0.0.1:8000/api_v1/forms/get_form";
const DEFAULT_FIXTURE: &str = "data/test_requests_data.json";
const GROUPS: &[&str] = &["success", "not_found", "validation_error"];

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin smoke_requests -- [fixture.json]\n\
         \n\
         Optional env vars:\n\
           FORM_MATCH_URL (default {})\n",
        DEFAULT_URL
    );
    std::process::exit(2);
}

fn load_fixture(path: &PathBuf) -> anyhow::Result<HashMap<String, Vec<HashMap<String, String>>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("{} not found or unreadable", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid request fixture", path.display()))
}

async fn send(
    client: reqwest::Client,
    url: String,
    params: HashMap<String, String>,
) -> anyhow::Result<(u16, JsonValue)> {
    let response = client.get(&url).query(&params).send().await?;
    let status = response.status().as_u16();
    let body = response.json::<JsonValue>().await?;
    Ok((status, body))
}

async fn execute(
    client: &reqwest::Client,
    url: &str,
    group: &str,
    requests: &[HashMap<String, String>],
) -> anyhow::Result<()> {
    println!("> {} requests:", group);

    let mut tasks = JoinSet::new();
    for (index, params) in requests.iter().cloned().enumerate() {
        let client = client.clone();
        let url = url.to_string();
        tasks.spawn(async move { (index, send(client, url, params).await) });
    }

    let mut results = Vec::with_capacity(requests.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _)| *index);

    for (_, result) in results {
        match result {
            Ok((status, body)) => println!("  [{}] {}", status, body),
            Err(e) => eprintln!("  request failed: {}", e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let fixture = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE));
    let url = std::env::var("FORM_MATCH_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

    let data = load_fixture(&fixture)?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    for group in GROUPS {
        let requests = data.get(*group).map(Vec::as_slice).unwrap_or(&[]);
        execute(&client, &url, group, requests).await?;
    }
    Ok(())
}
