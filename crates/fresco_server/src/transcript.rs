//! Fire-and-forget transcript recording.
//!
//! Each session writes one JSON file with its prompt and completion so runs
//! can be inspected later. Recording failures are logged and swallowed; they
//! never affect the session outcome.

use chrono::Utc;
use fresco_core::Message;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Spawns a background write of the exchange under `<logs_path>/run_logs/`.
pub fn record(logs_path: PathBuf, prompt: Vec<Message>, completion: String) {
    tokio::spawn(async move {
        if let Err(e) = write_transcript(logs_path, &prompt, &completion).await {
            warn!(error = %e, "failed to record transcript");
        }
    });
}

async fn write_transcript(
    logs_path: PathBuf,
    prompt: &[Message],
    completion: &str,
) -> std::io::Result<()> {
    let directory = logs_path.join("run_logs");
    tokio::fs::create_dir_all(&directory).await?;

    let filename = format!("messages_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = directory.join(filename);
    let body = json!({ "prompt": prompt, "completion": completion });
    tokio::fs::write(&path, serde_json::to_vec_pretty(&body)?).await?;

    debug!(path = %path.display(), "transcript recorded");
    Ok(())
}
