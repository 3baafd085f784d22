// src/bin/blob-upload.rs
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blob_admin::stores::{StoreName, STORE_CONFIGS};
use blob_admin::uploader::{BlobUploader, HttpUploadClient, SelectedFile, UploadResult};

#[derive(Parser, Debug)]
#[command(
    name = "blob-upload",
    version,
    about = "Upload JSON snapshots into the records, users and stats stores"
)]
struct Args {
    /// Base URL of the Blob Admin server
    #[arg(long, env = "BLOB_ADMIN_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Session token, sent as the `session` cookie
    #[arg(long, env = "BLOB_ADMIN_TOKEN")]
    token: Option<String>,

    /// Snapshot for the records store (records/data.json)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Snapshot for the users store (users/all_users.json)
    #[arg(long)]
    users: Option<PathBuf>,

    /// Snapshot for the stats store (stats/recent_logs.json)
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn print_result(result: &UploadResult) {
    let config = result.store_name.config();
    if result.success {
        println!(
            "{:<11} {:<24} ok      {} ({} bytes)",
            config.label,
            config.hint,
            result.message.as_deref().unwrap_or_default(),
            result.data_size.unwrap_or_default()
        );
    } else {
        println!(
            "{:<11} {:<24} FAILED  {}",
            config.label,
            config.hint,
            result.error.as_deref().unwrap_or_default()
        );
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "blob_admin=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut client = HttpUploadClient::new(&args.server)?;
    if let Some(token) = &args.token {
        client = client.with_session_token(token);
    }
    let mut uploader = BlobUploader::new(Arc::new(client));

    let selections = [
        (StoreName::Records, args.records),
        (StoreName::Users, args.users),
        (StoreName::Stats, args.stats),
    ];
    for (store, path) in selections {
        let Some(path) = path else { continue };
        let file = SelectedFile::from_path(&path);
        if let Err(e) = uploader.select_file(store, file) {
            eprintln!("{}: {} ({})", store, e, path.display());
            return Ok(ExitCode::from(2));
        }
    }

    eprintln!("Warning: uploading overwrites existing data in the selected stores.");

    let results = match uploader.upload_all().await {
        Ok(results) => results.to_vec(),
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        // Keep the catalog's display order
        for config in &STORE_CONFIGS {
            if let Some(result) = results.iter().find(|r| r.store_name == config.name) {
                print_result(result);
            }
        }
    }

    if results.iter().all(|r| r.success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
