//! Glacier Uploader
//!
//! Uploads one large file to an S3 bucket as a Deep Archive object.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glacier_uploader::checksum::IntegrityCheck;
use glacier_uploader::config::{StorageConfig, UploadConfig, DEFAULT_REGION};
use glacier_uploader::storage::S3Store;
use glacier_uploader::upload::{ProgressTracker, UploadReport, Uploader};

#[derive(Debug, Parser)]
#[command(name = "glacier-uploader", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Cli {
    /// Destination bucket
    #[arg(long)]
    bucket: String,

    /// Bucket region
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Resume a previous upload (not supported yet)
    #[arg(long = "upload-id")]
    upload_id: Option<String>,

    /// File to upload
    file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "glacier_uploader=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<UploadReport> {
    let storage = StorageConfig::from_env(cli.region);
    let config = UploadConfig::new(cli.bucket, cli.file)
        .with_upload_id(cli.upload_id)
        .with_env_overrides();

    tracing::info!("S3 region: {}", storage.region);
    tracing::info!("S3 bucket: {}", config.bucket);
    println!("File to upload: {}", config.source.display());

    let store = S3Store::new(&storage).await;
    let progress = ProgressTracker::new();

    let report = Uploader::new(&store, &progress).run(&config).await?;
    Ok(report)
}

fn print_report(report: &UploadReport) {
    for line in report_lines(report) {
        println!("{}", line);
    }
}

fn report_lines(report: &UploadReport) -> Vec<String> {
    let mut lines = vec![
        format!("Upload ID: {}", report.upload_id),
        "Success!".to_string(),
    ];

    match &report.integrity {
        IntegrityCheck::Match => lines.push("Etags match!".to_string()),
        IntegrityCheck::Mismatch { remote, local } => {
            lines.push("Etags don't match!".to_string());
            lines.push(format!("  AWS:  {}", remote));
            lines.push(format!("  Ours: {}", local));
        }
    }

    lines.push(report.location.clone());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(integrity: IntegrityCheck) -> UploadReport {
        UploadReport {
            bucket: "vault".to_string(),
            key: "backup.tar".to_string(),
            upload_id: "upload-42".to_string(),
            parts: 3,
            bytes: 10,
            location: "https://vault.s3.amazonaws.com/backup.tar".to_string(),
            local_etag: "abc123-3".to_string(),
            remote_etag: "abc123-3".to_string(),
            integrity,
        }
    }

    #[test]
    fn test_report_lines_on_match() {
        let lines = report_lines(&report(IntegrityCheck::Match));

        assert_eq!(
            lines,
            vec![
                "Upload ID: upload-42",
                "Success!",
                "Etags match!",
                "https://vault.s3.amazonaws.com/backup.tar",
            ]
        );
    }

    #[test]
    fn test_report_lines_on_mismatch_show_both_etags() {
        let lines = report_lines(&report(IntegrityCheck::Mismatch {
            remote: "def456-3".to_string(),
            local: "abc123-3".to_string(),
        }));

        assert_eq!(lines[0], "Upload ID: upload-42");
        assert_eq!(lines[2], "Etags don't match!");
        assert_eq!(lines[3], "  AWS:  def456-3");
        assert_eq!(lines[4], "  Ours: abc123-3");
    }
}
