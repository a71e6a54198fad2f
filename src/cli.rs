// src/cli.rs
use crate::analysis::{AnalysisResult, ReportParser};
use crate::core::{AtsServiceClient, ConfigManager};
use crate::utils::{normalize_job_description, validate_file_extension};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Parser)]
#[command(name = "ats-checker")]
#[command(about = "Score a resume against a job description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the web API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Parse a saved analysis report ("-" reads stdin)
    Parse { report: PathBuf },
    /// Send a resume to the analysis service and parse the answer
    Check(CheckArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Resume to analyze (PDF)
    #[arg(long)]
    pub resume: PathBuf,

    #[arg(long, conflicts_with = "job_description_file", required_unless_present = "job_description_file")]
    pub job_description: Option<String>,

    #[arg(long)]
    pub job_description_file: Option<PathBuf>,
}

pub async fn handle_command(cli: Cli, mut config: ConfigManager) -> Result<()> {
    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            crate::web::start_web_server(config).await
        }

        Command::Parse { report } => {
            let text = read_report(&report).await?;
            print_result(&ReportParser::new().parse(&text))
        }

        Command::Check(args) => {
            validate_file_extension(&args.resume.to_string_lossy(), &["pdf"])?;

            let job_description = match (args.job_description, args.job_description_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read file: {}", path.display()))?,
                (None, None) => anyhow::bail!("A job description is required"),
            };
            let job_description = normalize_job_description(&job_description)
                .ok_or_else(|| anyhow::anyhow!("Job description is empty"))?;

            let client = AtsServiceClient::from_config(&config.service)?;
            info!("Checking {} against job description", args.resume.display());

            let report = client
                .check_resume_file(&args.resume, &job_description)
                .await
                .context("Failed to analyze resume")?;

            print_result(&ReportParser::new().parse(&report))
        }
    }
}

async fn read_report(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read report from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }
}

fn print_result(result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommand() {
        let cli = Cli::try_parse_from(["ats-checker", "parse", "report.txt"]).unwrap();
        assert!(matches!(cli.command, Command::Parse { ref report } if report == Path::new("report.txt")));
    }

    #[test]
    fn test_check_requires_job_description() {
        assert!(Cli::try_parse_from(["ats-checker", "check", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "ats-checker",
            "check",
            "--resume",
            "cv.pdf",
            "--job-description",
            "Rust",
            "--job-description-file",
            "jd.txt",
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "ats-checker",
            "check",
            "--resume",
            "cv.pdf",
            "--job-description",
            "Rust engineer",
        ])
        .unwrap();
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.job_description.as_deref(), Some("Rust engineer"));
                assert_eq!(args.resume, PathBuf::from("cv.pdf"));
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["ats-checker", "serve", "--port", "9100"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { port: Some(9100) }));
    }

    #[tokio::test]
    async fn test_read_report_missing_file() {
        assert!(read_report(Path::new("/nonexistent/report.txt")).await.is_err());
    }
}
