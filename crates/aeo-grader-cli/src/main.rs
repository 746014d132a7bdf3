use std::env;
use std::fs;

use aeo_grader_cli::{
    APP_NAME, CliCommand, CliOptions, LeadOptions, VERSION, build_pdf_path, help_text,
    parse_arguments,
};
use aeo_grader_core::probe::user_agent;
use aeo_grader_core::{
    AnalysisSession, GraderConfig, LeadCapture, PDF_RECOMMENDATIONS, ProbeClient, ReportView,
    SCREEN_RECOMMENDATIONS, SubmissionStore, UrlSubmission, gather_signals, normalize_url,
    render_text, write_pdf,
};
use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let raw_args = env::args().skip(1).collect::<Vec<_>>();
    let command = parse_arguments(&raw_args)?;

    match command {
        CliCommand::Help => print!("{}", help_text()),
        CliCommand::Version => println!("{APP_NAME} {VERSION}"),
        CliCommand::Run(options) => {
            let config = load_config()?;
            run(options, config).await?;
        }
        CliCommand::Lead(options) => {
            let config = load_config()?;
            capture_lead(options, config).await?;
        }
    }

    Ok(())
}

fn load_config() -> Result<GraderConfig> {
    // .env has to be loaded before the subscriber reads LOG_LEVEL
    let config = GraderConfig::from_env().context("failed to load configuration")?;
    init_tracing("warn");
    Ok(config)
}

async fn grade(
    input: &str,
    offline: bool,
    email: Option<String>,
    client: &ProbeClient,
) -> Result<AnalysisSession> {
    let url = normalize_url(input).with_context(|| format!("cannot grade '{input}'"))?;
    info!(url = %url, offline, "grading");

    let signals = if offline {
        None
    } else {
        Some(gather_signals(&url, client).await)
    };

    Ok(AnalysisSession::new(url, email, signals))
}

fn submission_store(config: &GraderConfig, client: &ProbeClient) -> Option<SubmissionStore> {
    config
        .supabase
        .clone()
        .map(|supabase| SubmissionStore::new(client.http().clone(), supabase))
}

async fn run(options: CliOptions, config: GraderConfig) -> Result<()> {
    let client = ProbeClient::new(config.clone()).context("failed to build HTTP client")?;
    let session = grade(&options.url, options.offline, options.email.clone(), &client).await?;

    let view = ReportView::from_session(&session, SCREEN_RECOMMENDATIONS);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&view));
    }

    if let Some(target) = options.pdf_target.as_ref() {
        let path = build_pdf_path(target, &session.pdf_filename());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let pdf_view = ReportView::from_session(&session, PDF_RECOMMENDATIONS);
        write_pdf(&pdf_view, &path)
            .with_context(|| format!("failed to write PDF to {}", path.display()))?;
        eprintln!("✓ PDF report saved to {}", path.display());
    }

    if !options.offline {
        if let Some(store) = submission_store(&config, &client) {
            let row = UrlSubmission::from_session(&session, user_agent());
            if let Err(err) = store.record_submission(&row).await {
                warn!(error = %err, "failed to record URL submission");
            }
        }
    }

    Ok(())
}

async fn capture_lead(options: LeadOptions, config: GraderConfig) -> Result<()> {
    let client = ProbeClient::new(config.clone()).context("failed to build HTTP client")?;
    let session = grade(
        &options.url,
        options.offline,
        Some(options.email.clone()),
        &client,
    )
    .await?;

    let lead = LeadCapture {
        name: options.name,
        email: options.email,
        company: options.company,
        company_size: options.company_size,
        challenge: options.challenge,
        analyzed_url: Some(session.url.clone()),
        overall_score: Some(session.scores.overall),
        user_agent: user_agent(),
    };

    let store = if options.offline {
        None
    } else {
        submission_store(&config, &client)
    };

    match store {
        Some(store) => {
            store
                .record_lead(&lead)
                .await
                .context("failed to record consultation request")?;
            println!("✅ Thank you! We've received your info and will be in touch.");
        }
        None => {
            info!("lead not submitted; printing it instead");
            println!("{}", serde_json::to_string_pretty(&lead)?);
        }
    }

    Ok(())
}
