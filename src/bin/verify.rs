//! CXA Dashboard Verification Tool
//!
//! Recomputes dashboard figures straight from the response store and diffs
//! them against the payload served by a running API instance. Used to catch
//! aggregation regressions and stale-cache surprises after deployments.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cxa-verify --features "postgres-repo,verify-tool" -- \
//!   --tenant acme --period month --base-url http://127.0.0.1:8080
//! ```
//!
//! Exits non-zero when any figure disagrees.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cxa_rust::api::{TemplateFilter, TenantId};
use cxa_rust::db::RepositoryFactory;
use cxa_rust::services::dashboard::{compute_dashboard, DashboardPayload, DashboardRequest};
use cxa_rust::services::verification::diff_payloads;

#[derive(Parser, Debug)]
#[command(name = "cxa-verify", version, about = "Diff a live dashboard against store-derived figures")]
struct Cli {
    /// Tenant whose dashboard to verify
    #[arg(long)]
    tenant: String,

    /// Template filter; "all" selects every template
    #[arg(long, default_value = "all")]
    template_id: String,

    /// Named period (today, week, month, custom, all)
    #[arg(long, default_value = "month")]
    period: String,

    /// Custom period start timestamp
    #[arg(long)]
    start: Option<String>,

    /// Custom period end timestamp
    #[arg(long)]
    end: Option<String>,

    /// Bad classification threshold on the five-point scale
    #[arg(long, default_value_t = 2.0)]
    bad_threshold: f64,

    /// Good classification threshold on the five-point scale
    #[arg(long, default_value_t = 4.0)]
    good_threshold: f64,

    /// Maximum length of the low-rating list
    #[arg(long, default_value_t = 30)]
    low_ratings_limit: i64,

    /// Base URL of the running API instance
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::WARN),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Prefer repository.toml; fall back to environment-based selection.
    let repository = match RepositoryFactory::from_default_config().await {
        Ok(repo) => repo,
        Err(_) => RepositoryFactory::from_env().await?,
    };

    let request = DashboardRequest {
        tenant_id: TenantId::new(cli.tenant.clone()),
        template: TemplateFilter::from_param(Some(&cli.template_id)),
        period: Some(cli.period.clone()),
        start: cli.start.clone(),
        end: cli.end.clone(),
        bad_threshold: Some(cli.bad_threshold),
        good_threshold: Some(cli.good_threshold),
        low_ratings_limit: Some(cli.low_ratings_limit),
    };

    println!(
        "Recomputing dashboard for tenant '{}' (template={}, period={})",
        cli.tenant, cli.template_id, cli.period
    );
    let expected = compute_dashboard(repository.as_ref(), &request, chrono::Local::now()).await?;

    let url = format!(
        "{}/v1/tenants/{}/dashboard",
        cli.base_url.trim_end_matches('/'),
        cli.tenant
    );
    println!("Fetching live payload from {}", url);

    let mut params: Vec<(&str, String)> = vec![
        ("template_id", cli.template_id.clone()),
        ("period", cli.period.clone()),
        ("bad_threshold", cli.bad_threshold.to_string()),
        ("good_threshold", cli.good_threshold.to_string()),
        ("low_ratings_limit", cli.low_ratings_limit.to_string()),
    ];
    if let Some(start) = &cli.start {
        params.push(("start", start.clone()));
    }
    if let Some(end) = &cli.end {
        params.push(("end", end.clone()));
    }

    let actual: DashboardPayload = reqwest::Client::new()
        .get(&url)
        .query(&params)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mismatches = diff_payloads(&expected, &actual);
    if mismatches.is_empty() {
        println!(
            "OK: live payload matches store-derived figures ({} submissions, {} trend days, {} low ratings)",
            expected.summary.total_submissions,
            expected.trend.len(),
            expected.low_ratings.len()
        );
        return Ok(());
    }

    eprintln!("Found {} mismatching figure(s):", mismatches.len());
    for mismatch in &mismatches {
        eprintln!("  {}", mismatch);
    }
    anyhow::bail!("dashboard verification failed")
}
