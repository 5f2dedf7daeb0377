use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::sync::Arc;

use scoring_core::ScoringConfig;
use scoring_orchestrator::{OrchestratorConfig, ScoringOrchestrator, StaticMarketContext};

mod cli;

use cli::Cli;

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    // stdout carries the JSON result
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();
    let config = OrchestratorConfig::from_env().context("Failed to load scoring configuration")?;

    let mut orchestrator = ScoringOrchestrator::new(config);
    if let Some(path) = &args.context {
        let context = cli::load_context(path)?;
        orchestrator = orchestrator.with_context_provider(Arc::new(StaticMarketContext::new(context)));
    }

    let scoring = match (&args.profile, &args.weights) {
        (Some(profile), _) => orchestrator.config_for_profile(profile)?,
        (None, Some(raw)) => ScoringConfig::with_weights(cli::parse_weights(raw)?),
        (None, None) => ScoringConfig::default(),
    };

    let companies = cli::load_companies(&args.companies)?;
    tracing::info!("Loaded {} compan(ies)", companies.len());

    let output = if args.insights {
        let mut insights = serde_json::Map::new();
        for company in &companies {
            let summary = orchestrator.get_pillar_insights(company).await;
            insights.insert(company.id.clone(), serde_json::to_value(summary)?);
        }
        serde_json::Value::Object(insights)
    } else if let [company] = companies.as_slice() {
        let result = orchestrator.evaluate_company(company, &scoring).await?;
        serde_json::to_value(result)?
    } else {
        let results = orchestrator.evaluate_companies(&companies, &scoring).await;
        let statistics = orchestrator.get_scoring_statistics(&results);
        json!({ "statistics": statistics, "results": results })
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
