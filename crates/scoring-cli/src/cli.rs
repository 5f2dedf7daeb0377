use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use scoring_core::{CompanyData, MarketContext, WeightConfig};

#[derive(Parser, Debug)]
#[command(name = "investability")]
#[command(about = "Score biotech companies across six investability pillars", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Company JSON files; each holds one company or an array of companies
    #[arg(required = true)]
    pub companies: Vec<PathBuf>,

    /// Market context JSON (comparables, benchmarks, conditions)
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// Named weight profile (balanced, growth, conservative)
    #[arg(short, long, conflicts_with = "weights")]
    pub profile: Option<String>,

    /// Inline weight vector as JSON, e.g. '{"assetQuality":0.3,...}'
    #[arg(short, long)]
    pub weights: Option<String>,

    /// Print per-pillar insights instead of scores
    #[arg(long)]
    pub insights: bool,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompanyInput {
    Many(Vec<CompanyData>),
    One(Box<CompanyData>),
}

pub fn parse_companies(raw: &str) -> Result<Vec<CompanyData>> {
    let input: CompanyInput = serde_json::from_str(raw).context("Expected a company object or array")?;
    Ok(match input {
        CompanyInput::Many(companies) => companies,
        CompanyInput::One(company) => vec![*company],
    })
}

pub fn parse_weights(raw: &str) -> Result<WeightConfig> {
    serde_json::from_str(raw).context("Invalid --weights JSON")
}

pub fn load_companies(paths: &[PathBuf]) -> Result<Vec<CompanyData>> {
    let mut companies = Vec::new();
    for path in paths {
        let raw = read(path)?;
        companies.extend(parse_companies(&raw).with_context(|| format!("Failed to parse {}", path.display()))?);
    }
    Ok(companies)
}

pub fn load_context(path: &Path) -> Result<MarketContext> {
    let raw = read(path)?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse market context {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
