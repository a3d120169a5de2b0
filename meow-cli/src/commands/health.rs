use anyhow::{Context, Result};
use colored::Colorize;
use meow_service::health::{HealthResponse, ReadinessResponse};
use reqwest::StatusCode;
use std::time::Duration;

pub async fn execute(url: &str, timeout_secs: u64) -> Result<()> {
    let base = url.trim_end_matches('/');
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(format!("{base}/health"))
        .send()
        .await
        .with_context(|| format!("Could not reach {base}"))?;
    let status = response.status();
    let health: HealthResponse = response.json().await.context("Unexpected /health response")?;
    println!(
        "{} {} {} ({})",
        mark(status),
        "health".bold(),
        health.status,
        health.version.as_deref().unwrap_or("unknown version")
    );

    let response = client
        .get(format!("{base}/ready"))
        .send()
        .await
        .with_context(|| format!("Could not reach {base}"))?;
    let status = response.status();
    let readiness: ReadinessResponse = response.json().await.context("Unexpected /ready response")?;
    println!("{} {} {}", mark(status), "ready".bold(), readiness.ready);

    let mut dependencies: Vec<_> = readiness.dependencies.iter().collect();
    dependencies.sort_by(|a, b| a.0.cmp(b.0));
    for (name, dependency) in dependencies {
        let state = if dependency.healthy { "up".green() } else { "down".red() };
        println!(
            "    {} {} {}",
            name,
            state,
            dependency.message.as_deref().unwrap_or_default().dimmed()
        );
    }

    if !readiness.ready {
        anyhow::bail!("{} is not ready", health.service);
    }
    Ok(())
}

fn mark(status: StatusCode) -> colored::ColoredString {
    if status.is_success() {
        "✓".green()
    } else {
        "✗".red()
    }
}
