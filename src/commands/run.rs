use anyhow::{Context, Result};

use pawpost::config::Config;
use pawpost::pipeline::{Pipeline, RunOutcome};

/// Process the newest feed entry once
///
/// Configuration problems and an unreachable model return an error (nonzero
/// exit). Anything that goes wrong with this particular article is reported
/// and the process still exits cleanly.
pub async fn run(config: &Config, dry_run: bool) -> Result<()> {
    let pipeline = Pipeline::from_config(config, dry_run).context("Invalid configuration")?;

    let generator = pipeline.generator();
    if !generator.is_available().await {
        anyhow::bail!(
            "Model {} at {} is not available",
            generator.name(),
            config.llm.endpoint()
        );
    }
    tracing::info!("🧠 Model ready ({})", generator.name());

    let outcome = pipeline.run_once().await;

    match &outcome {
        RunOutcome::Previewed {
            post,
            used_fallback,
        } => {
            println!("Subject: {}", post.subject);
            if *used_fallback {
                println!("(model response unusable, fallback body)");
            }
            println!();
            println!("{}", post.html);
        }
        RunOutcome::Published { .. } => {}
        other => tracing::warn!("Run ended without publishing: {other}"),
    }

    tracing::info!("Run finished: {outcome}");
    Ok(())
}
