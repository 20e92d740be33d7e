//! One-shot CLI commands: ask a question, list knowledge-base entries.

use anyhow::ensure;

use faq_relay_core::{engine, models::ResolutionOutcome, store::KnowledgeStore};

use crate::config::Config;
use crate::fallback::create_generator;
use crate::sheets::SheetsStore;

/// Resolve a single question against the configured knowledge base and
/// print the answer with its provenance.
pub async fn run_ask(config: &Config, question: &str, threshold: Option<f64>) -> anyhow::Result<()> {
    let mut opts = config.engine_options()?;
    if let Some(t) = threshold {
        ensure!(
            (0.0..=1.0).contains(&t),
            "threshold must be between 0.0 and 1.0, got {}",
            t
        );
        opts.threshold = t;
    }

    let store = SheetsStore::new(&config.store)?;
    let generator = create_generator(&config.fallback)?;

    let outcome = engine::answer(&store, generator.as_ref(), &opts, question).await?;

    match outcome {
        ResolutionOutcome::Answered {
            answer,
            matched_question,
            score,
        } => {
            println!("{}", answer);
            println!();
            println!("  matched: {}", matched_question);
            println!("  score:   {:.4}", score);
        }
        ResolutionOutcome::Generated { answer } => {
            println!("{}", answer);
            println!();
            println!("  (generated answer, no knowledge-base match)");
        }
        ResolutionOutcome::Unresolved => {
            println!("{}", config.fallback.unresolved_message);
        }
    }

    Ok(())
}

/// List the entries currently in the knowledge base.
pub async fn run_entries(config: &Config) -> anyhow::Result<()> {
    let store = SheetsStore::new(&config.store)?;
    let entries = store.fetch_entries().await?;

    if entries.is_empty() {
        println!("Knowledge base is empty.");
        return Ok(());
    }

    println!("{} entries:", entries.len());
    println!();
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>4}. {}", i + 1, truncate(&entry.question, 72));
        println!("      {}", truncate(&entry.answer, 72));
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
