//! Review command implementation
//!
//! Handles `encyc review`: the eight-stage generation-with-review workflow
//! for one entry, optionally followed by the topic's other perspectives.

use anyhow::Result;
use tracing::info;

use encyc_config::{Config, Registry};
use encyc_engine::workflow::Persisted;
use encyc_engine::{ReviewRequest, ReviewWorkflow, WorkflowReport};
use encyc_utils::types::{Edition, EntryType};

use super::common::{Services, volume_slug, workflow_failure};

/// Parsed `review` arguments.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub entry: String,
    pub faculty: String,
    pub edition: Edition,
    pub volume: u32,
    pub entry_type: Option<EntryType>,
    pub reviewers: Vec<String>,
    pub multi_perspective: bool,
    pub additional_authors: Vec<String>,
}

pub async fn execute_review_command(
    options: ReviewOptions,
    config: &Config,
    registry: &Registry,
) -> Result<()> {
    let volume_slug = volume_slug(registry, options.volume)?;
    let additional = if options.multi_perspective {
        additional_authors(registry, &volume_slug, &options)
    } else {
        Vec::new()
    };

    let services = Services::from_config(config)?;
    let workflow = ReviewWorkflow::new(services.context(config, registry));
    let request = ReviewRequest {
        volume_slug,
        edition: options.edition,
        entry_slug: options.entry,
        faculty_id: options.faculty,
        entry_type: options.entry_type,
        reviewers: (!options.reviewers.is_empty()).then_some(options.reviewers),
    };

    let reports = if additional.is_empty() {
        vec![workflow.run(&request).await.map_err(workflow_failure)?]
    } else {
        info!(authors = %additional.join(", "), "Generating additional perspectives");
        workflow
            .run_multi_perspective(&request, &additional)
            .await
            .map_err(workflow_failure)?
    };

    for report in &reports {
        print_report(report);
    }
    Ok(())
}

/// Explicit list, else the topic's other assigned authors in registry order.
fn additional_authors(registry: &Registry, volume_slug: &str, options: &ReviewOptions) -> Vec<String> {
    if !options.additional_authors.is_empty() {
        return options.additional_authors.clone();
    }
    registry
        .assignment(volume_slug, &options.entry)
        .map(|topic| {
            topic
                .authors
                .iter()
                .filter(|a| **a != options.faculty)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn print_report(report: &WorkflowReport) {
    let reviewers: Vec<&str> = report.reviews.iter().map(|r| r.reviewer_id.as_str()).collect();
    println!(
        "✓ {} ({}) by {}: draft {} words, revised {} words",
        report.slug, report.edition, report.faculty_id, report.draft_words, report.revised_words
    );
    println!(
        "  Reviewers: {} ({})",
        reviewers.join(", "),
        report.reviewer_source
    );
    println!(
        "  Voice fidelity: draft {}, revision {}",
        report.draft_fidelity.score, report.revision_fidelity.score
    );
    match &report.persisted {
        Persisted::Written { path } => println!("  Updated {path}"),
        Persisted::MissingFile { path } => println!("  ⚠ Entry file not found, nothing written: {path}"),
        Persisted::NoCanonicalBlock { path } => {
            println!("  ⚠ No canonical block, nothing written: {path}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(additional: &[&str]) -> ReviewOptions {
        ReviewOptions {
            entry: "attention".to_string(),
            faculty: "a.james".to_string(),
            edition: Edition::Adult,
            volume: 1,
            entry_type: None,
            reviewers: Vec::new(),
            multi_perspective: true,
            additional_authors: additional.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_additional_authors_default_to_registry() {
        let registry = Registry::embedded().unwrap();
        assert_eq!(
            additional_authors(&registry, "volume-01-mind", &options(&[])),
            vec!["a.simon"]
        );
    }

    #[test]
    fn test_explicit_additional_authors_win() {
        let registry = Registry::embedded().unwrap();
        assert_eq!(
            additional_authors(&registry, "volume-01-mind", &options(&["a.freud", "a.darwin"])),
            vec!["a.freud", "a.darwin"]
        );
    }

    #[test]
    fn test_unassigned_topic_has_no_additional_authors() {
        let registry = Registry::embedded().unwrap();
        let mut opts = options(&[]);
        opts.entry = "reverie".to_string();
        assert!(additional_authors(&registry, "volume-01-mind", &opts).is_empty());
    }
}
