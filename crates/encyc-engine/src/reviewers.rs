//! Reviewer selection.
//!
//! Precedence, first usable source wins:
//! 1. the caller's explicit list, if it still names two reviewers once the
//!    primary author and duplicates are dropped
//! 2. the registry's default pair for the topic, under the same rule
//! 3. two reviewers drawn at random from the pool, excluding the primary author

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::debug;

use encyc_config::ReviewerPolicy;

/// Reviewers per entry.
pub const REVIEWERS_PER_ENTRY: usize = 2;

/// Where a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionSource {
    Explicit,
    TopicDefault,
    RandomPool,
}

/// Pick two distinct reviewers for an entry, neither being the primary author.
///
/// The random step can only come up short when the pool itself holds fewer
/// than two usable reviewers.
pub fn select_reviewers<R>(
    policy: &ReviewerPolicy,
    primary_author: &str,
    topic: &str,
    explicit: Option<&[String]>,
    rng: &mut R,
) -> (Vec<String>, SelectionSource)
where
    R: Rng + ?Sized,
{
    if let Some(list) = explicit
        && let Some(pair) = usable_pair(list, primary_author)
    {
        return (pair, SelectionSource::Explicit);
    }

    if let Some(defaults) = policy.default_pair(&topic.to_lowercase())
        && let Some(pair) = usable_pair(defaults, primary_author)
    {
        return (pair, SelectionSource::TopicDefault);
    }

    let candidates = distinct_excluding(&policy.pool, primary_author);
    let picked: Vec<String> = candidates
        .choose_multiple(rng, REVIEWERS_PER_ENTRY)
        .map(|id| (*id).to_string())
        .collect();
    debug!(
        topic = topic,
        candidates = candidates.len(),
        "Drew reviewers from the pool"
    );
    (picked, SelectionSource::RandomPool)
}

fn usable_pair(ids: &[String], primary_author: &str) -> Option<Vec<String>> {
    let distinct = distinct_excluding(ids, primary_author);
    (distinct.len() >= REVIEWERS_PER_ENTRY).then(|| {
        distinct
            .into_iter()
            .take(REVIEWERS_PER_ENTRY)
            .map(str::to_string)
            .collect()
    })
}

/// Trimmed, non-empty, first-occurrence order, primary author removed.
fn distinct_excluding<'a>(ids: &'a [String], primary_author: &str) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for id in ids.iter().map(|id| id.trim()) {
        if !id.is_empty() && id != primary_author && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
