use log::{info, debug};
use crate::actor_classifier::ClassifiedEvents;
use crate::errors::DistributionError;
use crate::subtitle_processor::DialogueEvent;

// @module: Policy-driven distribution of classified buckets into output buckets

/// Name of the standalone bucket holding broadcast lines when they are not
/// distributed into per-actor files
const GROUP_BUCKET_NAME: &str = "Гуры";

/// Name of the dedicated caption/sign bucket
const SIGN_BUCKET_NAME: &str = "Надписи";

/// Prefix of standalone exclusion-group bucket names
const EXCLUSION_BUCKET_PREFIX: &str = "Без ";

/// User-chosen inclusion policies. Each flag is independent;
/// `distribute_multiple` also governs exclusion groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionPolicy {
    /// Append broadcast lines to every actor's file
    pub distribute_group: bool,

    /// Append multiple-actor and qualifying exclusion lines to actor files
    pub distribute_multiple: bool,

    /// Emit the dedicated sign bucket
    pub save_signs: bool,
}

impl Default for DistributionPolicy {
    fn default() -> Self {
        DistributionPolicy {
            distribute_group: true,
            distribute_multiple: true,
            save_signs: true,
        }
    }
}

/// One named output file to be written: a display name, the events it
/// carries in final order, and whether the ASS serializer is forced
/// regardless of the chosen output format
#[derive(Debug)]
pub struct OutputBucket<'a> {
    /// Display name, sanitized later by the output orchestrator
    pub name: String,

    /// Events in final output order
    pub events: Vec<&'a DialogueEvent>,

    /// Sign buckets are always written as ASS
    pub force_ass: bool,
}

/// Apply the policy flags to the classified buckets and produce the final
/// list of named output buckets.
///
/// Per-actor order is a policy choice, not a timestamp sort: own lines
/// first, then broadcast lines, then qualifying multiple-actor lines in
/// entry order, then qualifying exclusion-group lines in group order.
pub fn build_output_buckets<'a>(
    classified: &ClassifiedEvents<'a>,
    policy: DistributionPolicy,
) -> Result<Vec<OutputBucket<'a>>, DistributionError> {
    if classified.is_empty() {
        return Err(DistributionError::EmptyResult);
    }

    let mut buckets = Vec::new();

    for actor in &classified.actors {
        let mut events = actor.events.clone();
        if policy.distribute_group {
            events.extend(classified.group_lines.iter().copied());
        }
        if policy.distribute_multiple {
            for entry in &classified.multiple_actor_lines {
                if entry.actors.iter().any(|name| *name == actor.name) {
                    events.push(entry.event);
                }
            }
            for group in &classified.excluded_groups {
                if !group.excluded.iter().any(|name| *name == actor.name) {
                    debug!(
                        "Actor {} receives {} lines excluded from {:?}",
                        actor.name,
                        group.events.len(),
                        group.excluded
                    );
                    events.extend(group.events.iter().copied());
                }
            }
        }
        buckets.push(OutputBucket {
            name: actor.name.clone(),
            events,
            force_ass: false,
        });
    }

    if !policy.distribute_group && !classified.group_lines.is_empty() {
        buckets.push(OutputBucket {
            name: GROUP_BUCKET_NAME.to_string(),
            events: classified.group_lines.clone(),
            force_ass: false,
        });
    }

    if !policy.distribute_multiple {
        for entry in &classified.multiple_actor_lines {
            buckets.push(OutputBucket {
                name: entry.actors.join(" "),
                events: vec![entry.event],
                force_ass: false,
            });
        }
        for group in &classified.excluded_groups {
            buckets.push(OutputBucket {
                name: format!("{}{}", EXCLUSION_BUCKET_PREFIX, group.excluded.join(" ")),
                events: group.events.clone(),
                force_ass: false,
            });
        }
    }

    if policy.save_signs && !classified.sign_lines.is_empty() {
        buckets.push(OutputBucket {
            name: SIGN_BUCKET_NAME.to_string(),
            events: classified.sign_lines.clone(),
            force_ass: true,
        });
    }

    info!("Built {} output buckets", buckets.len());
    Ok(buckets)
}
