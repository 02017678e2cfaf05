use std::collections::HashSet;
use once_cell::sync::Lazy;
use log::{info, debug};
use crate::subtitle_processor::DialogueEvent;

// @module: Actor field classification into distribution buckets

/// Broadcast-to-everyone tokens, compared case-insensitively
const GROUP_TOKENS: [&str; 2] = ["гуры", "все"];

/// Placeholder actor name substituted when a field yields no names
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Closed set of caption/sign marker literals, compared case-sensitively.
/// The set is exhaustive on purpose: a new spelling is a new marker, not a
/// case variant.
static SIGN_VARIANTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "НАДПИСЬ", "Надпись", "надпись", "НАДПИСИ", "Надписи", "надписи",
        "ТЕКСТ", "Текст", "текст", "SIGN", "Sign", "sign", "SIGNS", "Signs",
        "signs", "TEXT", "Text", "text",
    ]
    .into_iter()
    .collect()
});

/// Category assigned to one dialogue record's actor field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorCategory {
    /// Broadcast to everyone
    Group,

    /// Non-dialogue caption/sign line
    Sign,

    /// Everyone except the named actors; names in written order
    Exclusion(Vec<String>),

    /// Exactly one speaker
    Single(String),

    /// Several speakers, names in written order, not deduplicated
    Multiple(Vec<String>),
}

/// Classify a single actor field. First match wins: group token, sign
/// literal, exclusion marker, then the single/multiple split.
pub fn classify_actor_field(field: &str) -> ActorCategory {
    let field = field.trim();

    if is_group_token(field) {
        return ActorCategory::Group;
    }
    if SIGN_VARIANTS.contains(field) {
        return ActorCategory::Sign;
    }
    if let Some(rest) = field.strip_prefix('!') {
        let mut names = split_actor_names(rest);
        if names.is_empty() {
            names.push(UNKNOWN_ACTOR.to_string());
        }
        return ActorCategory::Exclusion(names);
    }

    let mut names = split_actor_names(field);
    if names.is_empty() {
        names.push(UNKNOWN_ACTOR.to_string());
    }
    if names.len() == 1 {
        ActorCategory::Single(names.remove(0))
    } else {
        ActorCategory::Multiple(names)
    }
}

/// True when the field, lowercased, equals one of the broadcast tokens
fn is_group_token(field: &str) -> bool {
    let lowered = field.to_lowercase();
    GROUP_TOKENS.iter().any(|token| lowered == *token)
}

/// Split an actor field into names: braces are deleted, comma and semicolon
/// both separate, each piece is trimmed, empty pieces are dropped
fn split_actor_names(field: &str) -> Vec<String> {
    let cleaned: String = field.chars().filter(|c| !matches!(c, '{' | '}')).collect();
    cleaned
        .split([',', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// One actor's bucket of solo lines, in file order
#[derive(Debug)]
pub struct ActorBucket<'a> {
    /// Actor name, case-sensitive, trimmed
    pub name: String,

    /// Events owned by this actor alone
    pub events: Vec<&'a DialogueEvent>,
}

/// One line spoken by several actors at once
#[derive(Debug)]
pub struct MultipleActorEntry<'a> {
    /// The shared event
    pub event: &'a DialogueEvent,

    /// Actor names in written order, not deduplicated, not sorted
    pub actors: Vec<String>,
}

/// Lines addressed to everyone except a fixed set of actors
#[derive(Debug)]
pub struct ExclusionGroup<'a> {
    /// Canonical key: excluded names sorted, duplicates kept
    pub excluded: Vec<String>,

    /// Events carrying this exclusion set, in file order
    pub events: Vec<&'a DialogueEvent>,
}

/// Flags telling the front end which distribution options make sense for
/// the loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// File contains broadcast lines
    pub has_group: bool,

    /// File contains multiple-actor or exclusion lines
    pub has_multiple: bool,

    /// File contains caption/sign lines
    pub has_signs: bool,
}

/// Result of classifying every event of a script. Buckets borrow the events
/// they reference; nothing here is mutated after classification.
#[derive(Debug, Default)]
pub struct ClassifiedEvents<'a> {
    /// Per-actor solo buckets, first-seen order
    pub actors: Vec<ActorBucket<'a>>,

    /// Broadcast lines, file order
    pub group_lines: Vec<&'a DialogueEvent>,

    /// Multiple-actor lines, file order
    pub multiple_actor_lines: Vec<MultipleActorEntry<'a>>,

    /// Exclusion groups keyed by their canonical excluded set, first-seen order
    pub excluded_groups: Vec<ExclusionGroup<'a>>,

    /// Caption/sign lines, file order
    pub sign_lines: Vec<&'a DialogueEvent>,

    /// Every actor name seen anywhere in a single, multiple or exclusion field
    pub all_actors: HashSet<String>,
}

impl<'a> ClassifiedEvents<'a> {
    /// True when no bucket of any kind holds a single event
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
            && self.group_lines.is_empty()
            && self.multiple_actor_lines.is_empty()
            && self.excluded_groups.is_empty()
            && self.sign_lines.is_empty()
    }

    /// Which optional policies the front end should offer for this file
    pub fn features(&self) -> FeatureFlags {
        FeatureFlags {
            has_group: !self.group_lines.is_empty(),
            has_multiple: !self.multiple_actor_lines.is_empty() || !self.excluded_groups.is_empty(),
            has_signs: !self.sign_lines.is_empty(),
        }
    }

    /// Total number of events across primary buckets
    pub fn total_classified(&self) -> usize {
        self.actors.iter().map(|a| a.events.len()).sum::<usize>()
            + self.group_lines.len()
            + self.multiple_actor_lines.len()
            + self.excluded_groups.iter().map(|g| g.events.len()).sum::<usize>()
            + self.sign_lines.len()
    }
}

/// Classify every event into exactly one primary bucket.
///
/// A pre-pass over all events gathers the full actor-name set first, so the
/// answer to "does this file have multiple actors" reflects the whole file
/// before any bucket is built. The main pass then assigns each event to one
/// of the five primary buckets in decision order.
pub fn classify_events(events: &[DialogueEvent]) -> ClassifiedEvents<'_> {
    let mut classified = ClassifiedEvents::default();

    for event in events {
        match classify_actor_field(&event.actor) {
            ActorCategory::Single(name) => {
                classified.all_actors.insert(name);
            }
            ActorCategory::Multiple(names) | ActorCategory::Exclusion(names) => {
                classified.all_actors.extend(names);
            }
            ActorCategory::Group | ActorCategory::Sign => {}
        }
    }

    for event in events {
        match classify_actor_field(&event.actor) {
            ActorCategory::Group => {
                debug!("Group line: {}", event.raw);
                classified.group_lines.push(event);
            }
            ActorCategory::Sign => {
                debug!("Sign line ({}): {}", event.actor.trim(), event.raw);
                classified.sign_lines.push(event);
            }
            ActorCategory::Exclusion(names) => {
                let mut key = names;
                key.sort();
                match classified
                    .excluded_groups
                    .iter()
                    .position(|group| group.excluded == key)
                {
                    Some(idx) => classified.excluded_groups[idx].events.push(event),
                    None => classified.excluded_groups.push(ExclusionGroup {
                        excluded: key,
                        events: vec![event],
                    }),
                }
            }
            ActorCategory::Single(name) => {
                match classified.actors.iter().position(|bucket| bucket.name == name) {
                    Some(idx) => classified.actors[idx].events.push(event),
                    None => classified.actors.push(ActorBucket {
                        name,
                        events: vec![event],
                    }),
                }
            }
            ActorCategory::Multiple(names) => {
                debug!("Multiple-actor line {:?}: {}", names, event.raw);
                classified.multiple_actor_lines.push(MultipleActorEntry {
                    event,
                    actors: names,
                });
            }
        }
    }

    info!(
        "Classified {} events: {} actors, {} group lines, {} multiple-actor lines, {} exclusion groups, {} sign lines",
        classified.total_classified(),
        classified.actors.len(),
        classified.group_lines.len(),
        classified.multiple_actor_lines.len(),
        classified.excluded_groups.len(),
        classified.sign_lines.len()
    );
    classified
}
