/*!
 * Tests for actor field classification
 */

use anyhow::Result;
use rolesplit::actor_classifier::{
    classify_actor_field, classify_events, ActorCategory, UNKNOWN_ACTOR,
};
use rolesplit::subtitle_processor::ScriptFile;
use crate::common;

/// Test single-actor classification
#[test]
fn test_classify_actor_field_withSingleName_shouldReturnSingle() {
    assert_eq!(
        classify_actor_field("Актер 1"),
        ActorCategory::Single("Актер 1".to_string())
    );
    assert_eq!(
        classify_actor_field("  Актер 1  "),
        ActorCategory::Single("Актер 1".to_string())
    );
}

/// Test multiple-actor classification keeps written order
#[test]
fn test_classify_actor_field_withSeveralNames_shouldKeepWrittenOrder() {
    assert_eq!(
        classify_actor_field("Актер 1, Актер 2"),
        ActorCategory::Multiple(vec!["Актер 1".to_string(), "Актер 2".to_string()])
    );
    // Semicolon is a separator too, and names are not sorted
    assert_eq!(
        classify_actor_field("Борис; Анна"),
        ActorCategory::Multiple(vec!["Борис".to_string(), "Анна".to_string()])
    );
    // Duplicates are kept
    assert_eq!(
        classify_actor_field("Анна, Анна"),
        ActorCategory::Multiple(vec!["Анна".to_string(), "Анна".to_string()])
    );
}

/// Test that braces are deleted from actor names
#[test]
fn test_classify_actor_field_withBraces_shouldStripThem() {
    assert_eq!(
        classify_actor_field("{Актер 1}"),
        ActorCategory::Single("Актер 1".to_string())
    );
}

/// Test that an empty field falls back to the placeholder actor
#[test]
fn test_classify_actor_field_withEmptyField_shouldUsePlaceholder() {
    assert_eq!(
        classify_actor_field(""),
        ActorCategory::Single(UNKNOWN_ACTOR.to_string())
    );
    assert_eq!(
        classify_actor_field("  , ; "),
        ActorCategory::Single(UNKNOWN_ACTOR.to_string())
    );
}

/// Test broadcast tokens in any letter case
#[test]
fn test_classify_actor_field_withGroupToken_shouldReturnGroup() {
    for field in ["гуры", "все", "ГУРЫ", "Все", "вСе"] {
        assert_eq!(classify_actor_field(field), ActorCategory::Group, "{}", field);
    }
}

/// Test sign literals are matched exactly, not case-folded
#[test]
fn test_classify_actor_field_withSignLiteral_shouldReturnSign() {
    for field in ["Надпись", "НАДПИСЬ", "надписи", "Sign", "TEXT", "текст"] {
        assert_eq!(classify_actor_field(field), ActorCategory::Sign, "{}", field);
    }
    // Mixed case outside the closed set is an actor name, not a sign
    assert_eq!(
        classify_actor_field("НаДпИсЬ"),
        ActorCategory::Single("НаДпИсЬ".to_string())
    );
}

/// Test exclusion classification
#[test]
fn test_classify_actor_field_withExclusionMarker_shouldReturnExclusion() {
    assert_eq!(
        classify_actor_field("!Актер 1"),
        ActorCategory::Exclusion(vec!["Актер 1".to_string()])
    );
    assert_eq!(
        classify_actor_field("!Актер 1, Актер 2"),
        ActorCategory::Exclusion(vec!["Актер 1".to_string(), "Актер 2".to_string()])
    );
    // A bare marker excludes the placeholder actor
    assert_eq!(
        classify_actor_field("!"),
        ActorCategory::Exclusion(vec![UNKNOWN_ACTOR.to_string()])
    );
}

/// Test that group tokens win over everything else in decision order
#[test]
fn test_classify_actor_field_decisionOrder_shouldPreferGroup() {
    // "все" lowercases to a group token even though it could be a name
    assert_eq!(classify_actor_field("ВСЕ"), ActorCategory::Group);
}

/// Test the partition property: every valid event lands in exactly one
/// primary bucket and the totals add up
#[test]
fn test_classify_events_withMixedScript_shouldPartitionAllEvents() -> Result<()> {
    let script = ScriptFile::parse_str(&common::sample_script())?;
    let classified = classify_events(&script.events);

    assert_eq!(classified.total_classified(), script.events.len());
    assert_eq!(classified.actors.len(), 2);
    assert_eq!(classified.group_lines.len(), 1);
    assert_eq!(classified.multiple_actor_lines.len(), 1);
    assert_eq!(classified.excluded_groups.len(), 1);
    assert_eq!(classified.sign_lines.len(), 1);
    Ok(())
}

/// Test first-seen ordering of actor buckets and file ordering inside them
#[test]
fn test_classify_events_withMixedScript_shouldKeepFirstSeenOrder() -> Result<()> {
    let script = ScriptFile::parse_str(&common::sample_script())?;
    let classified = classify_events(&script.events);

    assert_eq!(classified.actors[0].name, "Актер 1");
    assert_eq!(classified.actors[1].name, "Актер 2");
    assert_eq!(classified.actors[0].events.len(), 2);
    assert_eq!(classified.actors[0].events[0].text, "Первая реплика");
    assert_eq!(classified.actors[0].events[1].text, "Третья реплика");
    Ok(())
}

/// Test that two exclusion lists with the same set in different written
/// order collapse into one group
#[test]
fn test_classify_events_withReorderedExclusions_shouldShareOneGroup() -> Result<()> {
    let content = format!(
        "[Events]\n{}\n{}\n",
        common::dialogue_line("0:00:01.00", "0:00:02.00", "!Б,А", "Первая"),
        common::dialogue_line("0:00:03.00", "0:00:04.00", "!А,Б", "Вторая"),
    );
    let script = ScriptFile::parse_str(&content)?;
    let classified = classify_events(&script.events);

    assert_eq!(classified.excluded_groups.len(), 1);
    assert_eq!(classified.excluded_groups[0].excluded, vec!["А", "Б"]);
    assert_eq!(classified.excluded_groups[0].events.len(), 2);
    Ok(())
}

/// Test that the all-actors set spans single, multiple and exclusion fields
#[test]
fn test_classify_events_withMixedScript_shouldGatherAllActors() -> Result<()> {
    let content = format!(
        "[Events]\n{}\n{}\n{}\n",
        common::dialogue_line("0:00:01.00", "0:00:02.00", "Анна", "Соло"),
        common::dialogue_line("0:00:03.00", "0:00:04.00", "Борис, Вера", "Дуэт"),
        common::dialogue_line("0:00:05.00", "0:00:06.00", "!Глеб", "Без Глеба"),
    );
    let script = ScriptFile::parse_str(&content)?;
    let classified = classify_events(&script.events);

    for name in ["Анна", "Борис", "Вера", "Глеб"] {
        assert!(classified.all_actors.contains(name), "missing {}", name);
    }
    assert_eq!(classified.all_actors.len(), 4);
    Ok(())
}

/// Test the feature-flag query used by front ends
#[test]
fn test_features_withMixedScript_shouldReportAllFlags() -> Result<()> {
    let script = ScriptFile::parse_str(&common::sample_script())?;
    let features = classify_events(&script.events).features();

    assert!(features.has_group);
    assert!(features.has_multiple);
    assert!(features.has_signs);
    Ok(())
}

/// Test the feature-flag query on a solo-only script
#[test]
fn test_features_withSoloOnlyScript_shouldReportNoFlags() -> Result<()> {
    let content = format!(
        "[Events]\n{}\n",
        common::dialogue_line("0:00:01.00", "0:00:02.00", "Анна", "Соло"),
    );
    let script = ScriptFile::parse_str(&content)?;
    let features = classify_events(&script.events).features();

    assert!(!features.has_group);
    assert!(!features.has_multiple);
    assert!(!features.has_signs);
    Ok(())
}
