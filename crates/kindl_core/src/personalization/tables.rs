//! Static tag tables keyed by intent title.

/// Tags scored against a user's declared vibe tags.
const VIBE_TAG_MAPPING: &[(&str, [&str; 4])] = &[
    (
        "Slow & Intentional",
        ["thoughtful", "reflective", "intentional", "meaningful"],
    ),
    (
        "Meaningful Connection",
        ["deep", "authentic", "genuine", "lasting"],
    ),
    (
        "Deep Conversations",
        ["philosophical", "emotional", "vulnerable", "honest"],
    ),
    (
        "Creative Energy",
        ["artistic", "expressive", "imaginative", "inspiring"],
    ),
    (
        "Outdoors & Active",
        ["adventurous", "energetic", "nature-loving", "active"],
    ),
    (
        "Food & Coffee Dates",
        ["cozy", "relaxed", "social", "comfortable"],
    ),
    (
        "Spiritual & Calm",
        ["mindful", "peaceful", "compassionate", "grounded"],
    ),
];

/// Display-only labels shown on intent cards.
const AMBIENT_VIBES: &[(&str, [&str; 4])] = &[
    (
        "Slow & Intentional",
        ["Thoughtful", "Reflective", "Honest", "Warm"],
    ),
    (
        "Meaningful Connection",
        ["Deep", "Authentic", "Genuine", "Lasting"],
    ),
    (
        "Deep Conversations",
        ["Philosophical", "Emotional", "Vulnerable", "Real"],
    ),
    (
        "Creative Energy",
        ["Artistic", "Expressive", "Imaginative", "Inspiring"],
    ),
    (
        "Outdoors & Active",
        ["Adventurous", "Energetic", "Nature-loving", "Active"],
    ),
    (
        "Food & Coffee Dates",
        ["Cozy", "Relaxed", "Social", "Comfortable"],
    ),
    (
        "Spiritual & Calm",
        ["Mindful", "Peaceful", "Compassionate", "Grounded"],
    ),
];

/// Returns affinity tags for `title`, empty for unknown titles.
pub fn affinity_tags(title: &str) -> &'static [&'static str] {
    lookup(VIBE_TAG_MAPPING, title)
}

/// Returns ambient display labels for `title`, empty for unknown titles.
pub fn ambient_tags(title: &str) -> &'static [&'static str] {
    lookup(AMBIENT_VIBES, title)
}

/// Counts user tags contained (case-insensitively) in any affinity tag of
/// `title`. Blank user tags never match.
pub fn affinity_matches<S: AsRef<str>>(title: &str, user_tags: &[S]) -> usize {
    let affinity = affinity_tags(title);
    if affinity.is_empty() {
        return 0;
    }

    user_tags
        .iter()
        .filter(|tag| {
            let needle = tag.as_ref().trim().to_lowercase();
            !needle.is_empty()
                && affinity
                    .iter()
                    .any(|candidate| candidate.to_lowercase().contains(needle.as_str()))
        })
        .count()
}

fn lookup(
    table: &'static [(&'static str, [&'static str; 4])],
    title: &str,
) -> &'static [&'static str] {
    table
        .iter()
        .find(|(key, _)| *key == title)
        .map(|(_, tags)| tags.as_slice())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::{affinity_matches, affinity_tags, ambient_tags};

    #[test]
    fn every_title_has_four_tags_in_both_tables() {
        for intent in crate::model::intent::default_intents() {
            assert_eq!(affinity_tags(&intent.title).len(), 4, "{}", intent.title);
            assert_eq!(ambient_tags(&intent.title).len(), 4, "{}", intent.title);
        }
    }

    #[test]
    fn matching_is_case_insensitive_and_ignores_blanks() {
        assert_eq!(
            affinity_matches("Meaningful Connection", &["DEEP", "genuine", " ", "cozy"]),
            2
        );
        assert_eq!(affinity_matches("Unknown", &["deep"]), 0);
    }

    #[test]
    fn partial_tags_match_by_containment() {
        assert_eq!(affinity_matches("Outdoors & Active", &["nature"]), 1);
    }
}
