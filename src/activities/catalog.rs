//! The built-in activity catalogue, three activities per mood tag.

/// (mood_tag, title, description, category, duration_minutes, difficulty,
///  resources_needed).
pub type CatalogEntry = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static str,
    Option<&'static str>,
);

pub const DEFAULT_ACTIVITIES: &[CatalogEntry] = &[
    (
        "anxiety",
        "Mindful Breathing Exercise",
        "A gentle breathing exercise: breathe in for 4 counts, hold for 4, and exhale for 4. Repeat three times.",
        "meditation",
        5,
        "easy",
        Some("A quiet space"),
    ),
    (
        "anxiety",
        "5-4-3-2-1 Grounding Technique",
        "Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, and 1 you can taste.",
        "mindfulness",
        10,
        "easy",
        None,
    ),
    (
        "anxiety",
        "Peaceful Place Visualization",
        "Imagine your favorite peaceful place, maybe a beach or garden. Focus on the sights and sounds there.",
        "visualization",
        15,
        "easy",
        Some("A comfortable place to sit or lie down"),
    ),
    (
        "depression",
        "Tiny Joy Journal",
        "Write down three tiny moments of joy from your day, no matter how small they seem.",
        "reflection",
        10,
        "easy",
        Some("Journal and pen"),
    ),
    (
        "depression",
        "Sunshine and Steps",
        "Take a short walk outside, focusing on the warmth of the sun and the rhythm of your steps.",
        "physical",
        15,
        "medium",
        Some("Comfortable walking shoes"),
    ),
    (
        "depression",
        "Color Your Emotions",
        "Express your feelings through colors and shapes. No artistic skill needed, just let the colors flow.",
        "creative",
        20,
        "easy",
        Some("Paper and colored pencils or markers"),
    ),
    (
        "stress",
        "Tea Mindfulness Ritual",
        "Prepare and drink a cup of tea mindfully, focusing on each sensation and the calming process.",
        "mindfulness",
        15,
        "easy",
        Some("Tea and a quiet moment"),
    ),
    (
        "stress",
        "Progressive Muscle Relaxation",
        "Systematically tense and relax each muscle group, releasing physical and mental tension.",
        "relaxation",
        20,
        "medium",
        Some("Comfortable place to lie down"),
    ),
    (
        "stress",
        "Nature's Symphony",
        "Find a spot near nature and close your eyes. Focus on identifying different natural sounds.",
        "mindfulness",
        10,
        "easy",
        Some("Access to outdoors or a nature sounds recording"),
    ),
    (
        "loneliness",
        "Self-Care Letter",
        "Write a compassionate letter to yourself, acknowledging your feelings and offering kind words.",
        "self-care",
        15,
        "medium",
        Some("Paper and pen"),
    ),
    (
        "loneliness",
        "Memory Album Creation",
        "Create a digital or physical collection of happy memories with loved ones.",
        "creative",
        30,
        "medium",
        Some("Photos or memory items"),
    ),
    (
        "loneliness",
        "Comfort Playlist",
        "Create a playlist of songs that make you feel connected and understood.",
        "music",
        20,
        "easy",
        Some("Music player or streaming service"),
    ),
    (
        "overwhelmed",
        "Task Declutter",
        "Break down one overwhelming task into tiny, manageable steps.",
        "organization",
        15,
        "medium",
        Some("Paper and pen"),
    ),
    (
        "overwhelmed",
        "Five-Minute Reset",
        "Set a timer for 5 minutes and do absolutely nothing. Just observe your thoughts without judgment.",
        "meditation",
        5,
        "easy",
        Some("Timer"),
    ),
    (
        "overwhelmed",
        "Worry Box",
        "Write down your worries and physically put them in a box, symbolically setting them aside.",
        "coping",
        10,
        "easy",
        Some("Paper, pen, and a box or container"),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::MOOD_TAGS;

    #[test]
    fn every_mood_tag_has_catalogue_entries() {
        for tag in MOOD_TAGS {
            assert!(
                DEFAULT_ACTIVITIES.iter().any(|(mood, ..)| *mood == tag),
                "no activities seeded for mood tag {tag}"
            );
        }
    }

    #[test]
    fn catalogue_tags_are_all_recognised() {
        for (mood, title, ..) in DEFAULT_ACTIVITIES {
            assert!(MOOD_TAGS.contains(mood), "{title} has unknown tag {mood}");
        }
    }
}
