use std::{
    collections::{BTreeSet, HashSet},
    sync::LazyLock,
};

use regex::Regex;
use thiserror::Error;

use crate::models::{Intent, TimePreference, Urgency, UNKNOWN_MOOD};

/// Raised when extraction is attempted on blank text
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Input text is empty")]
pub struct EmptyInputError;

/// A canonical label and the words that select it
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub label: &'static str,
    pub terms: &'static [&'static str],
}

/// Mood groups in priority order: the first group with a hit decides the mood
pub const MOOD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        label: "stressed",
        terms: &["stressed", "anxious", "overwhelmed", "tense", "worried", "pressure", "nervous"],
    },
    KeywordGroup {
        label: "relaxed",
        terms: &["calm", "peaceful", "relaxed", "chill", "zen", "tranquil", "serene"],
    },
    KeywordGroup {
        label: "energetic",
        terms: &["energetic", "active", "pumped", "excited", "lively", "vigorous"],
    },
    KeywordGroup {
        label: "happy",
        terms: &["happy", "joyful", "cheerful", "upbeat", "positive", "glad"],
    },
    KeywordGroup {
        label: "creative",
        terms: &["creative", "artistic", "imaginative", "innovative", "inspired"],
    },
    KeywordGroup {
        label: "social",
        terms: &["social", "together", "friends", "people", "group", "community"],
    },
    KeywordGroup {
        label: "focused",
        terms: &["focused", "concentrated", "productive", "work", "study", "learn"],
    },
    KeywordGroup {
        label: "adventurous",
        terms: &["adventure", "adventurous", "explore", "outdoor", "nature", "hiking", "travel"],
    },
];

/// Coarse activity types; every matching group is reported
pub const ACTIVITY_TYPE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        label: "physical",
        terms: &["exercise", "workout", "sport", "sports", "run", "running", "gym", "fitness", "active"],
    },
    KeywordGroup {
        label: "mental",
        terms: &["read", "reading", "study", "learn", "think", "puzzle", "brain", "mind"],
    },
    KeywordGroup {
        label: "creative",
        terms: &["create", "creative", "art", "draw", "paint", "write", "music", "craft"],
    },
    KeywordGroup {
        label: "social",
        terms: &["friend", "friends", "people", "group", "party", "social", "together"],
    },
    KeywordGroup {
        label: "outdoor",
        terms: &["outside", "outdoor", "outdoors", "nature", "park", "hiking", "fresh air"],
    },
    KeywordGroup {
        label: "indoor",
        terms: &["inside", "indoor", "indoors", "home", "cozy", "comfortable"],
    },
    KeywordGroup {
        label: "wellness",
        terms: &["relax", "meditate", "breathe", "wellness", "self-care", "health"],
    },
];

/// Qualitative time phrases; the first matching entry wins
pub const TIME_PREFERENCE_GROUPS: &[(TimePreference, &[&str])] = &[
    (TimePreference::Quick, &["quick", "short", "brief"]),
    (TimePreference::Medium, &["medium", "moderate"]),
    (TimePreference::Long, &["long", "extended"]),
    (TimePreference::AllDay, &["all day", "whole day"]),
];

pub const URGENT_PHRASES: &[&str] = &["urgent", "asap", "quickly", "immediately", "right now", "need now"];
pub const MODERATE_PHRASES: &[&str] = &["soon", "today", "tonight", "this evening", "later"];

/// Words that never become keywords
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "doing", "for",
    "from", "get", "had", "has", "have", "having", "he", "her", "here", "him", "his", "how", "i",
    "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "it", "it's", "its", "just", "like",
    "me", "might", "more", "my", "myself", "need", "no", "not", "now", "of", "on", "or", "our",
    "out", "really", "she", "should", "so", "some", "something", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "to", "too", "up", "very", "want", "was",
    "we", "were", "what", "when", "where", "which", "while", "who", "why", "will", "with", "would",
    "you", "your", "feel", "feeling", "maybe", "please", "min", "mins", "minute", "minutes", "hr",
    "hrs", "hour", "hours", "half", "one",
];

static DURATION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?|half an?|an?|one)[\s-]*(minutes?|mins?|hours?|hrs?)\b").ok()
});

/// Immutable lookup tables driving extraction
#[derive(Debug, Clone)]
pub struct IntentTables {
    pub mood_groups: Vec<KeywordGroup>,
    pub activity_type_groups: Vec<KeywordGroup>,
    pub time_preferences: Vec<(TimePreference, &'static [&'static str])>,
    pub urgent_phrases: Vec<&'static str>,
    pub moderate_phrases: Vec<&'static str>,
    pub stop_words: HashSet<&'static str>,
}

impl Default for IntentTables {
    fn default() -> Self {
        Self {
            mood_groups: MOOD_GROUPS.to_vec(),
            activity_type_groups: ACTIVITY_TYPE_GROUPS.to_vec(),
            time_preferences: TIME_PREFERENCE_GROUPS.to_vec(),
            urgent_phrases: URGENT_PHRASES.to_vec(),
            moderate_phrases: MODERATE_PHRASES.to_vec(),
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }
}

/// Turns a free-text utterance into an [`Intent`]
///
/// Matching is case-insensitive and works on whole tokens, so "calming" does
/// not select the `relaxed` group through "calm". The extractor holds no
/// mutable state and can be shared freely across request handlers.
#[derive(Debug, Clone, Default)]
pub struct IntentExtractor {
    tables: IntentTables,
}

impl IntentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: IntentTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &IntentTables {
        &self.tables
    }

    /// Extracts mood, duration, keywords, activity types and urgency
    pub fn extract(&self, text: &str) -> Result<Intent, EmptyInputError> {
        if text.trim().is_empty() {
            return Err(EmptyInputError);
        }

        let tokens = tokenize(text);
        let parts = compound_parts(&tokens);

        let intent = Intent {
            mood: self.detect_mood(&tokens, &parts),
            duration_minutes: detect_duration(text),
            time_preference: self.detect_time_preference(&tokens),
            keywords: self.extract_keywords(&tokens),
            activity_types: self.detect_activity_types(&tokens, &parts),
            urgency: self.detect_urgency(&tokens),
        };

        tracing::debug!(
            mood = %intent.mood,
            duration_minutes = ?intent.duration_minutes,
            keywords = intent.keywords.len(),
            "Extracted intent"
        );

        Ok(intent)
    }

    fn detect_mood(&self, tokens: &[String], parts: &[String]) -> String {
        self.tables
            .mood_groups
            .iter()
            .find(|group| group_matches(group, tokens) || group_matches(group, parts))
            .map(|group| group.label)
            .unwrap_or(UNKNOWN_MOOD)
            .to_string()
    }

    fn detect_activity_types(&self, tokens: &[String], parts: &[String]) -> Vec<String> {
        self.tables
            .activity_type_groups
            .iter()
            .filter(|group| group_matches(group, tokens) || group_matches(group, parts))
            .map(|group| group.label.to_string())
            .collect()
    }

    fn detect_time_preference(&self, tokens: &[String]) -> Option<TimePreference> {
        self.tables
            .time_preferences
            .iter()
            .find(|(_, terms)| terms.iter().any(|term| contains_phrase(tokens, term)))
            .map(|(preference, _)| *preference)
    }

    fn detect_urgency(&self, tokens: &[String]) -> Urgency {
        let any_of = |phrases: &[&str]| phrases.iter().any(|p| contains_phrase(tokens, p));

        if any_of(self.tables.urgent_phrases.as_slice()) {
            Urgency::High
        } else if any_of(self.tables.moderate_phrases.as_slice()) {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    fn extract_keywords(&self, tokens: &[String]) -> BTreeSet<String> {
        tokens
            .iter()
            .filter(|token| !self.tables.stop_words.contains(token.as_str()))
            .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
            .cloned()
            .collect()
    }
}

/// Lower-cases and splits text into word tokens, keeping inner `'` and `-`
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|token| token.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens with hyphenated compounds broken apart, so "stressed-out" yields "stressed"
fn compound_parts(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| token.split('-'))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn group_matches(group: &KeywordGroup, tokens: &[String]) -> bool {
    group.terms.iter().any(|term| contains_phrase(tokens, term))
}

/// True when the words of `phrase` appear consecutively in `tokens`
fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }

    tokens
        .windows(words.len())
        .any(|window| window.iter().zip(&words).all(|(token, word)| token == word))
}

/// Finds the first usable "<quantity> <unit>" expression, in minutes
///
/// Fractional quantities are rounded to the nearest minute. A number directly
/// after a decimal point (the "5" of ".5 hours") is not a quantity of its own.
fn detect_duration(text: &str) -> Option<u32> {
    let pattern = DURATION_PATTERN.as_ref()?;

    pattern.captures_iter(text).find_map(|caps| {
        let quantity_match = caps.get(1)?;
        if text[..quantity_match.start()].ends_with('.') {
            return None;
        }

        let quantity = quantity_match.as_str().to_lowercase();
        let unit = caps.get(2)?.as_str().to_lowercase();
        let unit_minutes: u32 = if unit.starts_with('h') { 60 } else { 1 };

        let minutes = if quantity.starts_with("half") {
            unit_minutes / 2
        } else if matches!(quantity.as_str(), "a" | "an" | "one") {
            unit_minutes
        } else if quantity.contains('.') {
            let minutes = (quantity.parse::<f64>().ok()? * f64::from(unit_minutes)).round();
            if !minutes.is_finite() || minutes > f64::from(u32::MAX) {
                return None;
            }
            minutes as u32
        } else {
            quantity.parse::<u32>().ok()?.checked_mul(unit_minutes)?
        };

        (minutes > 0).then_some(minutes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Intent {
        IntentExtractor::new().extract(text).unwrap()
    }

    #[test]
    fn test_empty_input_fails() {
        let extractor = IntentExtractor::new();
        assert_eq!(extractor.extract(""), Err(EmptyInputError));
        assert_eq!(extractor.extract("   \n\t"), Err(EmptyInputError));
    }

    #[test]
    fn test_stressed_scenario() {
        let intent = extract("I feel stressed and need something calming for 20 minutes");
        assert_eq!(intent.mood, "stressed");
        assert_eq!(intent.duration_minutes, Some(20));
        assert!(intent.keywords.contains("calming"));
        assert!(intent.keywords.contains("stressed"));
        assert!(!intent.keywords.contains("minutes"));
        assert!(!intent.keywords.contains("20"));
    }

    #[test]
    fn test_creative_evening_scenario() {
        let intent = extract("I want to be creative this evening");
        assert_eq!(intent.mood, "creative");
        assert_eq!(intent.duration_minutes, None);
        assert!(intent.keywords.contains("creative"));
        assert!(intent.keywords.contains("evening"));
        assert_eq!(intent.urgency, Urgency::Medium);
    }

    #[test]
    fn test_mood_is_case_insensitive() {
        assert_eq!(extract("So ANXIOUS right now").mood, "stressed");
        assert_eq!(extract("Feeling Zen").mood, "relaxed");
    }

    #[test]
    fn test_mood_priority_order_is_fixed() {
        // stressed outranks happy regardless of word order
        assert_eq!(extract("happy but stressed").mood, "stressed");
        assert_eq!(extract("stressed but happy").mood, "stressed");
        // energetic outranks happy
        assert_eq!(extract("happy and excited").mood, "energetic");
    }

    #[test]
    fn test_each_mood_keyword_resolves_to_its_group() {
        let extractor = IntentExtractor::new();
        // the lowest-priority group's word never changes the result
        let trailing = MOOD_GROUPS[MOOD_GROUPS.len() - 1].terms[0];
        for group in MOOD_GROUPS {
            for term in group.terms {
                let text = format!("today I am {} and {}", term, trailing);
                let intent = extractor.extract(&text).unwrap();
                assert_eq!(intent.mood, group.label, "text: {}", text);
            }
        }
    }

    #[test]
    fn test_unknown_mood() {
        assert_eq!(extract("what should I do").mood, UNKNOWN_MOOD);
    }

    #[test]
    fn test_partial_word_does_not_match_mood() {
        // "calming" must not hit the "calm" term
        assert_eq!(extract("something calming").mood, UNKNOWN_MOOD);
    }

    #[test]
    fn test_duration_hours_convert_to_minutes() {
        assert_eq!(extract("I have 2 hours").duration_minutes, Some(120));
        assert_eq!(extract("maybe 1 hour").duration_minutes, Some(60));
        assert_eq!(extract("got 45min").duration_minutes, Some(45));
        assert_eq!(extract("for 3 hrs").duration_minutes, Some(180));
    }

    #[test]
    fn test_duration_first_occurrence_wins() {
        let intent = extract("either 15 minutes or 2 hours");
        assert_eq!(intent.duration_minutes, Some(15));
    }

    #[test]
    fn test_duration_words() {
        assert_eq!(extract("I have an hour").duration_minutes, Some(60));
        assert_eq!(extract("half an hour free").duration_minutes, Some(30));
    }

    #[test]
    fn test_zero_duration_is_skipped() {
        assert_eq!(extract("0 minutes, well maybe 10 minutes").duration_minutes, Some(10));
        assert_eq!(extract("0 minutes").duration_minutes, None);
    }

    #[test]
    fn test_overflowing_duration_is_ignored() {
        assert_eq!(extract("99999999999 hours").duration_minutes, None);
    }

    #[test]
    fn test_fractional_durations() {
        assert_eq!(extract("I have 1.5 hours free").duration_minutes, Some(90));
        assert_eq!(extract("about 2.5 hours").duration_minutes, Some(150));
        assert_eq!(extract("0.25 hours").duration_minutes, Some(15));
        assert_eq!(extract("12.5 minutes").duration_minutes, Some(13));
    }

    #[test]
    fn test_fraction_without_leading_digit_is_not_misread() {
        assert_eq!(extract("roughly .5 hours").duration_minutes, None);
        assert_eq!(extract("0.001 minutes").duration_minutes, None);
    }

    #[test]
    fn test_hyphenated_durations() {
        assert_eq!(extract("I want a 20-minute break").duration_minutes, Some(20));
        assert_eq!(extract("a 2-hour hike").duration_minutes, Some(120));
    }

    #[test]
    fn test_hyphenated_mood_and_activity_type() {
        let intent = extract("I'm stressed-out today");
        assert_eq!(intent.mood, "stressed");
        assert!(intent.keywords.contains("stressed-out"));

        let intent = extract("a bit of self-care tonight");
        assert_eq!(intent.activity_types, vec!["wellness"]);
        assert!(intent.keywords.contains("self-care"));
    }

    #[test]
    fn test_time_preference() {
        let intent = extract("something quick");
        assert_eq!(intent.time_preference, Some(TimePreference::Quick));
        assert_eq!(intent.duration_minutes, None);

        assert_eq!(extract("a long walk").time_preference, Some(TimePreference::Long));
        assert_eq!(
            extract("free all day").time_preference,
            Some(TimePreference::AllDay)
        );
        assert_eq!(extract("anything fun").time_preference, None);
        // "quickly" is urgency, not a time budget
        assert_eq!(extract("quickly please").time_preference, None);
    }

    #[test]
    fn test_duration_absent_without_unit() {
        assert_eq!(extract("I have 20").duration_minutes, None);
        assert_eq!(extract("feeling mindful").duration_minutes, None);
    }

    #[test]
    fn test_keywords_are_lowercase_and_deduplicated() {
        let intent = extract("Music, MUSIC and more music!");
        assert_eq!(intent.keywords.len(), 1);
        assert!(intent.keywords.contains("music"));
    }

    #[test]
    fn test_keywords_never_empty_strings() {
        let intent = extract(" -- ' ?? hiking ... ");
        assert!(intent.keywords.iter().all(|k| !k.is_empty()));
        assert!(intent.keywords.contains("hiking"));
    }

    #[test]
    fn test_activity_types() {
        let intent = extract("a workout outside with friends");
        assert_eq!(intent.activity_types, vec!["physical", "social", "outdoor"]);
    }

    #[test]
    fn test_activity_type_phrase() {
        let intent = extract("I need some fresh air");
        assert_eq!(intent.activity_types, vec!["outdoor"]);
    }

    #[test]
    fn test_urgency_levels() {
        assert_eq!(extract("give me something right now").urgency, Urgency::High);
        assert_eq!(extract("maybe later").urgency, Urgency::Medium);
        assert_eq!(extract("anything fun").urgency, Urgency::Low);
    }

    #[test]
    fn test_custom_tables() {
        let tables = IntentTables {
            mood_groups: vec![KeywordGroup {
                label: "sleepy",
                terms: &["tired", "sleepy"],
            }],
            ..IntentTables::default()
        };
        let extractor = IntentExtractor::with_tables(tables);
        assert_eq!(extractor.extract("so tired").unwrap().mood, "sleepy");
        assert_eq!(extractor.extract("so stressed").unwrap().mood, UNKNOWN_MOOD);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = IntentExtractor::new();
        let text = "Excited to paint with friends for 1 hour";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
