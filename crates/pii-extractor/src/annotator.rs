//! Heuristic linguistic annotator
//!
//! Rule-based tokenizer, POS tagger and named-entity recognizer for English text:
//! - Tokenizer: word runs and single punctuation characters
//! - POS: closed-class lexicon, then capitalization, then suffix rules
//! - NER: runs of adjacent alphabetic proper nouns, labeled from
//!   organization/location lexicons and location prepositions

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use pii_core::{EntityLabel, EntitySpan, LinguisticAnnotator, PosTag, Token};

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("token pattern is valid"));

// ============================================================================
// Lexicons
// ============================================================================

/// Function words, matched case-insensitively so sentence-initial forms
/// are not mistaken for proper nouns
static CLOSED_CLASS: Lazy<HashMap<&'static str, PosTag>> = Lazy::new(|| {
    let mut lexicon = HashMap::new();
    let groups: &[(&[&str], PosTag)] = &[
        (
            &["a", "an", "the", "this", "that", "these", "those", "all", "any", "each", "every", "some", "no"],
            PosTag::Dt,
        ),
        (
            &[
                "in", "on", "at", "of", "from", "by", "with", "for", "about", "into", "over",
                "under", "after", "before", "between", "through", "during", "without", "within",
                "near", "since", "until", "as", "per", "via", "if", "because", "while", "than",
                "so", "therefore",
            ],
            PosTag::In,
        ),
        (
            &["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them"],
            PosTag::Prp,
        ),
        (&["my", "your", "his", "her", "its", "our", "their"], PosTag::PrpS),
        (&["and", "or", "but", "nor", "yet"], PosTag::Cc),
        (&["to"], PosTag::To),
        (
            &["can", "could", "will", "would", "shall", "should", "may", "might", "must"],
            PosTag::Md,
        ),
        (
            &["is", "was", "are", "were", "be", "been", "being", "am", "has", "have", "had", "does", "do", "did"],
            PosTag::Vbz,
        ),
        (
            &["not", "also", "very", "recently", "here", "there", "then", "now", "just"],
            PosTag::Rb,
        ),
        (&["who", "what", "which", "whom", "whose", "where", "when", "why", "how"], PosTag::Wp),
        // Imperatives that open sentences in forms and messages
        (
            &[
                "please", "kindly", "send", "call", "contact", "email", "visit", "find", "see",
                "note", "check", "let", "make", "get", "give", "take", "provide", "submit",
                "share", "attach", "fill", "apply", "update", "verify", "confirm", "keep", "use",
                "ask", "tell", "reply", "enclosed", "attached",
            ],
            PosTag::Vb,
        ),
        (
            &[
                "thanks", "thank", "regards", "hello", "hi", "hey", "dear", "yes", "okay", "ok",
                "sorry", "sincerely", "cheers", "welcome", "greetings", "oh",
            ],
            PosTag::Uh,
        ),
    ];

    for (words, tag) in groups {
        for word in *words {
            lexicon.insert(*word, *tag);
        }
    }
    lexicon
});

/// Words that mark a span as an organization
static ORG_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "inc", "corp", "ltd", "llc", "plc", "pvt", "limited", "corporation", "company",
        "holdings", "group", "foundation", "institute", "university", "college", "school",
        "bank", "agency", "ministry", "department", "board", "authority", "commission",
        "council", "trust", "society", "association", "hospital", "insurance", "services",
        "technologies", "solutions",
    ]
    .into_iter()
    .collect()
});

/// Well-known organizations matched by full span text
static KNOWN_ORGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "google", "microsoft", "amazon", "infosys", "wipro", "tcs", "reliance", "tata",
        "hdfc", "icici", "sbi", "lic", "irctc", "isro", "uidai", "rbi", "sebi", "nasa",
    ]
    .into_iter()
    .collect()
});

/// Countries, Indian states and major cities
static LOCATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Countries
        "india", "usa", "america", "england", "britain", "china", "japan", "nepal",
        "bangladesh", "pakistan", "canada", "australia", "germany", "france",
        // States
        "andhra pradesh", "assam", "bihar", "chhattisgarh", "goa", "gujarat", "haryana",
        "himachal pradesh", "jharkhand", "karnataka", "kerala", "madhya pradesh",
        "maharashtra", "manipur", "meghalaya", "mizoram", "nagaland", "odisha", "punjab",
        "rajasthan", "sikkim", "tamil nadu", "telangana", "tripura", "uttar pradesh",
        "uttarakhand", "west bengal", "bengal", "delhi", "kashmir", "ladakh",
        // Cities
        "mumbai", "bangalore", "bengaluru", "chennai", "kolkata", "calcutta", "hyderabad",
        "pune", "ahmedabad", "jaipur", "lucknow", "kanpur", "nagpur", "indore", "bhopal",
        "patna", "asansol", "durgapur", "siliguri", "howrah", "noida", "gurgaon",
        "gurugram", "chandigarh", "guwahati", "mysore", "london", "paris", "tokyo",
    ]
    .into_iter()
    .collect()
});

/// Prepositions that usually introduce a location
const LOC_PREPOSITIONS: &[&str] = &["in", "from", "at", "near", "to"];

// ============================================================================
// Heuristic Annotator
// ============================================================================

/// Lexicon and capitalization based annotator
#[derive(Debug, Clone, Default)]
pub struct HeuristicAnnotator;

impl HeuristicAnnotator {
    pub fn new() -> Self {
        Self
    }

    fn tag_word(word: &str) -> PosTag {
        let lower = word.to_lowercase();
        let mut chars = word.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return PosTag::Sym,
        };

        if !first.is_alphanumeric() && first != '_' {
            return PosTag::Sym;
        }
        if word.chars().all(|c| c.is_numeric()) {
            return PosTag::Cd;
        }
        if let Some(tag) = CLOSED_CLASS.get(lower.as_str()) {
            return *tag;
        }
        if word.chars().any(char::is_uppercase) {
            return PosTag::Nnp;
        }
        if word.chars().any(|c| c.is_ascii_digit()) {
            return PosTag::Cd;
        }

        if lower.ends_with("ly") {
            PosTag::Rb
        } else if lower.ends_with("ing") && lower.len() > 4 {
            PosTag::Vbg
        } else if lower.ends_with("ed") && lower.len() > 3 {
            PosTag::Vbd
        } else if lower.ends_with("ous") || lower.ends_with("ful") || lower.ends_with("ive") {
            PosTag::Jj
        } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            PosTag::Nns
        } else {
            PosTag::Nn
        }
    }

    /// Group adjacent alphabetic proper nouns into labeled spans
    fn entities_from_tokens(&self, text: &str, tokens: &[Token]) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if !Self::is_entity_token(&tokens[i]) {
                i += 1;
                continue;
            }

            let first = i;
            let mut last = i;
            while last + 1 < tokens.len()
                && Self::is_entity_token(&tokens[last + 1])
                && text[tokens[last].end..tokens[last + 1].start]
                    .chars()
                    .all(char::is_whitespace)
            {
                last += 1;
            }

            let start = tokens[first].start;
            let end = tokens[last].end;
            let previous = first.checked_sub(1).map(|p| &tokens[p]);
            spans.push(EntitySpan {
                text: text[start..end].to_string(),
                label: Self::classify_span(&tokens[first..=last], previous),
                start,
                end,
            });

            i = last + 1;
        }

        spans
    }

    fn is_entity_token(token: &Token) -> bool {
        token.pos.is_proper_noun() && token.is_alpha()
    }

    fn classify_span(span: &[Token], previous: Option<&Token>) -> EntityLabel {
        let words: Vec<String> = span.iter().map(|t| t.text.to_lowercase()).collect();
        let joined = words.join(" ");

        let is_acronym = span.len() == 1
            && span[0].char_len() > 1
            && span[0].text.chars().all(char::is_uppercase);

        if is_acronym
            || KNOWN_ORGS.contains(joined.as_str())
            || words.iter().any(|w| ORG_MARKERS.contains(w.as_str()))
        {
            return EntityLabel::Org;
        }

        let after_preposition = previous
            .map(|t| LOC_PREPOSITIONS.contains(&t.text.to_lowercase().as_str()))
            .unwrap_or(false);

        if LOCATIONS.contains(joined.as_str())
            || words.iter().any(|w| LOCATIONS.contains(w.as_str()))
            || after_preposition
        {
            return EntityLabel::Gpe;
        }

        EntityLabel::Person
    }
}

impl LinguisticAnnotator for HeuristicAnnotator {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        TOKEN
            .find_iter(text)
            .map(|m| Token::new(m.as_str(), m.start(), m.end()))
            .collect()
    }

    fn tag(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                token.pos = Self::tag_word(&token.text);
                token
            })
            .collect()
    }

    fn recognize_entities(&self, text: &str) -> Vec<EntitySpan> {
        let tokens = self.tag(self.tokenize(text));
        self.entities_from_tokens(text, &tokens)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<(String, &'static str)> {
        let annotator = HeuristicAnnotator::new();
        annotator
            .tag(annotator.tokenize(text))
            .into_iter()
            .map(|t| (t.text, t.pos.as_str()))
            .collect()
    }

    #[test]
    fn test_tokenize_offsets() {
        let annotator = HeuristicAnnotator::new();
        let text = "PAN no- AKKJM7875665D.";
        let tokens = annotator.tokenize(text);

        let surfaces: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(surfaces, vec!["PAN", "no", "-", "AKKJM7875665D", "."]);
        for token in &tokens {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_pos_tags() {
        let tagged = tags("My name is John Sharma and I live in Asansol since 2019.");
        let lookup: HashMap<String, &str> = tagged.into_iter().collect();

        assert_eq!(lookup["My"], "PRP$");
        assert_eq!(lookup["name"], "NN");
        assert_eq!(lookup["is"], "VBZ");
        assert_eq!(lookup["John"], "NNP");
        assert_eq!(lookup["Sharma"], "NNP");
        assert_eq!(lookup["Asansol"], "NNP");
        assert_eq!(lookup["2019"], "CD");
        assert_eq!(lookup["."], "SYM");
    }

    #[test]
    fn test_sentence_initial_function_words() {
        let tagged = tags("Please send the form. Thanks, Regards");
        let lookup: HashMap<String, &str> = tagged.into_iter().collect();

        assert_eq!(lookup["Please"], "VB");
        assert_eq!(lookup["send"], "VB");
        assert_eq!(lookup["Thanks"], "UH");
        assert_eq!(lookup["Regards"], "UH");
    }

    #[test]
    fn test_uppercase_identifier_is_proper_noun() {
        let tagged = tags("AKKJM7875665D abc123");
        assert_eq!(tagged[0].1, "NNP");
        assert_eq!(tagged[1].1, "CD");
    }

    #[test]
    fn test_entity_spans_merge_adjacent_names() {
        let annotator = HeuristicAnnotator::new();
        let entities = annotator.recognize_entities("John Sharma studies at Jadavpur University.");

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "John Sharma");
        assert_eq!(entities[0].label, EntityLabel::Person);
        assert_eq!(entities[1].text, "Jadavpur University");
        assert_eq!(entities[1].label, EntityLabel::Org);
    }

    #[test]
    fn test_location_labels() {
        let annotator = HeuristicAnnotator::new();

        let entities = annotator.recognize_entities("He lives in West Bengal");
        assert_eq!(entities[0].text, "West Bengal");
        assert_eq!(entities[0].label, EntityLabel::Gpe);

        let entities = annotator.recognize_entities("She moved from Rampur");
        assert_eq!(entities[0].label, EntityLabel::Gpe);
    }

    #[test]
    fn test_acronym_is_organization() {
        let annotator = HeuristicAnnotator::new();
        let entities = annotator.recognize_entities("'CSE', 'Priya'");

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].label, EntityLabel::Org);
        assert_eq!(entities[1].label, EntityLabel::Person);
    }

    #[test]
    fn test_punctuation_splits_spans() {
        let annotator = HeuristicAnnotator::new();
        let entities = annotator.recognize_entities(" [['John', 'Sharma']]");

        let texts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["John", "Sharma"]);
    }

    #[test]
    fn test_annotate_attaches_labels() {
        let annotator = HeuristicAnnotator::new();
        let tokens = annotator.annotate("Priya banks with HDFC");

        assert_eq!(tokens[0].entity, Some(EntityLabel::Person));
        assert_eq!(tokens[1].entity, None);
        assert_eq!(tokens[3].entity, Some(EntityLabel::Org));
    }

    #[test]
    fn test_empty_text() {
        let annotator = HeuristicAnnotator::new();
        assert!(annotator.annotate("").is_empty());
        assert!(annotator.recognize_entities("").is_empty());
    }
}
