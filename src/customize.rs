//! Cosmetic post-processing for generated replies
//!
//! A three-stage pipeline applied in fixed order: length bounding, keyword
//! emoji decoration, deny-list filtering. Stage behavior is driven by the
//! runtime-mutable [`ResponseConfig`], read fresh on every invocation.

use serde::{Deserialize, Serialize};

/// Replacement text when the deny-list filter fires
pub const FILTER_REDIRECT_TEXT: &str =
    "I prefer to keep our conversation positive and helpful. Could you rephrase that?";

/// Words that cause the whole reply to be replaced (matched case-insensitively)
const DENY_LIST: &[&str] = &[
    "hate", "stupid", "idiot", "dumb", "kill", "die", "suicide", "violence",
];

/// Where a decoration attaches relative to the reply
#[derive(Clone, Copy)]
enum Affix {
    Prefix,
    Suffix,
}

struct DecorationRule {
    keywords: &'static [&'static str],
    emoji: &'static str,
    affix: Affix,
}

/// Keyword decoration table. Scanned top to bottom, first match wins, at most
/// one rule fires. The order is observable behavior on multi-keyword replies;
/// do not reorder.
const DECORATION_RULES: &[DecorationRule] = &[
    DecorationRule {
        keywords: &["hello", "hi"],
        emoji: "\u{1f44b} ",
        affix: Affix::Prefix,
    },
    DecorationRule {
        keywords: &["thank"],
        emoji: " \u{1f60a}",
        affix: Affix::Suffix,
    },
    DecorationRule {
        keywords: &["help"],
        emoji: "\u{1f91d} ",
        affix: Affix::Prefix,
    },
    DecorationRule {
        keywords: &["error", "problem"],
        emoji: "\u{26a0}\u{fe0f} ",
        affix: Affix::Prefix,
    },
    DecorationRule {
        keywords: &["great", "excellent"],
        emoji: " \u{2728}",
        affix: Affix::Suffix,
    },
    DecorationRule {
        keywords: &["idea", "suggestion"],
        emoji: " \u{1f4a1}",
        affix: Affix::Suffix,
    },
];

/// Named system-prompt templates selecting the tone of generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Friendly,
    Professional,
    Casual,
    Technical,
    Creative,
}

impl Personality {
    /// All personalities, in presentation order
    pub const ALL: [Self; 5] = [
        Self::Friendly,
        Self::Professional,
        Self::Casual,
        Self::Technical,
        Self::Creative,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Technical => "technical",
            Self::Creative => "creative",
        }
    }

    /// Parse an exact lowercase name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Names of all available personalities
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.into_iter().map(Self::name).collect()
    }

    /// System-prompt template for this personality
    #[must_use]
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::Friendly => {
                "You are a friendly, helpful AI assistant. Be warm, encouraging, and provide \
                 detailed, comprehensive answers. Explain things thoroughly and give examples \
                 when helpful. Use emojis occasionally to make responses engaging."
            }
            Self::Professional => {
                "You are a professional AI assistant. Be formal, precise, and provide detailed, \
                 well-structured responses. Include relevant details, examples, and explanations \
                 to give comprehensive answers."
            }
            Self::Casual => {
                "You are a casual, laid-back AI assistant. Be relaxed, use simple language, but \
                 still provide detailed and helpful responses. Explain things in an \
                 easy-to-understand way with plenty of context."
            }
            Self::Technical => {
                "You are a technical AI assistant. Be precise, use technical terms when \
                 appropriate, and provide detailed, comprehensive explanations. Include technical \
                 details, examples, and step-by-step guidance."
            }
            Self::Creative => {
                "You are a creative AI assistant. Be imaginative, use metaphors and analogies, \
                 and provide detailed, engaging responses. Explain concepts creatively while \
                 being thorough and informative."
            }
        }
    }
}

/// Runtime-mutable response settings
///
/// `personality` stays a free string: a `/config` update may store any value,
/// and lookup falls back to the friendly template when it is unrecognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Maximum words per response
    pub max_length: usize,
    /// Active personality name
    pub personality: String,
    /// Style descriptor (free-form, forwarded as-is)
    pub response_style: String,
    /// Enable keyword emoji decoration
    pub use_emojis: bool,
    /// Response language tag
    pub language: String,
    /// Enable the deny-list content filter
    pub filter_inappropriate: bool,
    /// Include conversation context in prompts
    pub add_context: bool,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            max_length: 2000,
            personality: Personality::Friendly.name().to_string(),
            response_style: "detailed".to_string(),
            use_emojis: true,
            language: "english".to_string(),
            filter_inappropriate: true,
            add_context: true,
        }
    }
}

impl ResponseConfig {
    /// Resolve the configured personality, falling back to friendly when the
    /// stored value is unrecognized
    #[must_use]
    pub fn active_personality(&self) -> Personality {
        Personality::parse(&self.personality).unwrap_or(Personality::Friendly)
    }

    /// Apply a partial update; present keys overwrite unconditionally
    pub fn apply(&mut self, updates: &ConfigUpdate) {
        if let Some(v) = updates.max_length {
            self.max_length = v;
        }
        if let Some(v) = &updates.personality {
            self.personality.clone_from(v);
        }
        if let Some(v) = &updates.response_style {
            self.response_style.clone_from(v);
        }
        if let Some(v) = updates.use_emojis {
            self.use_emojis = v;
        }
        if let Some(v) = &updates.language {
            self.language.clone_from(v);
        }
        if let Some(v) = updates.filter_inappropriate {
            self.filter_inappropriate = v;
        }
        if let Some(v) = updates.add_context {
            self.add_context = v;
        }
    }
}

/// Partial configuration update; unknown JSON keys are silently dropped
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdate {
    pub max_length: Option<usize>,
    pub personality: Option<String>,
    pub response_style: Option<String>,
    pub use_emojis: Option<bool>,
    pub language: Option<String>,
    pub filter_inappropriate: Option<bool>,
    pub add_context: Option<bool>,
}

/// Run the full pipeline over a raw generated reply
#[must_use]
pub fn customize(reply: &str, config: &ResponseConfig) -> String {
    let mut reply = complete_naturally(reply, config.max_length);
    if config.use_emojis {
        reply = decorate(&reply);
    }
    if config.filter_inappropriate {
        reply = filter(reply);
    }
    reply
}

/// Bound reply length without mid-thought cuts
///
/// Replies up to twice the word limit pass through untouched; only extreme
/// overruns are truncated at the word limit, preferring a paragraph boundary
/// in the final 20% of the kept text over a bare ellipsis.
fn complete_naturally(reply: &str, max_words: usize) -> String {
    let word_count = reply.split_whitespace().count();
    if word_count <= max_words.saturating_mul(2) {
        return reply.to_string();
    }

    let truncated = truncate_words(reply, max_words);
    let floor = (truncated.len() as f64 * 0.8) as usize;

    for boundary in ["\n\n\n", "\n\n"] {
        if let Some(pos) = truncated.rfind(boundary).filter(|&pos| pos > floor) {
            return truncated[..pos].to_string();
        }
    }

    format!("{truncated}...")
}

/// Cut off everything past the end of the `max_words`-th word, keeping the
/// original whitespace so paragraph boundaries survive for the cut search
fn truncate_words(text: &str, max_words: usize) -> String {
    let mut end = 0;
    let mut seen = 0;
    let mut in_word = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else {
            if !in_word {
                if seen == max_words {
                    break;
                }
                seen += 1;
            }
            in_word = true;
            end = i + ch.len_utf8();
        }
    }
    text[..end].to_string()
}

/// Attach at most one emoji, first matching rule in table order
fn decorate(reply: &str) -> String {
    let lower = reply.to_lowercase();
    for rule in DECORATION_RULES {
        if rule.keywords.iter().any(|k| lower.contains(k)) {
            return match rule.affix {
                Affix::Prefix => format!("{}{reply}", rule.emoji),
                Affix::Suffix => format!("{reply}{}", rule.emoji),
            };
        }
    }
    reply.to_string()
}

/// Replace the whole reply if any deny-list word appears; never partial
fn filter(reply: String) -> String {
    let lower = reply.to_lowercase();
    if DENY_LIST.iter().any(|word| lower.contains(word)) {
        FILTER_REDIRECT_TEXT.to_string()
    } else {
        reply
    }
}
