//! Script sanitization.
//!
//! Two fixed rule pipelines clean up what the chat model returns. The base
//! pass runs right after generation and removes parenthetical asides and
//! templated openers. The strict pass runs right before speech synthesis and
//! additionally strips markdown artifacts, stage directions and trailing
//! notes that would otherwise be read aloud. Rule order matters: the
//! `**Notes:**` and label rules must see their emphasis markers before the
//! emphasis rule erases them.
//!
//! Both passes are total; text without matching patterns passes through
//! unchanged.

use std::sync::LazyLock;

use regex::Regex;

/// One declarative rewrite step.
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("sanitizer pattern must compile"),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// Base pass: parenthetical asides and a leading templated opener.
static BASE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("（.*?）", ""),
        Rule::new(r"\(.*?\)", ""),
        Rule::new("^(好的|那么|接下来|下面)[，,。]*", ""),
    ]
});

/// Strict additions: notes, labels, stage directions, markdown residue.
static SPEECH_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?s)\*\*Notes:\*\*.*", ""),
        Rule::new(r"\*\*Speech (Text|Script):\*\*", ""),
        Rule::new(r"\[.*?\]", ""),
        Rule::new(r"\*+", ""),
        Rule::new("-{3,}", ""),
        Rule::new(r"\n{2,}", "\n"),
    ]
});

/// Cleans a freshly generated narration script.
///
/// Removes fullwidth and ASCII parenthetical asides, then a single leading
/// discourse-marker opener with its trailing punctuation, then trims.
#[must_use]
pub fn clean_script(text: &str) -> String {
    let mut cleaned = text.trim().to_owned();
    for rule in BASE_RULES.iter() {
        cleaned = rule.apply(&cleaned);
    }
    cleaned.trim().to_owned()
}

/// Cleans a script for speech synthesis.
///
/// Applies the base pass, then drops everything after a `**Notes:**` marker,
/// strips speech labels, `[...]` stage directions, emphasis markers and
/// horizontal rules, and collapses blank-line runs.
#[must_use]
pub fn clean_for_speech(text: &str) -> String {
    let mut cleaned = clean_script(text);
    for rule in SPEECH_RULES.iter() {
        cleaned = rule.apply(&cleaned);
    }
    cleaned.trim().to_owned()
}
