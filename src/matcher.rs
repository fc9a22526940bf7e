//! Input pattern matching.
//!
//! Every player-facing command and dialogue option carries a [`Matcher`]:
//! a regular expression compiled once at setup, matched whole-string and
//! case-insensitively against the trimmed input line. Whole-string matching
//! is what lets a catch-all pattern sit safely at the end of a scan order --
//! nothing fires on a partial hit.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// Pattern that matches any input. Used by universal catch-alls.
pub const MATCH_ALL: &str = ".*";

/// A compiled, reusable input matcher.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    regex: Regex,
}

impl Matcher {
    /// Compile a match expression into a reusable matcher.
    ///
    /// The expression is anchored at both ends and made case-insensitive.
    ///
    /// # Errors
    /// Returns an error if `expr` is not a valid regular expression. Pattern
    /// compilation happens at world setup, so a bad pattern is an authoring
    /// error and should abort startup.
    pub fn compile(expr: &str) -> Result<Self> {
        let regex = Regex::new(&format!("(?i)^(?:{expr})$"))
            .with_context(|| format!("compiling match expression /{expr}/"))?;
        Ok(Self {
            pattern: expr.to_string(),
            regex,
        })
    }

    /// Whole-string match against `text`, after trimming surrounding whitespace.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text.trim())
    }

    /// The source expression this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Join match expressions into one that matches if any alternative does.
///
/// `["take", "pick up"]` becomes `((take)|(pick up))`. Used to fold keyword
/// synonym sets into a single expression before compilation.
pub fn union<S: AsRef<str>>(options: &[S]) -> String {
    let joined = options
        .iter()
        .map(|o| format!("({})", o.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    format!("({joined})")
}

/// Pre-joined synonym expressions for the verbs the game understands.
///
/// Each field is an alternation ready to be embedded in a larger command
/// pattern (e.g. `format!("{} ({aliases})", KEYWORDS.take_item)`). Built once;
/// the combined patterns are compiled once per command at setup.
pub struct Keywords {
    pub take_item: String,
    pub drop_item: String,
    pub inspect_item: String,
    pub use_item: String,
    pub buy_item: String,
    pub sell_item: String,
    pub talk_to: String,
    pub movement: String,
    pub look_around: String,
    pub do_nothing: String,
    pub exit_game: String,
}

lazy_static! {
    pub static ref KEYWORDS: Keywords = Keywords {
        take_item: union(&["take", "pick up", "grab"]),
        drop_item: union(&["drop", "throw away", "put down", "discard"]),
        inspect_item: union(&["look at", "inspect"]),
        use_item: union(&["use"]),
        buy_item: union(&["buy", "purchase", "trade"]),
        sell_item: union(&["sell", "give"]),
        talk_to: union(&["talk to", "talk with", "speak to", "speak with"]),
        movement: union(&["move", "go", "travel"]),
        look_around: union(&["look", "look around"]),
        do_nothing: union(&["wait", "do nothing"]),
        exit_game: union(&["quit", "exit", "leave"]),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_whole_string_only() {
        let m = Matcher::compile("take").unwrap();
        assert!(m.is_match("take"));
        assert!(!m.is_match("take rock"));
        assert!(!m.is_match("intake"));
    }

    #[test]
    fn match_is_case_insensitive_and_trims() {
        let m = Matcher::compile("pick up (dull rock)").unwrap();
        assert!(m.is_match("  Pick Up dull rock  "));
        assert!(m.is_match("PICK UP DULL ROCK"));
    }

    #[test]
    fn union_matches_any_alternative() {
        let expr = union(&["take", "pick up", "grab"]);
        let m = Matcher::compile(&format!("{expr} rock")).unwrap();
        assert!(m.is_match("take rock"));
        assert!(m.is_match("pick up rock"));
        assert!(m.is_match("grab rock"));
        assert!(!m.is_match("steal rock"));
    }

    #[test]
    fn match_all_really_matches_everything() {
        let m = Matcher::compile(MATCH_ALL).unwrap();
        assert!(m.is_match("xyzzy plugh !!"));
        assert!(m.is_match(""));
    }

    #[test]
    fn bad_expression_fails_compile() {
        assert!(Matcher::compile("broken(").is_err());
    }

    #[test]
    fn keyword_table_covers_take_synonyms() {
        let m = Matcher::compile(&format!("{} (rock)", KEYWORDS.take_item)).unwrap();
        assert!(m.is_match("grab rock"));
        assert!(m.is_match("pick up rock"));
    }
}
