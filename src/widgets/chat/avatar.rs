// Avatar resolution - user name to display glyph
//
// Resolution order: caller-supplied lookup function, then the merged avatar
// table (built-in defaults overlaid by caller entries, both with normalized
// keys), then the first character of the user name.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Caller-supplied avatar lookup; overrides the table entirely when set
pub type AvatarLookup = Box<dyn Fn(&str) -> String + Send>;

const USER_GLYPH: &str = "🧑";
const ASSISTANT_GLYPH: &str = "🤖";
const SYSTEM_GLYPH: &str = "⚙️";
const ERROR_GLYPH: &str = "❌";

/// Built-in user-name -> avatar table.
///
/// Keys are normalized before lookup, so "Assistant" and "assistant" both
/// match. Callers overlay entries via `default_avatars`; the built-ins are
/// never mutated.
const DEFAULT_AVATARS: &[(&str, &str)] = &[
    // User
    ("client", USER_GLYPH),
    ("customer", USER_GLYPH),
    ("employee", USER_GLYPH),
    ("human", USER_GLYPH),
    ("person", USER_GLYPH),
    ("user", USER_GLYPH),
    // Assistant
    ("agent", ASSISTANT_GLYPH),
    ("ai", ASSISTANT_GLYPH),
    ("assistant", ASSISTANT_GLYPH),
    ("bot", ASSISTANT_GLYPH),
    ("chatbot", ASSISTANT_GLYPH),
    ("machine", ASSISTANT_GLYPH),
    ("robot", ASSISTANT_GLYPH),
    // System
    ("system", SYSTEM_GLYPH),
    ("exception", ERROR_GLYPH),
    ("error", ERROR_GLYPH),
    // Human variants
    ("adult", "🧑"),
    ("baby", "👶"),
    ("boy", "👦"),
    ("child", "🧒"),
    ("girl", "👧"),
    ("man", "👨"),
    ("woman", "👩"),
    // Tools
    ("calculator", "🧮"),
    ("translator", "🌐"),
    ("llama", "🦙"),
];

/// Strip non-alphanumeric characters and lowercase.
///
/// "Dr. Ada!" and "dr ada" both normalize to "drada", so table keys match
/// regardless of punctuation or case.
pub fn normalize(user: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("static pattern"));
    re.replace_all(user, "").to_lowercase()
}

/// Resolve an avatar for `user` from the merged table.
///
/// Caller `overrides` win over the built-in table; both sides are
/// re-normalized before lookup. A miss falls back to the first character of
/// the original user string, or the generic user glyph for an empty name.
pub fn resolve(user: &str, overrides: &HashMap<String, String>) -> String {
    let mut merged: HashMap<String, &str> = DEFAULT_AVATARS
        .iter()
        .map(|(key, glyph)| (normalize(key), *glyph))
        .collect();
    for (key, glyph) in overrides {
        merged.insert(normalize(key), glyph.as_str());
    }

    if let Some(glyph) = merged.get(&normalize(user)) {
        return (*glyph).to_string();
    }
    user.chars()
        .next()
        .map(|c| c.to_string())
        .unwrap_or_else(|| USER_GLYPH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Dr. Ada!"), "drada");
        assert_eq!(normalize("  User 42 "), "user42");
        assert_eq!(normalize("assistant"), "assistant");
    }

    #[test]
    fn test_builtin_table_hit() {
        let none = HashMap::new();
        assert_eq!(resolve("Assistant", &none), ASSISTANT_GLYPH);
        assert_eq!(resolve("SYSTEM", &none), SYSTEM_GLYPH);
        assert_eq!(resolve("User", &none), USER_GLYPH);
    }

    #[test]
    fn test_miss_falls_back_to_first_character() {
        let none = HashMap::new();
        assert_eq!(resolve("Dr. Ada!", &none), "D");
        assert_eq!(resolve("zoe", &none), "z");
    }

    #[test]
    fn test_overrides_win_and_are_normalized() {
        let mut overrides = HashMap::new();
        overrides.insert("Dr. Ada!".to_string(), "🔬".to_string());
        overrides.insert("assistant".to_string(), "🦾".to_string());

        assert_eq!(resolve("drada", &overrides), "🔬");
        assert_eq!(resolve("Assistant", &overrides), "🦾");
        // Untouched built-ins still resolve
        assert_eq!(resolve("system", &overrides), SYSTEM_GLYPH);
    }

    #[test]
    fn test_empty_user_gets_generic_glyph() {
        assert_eq!(resolve("", &HashMap::new()), USER_GLYPH);
    }
}
