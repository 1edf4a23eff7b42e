//! # Knowledge Base
//!
//! File: cli/src/bot/knowledge.rs
//!
//! Fixed topic keywords and their explanatory sentences. Entries are checked
//! in declaration order and matched as raw substrings of the lowercased input,
//! so "ai" also fires inside words like "said".
//!

/// A read-only, ordered keyword → sentence table.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeBase {
    entries: &'static [(&'static str, &'static str)],
}

const ENTRIES: &[(&str, &str)] = &[
    (
        "computer",
        "A computer is an electronic device for storing and processing data.",
    ),
    (
        "javascript",
        "JavaScript is a programming language used to make web pages interactive.",
    ),
    (
        "react",
        "React is a JavaScript library for building user interfaces.",
    ),
    (
        "typescript",
        "TypeScript is a typed superset of JavaScript that compiles to plain JavaScript.",
    ),
    (
        "ai",
        "AI stands for Artificial Intelligence, the simulation of human intelligence by machines.",
    ),
    (
        "python",
        "Python is a high-level, interpreted programming language known for readability.",
    ),
    (
        "html",
        "HTML is the standard markup language for creating web pages.",
    ),
    ("css", "CSS is used to style and layout web pages."),
    (
        "internet",
        "The Internet is a global network connecting millions of computers.",
    ),
    (
        "api",
        "An API (Application Programming Interface) allows applications to communicate with each other.",
    ),
    (
        "database",
        "A database is an organized collection of structured information or data.",
    ),
];

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self { entries: ENTRIES }
    }
}

impl KnowledgeBase {
    /// Returns the sentence of the first declared keyword contained in `lowered`.
    ///
    /// `lowered` must already be lowercased.
    pub fn lookup(&self, lowered: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, sentence)| *sentence)
    }

    /// Topic keywords in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(keyword, _)| *keyword)
    }

    #[cfg(test)]
    fn get(&self, keyword: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, sentence)| *sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_keyword_inside_sentence() {
        let kb = KnowledgeBase::default();
        assert_eq!(
            kb.lookup("what is a database?"),
            Some("A database is an organized collection of structured information or data.")
        );
        assert_eq!(kb.lookup("nothing relevant here"), None);
    }

    #[test]
    fn first_declared_keyword_wins() {
        let kb = KnowledgeBase::default();
        // "javascript" is declared before "typescript".
        assert_eq!(
            kb.lookup("typescript or javascript"),
            kb.get("javascript")
        );
        // "computer" precedes "internet" even though "internet" appears first.
        assert_eq!(kb.lookup("internet computer"), kb.get("computer"));
    }

    #[test]
    fn matches_raw_substrings() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.lookup("she said so"), kb.get("ai"));
        assert_eq!(kb.lookup("rapid"), kb.get("api"));
    }

    #[test]
    fn keywords_keep_declaration_order() {
        let kb = KnowledgeBase::default();
        let keys: Vec<_> = kb.keywords().collect();
        assert_eq!(keys.first(), Some(&"computer"));
        assert_eq!(keys.last(), Some(&"database"));
        assert_eq!(keys.len(), 11);
    }
}
