mod class_name;

pub use class_name::{Body, ClassMatch, ParentContext, Separator, ValueKind, match_class};

use crate::grammar::Grammar;
use ahash::AHashSet;

fn is_boundary(c: char) -> bool {
    matches!(c, '"' | '\'' | '{') || c.is_whitespace()
}

/// Every class name the grammar accepts in `text`, deduplicated, in
/// first-seen order.
///
/// A class starts at the beginning of the text or right after whitespace,
/// a quote or `{`. A boundary character that is part of an earlier match
/// does not start a new one.
pub fn find_class_names(grammar: &Grammar, text: &str) -> Vec<String> {
    let n = text.len();
    let mut seen = AHashSet::with_capacity(64);
    let mut found = Vec::new();
    if grammar.is_empty() {
        return found;
    }

    let mut pos = 0usize;
    // Bytes before `floor` belong to a previous match.
    let mut floor = 0usize;
    while pos < n {
        let candidate = pos == 0
            || (pos > floor && text[..pos].chars().next_back().is_some_and(is_boundary));
        if candidate {
            if let Some(m) = match_class(grammar, &text[pos..]) {
                if seen.insert(m.text) {
                    found.push(m.text.to_owned());
                }
                pos += m.text.len();
                floor = pos;
                continue;
            }
        }
        match text[pos..].char_indices().find(|&(_, c)| is_boundary(c)) {
            Some((off, c)) => pos += off + c.len_utf8(),
            None => break,
        }
    }

    tracing::trace!(count = found.len(), "extracted class names");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use proptest::prelude::*;

    fn grammar() -> Grammar {
        Grammar::compile(&[
            Rule::pattern("D", ["display"]).keyword("n", "none"),
            Rule::pattern("Op", ["opacity"]).suffix_to_value(),
            Rule::pattern("C", ["color"]).suffix_to_value(),
            Rule::helper("LineClamp", [("-webkit-line-clamp", "$0")]),
        ])
        .unwrap()
    }

    #[test]
    fn extracts_from_markup_in_first_seen_order() {
        let html = r#"<div class="Op-1 D-n">
            <p class='C-#fff.5 D-n'>x</p>
            <span class="LineClamp(3,4.5em) foo:h>Op-0">y</span>
        </div>"#;
        assert_eq!(
            grammar().find_class_names(html),
            ["Op-1", "D-n", "C-#fff.5", "LineClamp(3,4.5em)", "foo:h>Op-0"]
        );
    }

    #[test]
    fn requires_a_boundary_before_the_class() {
        let g = grammar();
        assert!(g.find_class_names("xD-n").is_empty());
        assert!(g.find_class_names("a.D-n").is_empty());
        assert_eq!(g.find_class_names("{D-n}"), ["D-n"]);
        assert_eq!(g.find_class_names("D-n"), ["D-n"]);
    }

    #[test]
    fn matches_do_not_share_boundaries() {
        // The space inside the params belongs to the helper match.
        let g = grammar();
        assert_eq!(
            g.find_class_names("LineClamp(2, D-n) Op-1"),
            ["LineClamp(2, D-n)", "Op-1"]
        );
    }

    #[test]
    fn keeps_classes_that_will_not_resolve() {
        assert_eq!(grammar().find_class_names("D-unknown"), ["D-unknown"]);
    }

    #[test]
    fn any_unicode_whitespace_is_a_boundary() {
        assert_eq!(
            grammar().find_class_names("Op-1\u{b}Op-2 Op-3\u{a0}Op-4\u{2003}D-n"),
            ["Op-1", "Op-2", "Op-3", "Op-4", "D-n"]
        );
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(grammar().find_class_names("é D-n ü Op-1 ✓"), ["D-n", "Op-1"]);
    }

    proptest! {
        #[test]
        fn extraction_is_idempotent_and_unique(
            words in proptest::collection::vec(
                prop_oneof![
                    Just("D-n"), Just("Op-1"), Just("C-#000"), Just("junk"),
                    Just("D-b:h"), Just("LineClamp(1,2)"), Just("xy_Op-0--sm"),
                ],
                0..20,
            ),
            seps in proptest::collection::vec(prop_oneof![Just(" "), Just("\""), Just("\n")], 20),
        ) {
            let mut text = String::new();
            for (word, sep) in words.iter().zip(seps.iter()) {
                text.push_str(word);
                text.push_str(sep);
            }
            let g = grammar();
            let first = g.find_class_names(&text);
            let second = g.find_class_names(&text);
            prop_assert_eq!(&first, &second);

            let unique: AHashSet<_> = first.iter().collect();
            prop_assert_eq!(unique.len(), first.len());

            let mut expected: Vec<&str> = Vec::new();
            for word in &words {
                if *word != "junk" && !expected.contains(word) {
                    expected.push(*word);
                }
            }
            prop_assert_eq!(first, expected);
        }
    }
}
