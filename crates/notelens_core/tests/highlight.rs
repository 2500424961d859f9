use notelens_core::{escape_html, highlight, Highlighter, MARK_CLOSE, MARK_OPEN};

// Removes markers and known entities; whatever is left must be plain text.
fn strip_markup(html: &str) -> String {
    html.replace(MARK_OPEN, "")
        .replace(MARK_CLOSE, "")
        .replace("&amp;", "")
        .replace("&lt;", "")
        .replace("&gt;", "")
        .replace("&quot;", "")
        .replace("&#39;", "")
}

#[test]
fn empty_query_output_has_no_raw_metacharacters() {
    let inputs = [
        "<script>alert('x')</script>",
        "a & b && c",
        "\"quoted\" <tag attr='1'>",
        "&amp; already escaped",
    ];
    for text in inputs {
        let html = highlight(text, "");
        let rest = strip_markup(&html);
        for ch in ['<', '>', '&', '"', '\''] {
            assert!(!rest.contains(ch), "`{ch}` leaked from `{text}`: {html}");
        }
    }
}

#[test]
fn already_escaped_text_is_escaped_again() {
    assert_eq!(escape_html("&amp;"), "&amp;amp;");
}

#[test]
fn output_is_safe_for_hostile_queries() {
    let text = "<img src=x onerror=alert(1)> & \"x\"";
    for query in ["<", "img", "&", "\"", "<img src", ">", "x", "(", "amp", "lt;"] {
        let html = highlight(text, query);
        let rest = strip_markup(&html);
        for ch in ['<', '>', '&', '"', '\''] {
            assert!(!rest.contains(ch), "query `{query}` leaked `{ch}`: {html}");
        }
    }
}

#[test]
fn present_query_is_highlighted_at_least_once() {
    let cases = [
        ("Shopping List", "list"),
        ("use milk and flour", "MILK"),
        ("x < y", "<"),
        ("Tom & Jerry", "& J"),
        ("Crème brûlée", "BRÛLÉE"),
    ];
    for (text, query) in cases {
        let html = highlight(text, query);
        assert!(html.contains(MARK_OPEN), "`{query}` in `{text}`: {html}");
    }
}

#[test]
fn dot_matches_only_a_literal_dot() {
    assert_eq!(highlight("a.b", "."), "a<mark>.</mark>b");
    assert_eq!(highlight("abc", "."), "abc");
}

#[test]
fn every_regex_metacharacter_is_literal() {
    for meta in [
        ".", "*", "+", "?", "(", ")", "[", "]", "{", "}", "^", "$", "|", "\\",
    ] {
        let text = format!("left{meta}right");
        let expected = format!("left<mark>{}</mark>right", escape_html(meta));
        assert_eq!(highlight(&text, meta), expected, "metacharacter `{meta}`");
        assert_eq!(highlight("plain words", meta), "plain words");
    }
}

#[test]
fn repetition_syntax_is_not_interpreted() {
    assert_eq!(highlight("a+b test", "a+b"), "<mark>a+b</mark> test");
    assert_eq!(highlight("aaab", "a+b"), "aaab");
    assert_eq!(highlight("x{2}", "{2}"), "x<mark>{2}</mark>");
}

#[test]
fn matches_are_greedy_left_to_right() {
    assert_eq!(highlight("aaaa", "aa"), "<mark>aa</mark><mark>aa</mark>");
    assert_eq!(highlight("ababa", "aba"), "<mark>aba</mark>ba");
}

#[test]
fn whitespace_around_query_is_ignored() {
    assert_eq!(highlight("milk tea", "  milk "), "<mark>milk</mark> tea");
}

#[test]
fn reusable_highlighter_matches_free_function() {
    let highlighter = Highlighter::new("an");
    for text in ["banana", "Anchor & anvil", "none"] {
        assert_eq!(highlighter.highlight(text), highlight(text, "an"));
    }
}

#[test]
fn markers_wrap_unchanged_escaped_text() {
    let text = "Fish & Chips <daily>";
    let html = highlight(text, "chips <");
    let unmarked = html.replace(MARK_OPEN, "").replace(MARK_CLOSE, "");
    assert_eq!(unmarked, escape_html(text));
}
