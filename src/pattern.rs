//! Line pattern recognition for ink script notation
//!
//! Stateless recognizers over a single line of text. This is the only layer
//! that knows the notation; everything downstream works on symbolic paths.
//! Precedence between the header patterns is knot, then stitch, then label;
//! redirects and tunnel markers are matched independently because a header
//! line may also carry a redirect.

use once_cell::sync::Lazy;
use regex::Regex;

static KNOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*==+\s*(\w+)").unwrap());
static STITCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*=\s*(\w+)").unwrap());
static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-*+]+\s*\(\s*(\w+)\s*\)").unwrap());
static REDIRECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"->\s*([\w.]+)").unwrap());

/// Header classification for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// `== name` (two or more `=`)
    Knot(String),
    /// `= name` (exactly one `=`)
    Stitch(String),
    /// A choice or gather marker with a parenthesized label: `* (name)`
    Label(String),
    /// No header on this line.
    None,
}

/// True if the line is a comment once leading whitespace is stripped.
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// Captures the knot name from a `== name` header.
pub fn match_knot(line: &str) -> Option<String> {
    KNOT.captures(line).map(|c| c[1].to_string())
}

/// Captures the stitch name from a `= name` header.
pub fn match_stitch(line: &str) -> Option<String> {
    STITCH.captures(line).map(|c| c[1].to_string())
}

/// Captures the first parenthesized choice/gather label on a non-comment
/// line.
pub fn match_label(line: &str) -> Option<String> {
    if is_comment(line) {
        return None;
    }
    LABEL.captures(line).map(|c| c[1].to_string())
}

/// Captures every `-> target` path on the line, left to right.
pub fn match_redirects(line: &str) -> Vec<String> {
    REDIRECT
        .captures_iter(line)
        .map(|c| c[1].to_string())
        .collect()
}

/// True if a non-comment line contains a tunnel marker (`->->`).
pub fn is_tunnel_entry(line: &str) -> bool {
    !is_comment(line) && line.contains("->->")
}

/// Classifies the header on a line, applying knot > stitch > label
/// precedence. The patterns are mutually exclusive by construction; the
/// precedence only decides which recognizer runs first.
pub fn match_header(line: &str) -> LineMatch {
    if let Some(name) = match_knot(line) {
        LineMatch::Knot(name)
    } else if let Some(name) = match_stitch(line) {
        LineMatch::Stitch(name)
    } else if let Some(name) = match_label(line) {
        LineMatch::Label(name)
    } else {
        LineMatch::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knot_header_requires_two_equals() {
        assert_eq!(match_knot("== start"), Some("start".to_string()));
        assert_eq!(match_knot("=== chapter_one ==="), Some("chapter_one".to_string()));
        assert_eq!(match_knot("  ==intro"), Some("intro".to_string()));
        assert_eq!(match_knot("= stitch_name"), None);
        assert_eq!(match_knot("plain text"), None);
    }

    #[test]
    fn stitch_header_is_single_equals() {
        assert_eq!(match_stitch("= greet"), Some("greet".to_string()));
        assert_eq!(match_stitch("  =greet"), Some("greet".to_string()));
        // A knot header never reads as a stitch: the anchor pins the single
        // `=` to the line start, where the second `=` blocks the name.
        assert_eq!(match_stitch("== start"), None);
        assert_eq!(match_stitch("no header"), None);
    }

    #[test]
    fn label_captures_first_parenthesized_name() {
        assert_eq!(match_label("* (accept) Take the deal"), Some("accept".to_string()));
        assert_eq!(match_label("- (hub)"), Some("hub".to_string()));
        assert_eq!(match_label("++ ( retry ) Again"), Some("retry".to_string()));
        assert_eq!(
            match_label("* (first) then * (second)"),
            Some("first".to_string())
        );
        // Nested weave markers separated by spaces still match.
        assert_eq!(match_label("* * (deep) choice"), Some("deep".to_string()));
        // Choices without a label capture nothing.
        assert_eq!(match_label("* Just a choice"), None);
        // Comment lines never produce labels.
        assert_eq!(match_label("// * (ghost) commented out"), None);
    }

    #[test]
    fn redirects_are_captured_in_order() {
        assert_eq!(match_redirects("-> DONE"), vec!["DONE"]);
        assert_eq!(
            match_redirects("* [Go] -> town.square -> epilogue"),
            vec!["town.square", "epilogue"]
        );
        assert!(match_redirects("no redirect here").is_empty());
        // The tunnel marker itself captures no target.
        assert!(match_redirects("->->").is_empty());
        // A tunnel return followed by a divert still captures the divert.
        assert_eq!(match_redirects("->-> next_scene"), vec!["next_scene"]);
    }

    #[test]
    fn tunnel_marker_ignores_comments() {
        assert!(is_tunnel_entry("->->"));
        assert!(is_tunnel_entry("    ->-> after"));
        assert!(!is_tunnel_entry("// ->->"));
        assert!(!is_tunnel_entry("-> once"));
    }

    #[test]
    fn header_precedence_is_knot_stitch_label() {
        assert_eq!(match_header("== start"), LineMatch::Knot("start".to_string()));
        assert_eq!(match_header("= greet"), LineMatch::Stitch("greet".to_string()));
        assert_eq!(
            match_header("* (accept) Deal"),
            LineMatch::Label("accept".to_string())
        );
        assert_eq!(match_header("plain narration"), LineMatch::None);
    }

    #[test]
    fn header_line_can_also_carry_a_redirect() {
        let line = "== start == -> prologue";
        assert_eq!(match_header(line), LineMatch::Knot("start".to_string()));
        assert_eq!(match_redirects(line), vec!["prologue"]);
    }
}
