//! Note list rendering: de-duplication, capping and HTML output

use std::collections::HashSet;

use crate::phase::Note;

/// Maximum number of notes shown at once
pub const MAX_NOTES: usize = 6;

/// Keep the first occurrence of each distinct text, in emission order,
/// stopping once [`MAX_NOTES`] are collected.
pub fn dedupe_notes<I>(notes: I) -> Vec<Note>
where
    I: IntoIterator<Item = Note>,
{
    let mut seen = HashSet::new();
    let mut list = Vec::new();
    for note in notes {
        if seen.insert(note.text.clone()) {
            list.push(note);
            if list.len() >= MAX_NOTES {
                break;
            }
        }
    }
    list
}

/// Escape the characters that are significant in HTML text content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render notes as `<li>` items with their severity class
pub fn notes_to_html(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|note| {
            format!(
                "<li class=\"note {}\">{}</li>",
                note.kind.css_class(),
                escape_html(&note.text)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("hips \u{2192} torso"), "hips \u{2192} torso");
    }

    #[test]
    fn test_notes_to_html() {
        let html = notes_to_html(&[
            Note::neutral("Target < 10px"),
            Note::bad("Head swaying at address."),
        ]);
        assert_eq!(
            html,
            "<li class=\"note \">Target &lt; 10px</li>\
             <li class=\"note bad\">Head swaying at address.</li>"
        );
    }

    #[test]
    fn test_dedupe_keeps_first_kind() {
        let list = dedupe_notes(vec![Note::good("same"), Note::bad("same")]);
        assert_eq!(list, vec![Note::good("same")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe_notes(Vec::new()).is_empty());
        assert_eq!(notes_to_html(&[]), "");
    }
}
