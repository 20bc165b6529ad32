//! Rendered-text approximation and the fixed text patterns.
//!
//! [`rendered_text`] approximates what a rendered page would expose as inner
//! text: invisible subtrees contribute nothing, inline whitespace collapses,
//! block-level elements separate with a line break, margin-bearing blocks
//! with a blank line, table cells with a tab. Embedded frame content never
//! contributes.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::document::Document;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tags;

/// Blank-line paragraph boundary: two or more line breaks, surrounding
/// whitespace ignored.
static PARAGRAPH_SPLITTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*\r?\n\s*){2,}").expect("PARAGRAPH_SPLITTER regex should compile")
});

/// A word character directly followed by a line break, with no terminal
/// punctuation in between. Rendered line breaks frequently fall at sentence
/// boundaries that carry no punctuation in the underlying markup.
static MISSING_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w)(\s*?\r?\n)").expect("MISSING_PUNCTUATION regex should compile")
});

/// Recognizable list-item enumerator: "1.", "(a)", "b)" and the like.
static ENUMERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[(]?(\d|[a-zA-Z][).])").expect("ENUMERATOR regex should compile")
});

/// Hyphen or dash directly before a line break (a hyphenated line wrap).
static HYPHEN_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[-\u{2013}\u{2014}]\r?\n").expect("HYPHEN_BREAK regex should compile")
});

/// Tags separated from their surroundings by a blank line when rendered.
const PARA_BREAK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "dl", "table", "blockquote", "figure",
    "pre",
];

/// Other block-level tags, separated by a single line break.
const LINE_BREAK_TAGS: &[&str] = &[
    "div", "li", "dt", "dd", "tr", "thead", "tbody", "tfoot", "section", "article", "header",
    "main", "form", "fieldset", "address", "hr",
];

/// Approximate the rendered inner text of a node.
pub fn rendered_text(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    render_into(doc, id, &mut out);
    tidy(&out)
}

fn render_into(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.get(id) else { return };
    match &node.data {
        NodeData::Text(raw) => {
            let mut last_was_space = out.ends_with([' ', '\n', '\t']) || out.is_empty();
            for ch in raw.chars() {
                if ch.is_whitespace() {
                    if !last_was_space {
                        out.push(' ');
                        last_was_space = true;
                    }
                } else {
                    out.push(ch);
                    last_was_space = false;
                }
            }
        }
        NodeData::Element { tag, .. } => {
            if !node.layout.visible {
                return;
            }
            match tag.as_str() {
                // Frame content belongs to the sub-document, not here.
                "iframe" | "frame" => {}
                "br" => out.push('\n'),
                "pre" => {
                    ensure_breaks(out, 2);
                    push_raw_text(doc, id, out);
                    ensure_breaks(out, 2);
                }
                "td" | "th" => {
                    if node.prev_sibling.is_some() {
                        out.push('\t');
                    }
                    for child in doc.children(id) {
                        render_into(doc, child, out);
                    }
                }
                tag => {
                    let breaks = if PARA_BREAK_TAGS.contains(&tag) {
                        2
                    } else if LINE_BREAK_TAGS.contains(&tag) {
                        1
                    } else {
                        0
                    };
                    ensure_breaks(out, breaks);
                    for child in doc.children(id) {
                        render_into(doc, child, out);
                    }
                    ensure_breaks(out, breaks);
                }
            }
        }
    }
}

/// Pad the output so it ends with at least `wanted` line breaks. No-op on an
/// empty buffer (no leading separators).
fn ensure_breaks(out: &mut String, wanted: usize) {
    if wanted == 0 {
        return;
    }
    while out.ends_with(' ') {
        out.pop();
    }
    if out.is_empty() {
        return;
    }
    let trailing = out.chars().rev().take_while(|&c| c == '\n').count();
    for _ in trailing..wanted {
        out.push('\n');
    }
}

fn push_raw_text(doc: &Document, id: NodeId, out: &mut String) {
    if let Some(text) = doc.text(id) {
        out.push_str(text);
        return;
    }
    for child in doc.children(id) {
        push_raw_text(doc, child, out);
    }
}

fn tidy(text: &str) -> String {
    text.lines().map(|line| line.trim_matches(' ')).collect::<Vec<_>>().join("\n").trim().to_string()
}

/// Split on blank-line paragraph boundaries. Single line breaks do not
/// split.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_SPLITTER.split(text).map(str::to_string).collect()
}

/// Insert a synthetic period where a word character runs straight into a
/// line break.
pub fn add_missing_punctuation(text: &str) -> String {
    MISSING_PUNCTUATION.replace_all(text, "${1}.${2}").into_owned()
}

/// Whether a list item already starts with its own enumerator.
pub fn starts_with_enumerator(text: &str) -> bool {
    ENUMERATOR.is_match(text)
}

/// Merge a run of line-structured texts into sentence-shaped passages.
///
/// Empty entries flush the passage under construction. A trailing hyphen or
/// dash joins the next line without a space; hyphenated line wraps inside an
/// entry are removed. A passage closes when its entry ends with terminal
/// punctuation.
pub fn fix_paragraphs(texts: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut para = String::new();
    for text in texts {
        if text.is_empty() {
            if !para.is_empty() {
                out.push(std::mem::take(&mut para));
            }
            continue;
        }
        if !para.is_empty() {
            if para.ends_with(['-', '\u{2013}', '\u{2014}']) {
                para.pop();
            } else {
                para.push(' ');
            }
        }
        para.push_str(&HYPHEN_BREAK.replace_all(text, ""));
        if text.ends_with(['.', '!', '?', ':', ')', '"', '\'', '\u{2019}', '\u{201d}']) {
            out.push(std::mem::take(&mut para));
        }
    }
    if !para.is_empty() {
        out.push(para);
    }
    out
}

/// Generic fallback walk: distinct, de-duplicated text runs of at least
/// `min_len` trimmed characters, in document order, skipping ignored
/// subtrees.
pub fn collect_text_runs(doc: &Document, root: NodeId, min_len: usize) -> Vec<String> {
    let mut texts = Vec::new();
    let mut seen = HashSet::new();
    collect_runs_into(doc, root, min_len, &mut seen, &mut texts);
    texts
}

fn collect_runs_into(
    doc: &Document,
    id: NodeId,
    min_len: usize,
    seen: &mut HashSet<String>,
    texts: &mut Vec<String>,
) {
    for child in doc.children(id) {
        if doc.is_element(child) {
            if tags::is_ignored(doc, child) || doc.frame_state(child).is_some() {
                continue;
            }
            collect_runs_into(doc, child, min_len, seen, texts);
        } else if let Some(raw) = doc.text(child) {
            let trimmed = raw.trim();
            if trimmed.len() >= min_len && seen.insert(trimmed.to_string()) {
                texts.push(trimmed.to_string());
            }
        }
    }
}
