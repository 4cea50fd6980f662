//! Feature extraction — text normalization, skill detection, experience and
//! education scoring. Every function here is total: malformed input degrades
//! to a documented default instead of erroring.

use std::collections::HashSet;

/// Skills recognized out of the box. Callers may pass their own pool to
/// `extract_skills` when a deployment tracks a different stack.
pub const DEFAULT_SKILLS_POOL: &[&str] = &[
    "python",
    "ml",
    "nlp",
    "sql",
    "aws",
    "docker",
    "react",
    "java",
    "c++",
    "pandas",
    "tensorflow",
];

/// Normalizes raw résumé/JD text: lower-cases, strips URLs, replaces any
/// character outside `[a-z0-9 whitespace , . # + -]` with a space, and
/// collapses runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    // URL stripping: everything from "http" to the next whitespace goes.
    let words = lowered.split_whitespace().filter_map(|w| match w.find("http") {
        Some(0) => None,
        Some(pos) => Some(&w[..pos]),
        None => Some(w),
    });

    for word in words {
        if !out.is_empty() {
            out.push(' ');
        }
        push_sanitized(&mut out, word);
    }

    // Sanitizing can introduce new whitespace runs; collapse once more.
    let collapsed: Vec<&str> = out.split_whitespace().collect();
    collapsed.join(" ")
}

fn push_sanitized(out: &mut String, word: &str) {
    for c in word.chars() {
        match c {
            'a'..='z' | '0'..='9' | ',' | '.' | '#' | '+' | '-' => out.push(c),
            _ => out.push(' '),
        }
    }
}

/// Returns the subset of `pool` present in `text` as whole words.
/// Matching is done against the cleaned form of `text`, so the function is
/// case- and whitespace-insensitive and idempotent on cleaned input.
pub fn extract_skills(text: &str, pool: &[&str]) -> HashSet<String> {
    let cleaned = clean_text(text);
    pool.iter()
        .filter(|skill| contains_word(&cleaned, &skill.to_lowercase()))
        .map(|s| s.to_lowercase())
        .collect()
}

/// Word-boundary containment test. A boundary is any character that is not
/// alphanumeric and not part of the token itself (so "c++" matches in
/// "c++ and go" but "ml" does not match inside "html").
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let h: Vec<char> = haystack.chars().collect();
    let n: Vec<char> = needle.chars().collect();
    let mut start = 0;
    while start + n.len() <= h.len() {
        if h[start..start + n.len()] == n[..] {
            let before_ok = start == 0 || !is_word_char(h[start - 1]);
            let after = start + n.len();
            let after_ok = after == h.len() || !is_word_char(h[after]);
            if before_ok && after_ok {
                return true;
            }
        }
        start += 1;
    }
    false
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Best-effort coercion of an experience value to whole months.
/// Accepts integers and floats (truncated); anything else, including
/// negatives, yields 0.
pub fn parse_experience_months(value: &str) -> u32 {
    let trimmed = value.trim();
    if let Ok(months) = trimmed.parse::<u32>() {
        return months;
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => f as u32,
        _ => 0,
    }
}

/// Categorical education score. First matching rule wins; the substring test
/// is case-insensitive. Unknown labels score 0.5.
pub fn education_score(label: &str) -> f64 {
    let e = label.to_lowercase();
    if e.contains("phd") {
        return 1.0;
    }
    if e.contains("m.tech") || e.contains("ms") || e.contains("m.sc") || e.contains("master") {
        return 0.9;
    }
    if e.contains("b.tech") || e.contains("bachelor") || e.contains("bsc") {
        return 0.7;
    }
    0.5
}
