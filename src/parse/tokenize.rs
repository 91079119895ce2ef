//! Word-level helpers used while classifying the words of a command.

use std::ops::Range;

/// Strip shell quoting from a single word using shlex (POSIX rules).
///
/// Words that shlex cannot parse, or that split into several words, are
/// returned unchanged.
pub fn unquote(word: &str) -> String {
    match shlex::split(word) {
        Some(mut parts) if parts.len() == 1 => parts.remove(0),
        _ => word.to_string(),
    }
}

/// Extract the basename of a command word: `/usr/bin/ls` → `ls`.
pub fn base_name(word: &str) -> &str {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => word,
    }
}

/// Whether a word has the `NAME=value` shape of a variable assignment.
pub fn is_assignment(word: &str) -> bool {
    let Some((name, _)) = word.split_once('=') else {
        return false;
    };
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Split a long option into its flag and optional glued value.
///
/// `--width=80` → `("--width", Some("80"))`, `--all` → `("--all", None)`.
/// Returns `None` for words that are not long options, including a bare `--`.
pub fn split_long_option(word: &str) -> Option<(&str, Option<&str>)> {
    if !word.starts_with("--") || word.len() == 2 {
        return None;
    }
    match word.split_once('=') {
        Some((flag, value)) => Some((flag, Some(value))),
        None => Some((word, None)),
    }
}

/// Decompose a clustered short flag into single flags with byte ranges
/// relative to the word.
///
/// `-la` → `[("-l", 0..2), ("-a", 2..3)]`. The first flag keeps the dash;
/// the rest cover one character each, so the ranges are adjacent and never
/// overlap. The first letter must be ASCII alphanumeric; later characters may
/// be anything, since a value-taking flag can swallow them (`-xf/tmp/a.tar`).
pub fn short_cluster(word: &str) -> Option<Vec<(String, Range<usize>)>> {
    let letters = word.strip_prefix('-')?;
    if !letters
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    let flags = letters
        .char_indices()
        .map(|(i, c)| {
            let start = if i == 0 { 0 } else { i + 1 };
            (format!("-{c}"), start..i + 1 + c.len_utf8())
        })
        .collect();
    Some(flags)
}
