//! Short menu names for presets.
//!
//! Pianoteq preset names repeat their instrument name ("D4 Grand Piano Close Mic",
//! "D4 Grand Piano Classical"). Menus show only the part after the words shared
//! by every preset of the instrument.

use std::sync::LazyLock;

use regex::Regex;

use pipq_types::Preset;

static SEPARATORS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\s\-:|\u{2013}\u{2014}]+").ok());

fn tokenize(name: &str) -> Vec<&str> {
    let name = name.trim();
    match SEPARATORS.as_ref() {
        Some(re) => re.split(name).collect(),
        None => name.split_whitespace().collect(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Longest run of leading words shared by all names, compared case-insensitively.
/// The words keep the spelling of the first name and are joined with single spaces.
pub fn find_longest_common_word_prefix(names: &[&str]) -> String {
    let Some(first) = names.first() else {
        return String::new();
    };
    if names.len() == 1 {
        return first.to_string();
    }

    let tokenized: Vec<Vec<&str>> = names.iter().map(|n| tokenize(n)).collect();
    let shortest = tokenized.iter().map(Vec::len).min().unwrap_or(0);

    let mut common = Vec::new();
    for i in 0..shortest {
        let word = tokenized[0][i];
        let lower = word.to_lowercase();
        if tokenized.iter().all(|t| t[i].to_lowercase() == lower) {
            common.push(word);
        } else {
            break;
        }
    }
    common.join(" ")
}

/// Strip `prefix` from `name` and capitalize what is left.
///
/// Returns `"Default"` when the name is exactly the prefix, the name with its
/// first letter capitalized when the prefix is empty, and the name unchanged
/// when the prefix does not lead it.
pub fn calculate_display_name(name: &str, prefix: &str) -> String {
    if prefix.trim().is_empty() {
        return capitalize(name);
    }

    let name_tokens = tokenize(name);
    let prefix_tokens = tokenize(prefix);
    if name_tokens.len() < prefix_tokens.len() {
        return name.to_string();
    }
    let leads = prefix_tokens
        .iter()
        .zip(&name_tokens)
        .all(|(p, n)| p.to_lowercase() == n.to_lowercase());
    if !leads {
        return name.to_string();
    }
    if name_tokens.len() == prefix_tokens.len() {
        return "Default".to_string();
    }

    let rest = name_tokens[prefix_tokens.len()..].join(" ");
    if rest.is_empty() {
        return name.to_string();
    }
    capitalize(&rest)
}

/// Build the presets of one instrument with display names computed against
/// their siblings. A lone preset keeps its full name.
pub fn presets_with_display_names(names: &[&str]) -> Vec<Preset> {
    if names.len() <= 1 {
        return names.iter().map(|n| Preset::new(*n)).collect();
    }
    let prefix = find_longest_common_word_prefix(names);
    names
        .iter()
        .map(|n| Preset::with_display_name(*n, calculate_display_name(n, &prefix)))
        .collect()
}
