//! Name inflections used to derive default table, key, and type names
//!
//! Only the subset the resolvers need is covered:
//! - `underscore`: `ARBlog` → `ar_blog`
//! - `camelize`: `a_r_post` → `ARPost`
//! - `singularize` / `pluralize` for regular English nouns
//! - `humanize`: `a_r_blog_id` → `A r blog`

use std::sync::OnceLock;

use regex::Regex;

fn acronym_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("Invalid regex"))
}

fn word_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("Invalid regex"))
}

/// Converts a CamelCase type name into snake_case.
pub fn underscore(name: &str) -> String {
    let step = acronym_boundary().replace_all(name, "${1}_${2}");
    let step = word_boundary().replace_all(&step, "${1}_${2}");
    step.replace('-', "_").to_lowercase()
}

/// Converts a snake_case name into CamelCase, capitalizing every segment.
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Singular form of a regular English plural.
pub fn singularize(word: &str) -> String {
    if word.len() > 3 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["sses", "uses", "xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Plural form of a regular English noun.
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let consonant_before = stem
            .chars()
            .last()
            .map_or(false, |c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if consonant_before {
            return format!("{}ies", stem);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// Human-readable label for a column or association name.
pub fn humanize(name: &str) -> String {
    let base = name.strip_suffix("_id").unwrap_or(name);
    let spaced = base.replace('_', " ").trim().to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Default table name for a type name (`ARPost` → `ar_posts`).
pub fn tableize(type_name: &str) -> String {
    pluralize(&underscore(type_name))
}

/// Default foreign key pointing at a type (`ARBlog` → `ar_blog_id`).
pub fn foreign_key(type_name: &str) -> String {
    format!("{}_id", underscore(type_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_handles_acronyms() {
        assert_eq!(underscore("ARBlog"), "ar_blog");
        assert_eq!(underscore("ARPost"), "ar_post");
        assert_eq!(underscore("PlayerTeam"), "player_team");
        assert_eq!(underscore("Ball"), "ball");
    }

    #[test]
    fn test_camelize_capitalizes_each_segment() {
        assert_eq!(camelize("a_r_post"), "ARPost");
        assert_eq!(camelize("a_r_category"), "ARCategory");
        assert_eq!(camelize("division"), "Division");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("a_r_categories"), "a_r_category");
        assert_eq!(singularize("a_r_posts"), "a_r_post");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("team"), "team");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("ball"), "balls");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize("a_r_blog"), "A r blog");
        assert_eq!(humanize("division_id"), "Division");
    }

    #[test]
    fn test_tableize_and_foreign_key() {
        assert_eq!(tableize("ARPost"), "ar_posts");
        assert_eq!(tableize("Team"), "teams");
        assert_eq!(foreign_key("ARBlog"), "ar_blog_id");
    }
}
