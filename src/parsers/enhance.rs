use crate::config::{ExtractionConfig, SearchConfig};
use crate::error::{Result, ScraperError};
use crate::models::ProfileRecord;
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

static CONNECTIVES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:at|of|the|in|and)\b|&").unwrap());
static ROLE_TERMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Professor|Assistant|Associate|Student|Principal|Faculty|Director|Dean)\b")
        .unwrap()
});
static STATUS_TERMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:Attended|Studying|Graduated|Alumni)\b").unwrap());

/// Tried in order; the first match wins.
static ROLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(Assistant Professor|Associate Professor|Professor)\b",
        r"(?i)\b(Principal|Director|Dean|Faculty|Lecturer)\b",
        r"(?i)\b(Student|Graduate|Alumni|Scholar)\b",
        r"(?i)\b(Engineer|Developer|Analyst|Manager)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const STOP_WORDS: &[&str] = &["the", "and", "or", "at", "in", "of"];

/// Guesses a person's name from a headline such as
/// "Priya Raman Assistant Professor at Chennai Institute of Technology".
///
/// Connectives, institution words, roles and study status are removed; the
/// remaining capitalized alphabetic words count as a name when there are two
/// to four of them.
pub fn name_from_headline(headline: &str, config: &ExtractionConfig) -> Option<String> {
    let cleaned = CONNECTIVES_RE.replace_all(headline, " ");
    let cleaned = ROLE_TERMS_RE.replace_all(&cleaned, " ");
    let cleaned = STATUS_TERMS_RE.replace_all(&cleaned, " ");

    let institution = institution_terms(&config.institution_name);
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| !institution.contains(&word.to_lowercase()))
        .filter(|word| is_name_word(word))
        .collect();

    if (2..=4).contains(&words.len()) {
        Some(words.join(" "))
    } else {
        None
    }
}

fn is_name_word(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().all(char::is_alphabetic)
        && word.chars().next().is_some_and(char::is_uppercase)
        && !STOP_WORDS.contains(&word.to_lowercase().as_str())
}

/// Lowercase words of the institution name plus its initials ("cit").
fn institution_terms(institution_name: &str) -> Vec<String> {
    let mut terms: Vec<String> = institution_name
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect();

    let initials: String = institution_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .filter(|c| c.is_uppercase())
        .collect();
    if initials.chars().count() > 1 {
        terms.push(initials.to_lowercase());
    }
    terms
}

/// First role phrase found in a headline, as written there.
pub fn role_keyword(headline: &str) -> Option<&str> {
    ROLE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(headline)?.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Name,
    Role,
    Location,
    Google,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Name => "name_search",
            SearchKind::Role => "role_search",
            SearchKind::Location => "location_search",
            SearchKind::Google => "google_search",
        }
    }
}

/// A follow-up search that may turn up a record's real profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedSearch {
    pub kind: SearchKind,
    pub url: String,
    pub description: String,
}

/// Follow-up searches for a record: by name, by role, by location and a
/// web search restricted to profile pages. Records without a headline get
/// none.
pub fn targeted_searches(
    record: &ProfileRecord,
    extraction: &ExtractionConfig,
    search: &SearchConfig,
) -> Result<Vec<TargetedSearch>> {
    let Some(headline) = record.headline.as_deref().map(str::trim) else {
        return Ok(Vec::new());
    };
    if headline.is_empty() {
        return Ok(Vec::new());
    }

    let institution = extraction.institution_name.as_str();
    let name = record
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| name_from_headline(headline, extraction));
    let location = record
        .location
        .as_deref()
        .map(str::trim)
        .filter(|location| !location.is_empty() && *location != headline);

    let mut searches = Vec::new();

    if let Some(name) = &name {
        searches.push(TargetedSearch {
            kind: SearchKind::Name,
            url: with_param(&search.search_url, "keywords", &format!("{} {}", name, institution))?,
            description: format!("Search for {} at {}", name, institution),
        });
    }

    if let Some(role) = role_keyword(headline) {
        searches.push(TargetedSearch {
            kind: SearchKind::Role,
            url: with_param(&search.search_url, "keywords", &format!("{} {}", role, institution))?,
            description: format!("Search for {} at {}", role, institution),
        });
    }

    if let Some(location) = location {
        searches.push(TargetedSearch {
            kind: SearchKind::Location,
            url: with_param(
                &search.search_url,
                "keywords",
                &format!("{} {}", institution, location),
            )?,
            description: format!("Search for {} profiles in {}", institution, location),
        });
    }

    if let Some(name) = &name {
        let query = format!(
            "site:{} \"{}\" \"{}\"",
            profile_site(extraction),
            name,
            institution
        );
        searches.push(TargetedSearch {
            kind: SearchKind::Google,
            url: with_param(GOOGLE_SEARCH_URL, "q", &query)?,
            description: format!("Web search for {}'s profile", name),
        });
    }

    Ok(searches)
}

/// `linkedin.com/in` style prefix for a `site:` filter.
fn profile_site(config: &ExtractionConfig) -> String {
    let host = config
        .allowed_profile_host
        .as_deref()
        .unwrap_or(&config.default_site_host);
    let host = host.strip_prefix("www.").unwrap_or(host);
    format!("{}{}", host, config.profile_path_marker.trim_end_matches('/'))
}

fn with_param(base: &str, key: &str, value: &str) -> Result<String> {
    let url = Url::parse_with_params(base, &[(key, value)])
        .map_err(|e| ScraperError::ConfigError(format!("bad search url {}: {}", base, e)))?;
    Ok(url.to_string())
}
