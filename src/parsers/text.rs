use crate::config::ExtractionConfig;

/// Fields the normalizer could pick out of one result's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub headline: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Splits rendered text into trimmed, non-empty lines in display order.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Classifies lines into headline, name and location.
///
/// Headline is picked first, then name, then location; each pick skips lines
/// equal to an earlier pick. The earliest qualifying line always wins.
pub fn classify_lines<S: AsRef<str>>(lines: &[S], config: &ExtractionConfig) -> ProfileFields {
    let headline = find_headline(lines, config);
    let name = find_name(lines, headline.as_deref(), config);
    let location = find_location(lines, headline.as_deref(), name.as_deref(), config);

    ProfileFields {
        headline,
        name,
        location,
    }
}

pub fn classify_text(text: &str, config: &ExtractionConfig) -> ProfileFields {
    classify_lines(&split_lines(text), config)
}

/// Whether any line mentions the institution at all.
pub fn is_relevant<S: AsRef<str>>(lines: &[S], config: &ExtractionConfig) -> bool {
    lines
        .iter()
        .any(|line| contains_any(line.as_ref(), &config.relevance_keywords))
}

pub fn find_headline<S: AsRef<str>>(lines: &[S], config: &ExtractionConfig) -> Option<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| contains_any(line, &config.headline_keywords))
        .map(str::to_string)
}

fn find_name<S: AsRef<str>>(
    lines: &[S],
    headline: Option<&str>,
    config: &ExtractionConfig,
) -> Option<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| {
            *line != config.placeholder_name
                && Some(*line) != headline
                && !contains_any(line, &config.chrome_keywords)
        })
        .map(str::to_string)
}

fn find_location<S: AsRef<str>>(
    lines: &[S],
    headline: Option<&str>,
    name: Option<&str>,
    config: &ExtractionConfig,
) -> Option<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| Some(*line) != headline && Some(*line) != name)
        .find(|line| contains_any(line, &config.place_keywords))
        .map(str::to_string)
}

/// Case-insensitive substring match against any keyword.
pub fn contains_any(line: &str, keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && lower.contains(&keyword.to_lowercase()))
}
