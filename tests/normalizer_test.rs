// tests/normalizer_test.rs

use alumni_scout_core::{
    ExtractionConfig, Result, classify_lines, classify_text, is_relevant, split_lines,
};

fn institution(keyword: &str) -> ExtractionConfig {
    ExtractionConfig {
        headline_keywords: vec![keyword.to_lowercase()],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_classifies_typical_result() -> Result<()> {
    let lines = [
        "Jane Doe",
        "Chennai Institute of Technology",
        "Chennai, India",
        "500+ connections",
    ];
    let fields = classify_lines(&lines, &institution("Chennai Institute of Technology"));

    assert_eq!(fields.headline.as_deref(), Some("Chennai Institute of Technology"));
    assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
    assert_eq!(fields.location.as_deref(), Some("Chennai, India"));

    println!("✅ Typical result classified");
    Ok(())
}

#[tokio::test]
async fn test_no_institution_keyword_leaves_headline_unset() -> Result<()> {
    let lines = ["John Smith", "Software Engineer at Acme", "Bengaluru, India"];
    let fields = classify_lines(&lines, &ExtractionConfig::default());

    assert!(fields.headline.is_none());
    // Name and location are still picked; the record builder drops the result.
    assert_eq!(fields.name.as_deref(), Some("John Smith"));
    assert_eq!(fields.location.as_deref(), Some("Bengaluru, India"));
    Ok(())
}

#[tokio::test]
async fn test_headline_is_earliest_keyword_line() -> Result<()> {
    let lines = [
        "Arun Kumar",
        "Student at Chennai Institute of Technology",
        "Former intern, Chennai Institute of Technology",
    ];
    let fields = classify_lines(&lines, &ExtractionConfig::default());
    assert_eq!(
        fields.headline.as_deref(),
        Some("Student at Chennai Institute of Technology")
    );

    let later_only = ["Arun Kumar", "Coimbatore", "Faculty, Chennai Institute Technology"];
    let fields = classify_lines(&later_only, &ExtractionConfig::default());
    assert_eq!(
        fields.headline.as_deref(),
        Some("Faculty, Chennai Institute Technology")
    );
    Ok(())
}

#[tokio::test]
async fn test_short_form_is_relevant_but_never_a_headline() -> Result<()> {
    let config = ExtractionConfig::default();
    let lines = ["Arun Kumar", "Faculty, CIT Chennai", "Coimbatore"];

    assert!(is_relevant(&lines, &config));
    let fields = classify_lines(&lines, &config);
    assert!(fields.headline.is_none());
    assert_eq!(fields.name.as_deref(), Some("Arun Kumar"));

    assert!(!is_relevant(&["Arun Kumar", "Anna University"], &config));
    Ok(())
}

#[tokio::test]
async fn test_headline_match_is_case_insensitive() -> Result<()> {
    let lines = ["Priya R", "ALUMNI - CHENNAI INSTITUTE OF TECHNOLOGY"];
    let fields = classify_lines(&lines, &ExtractionConfig::default());
    assert_eq!(
        fields.headline.as_deref(),
        Some("ALUMNI - CHENNAI INSTITUTE OF TECHNOLOGY")
    );
    Ok(())
}

#[tokio::test]
async fn test_name_skips_placeholder_and_chrome() -> Result<()> {
    let lines = [
        "LinkedIn Member",
        "View Karthik's profile",
        "Karthik S",
        "Professor at Chennai Institute of Technology",
        "12 mutual connections",
        "Message",
    ];
    let fields = classify_lines(&lines, &ExtractionConfig::default());

    assert_eq!(fields.name.as_deref(), Some("Karthik S"));
    assert_ne!(fields.name.as_deref(), Some("LinkedIn Member"));
    Ok(())
}

#[tokio::test]
async fn test_name_never_equals_headline() -> Result<()> {
    let lines = ["Chennai Institute of Technology", "2nd degree connection"];
    let fields = classify_lines(&lines, &ExtractionConfig::default());

    assert_eq!(fields.headline.as_deref(), Some("Chennai Institute of Technology"));
    assert!(fields.name.is_none());
    Ok(())
}

#[tokio::test]
async fn test_location_excludes_claimed_lines() -> Result<()> {
    // The first line is both a place and the first name candidate: name wins.
    let lines = [
        "Chennai Fan Club",
        "Lecturer, Chennai Institute of Technology",
        "Tamil Nadu, India",
    ];
    let fields = classify_lines(&lines, &ExtractionConfig::default());

    assert_eq!(fields.name.as_deref(), Some("Chennai Fan Club"));
    assert_eq!(
        fields.headline.as_deref(),
        Some("Lecturer, Chennai Institute of Technology")
    );
    assert_eq!(fields.location.as_deref(), Some("Tamil Nadu, India"));
    Ok(())
}

#[tokio::test]
async fn test_location_may_carry_chrome_words() -> Result<()> {
    let lines = [
        "Meena V",
        "Chennai Institute of Technology",
        "Chennai · View more connections",
    ];
    let fields = classify_lines(&lines, &ExtractionConfig::default());
    assert_eq!(
        fields.location.as_deref(),
        Some("Chennai · View more connections")
    );
    Ok(())
}

#[tokio::test]
async fn test_split_lines_trims_and_drops_blanks() -> Result<()> {
    let text = "  Jane Doe  \n\n\tChennai Institute of Technology\n   \nChennai\n";
    assert_eq!(
        split_lines(text),
        vec!["Jane Doe", "Chennai Institute of Technology", "Chennai"]
    );

    let fields = classify_text(text, &ExtractionConfig::default());
    assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
    assert_eq!(fields.location.as_deref(), Some("Chennai"));
    Ok(())
}

#[tokio::test]
async fn test_institution_is_swappable() -> Result<()> {
    let config = ExtractionConfig {
        headline_keywords: vec!["psg college of technology".to_string()],
        place_keywords: vec!["coimbatore".to_string()],
        ..Default::default()
    };
    let lines = [
        "Divya M",
        "Chennai Institute of Technology",
        "PSG College of Technology",
        "Coimbatore, Tamil Nadu",
    ];
    let fields = classify_lines(&lines, &config);

    assert_eq!(fields.headline.as_deref(), Some("PSG College of Technology"));
    assert_eq!(fields.location.as_deref(), Some("Coimbatore, Tamil Nadu"));
    Ok(())
}

#[tokio::test]
async fn test_empty_input() -> Result<()> {
    let lines: [&str; 0] = [];
    let fields = classify_lines(&lines, &ExtractionConfig::default());
    assert!(fields.headline.is_none());
    assert!(fields.name.is_none());
    assert!(fields.location.is_none());
    Ok(())
}
