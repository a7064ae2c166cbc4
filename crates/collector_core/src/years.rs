use std::sync::LazyLock;

use regex::Regex;

use crate::YearsExperience;

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<min>\d{1,2})\s*(?:-|to)\s*(?P<max>\d{1,2})\s*(?:years?|yrs?)")
        .expect("static years range pattern")
});

static WITH_EXPERIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<years>\d{1,2})(?P<plus>\s*\+)?\s*(?:years?|yrs?)\s+of\s+experience")
        .expect("static years pattern")
});

static FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:at\s+least\s+|minimum\s+of\s+)?(?P<years>\d{1,2})(?P<plus>\s*\+)?\s*(?:years?|yrs?)",
    )
    .expect("static years fallback pattern")
});

/// Extracts a years-of-experience descriptor; the first matching rule wins.
///
/// Ranges report their lower bound, `N+ years of experience` and bare
/// `N years` report `N`.
pub fn extract_years(text: &str) -> YearsExperience {
    let cascade: [(&Regex, &str); 3] = [
        (&*RANGE, "min"),
        (&*WITH_EXPERIENCE, "years"),
        (&*FALLBACK, "years"),
    ];
    cascade
        .iter()
        .find_map(|(pattern, group)| {
            pattern
                .captures(text)
                .and_then(|caps| caps.name(*group).map(|m| m.as_str().to_string()))
        })
        .map_or(YearsExperience::NotSpecified, |count| {
            YearsExperience::years(&count)
        })
}
