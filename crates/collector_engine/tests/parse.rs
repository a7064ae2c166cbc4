use collector_core::{Degree, PostingCandidate, YearsExperience};
use collector_engine::{
    decode_markup, enrich_from_description, extract_description, parse_postings,
};
use pretty_assertions::assert_eq;

const LISTING: &str = r#"
<ul>
  <li>
    <div class="base-card base-search-card job-search-card">
      <a class="base-card__full-link" href="https://il.example.com/jobs/view/data-scientist-101?refId=abc&amp;trackingId=xyz">
        <span class="sr-only">Data Scientist</span>
      </a>
      <div class="base-search-card__info">
        <h3 class="base-search-card__title">
          Data Scientist
        </h3>
        <h4 class="base-search-card__subtitle">
          <a href="https://il.example.com/company/acme">Acme Analytics</a>
        </h4>
        <div class="base-search-card__metadata">
          <span class="job-search-card__location">Tel Aviv-Yafo, Israel</span>
        </div>
      </div>
    </div>
  </li>
  <li>
    <div class="base-card base-search-card">
      <h3 class="base-search-card__title">Missing company</h3>
      <span class="job-search-card__location">Haifa, Israel</span>
      <a class="base-card__full-link" href="https://il.example.com/jobs/view/102"></a>
    </div>
  </li>
  <li>
    <div class="base-card base-search-card">
      <a class="base-card__full-link" href="https://il.example.com/jobs/view/103">x</a>
      <h4 class="base-search-card__subtitle">Globex</h4>
      <span class="job-search-card__location">Jerusalem, Israel</span>
    </div>
    <h3>Senior   ML Engineer</h3>
  </li>
  <li><div class="not-a-card">Promoted</div></li>
  <li>
    <div class="base-card base-search-card">
      <a class="base-card__full-link">no href</a>
      <h3 class="base-search-card__title">Analyst</h3>
      <h4 class="base-search-card__subtitle">Initech</h4>
      <span class="job-search-card__location">Remote</span>
    </div>
  </li>
</ul>
"#;

#[test]
fn parses_complete_cards_in_document_order() {
    let postings = parse_postings(LISTING);
    let summary: Vec<(&str, &str, &str, &str)> = postings
        .iter()
        .map(|p| {
            (
                p.title.as_str(),
                p.company.as_str(),
                p.location.as_str(),
                p.link.as_str(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            (
                "Data Scientist",
                "Acme Analytics",
                "Tel Aviv-Yafo, Israel",
                "https://il.example.com/jobs/view/data-scientist-101",
            ),
            (
                "Senior ML Engineer",
                "Globex",
                "Jerusalem, Israel",
                "https://il.example.com/jobs/view/103",
            ),
            ("Analyst", "Initech", "Remote", ""),
        ]
    );
    assert!(postings[2].identity().is_none());
}

#[test]
fn page_without_cards_parses_to_nothing() {
    assert!(parse_postings("<html><body><p>No more jobs</p></body></html>").is_empty());
    assert!(parse_postings("").is_empty());
}

#[test]
fn description_prefers_primary_container() {
    let html = r#"
    <html><body>
      <div class="show-more-less-html__markup">fallback text</div>
      <div class="description__text">
        <p>We are <strong>looking for</strong> a Data Scientist.</p>
        <ul><li>BSc required</li><li>3+ years of experience</li></ul>
      </div>
    </body></html>
    "#;
    assert_eq!(
        extract_description(html).as_deref(),
        Some("We are looking for a Data Scientist. BSc required 3+ years of experience")
    );
}

#[test]
fn description_falls_back_to_markup_container() {
    let html = r#"<div class="show-more-less-html__markup"><p>PhD preferred</p></div>"#;
    assert_eq!(extract_description(html).as_deref(), Some("PhD preferred"));
    assert_eq!(extract_description("<div>nothing here</div>"), None);
}

#[test]
fn description_drives_enrichment() {
    let candidate = PostingCandidate::new("DS", "Acme", "TLV", "https://example.com/jobs/1");
    let enriched = enrich_from_description(
        candidate,
        "Must have a B.Sc in a quantitative field and 3-5 years in analytics.",
    );
    assert_eq!(enriched.degree, Degree::Bachelor);
    assert_eq!(
        enriched.years_experience,
        YearsExperience::Stated("3 years".to_string())
    );
}

#[test]
fn decode_handles_utf8_bom_and_sniffing() {
    let decoded = decode_markup(b"\xEF\xBB\xBFhello", Some("text/html")).unwrap();
    assert_eq!(decoded.text, "hello");
    assert_eq!(decoded.encoding, "UTF-8");

    let sniffed = decode_markup("<p>naïve café</p>".as_bytes(), None).unwrap();
    assert_eq!(sniffed.text, "<p>naïve café</p>");
}
