use collector_core::PostingCandidate;
use collector_logging::collector_debug;
use scraper::{ElementRef, Html, Selector};

struct CardSelectors {
    item: Selector,
    card: Selector,
    title: Selector,
    any_heading: Selector,
    company: Selector,
    location: Selector,
    link: Selector,
}

impl CardSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            item: Selector::parse("li").ok()?,
            card: Selector::parse("div.base-search-card").ok()?,
            title: Selector::parse("h3.base-search-card__title").ok()?,
            any_heading: Selector::parse("h3").ok()?,
            company: Selector::parse("h4.base-search-card__subtitle").ok()?,
            location: Selector::parse("span.job-search-card__location").ok()?,
            link: Selector::parse("a.base-card__full-link").ok()?,
        })
    }

    fn candidate(&self, item: ElementRef) -> Option<PostingCandidate> {
        let card = item.select(&self.card).next()?;
        let title = card
            .select(&self.title)
            .next()
            .or_else(|| item.select(&self.any_heading).next())?;
        let company = card.select(&self.company).next()?;
        let location = card.select(&self.location).next()?;
        let anchor = card.select(&self.link).next()?;

        Some(PostingCandidate::new(
            element_text(title),
            element_text(company),
            element_text(location),
            anchor.value().attr("href").unwrap_or_default(),
        ))
    }
}

/// Extracts listing cards in document order.
///
/// A `li` must hold a `div.base-search-card` with a title, company, location
/// and `a.base-card__full-link`; anything less is skipped without error.
pub fn parse_postings(markup: &str) -> Vec<PostingCandidate> {
    let Some(selectors) = CardSelectors::new() else {
        return Vec::new();
    };
    let document = Html::parse_document(markup);

    let mut postings = Vec::new();
    let mut skipped = 0usize;
    for item in document.select(&selectors.item) {
        match selectors.candidate(item) {
            Some(candidate) => postings.push(candidate),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        collector_debug!("Skipped {} list item(s) without a complete posting card", skipped);
    }
    postings
}

/// Returns the description text of a detail page, if the page has one.
pub fn extract_description(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    ["div.description__text", "div.show-more-less-html__markup"]
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| document.select(&selector).next().map(element_text))
}

/// Descendant text with every whitespace run collapsed to a single space.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
