use std::fmt;

/// Label written for any field the heuristics could not determine.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Uniqueness key of a posting: its detail link without the query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Returns `None` for links that are empty once the query is stripped.
    pub fn from_link(link: &str) -> Option<Self> {
        let stripped = strip_query(link);
        if stripped.is_empty() {
            None
        } else {
            Some(Self(stripped.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn strip_query(link: &str) -> &str {
    let link = link.trim();
    match link.find('?') {
        Some(idx) => link[..idx].trim_end(),
        None => link,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Degree {
    Bachelor,
    Master,
    PhD,
    NotSpecified,
}

impl Degree {
    /// Permissiveness rank used to resolve competing matches; lower wins.
    pub fn rank(self) -> Option<u8> {
        match self {
            Degree::Bachelor => Some(0),
            Degree::Master => Some(1),
            Degree::PhD => Some(2),
            Degree::NotSpecified => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Degree::Bachelor => "Bachelor",
            Degree::Master => "Master",
            Degree::PhD => "PhD",
            Degree::NotSpecified => NOT_SPECIFIED,
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearsExperience {
    /// Free-form descriptor such as `"3 years"`.
    Stated(String),
    #[default]
    NotSpecified,
}

impl YearsExperience {
    pub fn years(count: &str) -> Self {
        YearsExperience::Stated(format!("{count} years"))
    }
}

impl fmt::Display for YearsExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearsExperience::Stated(text) => f.write_str(text),
            YearsExperience::NotSpecified => f.write_str(NOT_SPECIFIED),
        }
    }
}

/// A listing item as scraped from a search page, before enrichment.
///
/// The link is query-stripped and the identity derived once, in [`PostingCandidate::new`].
/// Later edits to `link` do not move the posting to a different identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingCandidate {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    identity: Option<Identity>,
}

impl PostingCandidate {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        link: &str,
    ) -> Self {
        let link = strip_query(link).to_string();
        let identity = Identity::from_link(&link);
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            link,
            identity,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPosting {
    pub candidate: PostingCandidate,
    pub degree: Degree,
    pub years_experience: YearsExperience,
}

impl EnrichedPosting {
    /// Wraps a candidate whose detail page was unavailable.
    pub fn unenriched(candidate: PostingCandidate) -> Self {
        Self {
            candidate,
            degree: Degree::NotSpecified,
            years_experience: YearsExperience::NotSpecified,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.candidate.identity()
    }
}

/// An enriched posting stamped with its persist time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub collected_at: String,
    pub posting: EnrichedPosting,
}

impl StoredRecord {
    /// Number of fields in [`StoredRecord::to_row`].
    pub const FIELD_COUNT: usize = 7;

    pub fn new(collected_at: impl Into<String>, posting: EnrichedPosting) -> Self {
        Self {
            collected_at: collected_at.into(),
            posting,
        }
    }

    /// Fields in storage order: collected_at, title, company, location,
    /// degree, years, link.
    pub fn to_row(&self) -> [String; Self::FIELD_COUNT] {
        let candidate = &self.posting.candidate;
        [
            self.collected_at.clone(),
            candidate.title.clone(),
            candidate.company.clone(),
            candidate.location.clone(),
            self.posting.degree.to_string(),
            self.posting.years_experience.to_string(),
            candidate.link.clone(),
        ]
    }
}
