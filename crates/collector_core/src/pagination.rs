use std::fmt;

use crate::PostingCandidate;

/// Outcome of one page request, fed back into [`Pagination::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Parsed(Vec<PostingCandidate>),
    FetchFailed,
}

/// What the driver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Fetch { start: usize },
    Stop(StopReason),
}

/// Why pagination ended. All three are normal completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    LimitReached,
    EmptyPage,
    FetchFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::LimitReached => write!(f, "limit reached"),
            StopReason::EmptyPage => write!(f, "empty page"),
            StopReason::FetchFailed => write!(f, "fetch failed"),
        }
    }
}

/// Pure pagination state machine: decides the next offset and accumulates
/// candidates in fetch order. The engine performs the requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    limit: usize,
    page_size: usize,
    next_start: usize,
    pages: usize,
    collected: Vec<PostingCandidate>,
    stopped: Option<StopReason>,
}

impl Pagination {
    pub fn new(limit: usize, page_size: usize) -> Self {
        Self {
            limit,
            page_size,
            next_start: 0,
            pages: 0,
            collected: Vec::new(),
            stopped: None,
        }
    }

    /// First step of a run; stops immediately for a zero limit.
    pub fn start(&mut self) -> PageStep {
        self.next_step()
    }

    pub fn apply(&mut self, event: PageEvent) -> PageStep {
        if self.stopped.is_some() {
            return self.next_step();
        }
        match event {
            PageEvent::FetchFailed => self.stopped = Some(StopReason::FetchFailed),
            PageEvent::Parsed(items) if items.is_empty() => {
                self.stopped = Some(StopReason::EmptyPage);
            }
            PageEvent::Parsed(items) => {
                self.pages += 1;
                self.collected.extend(items);
                self.next_start += self.page_size;
            }
        }
        self.next_step()
    }

    fn next_step(&mut self) -> PageStep {
        if let Some(reason) = self.stopped {
            return PageStep::Stop(reason);
        }
        if self.collected.len() >= self.limit {
            self.stopped = Some(StopReason::LimitReached);
            return PageStep::Stop(StopReason::LimitReached);
        }
        PageStep::Fetch {
            start: self.next_start,
        }
    }

    /// Non-empty pages accepted so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn collected_len(&self) -> usize {
        self.collected.len()
    }

    /// Consumes the state, truncating to the limit in fetch order.
    pub fn finish(mut self) -> (Vec<PostingCandidate>, StopReason) {
        self.collected.truncate(self.limit);
        let reason = self.stopped.unwrap_or(StopReason::LimitReached);
        (self.collected, reason)
    }
}
