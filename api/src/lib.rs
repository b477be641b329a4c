pub mod client;
pub mod pixel;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the Pixelsport wire format
// ---------------------------------------------------------------------------

/// Which side the first competitor plays on. Drives the Home/Away stream labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    Home,
    Away,
    #[default]
    Unknown,
}

impl Orientation {
    /// Case-insensitive; anything other than "home" / "away" is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Orientation::Home,
            "away" => Orientation::Away,
            _ => Orientation::Unknown,
        }
    }

    pub fn is_home(self) -> bool {
        self == Orientation::Home
    }
}

/// Up to three candidate stream URLs, addressed by 1-based server position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamLinks([Option<String>; 3]);

impl StreamLinks {
    pub fn new(links: [Option<String>; 3]) -> Self {
        Self(links)
    }

    /// Raw value at `position` (1..=3), before any "null" filtering.
    #[cfg(test)]
    pub fn get(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .and_then(|link| link.as_deref())
    }

    /// `(position, raw value)` pairs in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&str>)> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, link)| (i + 1, link.as_deref()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Event {
    pub id: Option<String>,
    pub name: Option<String>,
    pub start_time: Option<String>, // ISO 8601, UTC
    pub orientation: Orientation,
    pub primary_logo: Option<String>,
    pub category_name: Option<String>, // free text, e.g. "NFL Week 1"
    pub stream_links: StreamLinks,
}

impl Event {
    pub const DEFAULT_NAME: &'static str = "Unknown Event";
    pub const DEFAULT_CATEGORY: &'static str = "LIVE";

    /// Trimmed match name, or "Unknown Event" when the feed omitted it.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .unwrap_or(Self::DEFAULT_NAME)
    }

    pub fn category(&self) -> &str {
        self.category_name
            .as_deref()
            .unwrap_or(Self::DEFAULT_CATEGORY)
    }

    /// Event artwork, if the feed carried a non-empty one.
    pub fn logo(&self) -> Option<&str> {
        self.primary_logo
            .as_deref()
            .map(str::trim)
            .filter(|logo| !logo.is_empty())
    }
}
