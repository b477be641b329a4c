use pixelsport_api::{Orientation, StreamLinks};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SideLabel {
    Home,
    Away,
    Alt,
}

impl SideLabel {
    pub fn label(&self) -> &'static str {
        match self {
            SideLabel::Home => "Home",
            SideLabel::Away => "Away",
            SideLabel::Alt => "Alt",
        }
    }

    fn opposite(self) -> Self {
        match self {
            SideLabel::Home => SideLabel::Away,
            SideLabel::Away => SideLabel::Home,
            SideLabel::Alt => SideLabel::Alt,
        }
    }
}

impl fmt::Display for SideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledLink<'a> {
    pub url: &'a str,
    pub side: SideLabel,
}

/// Label for a server position. Server 1 carries the first competitor's side,
/// server 2 the other side, server 3 is always the alternate feed.
fn side_for(position: usize, orientation: Orientation) -> SideLabel {
    let first = if orientation.is_home() { SideLabel::Home } else { SideLabel::Away };
    match position {
        1 => first,
        2 => first.opposite(),
        _ => SideLabel::Alt,
    }
}

/// A usable link is non-blank and not the feed's literal "null" placeholder.
fn usable(link: &str) -> Option<&str> {
    let link = link.trim();
    (!link.is_empty() && !link.eq_ignore_ascii_case("null")).then_some(link)
}

/// Usable stream links in server order, each with its side label.
pub fn extract_links(links: &StreamLinks, orientation: Orientation) -> Vec<LabeledLink<'_>> {
    links
        .iter()
        .filter_map(|(position, raw)| {
            raw.and_then(usable).map(|url| LabeledLink {
                url,
                side: side_for(position, orientation),
            })
        })
        .collect()
}
