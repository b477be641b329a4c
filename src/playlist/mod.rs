pub mod league;
pub mod links;
pub mod time;

use crate::playlist::league::resolve_league;
use crate::playlist::links::{SideLabel, extract_links};
use chrono::{DateTime, Utc};
use pixelsport_api::Event;
use pixelsport_api::client::{ICY_METADATA, REFERER, USER_AGENT};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix of every group title and output file name.
pub const SOURCE_NAME: &str = "Pixelsports";
const HEADER: &str = "#EXTM3U";

/// Which player family a playlist targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// VLC-style: connection options as `#EXTVLCOPT` directives.
    Standard,
    /// TiviMate-style: connection options piped onto the stream URL.
    HeaderEmbedded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub tuner_id: &'static str,
    pub logo_url: String,
    /// League display name; the side label is appended in `group_label`.
    pub group: &'static str,
    pub title: String,
    pub stream_url: String,
    pub side: SideLabel,
}

impl PlaylistEntry {
    /// "Pixelsports - NFL - Home"
    pub fn group_label(&self) -> String {
        format!("{SOURCE_NAME} - {} - {}", self.group, self.side)
    }

    fn info_line(&self) -> String {
        format!(
            r#"#EXTINF:-1 tvg-id="{}" tvg-logo="{}" group-title="{}",{}"#,
            self.tuner_id,
            self.logo_url,
            self.group_label(),
            self.title
        )
    }

    fn push_lines(&self, variant: Variant, lines: &mut Vec<String>) {
        lines.push(self.info_line());
        match variant {
            Variant::Standard => {
                lines.push(format!("#EXTVLCOPT:http-user-agent={USER_AGENT}"));
                lines.push(format!("#EXTVLCOPT:http-referrer={REFERER}"));
                lines.push(format!("#EXTVLCOPT:http-icy-metadata={ICY_METADATA}"));
                lines.push(self.stream_url.clone());
            }
            Variant::HeaderEmbedded => {
                lines.push(format!("{}|{}", self.stream_url, inline_headers()));
            }
        }
    }
}

/// `referer=…|origin=…|user-agent=…` with the user agent percent-encoded.
fn inline_headers() -> String {
    // Strict component encoding: `/` is escaped as `%2F` too.
    format!(
        "referer={REFERER}|origin={REFERER}|user-agent={}",
        urlencoding::encode(USER_AGENT)
    )
}

/// "<name>[ - <Eastern time>][ - <status>]"
pub fn event_title(event: &Event, now: DateTime<Utc>) -> String {
    let start = event.start_time.as_deref();
    let mut title = event.title().to_owned();
    for part in [time::localized_time(start), time::status_label(start, now)] {
        if !part.is_empty() {
            title.push_str(" - ");
            title.push_str(&part);
        }
    }
    title
}

/// One entry per usable stream link; an event without links yields nothing.
pub fn entries_for(event: &Event, now: DateTime<Utc>) -> Vec<PlaylistEntry> {
    let links = extract_links(&event.stream_links, event.orientation);
    if links.is_empty() {
        return Vec::new();
    }

    let league = resolve_league(event.category());
    let logo_url = event.logo().unwrap_or(league.default_logo).to_owned();
    let title = event_title(event, now);

    links
        .into_iter()
        .map(|link| PlaylistEntry {
            tuner_id: league.tuner_id,
            logo_url: logo_url.clone(),
            group: league.display_name,
            title: title.clone(),
            stream_url: link.url.to_owned(),
            side: link.side,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPlaylist {
    pub body: String,
    pub entries: usize,
}

/// Render a full playlist. Lines are `\n`-joined without a trailing newline.
pub fn render<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    now: DateTime<Utc>,
    variant: Variant,
) -> RenderedPlaylist {
    let mut lines = vec![HEADER.to_owned()];
    let mut entries = 0;
    for event in events {
        for entry in entries_for(event, now) {
            entry.push_lines(variant, &mut lines);
            entries += 1;
        }
    }
    RenderedPlaylist { body: lines.join("\n"), entries }
}

pub fn render_standard(events: &[Event], now: DateTime<Utc>) -> RenderedPlaylist {
    render(events, now, Variant::Standard)
}

pub fn render_header_embedded(events: &[Event], now: DateTime<Utc>) -> RenderedPlaylist {
    render(events, now, Variant::HeaderEmbedded)
}

/// Distinct league display names across all events, link-less ones included.
pub fn category_names(events: &[Event]) -> BTreeSet<&'static str> {
    events
        .iter()
        .map(|event| resolve_league(event.category()).display_name)
        .collect()
}

/// One display name per line, sorted, each line newline-terminated.
pub fn category_index(events: &[Event]) -> String {
    category_names(events)
        .into_iter()
        .map(|name| format!("{name}\n"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlaylist {
    pub display_name: &'static str,
    pub file_name: String,
    pub playlist: RenderedPlaylist,
}

/// Replace every non-alphanumeric character with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Header-embedded playlists split by raw category name.
///
/// Partitions are visited in sorted raw-name order. Several raw names can
/// resolve to the same display group (e.g. "NFL Week 1" and "NFL Week 2");
/// those share one file, so nothing gets overwritten.
pub fn render_per_category(events: &[Event], now: DateTime<Utc>) -> Vec<CategoryPlaylist> {
    let mut partitions: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
    for event in events {
        partitions.entry(event.category()).or_default().push(event);
    }

    let mut by_file: BTreeMap<String, (&'static str, Vec<&Event>)> = BTreeMap::new();
    for (raw_name, members) in partitions {
        let display_name = resolve_league(raw_name).display_name;
        let file_name = format!("{SOURCE_NAME}_{}.m3u8", sanitize_file_stem(display_name));
        by_file
            .entry(file_name)
            .or_insert_with(|| (display_name, Vec::new()))
            .1
            .extend(members);
    }

    by_file
        .into_iter()
        .map(|(file_name, (display_name, members))| CategoryPlaylist {
            display_name,
            file_name,
            playlist: render(members, now, Variant::HeaderEmbedded),
        })
        .collect()
}
