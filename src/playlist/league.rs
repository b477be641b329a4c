/// Player-facing identity of a league: tuner id, fallback artwork, group name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueProfile {
    pub tuner_id: &'static str,
    pub default_logo: &'static str,
    pub display_name: &'static str,
}

const fn league(
    tuner_id: &'static str,
    default_logo: &'static str,
    display_name: &'static str,
) -> LeagueProfile {
    LeagueProfile { tuner_id, default_logo, display_name }
}

macro_rules! logo {
    ($file:literal) => {
        concat!("http://drewlive24.duckdns.org:9000/Logos/", $file)
    };
}

/// Matched in order against the upper-cased category name; first hit wins.
/// "NFL" sits ahead of "UFC", so "NFL vs UFC Night" resolves to NFL.
pub const LEAGUES: &[(&str, LeagueProfile)] = &[
    ("NFL", league("NFL.Dummy.us", logo!("Maxx.png"), "NFL")),
    ("MLB", league("MLB.Baseball.Dummy.us", logo!("Baseball3.png"), "MLB")),
    ("NHL", league("NHL.Hockey.Dummy.us", logo!("Hockey2.png"), "NHL")),
    ("NBA", league("NBA.Basketball.Dummy.us", logo!("Basketball-2.png"), "NBA")),
    ("NASCAR", league("Racing.Dummy.us", logo!("Motorsports2.png"), "NASCAR Cup Series")),
    ("UFC", league("UFC.Fight.Pass.Dummy.us", logo!("CombatSports2.png"), "UFC")),
    ("SOCCER", league("Soccer.Dummy.us", logo!("Soccer.png"), "Soccer")),
    ("BOXING", league("PPV.EVENTS.Dummy.us", logo!("Combat-Sports.png"), "Boxing")),
];

pub const FALLBACK_LEAGUE: LeagueProfile = league("Generic.Dummy", "", "Live Sports");

/// Resolve a free-text category against [`LEAGUES`], falling back to
/// [`FALLBACK_LEAGUE`]. Substring match, not whole-word.
pub fn resolve_league(category: &str) -> &'static LeagueProfile {
    resolve_in(LEAGUES, category).unwrap_or(&FALLBACK_LEAGUE)
}

fn resolve_in<'a>(
    table: &'a [(&str, LeagueProfile)],
    category: &str,
) -> Option<&'a LeagueProfile> {
    let haystack = category.to_uppercase();
    table
        .iter()
        .find(|(key, _)| haystack.contains(&key.to_uppercase()))
        .map(|(_, profile)| profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keys_are_never_empty() {
        assert!(LEAGUES.iter().all(|(key, _)| !key.trim().is_empty()));
    }

    #[test]
    fn logos_live_on_the_shared_host() {
        let host = "http://drewlive24.duckdns.org:9000/Logos/";
        assert!(LEAGUES.iter().all(|(_, p)| p.default_logo.starts_with(host)));
    }

    #[test]
    fn matches_substring_case_insensitively() {
        assert_eq!(resolve_league("NFL Week 1").display_name, "NFL");
        assert_eq!(resolve_league("nba playoffs").tuner_id, "NBA.Basketball.Dummy.us");
        assert_eq!(resolve_league("Premier League Soccer").display_name, "Soccer");
        assert_eq!(resolve_league("nascar").display_name, "NASCAR Cup Series");
    }

    #[test]
    fn unknown_or_empty_category_uses_fallback() {
        assert_eq!(resolve_league("LIVE"), &FALLBACK_LEAGUE);
        assert_eq!(resolve_league(""), &FALLBACK_LEAGUE);
        assert_eq!(resolve_league("Cricket").tuner_id, "Generic.Dummy");
        assert_eq!(resolve_league("Cricket").default_logo, "");
        assert_eq!(resolve_league("Cricket").display_name, "Live Sports");
    }

    #[test]
    fn first_declared_key_wins_on_overlap() {
        assert_eq!(resolve_league("UFC fighters at the NFL draft").display_name, "NFL");
        assert_eq!(resolve_league("Boxing & UFC").display_name, "UFC");
    }

    #[test]
    fn order_is_what_decides_not_position_in_input() {
        let a = LeagueProfile { tuner_id: "a", default_logo: "", display_name: "A" };
        let b = LeagueProfile { tuner_id: "b", default_logo: "", display_name: "B" };
        let input = "beta alpha";
        assert_eq!(resolve_in(&[("ALPHA", a), ("BETA", b)], input), Some(&a));
        assert_eq!(resolve_in(&[("BETA", b), ("ALPHA", a)], input), Some(&b));
    }

    #[test]
    fn substring_not_whole_word() {
        // "NBA" inside an unrelated word still matches.
        assert_eq!(resolve_league("WNBA Finals").display_name, "NBA");
    }
}
