use smartstats_types::{Player, PlayerGameStats};

/// Attributes transcribed names to roster identities.
///
/// Matching is deliberately loose: scoresheets carry "LAST First", nicknames and
/// misspellings. A lower-cased name matches a roster player when it equals the
/// first name, "first last", "last first", or merely contains the first name.
/// The first roster entry that matches wins.
pub struct RosterMatcher<'a> {
    roster: &'a [Player],
}

impl<'a> RosterMatcher<'a> {
    pub fn new(roster: &'a [Player]) -> Self {
        Self { roster }
    }

    pub fn find_match(&self, name: &str) -> Option<&'a Player> {
        let name = name.to_lowercase();
        self.roster.iter().find(|player| Self::matches(&name, player))
    }

    fn matches(name_lower: &str, player: &Player) -> bool {
        let first = player.first_name.to_lowercase();
        let (full, reversed) = match player.last_name.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => {
                let last = last.to_lowercase();
                (format!("{} {}", first, last), format!("{} {}", last, first))
            }
            None => (first.clone(), first.clone()),
        };

        name_lower == first
            || name_lower == full
            || name_lower == reversed
            || name_lower.contains(&first)
    }

    /// Player id for a batting line: the roster id on a match, otherwise a slug of
    /// the transcribed name.
    pub fn player_id_for(&self, name: &str) -> String {
        match self.find_match(name) {
            Some(player) => player.id.to_string(),
            None => name_slug(name),
        }
    }

    /// Stamp a player id onto every line
    pub fn attribute(&self, players: Vec<PlayerGameStats>) -> Vec<PlayerGameStats> {
        players
            .into_iter()
            .map(|mut stats| {
                stats.player_id = self.player_id_for(&stats.player_name);
                stats
            })
            .collect()
    }
}

/// Lower-case the name and replace each run of whitespace with a single `-`
pub fn name_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }
    slug
}
