use smartstats_types::Player;

const SCORESHEET_GUIDE: &str = r#"The photo shows a KNBSB (Royal Dutch Baseball and Softball Federation) scoresheet. Derive batting statistics from the per-inning at-bat boxes.

LAYOUT
- Left columns: Pos (field position), player name written as "ACHTERNAAM Voornaam", member number, shirt number.
- One column per inning. Each at-bat box is a diamond of four squares: bottom-right 1st base, top-right 2nd, top-left 3rd, bottom-left home. Scoring runs counter-clockwise from 1st.
- A "/" under the last batter of an inning closes that half-inning.
- Below the grid: per-inning totals (P runs, H hits, F errors, A left on base).
- Right-side columns (PA, AB, R, H, 2B, 3B, HR, BB, K, RBI and others) may be present. Use them to check your tallies.

POSITIONS
1 P, 2 C, 3 1B, 4 2B, 5 3B, 6 SS, 7 LF, 8 CF, 9 RF. DH designated hitter, PH pinch hitter, PR pinch runner.

SUBSTITUTIONS
- Each batting-order spot has several rows. The top row is the starter, lower rows are substitutes.
- PH: written below the replaced player with "PH" and the new field position, followed by the inning (e.g. "1/3" top of the 3rd). A thick vertical line in the at-bat box marks the moment of substitution. Everything before the line belongs to the original player, everything after to the substitute.
- PR: a small horizontal line between base squares marks the runner swap. Baserunning after it belongs to the runner.
- A new number in the Pos box without a new name is only a position change.
- Both players of a substitution appear in the output with their own stats.

OUTS (written inside a circle)
- KS strikeout swinging, KL strikeout looking. A strikeout with fielding numbers (KS23) still counts as K.
- F, L, P plus a position: fly, line drive, pop out. FF, FL, FP: the foul variants. IF: infield fly.
- Plain position chains (63, 3, 13B for a bunt) are ground outs. GDP marks a double play.
- PO plus positions is a pick-off.

REACHING BASE
- Hits are a thick slash with a small tick. In the 1st-base square it is a single, in the 2nd-base square a double, in the 3rd-base square a triple. A location code follows (7, 8, 9, LS, RS, MI, LC, RC, LL, RL, GLL, GRL, B suffix for a bunt).
- HR in the home square is a home run, IHR inside the park, GR a ground rule double.
- BB walk, IBB intentional walk, HP hit by pitch.
- E plus position is an error (E6F dropped fly, E5T throwing error, 4E3 fielded then dropped). INT catcher interference, OB obstruction.
- FC fielder's choice, O forced at another base. SH sacrifice bunt, SF sacrifice fly. Neither is an at-bat.
- WP, PB, BK, IP, SB and CS describe runner advancement, not batter results.

RUNNERS
- A number in a base square is the batting-order number of the batter whose action moved the runner there.
- A thick dot in the center of the diamond is a run scored.

TALLY PER PLAYER
- PA: every completed plate appearance.
- AB: PA minus walks, hit by pitch, sacrifices and interference.
- R: dots in the diamond center.
- H: all hits. 2B, 3B, HR counted separately as well.
- BB: walks including intentional walks.
- K: all KS and KL, including dropped third strikes.
- RBI: from the summary column when present, otherwise runs that scored as a direct result of this batter's plate appearance.
- AVG = H / AB, OBP = (H + BB) / (AB + BB), SLG = total bases / AB. Use 0.000 when the denominator is 0."#;

const RESPONSE_FORMAT: &str = r#"Return ONLY a JSON object in this exact format, without markdown or commentary:
{
  "opponent": "opponent team name if visible",
  "score": "score if visible (e.g. 5-3)",
  "date": "game date if visible (YYYY-MM-DD)",
  "players": [
    {
      "playerName": "Player Name",
      "battingOrder": 1,
      "isSubstitute": false,
      "substituteFor": null,
      "PA": 0, "AB": 0, "R": 0, "H": 0,
      "2B": 0, "3B": 0, "HR": 0,
      "BB": 0, "K": 0, "RBI": 0,
      "AVG": 0.000, "OBP": 0.000, "SLG": 0.000
    }
  ]
}"#;

/// Full instruction text sent alongside the scoresheet image
pub fn build_prompt(roster: &[Player], notes: &str) -> String {
    let mut prompt = String::from(SCORESHEET_GUIDE);

    prompt.push_str("\n\n");
    prompt.push_str(&roster_section(roster));

    let notes = notes.trim();
    if !notes.is_empty() {
        prompt.push_str("\n\nNotes from the scorer: ");
        prompt.push_str(notes);
    }

    prompt.push_str("\n\n");
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

fn roster_section(roster: &[Player]) -> String {
    let Some(first) = roster.first() else {
        return "No roster is available. Report player names as written on the scoresheet."
            .to_string();
    };

    let mut section = format!(
        "ROSTER ({} players). Use ONLY these names in the output:\n",
        roster.len()
    );
    for (index, player) in roster.iter().enumerate() {
        section.push_str(&format!(
            "{}. \"{}\" (first name \"{}\"",
            index + 1,
            player.full_name(),
            player.first_name
        ));
        if let Some(number) = &player.number {
            section.push_str(&format!(", #{}", number));
        }
        if let Some(position) = &player.position {
            section.push_str(&format!(", {}", position));
        }
        section.push_str(")\n");
    }

    let expected_low = roster.len().min(9);
    let expected_high = roster.len().min(12);
    section.push_str(&format!(
        "\nROSTER RULES\n\
         - Output each name exactly as listed above, e.g. \"{}\".\n\
         - Scoresheet names are written as last name in capitals followed by first name. Match on first name, last name or a partial match.\n\
         - When a name is hard to read, choose the closest roster entry. Never invent a name and skip rows you cannot match.\n\
         - List each roster player at most once. Combine the rows of a player who appears twice.\n\
         - Expect roughly {}-{} batters. Many more than that usually means duplicates.",
        first.full_name(),
        expected_low,
        expected_high
    ));
    section
}
