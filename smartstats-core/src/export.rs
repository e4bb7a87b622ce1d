use anyhow::Result;
use smartstats_types::{BattingLine, PlayerGameStats, RateStats, SeasonPlayerStats};

const COUNT_HEADERS: [&str; 10] = ["PA", "AB", "R", "H", "2B", "3B", "HR", "BB", "K", "RBI"];
const RATE_HEADERS: [&str; 3] = ["AVG", "OBP", "SLG"];

/// Season table as CSV, one row per player
pub fn season_stats_csv(stats: &[SeasonPlayerStats]) -> Result<String> {
    write_table("G", stats.iter().map(|s| {
        (s.player_name.as_str(), s.games, &s.line, &s.rates)
    }))
}

/// One side of a game as CSV, with the batting-order slot in the second column
pub fn game_stats_csv(stats: &[PlayerGameStats]) -> Result<String> {
    write_table("#", stats.iter().map(|s| {
        (s.player_name.as_str(), s.batting_order, &s.line, &s.rates)
    }))
}

fn write_table<'a>(
    second_column: &str,
    rows: impl Iterator<Item = (&'a str, i32, &'a BattingLine, &'a RateStats)>,
) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["Player", second_column];
    header.extend(COUNT_HEADERS);
    header.extend(RATE_HEADERS);
    writer.write_record(&header)?;

    for (name, second, line, rates) in rows {
        let mut record = vec![name.to_string(), second.to_string()];
        record.extend(
            [
                line.pa, line.ab, line.r, line.h, line.doubles, line.triples, line.hr, line.bb,
                line.k, line.rbi,
            ]
            .iter()
            .map(|count| count.to_string()),
        );
        record.extend(
            [rates.avg, rates.obp, rates.slg]
                .iter()
                .map(|rate| format!("{:.3}", rate)),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
