use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::pgn::{result_from_headers, GameRecord};
use crate::stats::Statistic;

/// Win/loss report for one player: an overall tally plus one tally per
/// opening the classifier named. Games the player was not part of are
/// skipped, not counted.
pub struct Report {
    player: String,
    overall: Statistic,
    openings: BTreeMap<String, Statistic>,
    skipped: u64,
}

impl Report {
    pub fn new(player: &str) -> Self {
        Report {
            player: player.to_string(),
            overall: Statistic::default(),
            openings: BTreeMap::new(),
            skipped: 0,
        }
    }

    /// Fold one classified game into the tallies.
    pub fn count(&mut self, game: &GameRecord, opening: &str) {
        let white = match self.player_color(game) {
            Some(white) => white,
            None => {
                self.skipped += 1;
                vprintln!(
                    "report: skipping game, '{}' not playing (White={:?} Black={:?})",
                    self.player,
                    game.tags.get("White"),
                    game.tags.get("Black")
                );
                return;
            }
        };
        let result = result_from_headers(&game.tags);
        self.overall.count(white, &result);
        self.openings
            .entry(opening.to_string())
            .or_default()
            .count(white, &result);
    }

    /// The player's color in this game, if they played at all.
    fn player_color(&self, game: &GameRecord) -> Option<bool> {
        if game.tags.get("White").map(String::as_str) == Some(self.player.as_str()) {
            Some(true)
        } else if game.tags.get("Black").map(String::as_str) == Some(self.player.as_str()) {
            Some(false)
        } else {
            None
        }
    }

    pub fn overall(&self) -> &Statistic {
        &self.overall
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Per-opening CSV, busiest openings first.
    pub fn write_csv(&self, out_path: &Path) -> io::Result<()> {
        let mut entries: Vec<_> = self.openings.iter().collect();
        entries.sort_by_key(|(_, s)| std::cmp::Reverse(s.games()));

        let mut f = File::create(out_path)?;
        writeln!(f, "opening,games,won,lost,drawn,win_pct,loss_pct,draw_pct")?;
        for (opening, s) in entries {
            let (won, lost, drawn) = s.percentages();
            writeln!(
                f,
                "{},{},{},{},{},{:.3},{:.3},{:.3}",
                escape_csv(opening),
                s.games(),
                s.won.total(),
                s.lost.total(),
                s.drawn.total(),
                won,
                lost,
                drawn
            )?;
        }
        Ok(())
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(self.openings.len() + 2);
        let mut header = vec!["Opening".to_string()];
        header.extend(Statistic::HEADERS.iter().map(|h| h.to_string()));
        rows.push(header);
        for (opening, stats) in &self.openings {
            let mut row = vec![opening.clone()];
            row.extend(stats.data());
            rows.push(row);
        }
        let mut total = vec!["TOTAL".to_string()];
        total.extend(self.overall.data());
        rows.push(total);
        rows
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Plain aligned table, openings sorted by name, TOTAL row last.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let columns = rows[0].len();
        let mut widths = vec![0usize; columns];
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        for (r, row) in rows.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
                .collect();
            writeln!(f, "{}", line.join(" | ").trim_end())?;
            if r == 0 || r == rows.len() - 2 {
                let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                writeln!(f, "{}", sep.join("-+-"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn game(white: &str, black: &str, result: &str) -> GameRecord {
        let mut tags = HashMap::new();
        tags.insert("White".to_string(), white.to_string());
        tags.insert("Black".to_string(), black.to_string());
        tags.insert("Result".to_string(), result.to_string());
        GameRecord {
            tags,
            moves: vec![],
        }
    }

    #[test]
    fn counts_only_the_players_games() {
        let mut report = Report::new("bart");
        report.count(&game("bart", "alice", "1-0"), "Italian Game");
        report.count(&game("carol", "dave", "1-0"), "Italian Game");
        report.count(&game("alice", "bart", "1-0"), "Sicilian defence");

        assert_eq!(report.overall().games(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.overall().won.white, 1);
        assert_eq!(report.overall().lost.black, 1);
    }

    #[test]
    fn openings_are_tallied_separately() {
        let mut report = Report::new("bart");
        report.count(&game("bart", "a", "1-0"), "Italian Game");
        report.count(&game("bart", "b", "0-1"), "Italian Game");
        report.count(&game("c", "bart", "0-1"), "Unknown opening");

        let italian = &report.openings["Italian Game"];
        assert_eq!(italian.games(), 2);
        assert_eq!(italian.won.white, 1);
        assert_eq!(italian.lost.white, 1);
        assert_eq!(report.openings["Unknown opening"].won.black, 1);
    }

    #[test]
    fn table_has_header_rows_and_total() {
        let mut report = Report::new("bart");
        report.count(&game("bart", "a", "1-0"), "Italian Game");
        let text = format!("{}", report);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Opening"));
        assert!(lines[0].contains("Games"));
        assert!(lines.iter().any(|l| l.starts_with("Italian Game")));
        assert!(lines[lines.len() - 1].starts_with("TOTAL"));
    }

    #[test]
    fn csv_escaping() {
        assert_eq!(escape_csv("Italian Game"), "Italian Game");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
