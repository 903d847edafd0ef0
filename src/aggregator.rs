use std::io::{self, BufRead};

use rayon::prelude::*;

use crate::config::Config;
use crate::movetree::MoveTree;
use crate::pgn::{self, is_game_start, month_from_headers};
use crate::report::Report;

/// Inclusive "YYYY-MM" bounds on a game's date header. Months compare
/// lexically; a game with no parsable date is dropped whenever any
/// bound is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonthBounds<'a> {
    pub since: Option<&'a str>,
    pub until: Option<&'a str>,
}

impl MonthBounds<'_> {
    fn admits(&self, month: &str) -> bool {
        if self.since.is_none() && self.until.is_none() {
            return true;
        }
        if month == "unknown" {
            return false;
        }
        if let Some(since) = self.since {
            if month < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if month > until {
                return false;
            }
        }
        true
    }
}

/// Stream PGN from `reader`, classify each admitted game against `tree`
/// and fold it into `report`. Games are parsed and classified in
/// parallel batches of `cfg.batch_size`. Returns the number of games
/// seen in the stream.
pub fn aggregate_from_reader<R: BufRead>(
    reader: R,
    tree: &MoveTree,
    report: &mut Report,
    cfg: &Config,
    bounds: &MonthBounds,
) -> io::Result<usize> {
    let mut batch: Vec<Vec<String>> = Vec::with_capacity(cfg.batch_size);
    let mut current_game: Vec<String> = Vec::with_capacity(64);
    let mut total_games = 0usize;

    for line_res in reader.lines() {
        let line = line_res?;
        if is_game_start(&line) && !current_game.is_empty() {
            batch.push(std::mem::take(&mut current_game));
            total_games += 1;
            if batch.len() >= cfg.batch_size {
                classify_batch(&mut batch, tree, report, bounds);
            }
        }
        current_game.push(line);
    }
    if !current_game.is_empty() {
        batch.push(current_game);
        total_games += 1;
    }
    classify_batch(&mut batch, tree, report, bounds);

    Ok(total_games)
}

/// Parse and classify a batch in parallel, then drain it into the
/// report sequentially. Month-filtered games never touch the tree, so
/// traffic counters only reflect reported games.
fn classify_batch(
    batch: &mut Vec<Vec<String>>,
    tree: &MoveTree,
    report: &mut Report,
    bounds: &MonthBounds,
) {
    if batch.is_empty() {
        return;
    }
    let classified: Vec<(pgn::GameRecord, String)> = batch
        .par_iter()
        .filter_map(|game_lines| {
            let record = pgn::parse_game(game_lines);
            if !bounds.admits(&month_from_headers(&record.tags)) {
                return None;
            }
            let annotation = tree.classify(&record.moves).to_string();
            Some((record, annotation))
        })
        .collect();

    let start = tree.start_annotation();
    for (record, annotation) in &classified {
        let opening = if annotation == start {
            "Unknown opening"
        } else {
            annotation.as_str()
        };
        report.count(record, opening);
    }
    batch.clear();
}
