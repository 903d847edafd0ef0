use std::collections::HashMap;

use regex::Regex;

/// One game as handed to classification: its header tags and the SAN
/// move tokens of the main line.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub tags: HashMap<String, String>,
    pub moves: Vec<String>,
}

/// Consider a line that starts a new game.
pub fn is_game_start(line: &str) -> bool {
    line.starts_with("[Event ")
}

/// Parse PGN headers from a game's lines into a map (Tag -> Value).
pub fn parse_headers(game_lines: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in game_lines {
        let line = line.trim();
        if !(line.starts_with('[') && line.ends_with(']')) {
            // beyond headers
            continue;
        }
        // format: [Tag "Value"]
        if let Some(space_idx) = line.find(' ') {
            let tag = &line[1..space_idx];
            if let (Some(fq_rel), Some(lq)) = (line[space_idx..].find('"'), line.rfind('"')) {
                let fq = space_idx + fq_rel;
                if lq > fq {
                    let val = &line[(fq + 1)..lq];
                    map.insert(tag.to_string(), val.to_string());
                }
            }
        }
    }
    map
}

/// Split a game's lines into headers and move tokens.
pub fn parse_game(game_lines: &[String]) -> GameRecord {
    let tags = parse_headers(game_lines);
    let mut movetext = String::new();
    for line in game_lines {
        let trimmed = line.trim();
        if trimmed.starts_with('[') || trimmed.is_empty() {
            continue;
        }
        movetext.push_str(trimmed);
        movetext.push('\n');
    }
    GameRecord {
        tags,
        moves: movetext_tokens(&movetext),
    }
}

/// Tokenize SAN move text. Brace comments, semicolon comments,
/// parenthesized variations (nesting-aware), NAGs, move numbers and game
/// results are dropped; `!`/`?` suffixes are stripped so catalog moves
/// and game moves key identically. No legality checking.
pub fn movetext_tokens(text: &str) -> Vec<String> {
    let move_number = Regex::new(r"^\d+\.*").unwrap();

    let mut cleaned = String::with_capacity(text.len());
    let mut brace = false;
    let mut paren = 0usize;
    let mut semi = false;
    for c in text.chars() {
        if c == '\n' {
            semi = false;
            cleaned.push(' ');
            continue;
        }
        if semi {
            continue;
        }
        if brace {
            if c == '}' {
                brace = false;
            }
            continue;
        }
        if paren > 0 {
            match c {
                '(' => paren += 1,
                ')' => paren -= 1,
                _ => {}
            }
            continue;
        }
        match c {
            '{' => brace = true,
            '(' => paren = 1,
            ';' => semi = true,
            _ => cleaned.push(c),
        }
    }

    cleaned
        .split_whitespace()
        .filter_map(|token| {
            if token.starts_with('$') {
                return None;
            }
            if matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*") {
                return None;
            }
            // "12.e4" and "12...Nf6" carry the move glued to the number
            let stripped = move_number.replace(token, "");
            let mv = stripped.trim_start_matches('.').trim_end_matches(['!', '?']);
            if mv.is_empty() {
                None
            } else {
                Some(mv.to_string())
            }
        })
        .collect()
}

/// Extract YYYY-MM month from UTCDate or Date ("YYYY.MM.DD").
/// Returns "unknown" if absent/malformed.
pub fn month_from_headers(h: &HashMap<String, String>) -> String {
    let date = h.get("UTCDate").or_else(|| h.get("Date"));
    if let Some(d) = date {
        // expected "YYYY.MM.DD"
        if d.len() >= 7 && d.chars().nth(4) == Some('.') && d.chars().nth(7) == Some('.') {
            let y = &d[0..4];
            let m = &d[5..7];
            if y.chars().all(|c| c.is_ascii_digit()) && m.chars().all(|c| c.is_ascii_digit()) {
                return format!("{}-{}", y, m);
            }
        }
    }
    "unknown".to_string()
}

/// Result string (e.g., "1-0", "0-1", "1/2-1/2"), or "*" if absent.
pub fn result_from_headers(h: &HashMap<String, String>) -> String {
    h.get("Result").cloned().unwrap_or_else(|| "*".to_string())
}
