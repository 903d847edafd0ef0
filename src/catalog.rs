// src/catalog.rs
// Line-oriented opening catalog (scid .eco style): one entry per
// non-indented line, `CODE "Name" moves`, with indented continuation
// lines carrying overflow move text.

use thiserror::Error;

use crate::movetree::MoveTree;
use crate::pgn;

/// Catalog bundled into the binary; `catalog_path` in config.toml or
/// `--catalog` swaps in an external file.
pub const DEFAULT_CATALOG: &str = include_str!("../data/openings.eco");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub code: String,
    pub name: String,
    pub moves: Vec<String>,
}

/// The catalog is a trusted bundled asset, so grammar violations are
/// loud and fatal rather than recovered.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog line {line}: entry {code:?} has no quoted name")]
    MissingName { line: usize, code: String },
    #[error("catalog line {line}: missing closing quote in {text:?}")]
    UnclosedName { line: usize, text: String },
    #[error("catalog line {line}: expected `CODE \"Name\" moves`, got {text:?}")]
    MalformedEntry { line: usize, text: String },
    #[error("catalog line {line}: continuation before any entry")]
    DanglingContinuation { line: usize },
}

struct Pending {
    code: String,
    name: String,
    movetext: String,
}

impl Pending {
    fn finish(self) -> Entry {
        Entry {
            code: self.code,
            name: self.name,
            moves: pgn::movetext_tokens(&self.movetext),
        }
    }
}

/// Parse the whole catalog text into entries, in file order.
pub fn parse(text: &str) -> Result<Vec<Entry>, CatalogError> {
    let mut entries = Vec::new();
    let mut pending: Option<Pending> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.starts_with('#') || raw.trim().is_empty() {
            continue;
        }
        if raw.starts_with([' ', '\t']) {
            match pending.as_mut() {
                Some(p) => {
                    p.movetext.push(' ');
                    p.movetext.push_str(raw.trim());
                }
                None => return Err(CatalogError::DanglingContinuation { line }),
            }
            continue;
        }

        // a new non-indented line closes any open entry
        if let Some(p) = pending.take() {
            entries.push(p.finish());
        }

        let (code, rest) = match raw.split_once(char::is_whitespace) {
            Some((code, rest)) => (code, rest.trim()),
            None => (raw, ""),
        };
        if rest.is_empty() || !rest.contains('"') {
            return Err(CatalogError::MissingName {
                line,
                code: code.to_string(),
            });
        }

        if rest.ends_with('"') {
            // name only; moves follow on continuation lines
            let inner = &rest[..rest.len() - 1];
            let open = match inner.find('"') {
                Some(q) => q,
                None => {
                    return Err(CatalogError::UnclosedName {
                        line,
                        text: raw.to_string(),
                    })
                }
            };
            pending = Some(Pending {
                code: code.to_string(),
                name: inner[open + 1..].to_string(),
                movetext: String::new(),
            });
        } else {
            // one-line entry: split on quotes into [prefix, name, moves]
            let parts: Vec<&str> = rest.split('"').collect();
            if parts.len() != 3 {
                return Err(CatalogError::MalformedEntry {
                    line,
                    text: raw.to_string(),
                });
            }
            entries.push(Entry {
                code: code.to_string(),
                name: parts[1].to_string(),
                moves: pgn::movetext_tokens(parts[2]),
            });
        }
    }
    // end of input flushes an open entry
    if let Some(p) = pending.take() {
        entries.push(p.finish());
    }
    Ok(entries)
}

/// One insertion walk per entry, in catalog order.
pub fn build_tree(entries: &[Entry]) -> MoveTree {
    let mut tree = MoveTree::new();
    for entry in entries {
        vprintln!(
            "catalog: {} {:?} ({} moves)",
            entry.code,
            entry.name,
            entry.moves.len()
        );
        tree.insert(&entry.moves, &entry.name);
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_entries() {
        let text = r#"# test catalog
B20 "Sicilian defence" 1.e4 c5 *

C50 "Italian Game" 1.e4 e5 2.Nf3 Nc6 3.Bc4 *
"#;
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "B20");
        assert_eq!(entries[0].name, "Sicilian defence");
        assert_eq!(entries[0].moves, vec!["e4", "c5"]);
        assert_eq!(
            entries[1].moves,
            vec!["e4", "e5", "Nf3", "Nc6", "Bc4"]
        );
    }

    #[test]
    fn continuation_lines_accumulate_moves() {
        let text = "D85 \"Gruenfeld: exchange variation\"\n    1.d4 Nf6 2.c4 g6 3.Nc3 d5\n    4.cxd5 Nxd5 5.e4 *\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Gruenfeld: exchange variation");
        assert_eq!(
            entries[0].moves,
            vec!["d4", "Nf6", "c4", "g6", "Nc3", "d5", "cxd5", "Nxd5", "e4"]
        );
    }

    #[test]
    fn next_header_closes_open_entry() {
        let text = "A02 \"Bird's opening\"\n    1.f4 *\nA04 \"Reti opening\" 1.Nf3 *\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].moves, vec!["f4"]);
        assert_eq!(entries[1].code, "A04");
    }

    #[test]
    fn empty_move_list_is_allowed() {
        let entries = parse("A00 \"Start position\" *\n").unwrap();
        assert_eq!(entries[0].name, "Start position");
        assert!(entries[0].moves.is_empty());
    }

    #[test]
    fn missing_name_is_fatal() {
        let err = parse("B20 1.e4 c5 *\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingName { line: 1, .. }));
    }

    #[test]
    fn unterminated_name_is_fatal() {
        let err = parse("B20 \"Sicilian defence 1.e4 c5 *\n").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedEntry { line: 1, .. }));
    }

    #[test]
    fn extra_quotes_are_fatal() {
        let err = parse("B20 \"Sicilian\" \"defence\" 1.e4 c5 *\n").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedEntry { line: 1, .. }));
    }

    #[test]
    fn indented_first_line_is_fatal() {
        let err = parse("    1.e4 *\n").unwrap_err();
        assert!(matches!(err, CatalogError::DanglingContinuation { line: 1 }));
    }

    #[test]
    fn built_tree_classifies_catalog_lines() {
        let entries = parse(
            "A00 \"Start\" *\nC50 \"Italian Game\" 1.e4 e5 2.Nf3 Nc6 3.Bc4 *\n",
        )
        .unwrap();
        let tree = build_tree(&entries);
        assert_eq!(
            tree.classify(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"]),
            "Italian Game"
        );
        assert_eq!(tree.classify(&["d4", "d5"]), "Start");
    }

    #[test]
    fn bundled_catalog_parses() {
        let entries = parse(DEFAULT_CATALOG).unwrap();
        assert!(entries.len() > 40);
        let tree = build_tree(&entries);
        assert!(tree.conflicts().is_empty());
        assert_eq!(tree.classify(&["e4", "c5"]), "Sicilian defence");
    }
}
