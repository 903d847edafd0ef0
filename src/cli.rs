use std::path::PathBuf;

pub struct Cli {
    pub files: Vec<PathBuf>,       // PGN inputs (.pgn or .pgn.zst)
    pub player: String,            // ← no default here; config.toml is the default
    pub catalog: Option<PathBuf>,  // override the bundled catalog
    pub out: Option<PathBuf>,      // CSV output
    pub since: Option<String>,     // "YYYY-MM" (lower bound, inclusive)
    pub until: Option<String>,     // "YYYY-MM" (upper bound, inclusive)
    pub prune: bool,
    pub verbose: bool,
    pub help: bool,
}

pub fn parse() -> Cli {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut player = String::new();
    let mut catalog: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut since: Option<String> = None;
    let mut until: Option<String> = None;
    let mut prune = false;
    let mut verbose = false;
    let mut help = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--player" | "-p" => {
                if let Some(name) = it.next() { player = name; }
            }
            "--catalog" => {
                if let Some(p) = it.next() { catalog = Some(PathBuf::from(p)); }
            }
            "--out" | "-o" => {
                if let Some(p) = it.next() { out = Some(PathBuf::from(p)); }
            }
            "--since" | "--from" => {
                if let Some(m) = it.next() { since = Some(m); }
            }
            "--until" => {
                if let Some(m) = it.next() { until = Some(m); }
            }
            "--prune" => prune = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => help = true,
            _ => {
                if !arg.starts_with('-') {
                    files.push(PathBuf::from(arg));
                }
            }
        }
    }

    Cli { files, player, catalog, out, since, until, prune, verbose, help }
}

pub fn print_help() {
    eprintln!(
r#"openingstats — per-opening win/loss report for one player

Usage:
    openingstats --player NAME [options] file1.pgn [file2.pgn.zst ...]

Options:
  --player, -p NAME           Player to report on (or `player` in config.toml).
  --catalog PATH              Opening catalog file (default: bundled catalog).
  --out, -o PATH              Also write the per-opening rows as CSV.
  --since YYYY-MM, --from     Only count games from this month on (inclusive).
  --until YYYY-MM             Only count games up to this month (inclusive).
  --prune                     After the report, print the catalog branches the
                              games actually reached, with visit counts.
  -v, --verbose               Detailed timings/logs.
  -h, --help                  Show this help.

Notes:
  • Inputs ending in .zst are decompressed while streaming.
  • Openings come from prefix-matching each game's moves against the
    catalog; a game with no recognized first move is reported as
    "Unknown opening".
  • Configure player, catalog_path and batch sizes in config.toml.
"#);
}
