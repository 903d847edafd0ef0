#[macro_use]
mod verbose;

mod aggregator;
mod catalog;
mod cli;
mod config;
mod movetree;
mod pgn;
mod report;
mod stats;

use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::{bail, Context};

fn main() -> anyhow::Result<()> {
    let args = cli::parse();
    if args.help {
        cli::print_help();
        return Ok(());
    }
    verbose::set(args.verbose);
    let cfg = config::Config::load();

    if let Some(n) = cfg.rayon_threads {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    }

    // pick player: CLI override > config
    let player = if args.player.is_empty() { cfg.player.clone() } else { args.player.clone() };
    if player.is_empty() {
        bail!("no player set; pass --player NAME or set `player` in config.toml");
    }
    if args.files.is_empty() {
        bail!("no input files; pass one or more PGN paths (.pgn or .pgn.zst)");
    }

    let catalog_path = args.catalog.clone().or_else(|| cfg.catalog_path.clone());
    let catalog_text = match &catalog_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?,
        None => catalog::DEFAULT_CATALOG.to_string(),
    };

    let t0 = Instant::now();
    let entries = catalog::parse(&catalog_text).context("parsing opening catalog")?;
    let tree = catalog::build_tree(&entries);
    vprintln!(
        "catalog: {} entries, {} tree nodes in {:.3}s",
        entries.len(),
        tree.node_count(),
        verbose::secs(t0)
    );
    for conflict in tree.conflicts() {
        vprintln!(
            "catalog: {} already annotated {:?}, dropped {:?}",
            conflict.moves.join(" "),
            conflict.kept,
            conflict.rejected
        );
    }

    let bounds = aggregator::MonthBounds {
        since: args.since.as_deref(),
        until: args.until.as_deref(),
    };
    let mut report = report::Report::new(&player);

    for path in &args.files {
        let t1 = Instant::now();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let games = if path.extension().is_some_and(|ext| ext == "zst") {
            let decoder = zstd::stream::Decoder::new(file)
                .with_context(|| format!("decompressing {}", path.display()))?;
            aggregator::aggregate_from_reader(
                BufReader::new(decoder), &tree, &mut report, &cfg, &bounds,
            )
        } else {
            aggregator::aggregate_from_reader(
                BufReader::new(file), &tree, &mut report, &cfg, &bounds,
            )
        }
        .with_context(|| format!("reading {}", path.display()))?;
        eprintln!("{} | {:.3}s | games={}", path.display(), verbose::secs(t1), games);
    }

    println!("{}", report);
    if report.overall().games() == 0 {
        eprintln!("No games counted for '{}'.", player);
    }
    if report.skipped() > 0 {
        eprintln!(
            "Skipped {} games '{}' wasn't playing (NB. you can set the player username with --player)",
            report.skipped(),
            player
        );
    }

    if let Some(out) = args.out.as_deref() {
        report.write_csv(out).with_context(|| format!("writing CSV {}", out.display()))?;
        vprintln!("csv: written to {}", out.display());
    }

    if args.prune {
        println!("{}", tree.prune());
    }

    Ok(())
}
