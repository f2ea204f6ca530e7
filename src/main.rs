use std::path::PathBuf;

use clap::Parser;
use log::{error, warn};

mod buf;
mod cli;
mod process;
mod tags;
mod xdf;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.loglevel.as_str()),
    )
    .init();

    // An empty suffix leaves nowhere to write a sibling file, so it
    // behaves like --inplace.
    let inplace = cli.inplace || cli.suffix.is_empty();
    let is_modifying = !cli.set.is_empty() || !cli.clear.is_empty();

    let inpaths = matching_pathnames(&cli.paths);
    if inpaths.is_empty() {
        warn!("no files matched the given patterns");
    }

    let mut failed = false;
    for inpath in inpaths {
        // Skip output files from earlier runs.
        if !cli.process_suffixed && !cli.suffix.is_empty() && has_suffix(&inpath, &cli.suffix) {
            continue;
        }

        let outpath = if !is_modifying {
            None
        } else if inplace {
            Some(inpath.clone())
        } else {
            Some(process::suffixed_path(&inpath, &cli.suffix))
        };

        let result = process::process_file(&inpath, outpath.as_deref(), cli.overwrite, |content| {
            tags::apply_directives(content, &cli.set, &cli.clear, &cli.show)
        });
        if let Err(err) = result {
            error!("{}: {}", inpath.display(), err);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Expand the given glob patterns into the matching pathnames.
fn matching_pathnames(patterns: &[String]) -> Vec<PathBuf> {
    let mut results = Vec::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(paths) => results.extend(paths.flatten()),
            Err(err) => warn!("skipping bad pattern {pattern}: {err}"),
        }
    }
    results
}

fn has_suffix(path: &PathBuf, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.ends_with(&format!("{suffix}.xdf")))
}
