use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use sweeper_core::KeywordStore;
use sweeper_engine::KeywordFile;

#[derive(Subcommand)]
pub enum KeywordsSubcommand {
    /// Print the target and protected lists
    List,
    /// Add sender keywords to the target list
    Add { keywords: Vec<String> },
    /// Remove sender keywords from the target list
    Remove { keywords: Vec<String> },
    /// Never clean these senders, even when listed
    Protect { keywords: Vec<String> },
    /// Lift protection from these senders
    Unprotect { keywords: Vec<String> },
    /// Append every address from a file, one per line (`#` starts a comment)
    Merge { file: PathBuf },
}

pub fn run(data_dir: &Path, subcmd: KeywordsSubcommand) -> anyhow::Result<()> {
    let file = KeywordFile::in_dir(data_dir);
    let mut store = file
        .load_or_default()
        .context("could not read the keyword store")?;

    let changed = match subcmd {
        KeywordsSubcommand::List => {
            print!("{}", render(&store));
            return Ok(());
        }
        KeywordsSubcommand::Add { keywords } => {
            apply(&keywords, "added", |k| store.add(k))
        }
        KeywordsSubcommand::Remove { keywords } => {
            apply(&keywords, "removed", |k| store.remove(k))
        }
        KeywordsSubcommand::Protect { keywords } => {
            apply(&keywords, "protected", |k| store.protect(k))
        }
        KeywordsSubcommand::Unprotect { keywords } => {
            apply(&keywords, "unprotected", |k| store.unprotect(k))
        }
        KeywordsSubcommand::Merge { file: source } => {
            let content = fs::read_to_string(&source)
                .with_context(|| format!("could not read {}", source.display()))?;
            let added = store.merge(parse_address_lines(&content));
            println!("merged {added} new keywords from {}", source.display());
            added
        }
    };

    if changed > 0 {
        let path = file
            .save(&store)
            .context("could not write the keyword store")?;
        println!("saved {}", path.display());
    }
    Ok(())
}

fn apply(keywords: &[String], verb: &str, mut op: impl FnMut(&str) -> bool) -> usize {
    let mut changed = 0;
    for keyword in keywords {
        if op(keyword) {
            println!("{verb} {keyword}");
            changed += 1;
        } else {
            println!("unchanged {keyword}");
        }
    }
    changed
}

fn parse_address_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn render(store: &KeywordStore) -> String {
    let mut out = format!("Keywords ({}):\n", store.emails().len());
    for keyword in store.emails() {
        out.push_str(&format!("  {keyword}\n"));
    }
    out.push_str(&format!("Protected ({}):\n", store.protected_emails().len()));
    for keyword in store.protected_emails() {
        out.push_str(&format!("  {keyword}\n"));
    }
    out
}
