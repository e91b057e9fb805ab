// src/main.rs

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Format};
use gitfolio::{ChangeContext, Repository};
use indicatif::ProgressBar;
use serde_json::Value;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);
    let start_time = Instant::now();

    match run(&args) {
        Ok(()) => {
            tracing::info!("Total time: {:.2?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<gitfolio::GitError>() {
                Some(git_err) => eprintln!("Error {}: {}", git_err.status(), git_err.description()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    };

    let mut repo = Repository::open(&args.repo, args.branch.as_deref())?
        .with_ancestry(args.ancestry.into())
        .with_progress(bar.clone());
    let changectx = repo.load(args.mode())?;
    bar.finish_and_clear();

    match args.format {
        Format::Summary => print_summary(changectx),
        Format::Json => {
            let json = to_json(changectx, args.content).context("Failed to serialize change context")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_summary(changectx: &ChangeContext) {
    match (&changectx.refname, changectx.revision) {
        (Some(name), Some(rev)) => println!("{name} at {rev}"),
        _ => println!("staging area"),
    }
    for file in &changectx.files {
        let date = file.date.map_or("-".to_string(), |d| d.to_rfc3339());
        let mdate = file.mdate.map_or("-".to_string(), |d| d.to_rfc3339());
        println!(
            "{:<40} {:>8}  {}  {}  {}",
            file.path,
            file.content.len(),
            date,
            mdate,
            file.author.as_deref().unwrap_or("-")
        );
    }
    println!("{} files", changectx.files.len());
}

fn to_json(changectx: &ChangeContext, with_content: bool) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(changectx)?;
    if let Some(files) = value.get_mut("files").and_then(Value::as_array_mut) {
        for (file, json) in changectx.files.iter().zip(files.iter_mut()) {
            json["size"] = Value::from(file.content.len());
            if with_content {
                json["content"] = file.content_str().map_or(Value::Null, Value::from);
            }
        }
    }
    serde_json::to_string_pretty(&value)
}

fn init_tracing(args: &Args) {
    if args.quiet {
        return;
    }

    let filter = match args.verbose {
        0 => "warn,gitfolio=info",
        1 => "info,gitfolio=debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
