use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use cli::{EntrygenArgs, Platform};
use colors::{
    GENERAL_TEXT_COLOR, REJECTED_BACKGROUND_COLOR, SYSCALL_NAME_COLOR, UNKNOWN_BACKGROUND_COLOR,
    UNKNOWN_TYPE_COLOR,
};
use generator::{generate_output, GenerationReport};
use writer::{generation_year, CSourceRenderer, DirectorySink, TemplateSet};

mod arguments;
mod cli;
mod colors;
mod entry;
mod generator;
mod record;
mod template;
mod type_map;
mod types;
mod writer;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = EntrygenArgs::parse();
    let report = run(&args)?;
    if args.summary {
        print_summary(&report);
    }
    Ok(())
}

fn run(args: &EntrygenArgs) -> Result<GenerationReport> {
    let platform = match args.os {
        Some(platform) => platform,
        None => {
            let host = Platform::host().ok_or_else(|| {
                anyhow!(
                    "there is no syscall table for {}, pick one with --os",
                    std::env::consts::OS
                )
            })?;
            info!("No operating system selected, defaulting to: {host}");
            host
        }
    };

    let table_path = args.table_path(platform);
    let table_text = fs::read_to_string(&table_path)
        .with_context(|| format!("could not read syscall table {}", table_path.display()))?;

    let mut sink = DirectorySink::create(args.output_dir.join(platform.name()))?;
    let renderer = CSourceRenderer::with_templates(
        args.year.unwrap_or_else(generation_year),
        TemplateSet::load(&args.input_dir)?,
    );
    let report = generate_output(
        platform,
        &table_text,
        &renderer,
        &mut sink,
        args.unknown_type_policy(),
    )?;

    info!(
        "wrote {} syscall entries for {platform} to {}",
        report.entries_written,
        sink.dir().display()
    );
    Ok(report)
}

fn print_summary(report: &GenerationReport) {
    use tabled::{builder::Builder, settings::Style};

    let mut builder = Builder::new();
    builder.push_record(["count", "records"]);
    builder.push_record([""]);
    for (count, outcome) in [
        (report.table.slots().len(), "syscall slots"),
        (report.entries_written, "entries written"),
        (report.placeholders, "placeholders"),
        (report.rejected.len(), "rejected"),
        (report.malformed, "malformed"),
        (report.unknown_types.len(), "unknown argument types"),
    ] {
        builder.push_record([count.to_string(), outcome.to_string()]);
    }
    let table = builder.build().with(Style::ascii_rounded()).to_string();
    println!("\n{}", table);

    if !report.rejected.is_empty() {
        println!("\n{}", " REJECTED ".on_custom_color(*REJECTED_BACKGROUND_COLOR));
        for error in &report.rejected {
            println!(
                " - {}",
                error.to_string().custom_color(*GENERAL_TEXT_COLOR)
            );
        }
    }

    if !report.unknown_types.is_empty() {
        println!("\n{}", " UNKNOWN TYPES ".on_custom_color(*UNKNOWN_BACKGROUND_COLOR));
        for unknown in &report.unknown_types {
            println!(
                " - {} {}",
                unknown.syscall.custom_color(*SYSCALL_NAME_COLOR),
                unknown.type_text.custom_color(*UNKNOWN_TYPE_COLOR)
            );
        }
    }
}
