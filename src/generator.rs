use std::collections::HashMap;

use anyhow::Context;
use log::{debug, error, warn};

use crate::{
    cli::Platform,
    entry::{check_entry, parse_record, EntryError, ParsedRecord, UnknownTypePolicy},
    record::records,
    types::{entry_symbol, DispatchSlot, UnknownType},
    writer::{RenderContext, Renderer, Sink},
};

pub const SYSCALL_LIST_FILE: &str = "syscall_list.h";

/// What a named record turned into. Malformed records take no slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Accepted(String),
    Placeholder,
    Rejected(String),
}

/// Append-only, table-ordered record of every named syscall slot, read by
/// the two aggregate passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyscallTable {
    slots: Vec<Slot>,
}

impl SyscallTable {
    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn accepted_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Accepted(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// `entry_<name>` for every accepted syscall, in table order.
    pub fn list_symbols(&self) -> Vec<String> {
        self.accepted_names().map(entry_symbol).collect()
    }

    /// Every skipped slot pulls the following indices down by one, so the
    /// accepted syscalls are numbered without gaps.
    pub fn dispatch_slots(&self) -> Vec<DispatchSlot> {
        let mut skipped = 0;
        let mut dispatch = Vec::new();
        for (position, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Accepted(name) => dispatch.push(DispatchSlot {
                    symbol: entry_symbol(name),
                    index: position - skipped,
                }),
                Slot::Placeholder | Slot::Rejected(_) => skipped += 1,
            }
        }
        dispatch
    }
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    pub table: SyscallTable,
    pub entries_written: usize,
    pub placeholders: usize,
    pub malformed: usize,
    pub rejected: Vec<EntryError>,
    pub unknown_types: Vec<UnknownType>,
}

impl GenerationReport {
    fn reject(&mut self, error: EntryError) {
        match error {
            EntryError::DuplicateName { .. } => warn!("skipping {error}"),
            _ => error!("skipping {error}"),
        }
        self.table.push(Slot::Rejected(error.syscall().to_string()));
        self.rejected.push(error);
    }
}

/// Generates one entry file per syscall and then the two aggregates.
pub fn generate_output(
    platform: Platform,
    table_text: &str,
    renderer: &dyn Renderer,
    sink: &mut dyn Sink,
    policy: UnknownTypePolicy,
) -> anyhow::Result<GenerationReport> {
    let report = process_records(table_text, renderer, sink, policy)?;
    write_syscall_list(&report.table, renderer, sink)?;
    write_dispatch_table(platform, &report.table, renderer, sink)?;
    Ok(report)
}

/// The per-record pass: parse, classify, assemble and write each entry in
/// table order.
pub fn process_records(
    table_text: &str,
    renderer: &dyn Renderer,
    sink: &mut dyn Sink,
    policy: UnknownTypePolicy,
) -> anyhow::Result<GenerationReport> {
    let mut report = GenerationReport::default();
    let mut generated: HashMap<String, u32> = HashMap::new();

    for record in records(table_text) {
        let entry = match parse_record(&record) {
            Ok(ParsedRecord::Entry(entry)) => entry,
            Ok(ParsedRecord::Placeholder { number, name }) => {
                debug!("syscall {number} is a placeholder ({name})");
                report.placeholders += 1;
                report.table.push(Slot::Placeholder);
                continue;
            }
            Ok(ParsedRecord::Malformed) => {
                debug!(
                    "skipping malformed record: {}",
                    record.text().lines().next().unwrap_or_default()
                );
                report.malformed += 1;
                continue;
            }
            Err(error) => {
                report.reject(error);
                continue;
            }
        };

        if let Some(&number) = generated.get(&entry.name) {
            report.reject(EntryError::DuplicateName {
                syscall: entry.name,
                number,
            });
            continue;
        }

        for argument in entry.unresolved_arguments() {
            debug!(
                "{}: {} has no generator, declared as `{}`",
                entry.name, argument.symbol, argument.declaration
            );
            report.unknown_types.push(UnknownType {
                syscall: entry.name.clone(),
                type_text: argument.declared_type.clone(),
            });
        }
        if let Err(error) = check_entry(&entry, policy) {
            report.reject(error);
            continue;
        }

        write_artifact(renderer, sink, &RenderContext::Entry(&entry), &entry.file_name())?;
        generated.insert(entry.name.clone(), entry.number);
        report.table.push(Slot::Accepted(entry.name));
        report.entries_written += 1;
    }

    Ok(report)
}

pub fn write_syscall_list(
    table: &SyscallTable,
    renderer: &dyn Renderer,
    sink: &mut dyn Sink,
) -> anyhow::Result<()> {
    let symbols = table.list_symbols();
    write_artifact(
        renderer,
        sink,
        &RenderContext::SyscallList(&symbols),
        SYSCALL_LIST_FILE,
    )
}

pub fn write_dispatch_table(
    platform: Platform,
    table: &SyscallTable,
    renderer: &dyn Renderer,
    sink: &mut dyn Sink,
) -> anyhow::Result<()> {
    let slots = table.dispatch_slots();
    write_artifact(
        renderer,
        sink,
        &RenderContext::SyscallTable {
            platform,
            slots: &slots,
        },
        &platform.dispatch_table_file_name(),
    )
}

fn write_artifact(
    renderer: &dyn Renderer,
    sink: &mut dyn Sink,
    context: &RenderContext<'_>,
    file_name: &str,
) -> anyhow::Result<()> {
    let mut buffer = Vec::new();
    renderer.render(context, &mut buffer).with_context(|| {
        format!(
            "could not render the {} template for {file_name}",
            context.template().name()
        )
    })?;
    sink.persist(file_name, &buffer)
        .with_context(|| format!("could not write {file_name}"))
}
