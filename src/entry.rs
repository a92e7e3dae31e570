use std::fmt::Display;

use log::trace;

use crate::{
    arguments::{count_arguments, tokenize},
    record::RawRecord,
    type_map::{classify_arguments, classify_return_type},
    types::{Argument, SyscallEntry},
};

// spelled exactly as the harness headers define them, EIGTH_ARG included
pub const ARG_SYMBOLS: [&str; 12] = [
    "FIRST_ARG",
    "SECOND_ARG",
    "THIRD_ARG",
    "FOURTH_ARG",
    "FIFTH_ARG",
    "SIXTH_ARG",
    "SEVENTH_ARG",
    "EIGTH_ARG",
    "NINTH_ARG",
    "TENTH_ARG",
    "ELEVENTH_ARG",
    "TWELFTH_ARG",
];

/// Names of unimplemented syscall slots.
pub const PLACEHOLDER_NAMES: [&str; 2] = ["enosys", "nosys"];

pub fn is_placeholder(name: &str) -> bool {
    PLACEHOLDER_NAMES.contains(&name)
}

/// What to do with an entry whose arguments are not all classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownTypePolicy {
    /// render it anyway, the unknown arguments get no generator
    #[default]
    Emit,
    Reject,
}

/// Reasons a single record does not become an entry. None of them stop the
/// batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryError {
    TooManyArguments {
        syscall: String,
        count: usize,
    },
    ArgumentCountMismatch {
        syscall: String,
        counted: usize,
        tokenized: usize,
    },
    UnresolvedArguments {
        syscall: String,
        types: Vec<String>,
    },
    DuplicateName {
        syscall: String,
        number: u32,
    },
}

impl EntryError {
    pub fn syscall(&self) -> &str {
        match self {
            EntryError::TooManyArguments { syscall, .. }
            | EntryError::ArgumentCountMismatch { syscall, .. }
            | EntryError::UnresolvedArguments { syscall, .. }
            | EntryError::DuplicateName { syscall, .. } => syscall,
        }
    }
}

impl Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::TooManyArguments { syscall, count } => write!(
                f,
                "{syscall} takes {count} arguments, at most {} are supported",
                ARG_SYMBOLS.len()
            ),
            EntryError::ArgumentCountMismatch {
                syscall,
                counted,
                tokenized,
            } => write!(
                f,
                "{syscall}: counted {counted} arguments but split out {tokenized}"
            ),
            EntryError::UnresolvedArguments { syscall, types } => {
                write!(f, "{syscall} has arguments of unrecognized type: {}", types.join(", "))
            }
            EntryError::DuplicateName { syscall, number } => {
                write!(f, "{syscall} was already generated from syscall {number}")
            }
        }
    }
}

impl std::error::Error for EntryError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedRecord {
    /// no braced prototype, no usable number, or no argument list
    Malformed,
    Placeholder { number: u32, name: String },
    Entry(SyscallEntry),
}

pub fn parse_record(record: &RawRecord<'_>) -> Result<ParsedRecord, EntryError> {
    let (Some(number), Some(prototype)) = (record.number(), record.prototype()) else {
        return Ok(ParsedRecord::Malformed);
    };
    trace!("syscall {number}: {}", prototype.text());
    let Some(name) = prototype.name() else {
        return Ok(ParsedRecord::Malformed);
    };
    if is_placeholder(name) {
        return Ok(ParsedRecord::Placeholder {
            number,
            name: name.to_string(),
        });
    }
    let Some(argument_list) = prototype.argument_list() else {
        return Ok(ParsedRecord::Malformed);
    };

    let total_args = count_arguments(argument_list);
    let declarations = tokenize(argument_list);
    assemble(
        number,
        name,
        prototype.return_type(),
        &declarations,
        total_args,
    )
    .map(ParsedRecord::Entry)
}

/// Builds an entry, handing out positional symbols in declaration order.
pub fn assemble(
    number: u32,
    name: &str,
    return_type: &str,
    declarations: &[&str],
    total_args: usize,
) -> Result<SyscallEntry, EntryError> {
    if declarations.len() != total_args {
        return Err(EntryError::ArgumentCountMismatch {
            syscall: name.to_string(),
            counted: total_args,
            tokenized: declarations.len(),
        });
    }
    if total_args > ARG_SYMBOLS.len() {
        return Err(EntryError::TooManyArguments {
            syscall: name.to_string(),
            count: total_args,
        });
    }

    let arguments = classify_arguments(name, declarations)
        .into_iter()
        .zip(declarations)
        .zip(ARG_SYMBOLS)
        .map(|((classified, declaration), symbol)| Argument {
            declaration: declaration.trim().to_string(),
            declared_type: classified.declared_type,
            category: classified.classification.map(|c| c.category),
            strategy: classified.classification.map(|c| c.strategy),
            symbol,
        })
        .collect();

    Ok(SyscallEntry {
        number,
        name: name.to_string(),
        return_type: return_type.to_string(),
        return_category: classify_return_type(return_type),
        arguments,
        total_args,
    })
}

/// Applies the unknown type policy to an assembled entry.
pub fn check_entry(entry: &SyscallEntry, policy: UnknownTypePolicy) -> Result<(), EntryError> {
    let unresolved: Vec<String> = entry
        .unresolved_arguments()
        .map(|argument| argument.declared_type.clone())
        .collect();
    if unresolved.is_empty() || policy == UnknownTypePolicy::Emit {
        return Ok(());
    }
    Err(EntryError::UnresolvedArguments {
        syscall: entry.name.clone(),
        types: unresolved,
    })
}
