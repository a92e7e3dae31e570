use std::{collections::HashMap, sync::LazyLock};

use log::{debug, warn};

use crate::{
    arguments::strip_arg_name,
    types::{ArgCategory, Classification, GenerationStrategy},
};

// canonical type text (see `normalize_type`) -> category and generator
#[rustfmt::skip]
pub const TYPE_TABLE: &[(&str, ArgCategory, GenerationStrategy)] = {
    use ArgCategory::*;
    use GenerationStrategy::*;
    &[
        // plain C scalars
        ("int",              Integer,   GenerateInt),
        ("long",             Integer,   GenerateInt),
        ("short",            Integer,   GenerateInt),
        ("char",             Integer,   GenerateInt),
        ("unsigned",         Integer,   GenerateInt),
        ("u_int",            Integer,   GenerateInt),
        ("u_long",           Integer,   GenerateInt),
        ("u_short",          Integer,   GenerateInt),
        ("u_char",           Integer,   GenerateInt),
        // fixed width
        ("int8_t",           Integer,   GenerateInt),
        ("int16_t",          Integer,   GenerateInt),
        ("int32_t",          Integer,   GenerateInt),
        ("int64_t",          Integer,   GenerateInt),
        ("uint8_t",          Integer,   GenerateInt),
        ("uint16_t",         Integer,   GenerateInt),
        ("uint32_t",         Integer,   GenerateInt),
        ("uint64_t",         Integer,   GenerateInt),
        ("u_int8_t",         Integer,   GenerateInt),
        ("u_int16_t",        Integer,   GenerateInt),
        ("u_int32_t",        Integer,   GenerateInt),
        ("u_int64_t",        Integer,   GenerateInt),
        // sizes and offsets
        ("size_t",           Integer,   GenerateInt),
        ("ssize_t",          Integer,   GenerateInt),
        ("user_size_t",      Integer,   GenerateInt),
        ("user_ssize_t",     Integer,   GenerateInt),
        ("user_long_t",      Integer,   GenerateInt),
        ("user_ulong_t",     Integer,   GenerateInt),
        ("socklen_t",        Integer,   GenerateInt),
        ("off_t",            Integer,   GenerateInt),
        ("time_t",           Integer,   GenerateInt),
        ("rlim_t",           Integer,   GenerateInt),
        // kernel identifiers
        ("uid_t",            Integer,   GenerateInt),
        ("gid_t",            Integer,   GenerateInt),
        ("id_t",             Integer,   GenerateInt),
        ("idtype_t",         Integer,   GenerateInt),
        ("mode_t",           Integer,   GenerateInt),
        ("dev_t",            Integer,   GenerateInt),
        ("key_t",            Integer,   GenerateInt),
        ("clockid_t",        Integer,   GenerateInt),
        ("lwpid_t",          Integer,   GenerateInt),
        ("cpuwhich_t",       Integer,   GenerateInt),
        ("cpulevel_t",       Integer,   GenerateInt),
        ("cpusetid_t",       Integer,   GenerateInt),
        ("accmode_t",        Integer,   GenerateInt),
        ("register_t",       Integer,   GenerateInt),
        ("u_register_t",     Integer,   GenerateInt),
        ("au_id_t",          Integer,   GenerateInt),
        ("au_asid_t",        Integer,   GenerateInt),
        ("sae_associd_t",    Integer,   GenerateInt),
        ("sae_connid_t",     Integer,   GenerateInt),
        ("uuid_t",           Integer,   GenerateInt),
        // ipc and signals, passed by value
        ("sem_t",            Integer,   GenerateInt),
        ("semun_t",          Integer,   GenerateInt),
        ("sigset_t",         Integer,   GenerateInt),
        ("siginfo_t",        Integer,   GenerateInt),
        // opaque user space addresses
        ("user_addr_t",      Address,   GeneratePointer),
        ("caddr_t",          Address,   GeneratePointer),
        ("fhandle_t",        Address,   GeneratePointer),
        ("uintptr_t",        Address,   GeneratePointer),
        ("pid_t",            ProcessID, GeneratePID),
        ("mach_port_name_t", MachPort,  GenerateMachPort),
    ]
};

pub static TYPE_MAP: LazyLock<HashMap<&'static str, Classification>> =
    LazyLock::new(initialize_type_map);

pub fn initialize_type_map() -> HashMap<&'static str, Classification> {
    TYPE_TABLE
        .iter()
        .map(|&(type_text, category, strategy)| (type_text, Classification { category, strategy }))
        .collect()
}

/// Collapses whitespace runs to one space and writes pointer stars as
/// `type *` / `type **`, so `void*`, `socklen_t\t*` and `struct\tmsqid_ds *`
/// all land on the canonical spelling.
pub fn normalize_type(type_text: &str) -> String {
    let mut normalized = String::with_capacity(type_text.len());
    let mut pending_space = false;
    for c in type_text.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c == '*' {
            if !normalized.is_empty() && !normalized.ends_with('*') {
                normalized.push(' ');
            }
        } else if pending_space && !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push(c);
        pending_space = false;
    }
    normalized
}

/// Looks a stripped type up in the table. Pointers the table does not name
/// are still addresses.
pub fn classify_type(type_text: &str) -> Option<Classification> {
    let normalized = normalize_type(type_text);
    if let Some(classification) = TYPE_MAP.get(normalized.as_str()) {
        return Some(*classification);
    }
    if normalized.ends_with('*') {
        return Some(Classification {
            category: ArgCategory::Address,
            strategy: GenerationStrategy::GeneratePointer,
        });
    }
    None
}

/// Return values use the argument table, except that a returned mach port
/// name is just a number.
pub fn classify_return_type(return_type: &str) -> Option<ArgCategory> {
    let normalized = normalize_type(return_type);
    if normalized == "mach_port_name_t" {
        return Some(ArgCategory::Integer);
    }
    let category = classify_type(&normalized).map(|classification| classification.category);
    if category.is_none() {
        debug!("no category for return type `{normalized}`");
    }
    category
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedArgument {
    pub declared_type: String,
    pub classification: Option<Classification>,
}

/// Classifies raw declarations in order. Unknown types are reported and left
/// unclassified.
pub fn classify_arguments(syscall: &str, declarations: &[&str]) -> Vec<ClassifiedArgument> {
    declarations
        .iter()
        .map(|declaration| {
            let declared_type = normalize_type(strip_arg_name(declaration));
            let classification = classify_type(&declared_type);
            match classification {
                Some(Classification { category, strategy }) => {
                    debug!("{syscall}: `{declared_type}` is {category}, {strategy}")
                }
                None => warn!("{syscall}: unrecognized argument type `{declared_type}`"),
            }
            ClassifiedArgument {
                declared_type,
                classification,
            }
        })
        .collect()
}
