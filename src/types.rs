use std::fmt::Display;

/// Coarse bucket an argument type falls into. Decided from the declared type
/// alone, never from the parameter name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgCategory {
    Integer,
    Address,
    ProcessID,
    MachPort,
}

impl ArgCategory {
    /// Symbol the harness expects in `arg_type_array`.
    pub fn c_symbol(self) -> &'static str {
        match self {
            ArgCategory::Integer => "INT",
            ArgCategory::Address => "ADDRESS",
            ArgCategory::ProcessID => "PID",
            // mach ports are fuzzed as addresses
            ArgCategory::MachPort => "ADDRESS",
        }
    }
}

impl Display for ArgCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgCategory::Integer => {
                write!(f, "Integer",)
            }
            ArgCategory::Address => {
                write!(f, "Address",)
            }
            ArgCategory::ProcessID => {
                write!(f, "ProcessID",)
            }
            ArgCategory::MachPort => {
                write!(f, "MachPort",)
            }
        }
    }
}

/// Value generator the harness calls for an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationStrategy {
    GenerateInt,
    GeneratePointer,
    GeneratePID,
    GenerateMachPort,
}

impl GenerationStrategy {
    pub fn function_name(self) -> &'static str {
        match self {
            GenerationStrategy::GenerateInt => "generate_int",
            GenerationStrategy::GeneratePointer => "generate_ptr",
            GenerationStrategy::GeneratePID => "generate_pid",
            GenerationStrategy::GenerateMachPort => "generate_mach_port",
        }
    }
}

impl From<ArgCategory> for GenerationStrategy {
    fn from(category: ArgCategory) -> Self {
        match category {
            ArgCategory::Integer => GenerationStrategy::GenerateInt,
            ArgCategory::Address => GenerationStrategy::GeneratePointer,
            ArgCategory::ProcessID => GenerationStrategy::GeneratePID,
            ArgCategory::MachPort => GenerationStrategy::GenerateMachPort,
        }
    }
}

impl Display for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub category: ArgCategory,
    pub strategy: GenerationStrategy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    /// declaration as written in the table, e.g. `const struct timespec *rqtp`
    pub declaration: String,
    /// declaration with the parameter name stripped and whitespace normalized
    pub declared_type: String,
    pub category: Option<ArgCategory>,
    pub strategy: Option<GenerationStrategy>,
    pub symbol: &'static str,
}

impl Argument {
    pub fn is_resolved(&self) -> bool {
        self.strategy.is_some()
    }
}

/// One syscall ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallEntry {
    pub number: u32,
    pub name: String,
    pub return_type: String,
    pub return_category: Option<ArgCategory>,
    pub arguments: Vec<Argument>,
    pub total_args: usize,
}

impl SyscallEntry {
    pub fn file_name(&self) -> String {
        format!("{}.c", entry_symbol(&self.name))
    }

    pub fn unresolved_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|argument| !argument.is_resolved())
    }
}

/// `read` -> `entry_read`, the symbol every generated artifact refers to.
pub fn entry_symbol(name: &str) -> String {
    format!("entry_{name}")
}

/// A row of the dispatch table aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchSlot {
    pub symbol: String,
    pub index: usize,
}

/// An argument type the classifier did not recognize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownType {
    pub syscall: String,
    pub type_text: String,
}
