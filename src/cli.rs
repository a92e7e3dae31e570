use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::entry::UnknownTypePolicy;

#[derive(Parser, Debug)]
#[command(
    about = "entrygen turns a syscall.master table into syscall entries for the fuzzer.",
    version
)]
pub struct EntrygenArgs {
    /// operating system to generate syscall entries for, defaults to the host
    #[arg(long = "os", value_enum)]
    pub os: Option<Platform>,

    /// directory holding the <os>-syscall.master tables
    #[arg(short = 'i', long = "input-dir", default_value = "input")]
    pub input_dir: PathBuf,

    /// read this syscall table instead of the one in the input directory
    #[arg(short = 't', long = "table")]
    pub table: Option<PathBuf>,

    /// directory the per-platform output directory is created in
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// skip syscalls that have arguments of unrecognized types
    #[arg(long)]
    pub strict: bool,

    /// provide a summary table at the end of generation
    #[arg(short = 'c', long)]
    pub summary: bool,

    /// year written into the generated file headers
    #[arg(long)]
    pub year: Option<i64>,
}

impl EntrygenArgs {
    pub fn table_path(&self, platform: Platform) -> PathBuf {
        match &self.table {
            Some(table) => table.clone(),
            None => self.input_dir.join(platform.table_file_name()),
        }
    }

    pub fn unknown_type_policy(&self) -> UnknownTypePolicy {
        if self.strict {
            UnknownTypePolicy::Reject
        } else {
            UnknownTypePolicy::Emit
        }
    }
}

/// Platforms that ship a syscall table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    #[value(name = "freebsd")]
    FreeBsd,
    #[value(name = "darwin", alias = "osx", alias = "macos")]
    Darwin,
}

impl Platform {
    /// The platform this binary runs on, if it has a table.
    pub fn host() -> Option<Platform> {
        if cfg!(target_os = "freebsd") {
            Some(Platform::FreeBsd)
        } else if cfg!(target_os = "macos") {
            Some(Platform::Darwin)
        } else {
            None
        }
    }

    /// Also the name of the output directory.
    pub fn name(self) -> &'static str {
        match self {
            Platform::FreeBsd => "freebsd",
            Platform::Darwin => "darwin",
        }
    }

    pub fn table_file_name(self) -> &'static str {
        match self {
            Platform::FreeBsd => "freebsd-syscall.master",
            Platform::Darwin => "osx-syscall.master",
        }
    }

    pub fn dispatch_table_file_name(self) -> String {
        format!("{}_table.h", self.name())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
