use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use log::{debug, info};

use crate::{
    cli::Platform,
    template::{Scope, TextTemplate},
    types::{entry_symbol, ArgCategory, DispatchSlot, GenerationStrategy, SyscallEntry},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template {
    Entry,
    SyscallList,
    SyscallTable,
    Copyright,
    Warning,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::Entry => "entry",
            Template::SyscallList => "syscall_list",
            Template::SyscallTable => "syscall_table",
            Template::Copyright => "copyright",
            Template::Warning => "warning",
        }
    }

    /// File the template is read from in the input directory.
    pub fn file_name(self) -> String {
        format!("{}.txt", self.name())
    }

    fn builtin(self) -> &'static str {
        match self {
            Template::Entry => include_str!("../templates/entry.txt"),
            Template::SyscallList => include_str!("../templates/syscall_list.txt"),
            Template::SyscallTable => include_str!("../templates/syscall_table.txt"),
            Template::Copyright => include_str!("../templates/copyright.txt"),
            Template::Warning => include_str!("../templates/warning.txt"),
        }
    }
}

/// The data a template is filled with.
#[derive(Clone, Copy, Debug)]
pub enum RenderContext<'a> {
    Entry(&'a SyscallEntry),
    SyscallList(&'a [String]),
    SyscallTable {
        platform: Platform,
        slots: &'a [DispatchSlot],
    },
}

impl RenderContext<'_> {
    pub fn template(&self) -> Template {
        match self {
            RenderContext::Entry(_) => Template::Entry,
            RenderContext::SyscallList(_) => Template::SyscallList,
            RenderContext::SyscallTable { .. } => Template::SyscallTable,
        }
    }
}

pub trait Renderer {
    fn render(&self, context: &RenderContext<'_>, out: &mut dyn Write) -> io::Result<()>;
}

/// Persists rendered artifacts by file name.
pub trait Sink {
    fn persist(&mut self, file_name: &str, contents: &[u8]) -> io::Result<()>;
}

/// Writes every artifact into one directory, created up front.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn create(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create output directory {}", dir.display()))?;
        Ok(DirectorySink { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Sink for DirectorySink {
    fn persist(&mut self, file_name: &str, contents: &[u8]) -> io::Result<()> {
        fs::write(self.dir.join(file_name), contents)
    }
}

#[derive(Clone, Debug)]
pub struct TemplateSet {
    entry: TextTemplate,
    syscall_list: TextTemplate,
    syscall_table: TextTemplate,
    copyright: TextTemplate,
    warning: TextTemplate,
}

static BUILTIN_TEMPLATES: LazyLock<TemplateSet> = LazyLock::new(|| {
    TemplateSet::from_sources(|template| Ok(template.builtin().to_string()))
        .expect("built-in templates parse")
});

impl TemplateSet {
    fn from_sources(
        mut source: impl FnMut(Template) -> anyhow::Result<String>,
    ) -> anyhow::Result<TemplateSet> {
        let mut parse = |template: Template| -> anyhow::Result<TextTemplate> {
            let text = source(template)?;
            TextTemplate::parse(&text)
                .with_context(|| format!("could not parse the {} template", template.name()))
        };
        Ok(TemplateSet {
            entry: parse(Template::Entry)?,
            syscall_list: parse(Template::SyscallList)?,
            syscall_table: parse(Template::SyscallTable)?,
            copyright: parse(Template::Copyright)?,
            warning: parse(Template::Warning)?,
        })
    }

    /// Reads `<template>.txt` from `dir` for every template that has a file
    /// there. The others stay built in.
    pub fn load(dir: &Path) -> anyhow::Result<TemplateSet> {
        Self::from_sources(|template| {
            let path = dir.join(template.file_name());
            if !path.is_file() {
                debug!("no {}, using the built-in {} template", path.display(), template.name());
                return Ok(template.builtin().to_string());
            }
            info!("using template {}", path.display());
            fs::read_to_string(&path)
                .with_context(|| format!("could not read template {}", path.display()))
        })
    }

    pub fn get(&self, template: Template) -> &TextTemplate {
        match template {
            Template::Entry => &self.entry,
            Template::SyscallList => &self.syscall_list,
            Template::SyscallTable => &self.syscall_table,
            Template::Copyright => &self.copyright,
            Template::Warning => &self.warning,
        }
    }
}

/// Renders the C sources the fuzzing harness compiles from a [`TemplateSet`].
#[derive(Clone, Debug)]
pub struct CSourceRenderer {
    pub year: i64,
    templates: TemplateSet,
}

impl CSourceRenderer {
    pub fn builtin(year: i64) -> Self {
        CSourceRenderer {
            year,
            templates: BUILTIN_TEMPLATES.clone(),
        }
    }

    pub fn with_templates(year: i64, templates: TemplateSet) -> Self {
        CSourceRenderer { year, templates }
    }

    /// The fields every template, the shared headers included, can use.
    pub fn scope(&self, context: &RenderContext<'_>) -> Scope {
        let scope = Scope::default().text("year", self.year);
        match *context {
            RenderContext::Entry(entry) => entry_scope(scope, entry),
            RenderContext::SyscallList(symbols) => scope.list(
                "syscalls",
                symbols
                    .iter()
                    .map(|symbol| Scope::default().text("symbol", symbol))
                    .collect(),
            ),
            RenderContext::SyscallTable { platform, slots } => scope
                .text("platform", platform)
                .text("guard", format!("{}_TABLE_H", platform.name().to_uppercase()))
                .text("total_syscalls", slots.len())
                .list(
                    "syscalls",
                    slots
                        .iter()
                        .map(|slot| {
                            Scope::default()
                                .text("symbol", &slot.symbol)
                                .text("index", slot.index)
                        })
                        .collect(),
                ),
        }
    }
}

fn entry_scope(scope: Scope, entry: &SyscallEntry) -> Scope {
    let arguments = entry
        .arguments
        .iter()
        .map(|argument| {
            Scope::default()
                .text("arg_symbol", argument.symbol)
                .text("declaration", &argument.declaration)
                .text("declared_type", &argument.declared_type)
                .text("arg_type", argument.category.map_or("", ArgCategory::c_symbol))
                .text(
                    "get_arg",
                    argument
                        .strategy
                        .map_or("", GenerationStrategy::function_name),
                )
                .flag("resolved", argument.is_resolved())
        })
        .collect();
    scope
        .text("name", &entry.name)
        .text("symbol", entry_symbol(&entry.name))
        .text("number", entry.number)
        .text("status", "ON")
        .text("total_args", entry.total_args)
        .text("return_type", &entry.return_type)
        .text("ret_type", entry.return_category.map_or("", ArgCategory::c_symbol))
        .list("arguments", arguments)
}

impl Renderer for CSourceRenderer {
    fn render(&self, context: &RenderContext<'_>, out: &mut dyn Write) -> io::Result<()> {
        let scope = self.scope(context);
        let copyright = self.templates.copyright.render_to_string(&scope)?;
        let warning = self.templates.warning.render_to_string(&scope)?;
        let scope = scope.text("copyright", copyright).text("warning", warning);
        self.templates
            .get(context.template())
            .render(&scope, out)
    }
}

/// Year stamped into generated files: `SOURCE_DATE_EPOCH` when set, so builds
/// are reproducible, otherwise now.
pub fn generation_year() -> i64 {
    let seconds = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|epoch| epoch.trim().parse::<i64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| elapsed.as_secs() as i64)
        });
    year_from_unix_seconds(seconds)
}

/// Proleptic Gregorian year of a unix timestamp (UTC).
pub fn year_from_unix_seconds(seconds: i64) -> i64 {
    // days_from_civil inverse, http://howardhinnant.github.io/date_algorithms.html
    let days = seconds.div_euclid(86_400) + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let year = year_of_era + era * 400;
    // the shifted calendar starts in March
    if shifted_month >= 10 {
        year + 1
    } else {
        year
    }
}
