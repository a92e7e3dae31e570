use std::{collections::BTreeMap, io};

use indoc::indoc;

use crate::writer::Sink;

mod arguments;
mod entry;

/// A small FreeBSD style table: two placeholders, one obsolete slot without
/// a prototype and a prototype spread over a continuation line.
pub const FREEBSD_TABLE: &str = indoc! {r#"
    ; System call name/number master file.
    #include <sys/param.h>

    0	AUE_NULL	STD	{ int nosys(void); } syscall nosys_args int
    1	AUE_EXIT	STD	{ void sys_exit(int rval); } exit sys_exit_args void
    2	AUE_FORK	STD	{ int fork(void); }
    ; the next one is split over two lines
    3	AUE_READ	STD	{ ssize_t read(int fd, void *buf, \
    		    size_t nbyte); }
    4	AUE_NULL	OBSOL	old_creat
    5	AUE_NULL	ALL	{ int enosys(void); }
    6	AUE_WAIT4	STD	{ int wait4(pid_t pid, int *status, int options, struct rusage *rusage); }
"#};

#[derive(Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn file(&self, name: &str) -> &str {
        self.files
            .get(name)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("{name} was not written"))
    }
}

impl Sink for MemorySink {
    fn persist(&mut self, file_name: &str, contents: &[u8]) -> io::Result<()> {
        self.files.insert(
            file_name.to_string(),
            String::from_utf8_lossy(contents).into_owned(),
        );
        Ok(())
    }
}

/// Refuses every write.
pub struct FullDisk;

impl Sink for FullDisk {
    fn persist(&mut self, _file_name: &str, _contents: &[u8]) -> io::Result<()> {
        Err(io::Error::other("no space left on device"))
    }
}
