use std::sync::LazyLock;

use regex::Regex;

// a syscall number at the start of a line opens a record
static RECORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[0-9]+").expect("record start pattern is valid"));

/// The text of one syscall record, from its leading number up to the next
/// line that starts with a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRecord<'a> {
    text: &'a str,
    number_len: usize,
}

impl<'a> RawRecord<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// `None` when the leading digits do not fit a syscall number.
    pub fn number(&self) -> Option<u32> {
        self.text[..self.number_len].parse().ok()
    }

    pub fn prototype(&self) -> Option<Prototype> {
        Prototype::extract(self.text)
    }
}

/// Lazily walks a syscall table. Cloning it restarts from the clone point.
#[derive(Clone, Debug)]
pub struct Records<'a> {
    table: &'a str,
    position: usize,
}

pub fn records(table: &str) -> Records<'_> {
    Records { table, position: 0 }
}

impl<'a> Iterator for Records<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = RECORD_START.find_at(self.table, self.position)?;
        let end = RECORD_START
            .find_at(self.table, start.end())
            .map_or(self.table.len(), |next| next.start());
        self.position = end;
        Some(RawRecord {
            text: &self.table[start.start()..end],
            number_len: start.len(),
        })
    }
}

/// The braced C prototype of a record, folded onto a single line:
/// `{ int read(int fd, char *buf, size_t nbyte); }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prototype {
    text: String,
}

impl Prototype {
    /// Takes the first `{ ... }` span of a record. The first `}` closes it.
    /// Braces on `;` and `#` comment lines do not count.
    pub fn extract(record: &str) -> Option<Prototype> {
        let mut offset = 0;
        let mut open = None;
        for line in record.split_inclusive('\n') {
            if !is_comment(line) {
                if let Some(brace) = line.find('{') {
                    open = Some(offset + brace);
                    break;
                }
            }
            offset += line.len();
        }
        let open = open?;
        let close = open + record[open..].find('}')?;
        let text = record[open..=close]
            .lines()
            .filter(|line| !is_comment(line))
            .map(|line| line.trim().trim_end_matches('\\').trim_end())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Some(Prototype { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// First token after the opening brace, taken verbatim.
    pub fn return_type(&self) -> &str {
        let body = self.text.strip_prefix('{').unwrap_or(&self.text).trim_start();
        body.split(char::is_whitespace).next().unwrap_or_default()
    }

    /// The identifier right before the argument list's opening parenthesis.
    pub fn name(&self) -> Option<&str> {
        let paren = self.text.find('(')?;
        let before = self.text[..paren].trim_end();
        let start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
            .last()
            .map(|(index, _)| index)?;
        Some(&before[start..])
    }

    /// Text between the first `(` and the `)` that balances it.
    pub fn argument_list(&self) -> Option<&str> {
        let open = self.text.find('(')?;
        let mut depth = 0usize;
        for (offset, c) in self.text[open..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&self.text[open + 1..open + offset]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

fn is_comment(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with(';') || line.starts_with('#')
}
