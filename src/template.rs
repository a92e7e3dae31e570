use std::{collections::HashMap, fmt::Display, io::Write, sync::LazyLock};

use regex::Regex;

// `{{field}}`, `{{#section}}`, `{{^inverted}}` and `{{/section}}`
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([#^/]?)\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("template tag pattern is valid")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    UnclosedSection(String),
    UnexpectedClose(String),
    UnknownField(String),
    NotText(String),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::UnclosedSection(name) => write!(f, "section `{name}` is never closed"),
            TemplateError::UnexpectedClose(name) => {
                write!(f, "`{{{{/{name}}}}}` closes a section that is not open")
            }
            TemplateError::UnknownField(name) => write!(f, "unknown field `{name}`"),
            TemplateError::NotText(name) => write!(f, "`{name}` is a section, not text"),
        }
    }
}

impl std::error::Error for TemplateError {}

/// What a field of a [`Scope`] holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Flag(bool),
    List(Vec<Scope>),
}

/// Named values a template is rendered against. Sections push the scope of
/// each list item, lookups fall back to the enclosing scopes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    fields: HashMap<&'static str, Value>,
}

impl Scope {
    pub fn text(mut self, key: &'static str, value: impl ToString) -> Self {
        self.fields.insert(key, Value::Text(value.to_string()));
        self
    }

    pub fn flag(mut self, key: &'static str, value: bool) -> Self {
        self.fields.insert(key, Value::Flag(value));
        self
    }

    pub fn list(mut self, key: &'static str, items: Vec<Scope>) -> Self {
        self.fields.insert(key, Value::List(items));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Text(String),
    Field(String),
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

/// A parsed template file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTemplate {
    nodes: Vec<Node>,
}

struct OpenSection {
    name: String,
    inverted: bool,
    children: Vec<Node>,
}

impl TextTemplate {
    /// Section tags alone on their line take the whole line with them, so
    /// loops over C initializers leave no blank lines behind.
    pub fn parse(source: &str) -> Result<TextTemplate, TemplateError> {
        let mut root = Vec::new();
        let mut open: Vec<OpenSection> = Vec::new();
        let mut cursor = 0;

        for tag in TAG.captures_iter(source) {
            let (Some(whole), Some(sigil), Some(name)) = (tag.get(0), tag.get(1), tag.get(2)) else {
                continue;
            };
            let sigil = sigil.as_str();
            let name = name.as_str().to_string();

            let (text_end, next_cursor) = if sigil.is_empty() {
                (whole.start(), whole.end())
            } else {
                standalone_line(source, cursor, whole.start(), whole.end())
                    .unwrap_or((whole.start(), whole.end()))
            };

            let nodes = match open.last_mut() {
                Some(section) => &mut section.children,
                None => &mut root,
            };
            if text_end > cursor {
                nodes.push(Node::Text(source[cursor..text_end].to_string()));
            }
            cursor = next_cursor;

            match sigil {
                "#" | "^" => open.push(OpenSection {
                    name,
                    inverted: sigil == "^",
                    children: Vec::new(),
                }),
                "/" => {
                    let section = match open.pop() {
                        Some(section) if section.name == name => section,
                        _ => return Err(TemplateError::UnexpectedClose(name)),
                    };
                    let parent = match open.last_mut() {
                        Some(parent) => &mut parent.children,
                        None => &mut root,
                    };
                    parent.push(Node::Section {
                        name: section.name,
                        inverted: section.inverted,
                        children: section.children,
                    });
                }
                _ => nodes.push(Node::Field(name)),
            }
        }

        if let Some(section) = open.pop() {
            return Err(TemplateError::UnclosedSection(section.name));
        }
        if cursor < source.len() {
            root.push(Node::Text(source[cursor..].to_string()));
        }
        Ok(TextTemplate { nodes: root })
    }

    pub fn render(&self, scope: &Scope, out: &mut dyn Write) -> std::io::Result<()> {
        let mut stack = vec![scope];
        render_nodes(&self.nodes, &mut stack, out)
    }

    pub fn render_to_string(&self, scope: &Scope) -> std::io::Result<String> {
        let mut out = Vec::new();
        self.render(scope, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

// (end of the text before the tag's line, start of the line after it)
fn standalone_line(source: &str, cursor: usize, start: usize, end: usize) -> Option<(usize, usize)> {
    let line_start = source[..start].rfind('\n').map_or(0, |newline| newline + 1);
    let line_end = source[end..]
        .find('\n')
        .map_or(source.len(), |newline| end + newline + 1);
    let alone = line_start >= cursor
        && source[line_start..start].trim().is_empty()
        && source[end..line_end].trim().is_empty();
    alone.then_some((line_start, line_end))
}

fn lookup<'a>(stack: &[&'a Scope], name: &str) -> Result<&'a Value, TemplateError> {
    stack
        .iter()
        .rev()
        .find_map(|scope| scope.get(name))
        .ok_or_else(|| TemplateError::UnknownField(name.to_string()))
}

fn render_nodes<'a>(
    nodes: &'a [Node],
    stack: &mut Vec<&'a Scope>,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    for node in nodes {
        match node {
            Node::Text(text) => out.write_all(text.as_bytes())?,
            Node::Field(name) => match lookup(stack, name).map_err(std::io::Error::other)? {
                Value::Text(text) => out.write_all(text.as_bytes())?,
                _ => return Err(std::io::Error::other(TemplateError::NotText(name.clone()))),
            },
            Node::Section {
                name,
                inverted,
                children,
            } => match lookup(stack, name).map_err(std::io::Error::other)? {
                Value::List(items) if !inverted => {
                    for item in items {
                        stack.push(item);
                        let rendered = render_nodes(children, stack, out);
                        stack.pop();
                        rendered?;
                    }
                }
                Value::List(items) => {
                    if items.is_empty() {
                        render_nodes(children, stack, out)?;
                    }
                }
                Value::Flag(set) => {
                    if set != inverted {
                        render_nodes(children, stack, out)?;
                    }
                }
                Value::Text(text) => {
                    if text.is_empty() == *inverted {
                        render_nodes(children, stack, out)?;
                    }
                }
            },
        }
    }
    Ok(())
}
