/// `(void)` and `()` both declare no arguments.
pub fn is_void(argument_list: &str) -> bool {
    let trimmed = argument_list.trim();
    trimmed.is_empty() || trimmed == "void"
}

/// Argument count as the number of commas plus one. Deliberately blind to
/// nesting, so it can be checked against what [`tokenize`] produces.
pub fn count_arguments(argument_list: &str) -> usize {
    if is_void(argument_list) {
        return 0;
    }
    argument_list.matches(',').count() + 1
}

/// Splits an argument list on the commas that are not inside parentheses.
pub fn tokenize(argument_list: &str) -> Vec<&str> {
    if is_void(argument_list) {
        return Vec::new();
    }

    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut segment_start = 0;
    for (index, c) in argument_list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                declarations.push(&argument_list[segment_start..index]);
                segment_start = index + 1;
            }
            _ => {}
        }
    }
    declarations.push(&argument_list[segment_start..]);
    declarations
}

/// Drops leading FreeBSD source annotations such as `_In_z_`,
/// `_Contains_long_ptr_` or `_In_reads_bytes_(sizeof(struct foo))`.
pub fn strip_annotations(declaration: &str) -> &str {
    let mut rest = declaration;
    let mut stripped = false;
    while let Some(after) = annotation_end(rest.trim_start()) {
        rest = after.trim_start();
        stripped = true;
    }
    if stripped {
        rest
    } else {
        declaration
    }
}

// what follows one annotation and the whitespace that must close it
fn annotation_end(text: &str) -> Option<&str> {
    let word_len = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    let word = &text[..word_len];
    if word.len() < 2 || !word.starts_with('_') || !word.ends_with('_') {
        return None;
    }

    let mut rest = &text[word_len..];
    if rest.starts_with('(') {
        let mut depth = 0usize;
        let close = rest.char_indices().find_map(|(index, c)| {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                _ => {}
            }
            None
        })?;
        rest = &rest[close + 1..];
    }
    rest.starts_with(char::is_whitespace).then_some(rest)
}

/// Everything up to and including the first `*`.
pub fn pointer_arg_type(declaration: &str) -> &str {
    match declaration.find('*') {
        Some(star) => &declaration[..=star],
        None => declaration,
    }
}

/// Drops the parameter name from a declaration and leaves the type.
///
/// Pointer declarations end at their first `*` (`char *pointer` -> `char *`).
/// Anything else keeps its first whitespace-delimited token
/// (`int fileport_makeport` -> `int`), so multi-word scalar types lose their
/// tail. The result still needs [`crate::type_map::normalize_type`] before
/// lookup.
pub fn strip_arg_name(declaration: &str) -> &str {
    let declaration = strip_annotations(declaration);
    if declaration.contains('*') {
        return pointer_arg_type(declaration).trim();
    }
    declaration.split_whitespace().next().unwrap_or_default()
}
