use crate::{
    entry::{
        assemble, check_entry, is_placeholder, parse_record, EntryError, ParsedRecord,
        UnknownTypePolicy, ARG_SYMBOLS,
    },
    record::{records, RawRecord},
    types::{ArgCategory, GenerationStrategy, SyscallEntry},
};

fn parse(text: &str) -> Result<ParsedRecord, EntryError> {
    let record: RawRecord = records(text).next().expect("the text holds a record");
    parse_record(&record)
}

fn parse_entry(text: &str) -> SyscallEntry {
    match parse(text) {
        Ok(ParsedRecord::Entry(entry)) => entry,
        other => panic!("expected an entry, got {other:?}"),
    }
}

#[test]
fn builds_an_entry_from_a_record() {
    let entry = parse_entry("5\tAUE_NULL\tALL\t{ int dummy_call(int a, char *b, pid_t c); }");

    assert_eq!(entry.number, 5);
    assert_eq!(entry.name, "dummy_call");
    assert_eq!(entry.return_type, "int");
    assert_eq!(entry.return_category, Some(ArgCategory::Integer));
    assert_eq!(entry.total_args, 3);
    assert_eq!(entry.file_name(), "entry_dummy_call.c");

    let declarations: Vec<&str> = entry
        .arguments
        .iter()
        .map(|argument| argument.declaration.as_str())
        .collect();
    assert_eq!(declarations, vec!["int a", "char *b", "pid_t c"]);

    let symbols: Vec<&str> = entry.arguments.iter().map(|argument| argument.symbol).collect();
    assert_eq!(symbols, vec!["FIRST_ARG", "SECOND_ARG", "THIRD_ARG"]);

    let categories: Vec<Option<ArgCategory>> =
        entry.arguments.iter().map(|argument| argument.category).collect();
    assert_eq!(
        categories,
        vec![
            Some(ArgCategory::Integer),
            Some(ArgCategory::Address),
            Some(ArgCategory::ProcessID)
        ]
    );
    let strategies: Vec<Option<GenerationStrategy>> =
        entry.arguments.iter().map(|argument| argument.strategy).collect();
    assert_eq!(
        strategies,
        vec![
            Some(GenerationStrategy::GenerateInt),
            Some(GenerationStrategy::GeneratePointer),
            Some(GenerationStrategy::GeneratePID)
        ]
    );
}

#[test]
fn space_separated_record() {
    let entry = parse_entry("5 AUE_NULL ALL { int dummy_call(int a, char *b, pid_t c); }");

    assert_eq!(entry.number, 5);
    assert_eq!(entry.name, "dummy_call");
    assert_eq!(entry.total_args, 3);
    let rendered: Vec<(Option<ArgCategory>, Option<GenerationStrategy>, &str)> = entry
        .arguments
        .iter()
        .map(|argument| (argument.category, argument.strategy, argument.symbol))
        .collect();
    assert_eq!(
        rendered,
        vec![
            (
                Some(ArgCategory::Integer),
                Some(GenerationStrategy::GenerateInt),
                "FIRST_ARG"
            ),
            (
                Some(ArgCategory::Address),
                Some(GenerationStrategy::GeneratePointer),
                "SECOND_ARG"
            ),
            (
                Some(ArgCategory::ProcessID),
                Some(GenerationStrategy::GeneratePID),
                "THIRD_ARG"
            ),
        ]
    );
}

#[test]
fn commented_out_prototype_after_an_obsolete_slot() {
    assert_eq!(
        parse("4 AUE_NULL OBSOL old_creat\n; see { int bogus(int a); }\n"),
        Ok(ParsedRecord::Malformed)
    );
}

#[test]
fn void_argument_lists_have_no_arguments() {
    for text in [
        "2\tAUE_FORK\tSTD\t{ int fork(void); }",
        "2\tAUE_FORK\tSTD\t{ int fork(); }",
        "2\tAUE_FORK\tSTD\t{ int fork( void ); }",
    ] {
        let entry = parse_entry(text);
        assert_eq!(entry.total_args, 0, "{text}");
        assert!(entry.arguments.is_empty(), "{text}");
    }
}

#[test]
fn void_return_has_no_category() {
    let entry = parse_entry("1\tAUE_EXIT\tSTD\t{ void sys_exit(int rval); }");
    assert_eq!(entry.return_type, "void");
    assert_eq!(entry.return_category, None);
}

#[test]
fn placeholders_are_recognized() {
    assert!(is_placeholder("nosys"));
    assert!(is_placeholder("enosys"));
    assert!(!is_placeholder("nosys2"));

    assert_eq!(
        parse("0\tAUE_NULL\tSTD\t{ int nosys(void); } syscall nosys_args int"),
        Ok(ParsedRecord::Placeholder {
            number: 0,
            name: "nosys".to_string()
        })
    );
    assert_eq!(
        parse("5\tAUE_NULL\tALL\t{ int enosys(void); }"),
        Ok(ParsedRecord::Placeholder {
            number: 5,
            name: "enosys".to_string()
        })
    );
}

#[test]
fn records_without_a_usable_prototype_are_malformed() {
    for text in [
        "4\tAUE_NULL\tOBSOL\told_creat",
        "8\tAUE_NULL\tSTD\t{ int; }",
        "9\tAUE_NULL\tSTD\t{ int broken(int a; }",
        "99999999999\tAUE_NULL\tSTD\t{ int huge(void); }",
    ] {
        assert_eq!(parse(text), Ok(ParsedRecord::Malformed), "{text}");
    }
}

#[test]
fn twelve_arguments_fill_every_symbol() {
    let declarations: Vec<String> = (0..12).map(|i| format!("int a{i}")).collect();
    let declarations: Vec<&str> = declarations.iter().map(String::as_str).collect();

    let entry = assemble(400, "wide", "int", &declarations, 12).expect("twelve fit");

    assert_eq!(entry.arguments.len(), 12);
    assert_eq!(entry.arguments[7].symbol, "EIGTH_ARG");
    assert_eq!(entry.arguments[11].symbol, "TWELFTH_ARG");
    assert_eq!(
        entry.arguments.iter().map(|a| a.symbol).collect::<Vec<_>>(),
        ARG_SYMBOLS.to_vec()
    );
}

#[test]
fn more_than_twelve_arguments_are_rejected() {
    let arguments: Vec<String> = (0..13).map(|i| format!("int a{i}")).collect();
    let text = format!("401\tAUE_NULL\tSTD\t{{ int wider({}); }}", arguments.join(", "));

    assert_eq!(
        parse(&text),
        Err(EntryError::TooManyArguments {
            syscall: "wider".to_string(),
            count: 13
        })
    );
}

#[test]
fn nested_commas_are_a_count_mismatch() {
    let result = parse(
        "416\tAUE_SIGACTION\tSTD\t{ int sigaction(int sig, void (*handler)(int, int), int flags); }",
    );
    assert_eq!(
        result,
        Err(EntryError::ArgumentCountMismatch {
            syscall: "sigaction".to_string(),
            counted: 4,
            tokenized: 3
        })
    );
}

#[test]
fn mismatch_is_checked_before_assembly() {
    assert_eq!(
        assemble(7, "short", "int", &["int a"], 2),
        Err(EntryError::ArgumentCountMismatch {
            syscall: "short".to_string(),
            counted: 2,
            tokenized: 1
        })
    );
}

#[test]
fn unknown_types_follow_the_policy() {
    let entry = parse_entry("500\tAUE_NULL\tSTD\t{ int frob(wibble_t w, int x); }");

    let unresolved: Vec<&str> = entry
        .unresolved_arguments()
        .map(|argument| argument.declared_type.as_str())
        .collect();
    assert_eq!(unresolved, vec!["wibble_t"]);
    assert_eq!(entry.arguments[0].symbol, "FIRST_ARG");
    assert_eq!(entry.arguments[1].symbol, "SECOND_ARG");

    assert_eq!(check_entry(&entry, UnknownTypePolicy::default()), Ok(()));
    let error = check_entry(&entry, UnknownTypePolicy::Reject).unwrap_err();
    assert_eq!(
        error,
        EntryError::UnresolvedArguments {
            syscall: "frob".to_string(),
            types: vec!["wibble_t".to_string()]
        }
    );
    assert_eq!(
        error.to_string(),
        "frob has arguments of unrecognized type: wibble_t"
    );
}

#[test]
fn resolved_entries_pass_either_policy() {
    let entry = parse_entry("3\tAUE_READ\tSTD\t{ ssize_t read(int fd, void *buf, size_t nbyte); }");
    assert_eq!(check_entry(&entry, UnknownTypePolicy::Emit), Ok(()));
    assert_eq!(check_entry(&entry, UnknownTypePolicy::Reject), Ok(()));
}

#[test]
fn errors_name_their_syscall() {
    let errors = [
        EntryError::TooManyArguments {
            syscall: "wider".to_string(),
            count: 13,
        },
        EntryError::DuplicateName {
            syscall: "fork".to_string(),
            number: 2,
        },
    ];
    assert_eq!(errors[0].syscall(), "wider");
    assert_eq!(
        errors[0].to_string(),
        "wider takes 13 arguments, at most 12 are supported"
    );
    assert_eq!(errors[1].syscall(), "fork");
    assert_eq!(errors[1].to_string(), "fork was already generated from syscall 2");
}
