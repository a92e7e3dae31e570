use crate::arguments::{
    count_arguments, is_void, pointer_arg_type, strip_annotations, strip_arg_name, tokenize,
};

#[test]
fn pointer_type_keeps_the_star() {
    assert_eq!(pointer_arg_type("char *pointer"), "char *");
    assert_eq!(pointer_arg_type("void **argv"), "void *");
    assert_eq!(pointer_arg_type("int fd"), "int fd");
}

#[test]
fn strips_argument_names() {
    assert_eq!(strip_arg_name("int fileport_makeport"), "int");
    assert_eq!(strip_arg_name("char *pointer"), "char *");
    assert_eq!(strip_arg_name("uid_t *uid"), "uid_t *");
    assert_eq!(strip_arg_name("struct shmid_ds *pointer"), "struct shmid_ds *");
    assert_eq!(strip_arg_name("const struct timespec *rqtp"), "const struct timespec *");
}

#[test]
fn strips_leading_whitespace() {
    // everything after the first comma of a list starts with a space
    assert_eq!(strip_arg_name(" pid_t c"), "pid_t");
    assert_eq!(strip_arg_name("  size_t nbyte "), "size_t");
    assert_eq!(strip_arg_name(" char *b"), "char *");
}

#[test]
fn tabs_separate_type_and_name() {
    assert_eq!(strip_arg_name("int\tnsems"), "int");
    assert_eq!(strip_arg_name("socklen_t\t*anamelen"), "socklen_t\t*");
    assert_eq!(strip_arg_name("struct\tmsqid_ds *buf"), "struct\tmsqid_ds *");
}

#[test]
fn drops_source_annotations() {
    assert_eq!(strip_annotations("_In_z_ const char *path"), "const char *path");
    assert_eq!(
        strip_annotations("_Out_writes_bytes_(nbyte) void *buf"),
        "void *buf"
    );
    assert_eq!(
        strip_annotations(" _Inout_ _Contains_long_ptr_ struct msghdr *msg"),
        "struct msghdr *msg"
    );
    assert_eq!(strip_annotations("int fd"), "int fd");
    assert_eq!(strip_annotations("__int64_t offset"), "__int64_t offset");

    assert_eq!(strip_arg_name("_In_z_ const char *path"), "const char *");
    assert_eq!(strip_arg_name(" _Out_writes_bytes_(nbyte) void *buf"), "void *");
    assert_eq!(strip_arg_name("_In_ int fd"), "int");
}

#[test]
fn annotation_arguments_may_nest() {
    assert_eq!(
        strip_annotations("_In_reads_bytes_(sizeof(struct foo)) int x"),
        "int x"
    );
    assert_eq!(strip_arg_name("_In_reads_bytes_(sizeof(struct foo)) int x"), "int");
    assert_eq!(
        strip_arg_name("_Out_writes_(MIN(len, (size_t)64)) _Contains_long_ptr_ char *buf"),
        "char *"
    );
    // an unbalanced argument is not an annotation
    assert_eq!(strip_annotations("_In_(len int x"), "_In_(len int x");
}

#[test]
fn void_lists_have_no_arguments() {
    assert!(is_void("void"));
    assert!(is_void(" void "));
    assert!(is_void(""));
    assert!(!is_void("void *addr"));

    assert_eq!(count_arguments("void"), 0);
    assert!(tokenize("void").is_empty());
    assert_eq!(count_arguments(""), 0);
    assert!(tokenize("").is_empty());
}

#[test]
fn count_matches_tokens() {
    for list in [
        "int fd",
        "int a, char *b, pid_t c",
        "int fd, void *buf, size_t nbyte",
        " int fd, _Out_writes_bytes_(nbyte) void *buf, size_t nbyte ",
        "user_addr_t path, int flags, int mode, user_addr_t xsecurity, int fd, int dpclass, int dpflags",
    ] {
        assert_eq!(count_arguments(list), tokenize(list).len(), "{list}");
    }
}

#[test]
fn tokens_keep_declaration_order() {
    assert_eq!(
        tokenize("int a, char *b, pid_t c"),
        vec!["int a", " char *b", " pid_t c"]
    );
}

#[test]
fn nested_commas_stay_inside_their_declaration() {
    let list = "int signum, void (*handler)(int, int), int flags";
    assert_eq!(
        tokenize(list),
        vec!["int signum", " void (*handler)(int, int)", " int flags"]
    );
    // the comma count is blind to nesting and disagrees
    assert_eq!(count_arguments(list), 4);
}
