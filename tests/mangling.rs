use proptest::collection;
use test_strategy::proptest;
use wgsl_rewriter::symbol::is_identifier;
use wgsl_rewriter::transform::mangling::{mangle_name, to_identifier, unmangle_name};

#[proptest]
fn mangle_proptest(
    #[strategy(collection::vec("[a-z]([a-z0-9_])*", 1..=3))] prefix: Vec<String>,
    #[strategy("[a-z]([a-z0-9_])*")] name: String,
) {
    let mangled = mangle_name(&prefix, &name);
    let unmangled = unmangle_name(&mangled);
    assert_eq!(prefix, unmangled.prefix);
    assert_eq!(name, unmangled.name);
}

#[proptest]
fn prefixed_names_are_identifiers(
    #[strategy(collection::vec("[a-z]([a-z0-9_])*", 1..=3))] prefix: Vec<String>,
    #[strategy("_?[a-zA-Z]([a-zA-Z0-9_])*")] name: String,
) {
    assert!(is_identifier(&mangle_name(&prefix, &name)));
}

#[proptest]
fn renamed_names_are_identifiers(
    #[strategy(collection::vec("[a-z]([a-z0-9_])*", 0..=3))] prefix: Vec<String>,
    #[strategy("_*[a-zA-Z0-9]([a-zA-Z0-9_])*")] name: String,
) {
    assert!(is_identifier(&to_identifier(mangle_name(&prefix, &name))));
}

#[proptest]
fn distinct_inputs_stay_distinct(
    #[strategy(collection::vec("[a-z]([a-z0-9_]){0,3}", 1..=2))] a: Vec<String>,
    #[strategy(collection::vec("[a-z]([a-z0-9_]){0,3}", 1..=2))] b: Vec<String>,
) {
    let (a_prefix, a_name) = a.split_at(a.len() - 1);
    let (b_prefix, b_name) = b.split_at(b.len() - 1);
    if a != b {
        assert_ne!(
            mangle_name(a_prefix, &a_name[0]),
            mangle_name(b_prefix, &b_name[0])
        );
    }
}
