//! Import tables and class-name expansion over the PHP fixtures.
//!
//! The fixtures cover the supported shapes: no namespace, bracketed
//! namespaces, a statement namespace, two namespaces in one unit, non-type
//! imports and group imports.

use once_cell::sync::Lazy;
use rstest::rstest;
use use_statements::{ImportTable, SourceSet, TypeIdentity, UseStatements};

static USES: Lazy<UseStatements<SourceSet>> = Lazy::new(|| {
    let sources = SourceSet::new();
    sources.add_file("noNamespace.php", include_str!("fixtures/noNamespace.php"));
    sources.add_file(
        "bracketedNamespace.php",
        include_str!("fixtures/bracketedNamespace.php"),
    );
    sources.add_file("inNamespace.php", include_str!("fixtures/inNamespace.php"));
    sources.add_file("twoBlocks.php", include_str!("fixtures/twoBlocks.php"));
    sources.add_file("nonClassUse.php", include_str!("fixtures/nonClassUse.php"));
    sources.add_file("groupUse.php", include_str!("fixtures/groupUse.php"));
    UseStatements::new(sources)
});

fn ty(name: &str) -> TypeIdentity {
    TypeIdentity::parse(name).unwrap()
}

fn expand(reference: &str, declaring: &str) -> String {
    USES.expand_class_name(reference, &ty(declaring)).unwrap()
}

fn table(entries: &[(&str, &str)]) -> ImportTable {
    entries.iter().copied().collect()
}

#[test]
fn test_no_namespace() {
    assert_eq!(expand("A", "NoNamespace"), "A");
    assert_eq!(expand("C", "NoNamespace"), "A\\B");
    assert_eq!(expand("BTest", "BTest"), "BTest");
}

#[rstest]
#[case("self")]
#[case("Self")]
#[case("static")]
#[case("$this")]
fn test_declaring_type_keywords(#[case] keyword: &str) {
    assert_eq!(expand(keyword, "Test\\Space\\Foo"), "Test\\Space\\Foo");
}

#[rstest]
#[case("String")]
#[case("string")]
#[case("int")]
#[case("float")]
#[case("bool")]
#[case("array")]
#[case("callable")]
fn test_builtin_types(#[case] builtin: &str) {
    assert_eq!(expand(builtin, "Test\\Space\\Foo"), builtin.to_lowercase());
}

/// Each case gives the expansion inside `Foo` (no imports) and inside `Bar`.
#[rstest]
#[case("\\Absolute", "Absolute", "Absolute")]
#[case("\\Absolute\\Foo", "Absolute\\Foo", "Absolute\\Foo")]
#[case("AAA", "Test\\Space\\AAA", "AAA")]
#[case("AAA\\Foo", "Test\\Space\\AAA\\Foo", "AAA\\Foo")]
#[case("B", "Test\\Space\\B", "BBB")]
#[case("B\\Foo", "Test\\Space\\B\\Foo", "BBB\\Foo")]
#[case("DDD", "Test\\Space\\DDD", "CCC\\DDD")]
#[case("DDD\\Foo", "Test\\Space\\DDD\\Foo", "CCC\\DDD\\Foo")]
#[case("F", "Test\\Space\\F", "EEE\\FFF")]
#[case("F\\Foo", "Test\\Space\\F\\Foo", "EEE\\FFF\\Foo")]
#[case("HHH", "Test\\Space\\HHH", "Test\\Space\\HHH")]
#[case("Notdef", "Test\\Space\\Notdef", "Test\\Space\\Notdef")]
#[case("Notdef\\Foo", "Test\\Space\\Notdef\\Foo", "Test\\Space\\Notdef\\Foo")]
#[case("G", "Test\\Space\\G", "GGG")]
#[case("G\\Foo", "Test\\Space\\G\\Foo", "GGG\\Foo")]
#[case("Iii", "Test\\Space\\Iii", "Test\\Space\\Iii")]
fn test_alias_expansion(#[case] reference: &str, #[case] in_foo: &str, #[case] in_bar: &str) {
    assert_eq!(expand(reference, "Test\\Space\\Foo"), in_foo, "Foo: {reference}");
    assert_eq!(expand(reference, "Test\\Space\\Bar"), in_bar, "Bar: {reference}");
}

#[test]
fn test_import_tables() {
    assert_eq!(*USES.import_table(&ty("NoNamespace")), table(&[("C", "A\\B")]));
    assert_eq!(*USES.import_table(&ty("Test\\Space\\Foo")), ImportTable::new());
    assert_eq!(
        *USES.import_table(&ty("Test\\Space\\Bar")),
        table(&[
            ("AAA", "AAA"),
            ("B", "BBB"),
            ("DDD", "CCC\\DDD"),
            ("F", "EEE\\FFF"),
            ("G", "GGG"),
        ])
    );
    assert_eq!(*USES.import_table(&ty("stdClass")), ImportTable::new());
}

#[test]
fn test_bar_table_keeps_declaration_order() {
    let bar = USES.import_table(&ty("Test\\Space\\Bar"));
    let aliases: Vec<_> = bar.iter().map(|(alias, _)| alias).collect();
    assert_eq!(aliases, ["AAA", "B", "DDD", "F", "G"]);
}

#[test]
fn test_second_namespace_block_starts_clean() {
    assert_eq!(
        *USES.import_table(&ty("First\\Block\\TwoBlocksA")),
        table(&[("Logger", "Shared\\Logger")])
    );
    assert!(USES.import_table(&ty("Second\\Block\\TwoBlocksB")).is_empty());
    assert_eq!(expand("Logger", "Second\\Block\\TwoBlocksB"), "Second\\Block\\Logger");
}

#[test]
fn test_non_class_use() {
    assert!(USES.import_table(&ty("NonClassUseTest")).is_empty());
}

#[test]
fn test_group_use() {
    assert_eq!(
        *USES.import_table(&ty("GroupUseTest")),
        table(&[
            ("A", "A\\B\\A"),
            ("C", "A\\B\\B\\C"),
            ("D", "A\\B\\C"),
            ("E", "D\\E"),
        ])
    );
}

#[test]
fn test_type_without_source_resolves_relative() {
    let ghost = "Test\\Space\\Ghost";
    assert!(USES.import_table(&ty(ghost)).is_empty());
    assert_eq!(expand("B\\Foo", ghost), "Test\\Space\\B\\Foo");
}
