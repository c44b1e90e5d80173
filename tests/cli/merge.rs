use anyhow::Result;
use polib::message::MessageView;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const OLD: &str = r#"msgid ""
msgstr ""
"Language: es\n"

msgid "Save"
msgstr "Guardar"

msgid "Delete"
msgstr "Borrar"
"#;

const NEW: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Save"
msgstr ""

msgid "Open"
msgstr ""
"#;

#[test]
fn test_merge_in_place() -> Result<()> {
    let test = CliTest::with_file("es.po", OLD)?;
    test.write_file("messages.pot", NEW)?;

    let output = test
        .merge_command()
        .args(["es.po", "messages.pot"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Merged catalog written to es.po"));

    let merged = test.read_catalog("es.po")?;
    assert_eq!(merged.metadata.language, "es");
    assert!(!merged.metadata.po_revision_date.is_empty());

    let save = merged.find_message(None, "Save", None).unwrap();
    assert_eq!(save.msgstr().ok(), Some("Guardar"));
    let open = merged.find_message(None, "Open", None).unwrap();
    assert_eq!(open.msgstr().ok(), Some(""));
    let delete = merged.find_message(None, "Delete", None).unwrap();
    assert!(delete.flags().contains("obsolete"));
    assert_eq!(delete.msgstr().ok(), Some("Borrar"));

    Ok(())
}

#[test]
fn test_merge_to_output() -> Result<()> {
    let test = CliTest::with_file("es.po", OLD)?;
    test.write_file("messages.pot", NEW)?;

    let output = test
        .merge_command()
        .args(["es.po", "messages.pot", "-o", "out/es.po"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(test.read_file("es.po")?, OLD);

    let merged = test.read_catalog("out/es.po")?;
    let save = merged.find_message(None, "Save", None).unwrap();
    assert_eq!(save.msgstr().ok(), Some("Guardar"));

    Ok(())
}

#[test]
fn test_merge_rejects_directory_catalog() -> Result<()> {
    let test = CliTest::with_file("es.po/keep.txt", "not a catalog")?;
    test.write_file("messages.pot", NEW)?;

    let output = test
        .merge_command()
        .args(["es.po", "messages.pot"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read catalog: es.po is not a file"));
    assert_eq!(test.read_file("es.po/keep.txt")?, "not a catalog");

    Ok(())
}

#[test]
fn test_merge_missing_file() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .merge_command()
        .args(["es.po", "messages.pot"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read catalog: es.po"));

    Ok(())
}
