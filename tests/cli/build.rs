use anyhow::Result;
#[cfg(feature = "catalog")]
use polib::message::MessageView;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

const MESSAGES: &str = "export const m = {\n  hello: () => \"Hello, World!\",\n};\n";

fn dictionary(test: &CliTest, path: &str) -> Result<Value> {
    Ok(serde_json::from_str(&test.read_file(path)?)?)
}

#[test]
fn test_build_writes_source_dictionary() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Extracted 1 message (1 unique) from 1 file"));

    assert_eq!(
        dictionary(&test, "locales/en.json")?,
        serde_json::json!({ "0a0a9f2a67": "Hello, World!" })
    );

    Ok(())
}

#[test]
fn test_build_rewrites_sources_into_out_dir() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;

    let output = test.build_command().args(["--out-dir", "dist"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("dist/src/messages.ts")?,
        "import { translate } from \"@msgkey/runtime\";\nexport const m = {\n  hello: () => translate(\"0a0a9f2a67\"),\n};\n"
    );
    // Originals are untouched
    assert_eq!(test.read_file("src/messages.ts")?, MESSAGES);

    Ok(())
}

#[cfg(feature = "catalog")]
#[test]
fn test_build_template_and_locale_catalogs() -> Result<()> {
    let test = CliTest::with_file(
        "src/messages.ts",
        r#"export const m = {
  /** Button label */
  save: () => "Save",
  greet: (name: string) => "Hello, " + name,
};
"#,
    )?;
    test.write_file(".msgkeyrc.json", r#"{ "locales": ["en", "es"] }"#)?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let template = test.read_catalog("locales/messages.pot")?;
    let save = template.find_message(None, "Save", None).unwrap();
    assert_eq!(save.comments(), "Button label");
    assert!(save.source().starts_with("src/messages.ts:3:"));
    assert_eq!(save.msgstr().ok(), Some(""));

    let catalog = test.read_catalog("locales/es.po")?;
    assert_eq!(catalog.metadata.language, "es");
    assert!(catalog.find_message(None, "Save", None).is_some());

    // Untranslated entries fall back to the source text
    let compiled = dictionary(&test, "locales/es.json")?;
    let source = dictionary(&test, "locales/en.json")?;
    assert_eq!(compiled, source);
    assert!(!test.root().join("locales/en.po").exists());

    Ok(())
}

#[cfg(feature = "catalog")]
#[test]
fn test_build_keeps_translations_across_rebuilds() -> Result<()> {
    let test = CliTest::with_file(
        "src/messages.ts",
        "export const m = { save: () => \"Save\" };\n",
    )?;
    test.write_file(".msgkeyrc.json", r#"{ "locales": ["es"] }"#)?;
    test.write_file(
        "locales/es.po",
        r#"msgid ""
msgstr ""
"Language: es\n"
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Save"
msgstr "Guardar"
"#,
    )?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let compiled = dictionary(&test, "locales/es.json")?;
    let values: Vec<&str> = compiled
        .as_object()
        .into_iter()
        .flat_map(|map| map.values())
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(values, vec!["Guardar"]);

    // A second build leaves the translation in place
    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let catalog = test.read_catalog("locales/es.po")?;
    let save = catalog.find_message(None, "Save", None).unwrap();
    assert_eq!(save.msgstr().ok(), Some("Guardar"));

    Ok(())
}

#[cfg(feature = "catalog")]
#[test]
fn test_build_does_not_replace_unreadable_catalog() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;
    test.write_file(".msgkeyrc.json", r#"{ "locales": ["es"] }"#)?;
    test.write_file("locales/es.po/keep.txt", "not a catalog")?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains("es.po"),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(test.read_file("locales/es.po/keep.txt")?, "not a catalog");

    Ok(())
}

#[test]
fn test_build_reports_unparsable_files() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;
    test.write_file("src/broken.ts", "export const = {")?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("1 file could not be parsed (use -v for details)"));
    // The remaining files are still processed
    assert!(test.root().join("locales/en.json").exists());

    let output = test.build_command().arg("-v").output()?;
    assert!(stderr(&output).contains("src/broken.ts"));

    Ok(())
}

#[test]
fn test_build_skips_ignored_and_test_files() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;
    test.write_file(
        "src/messages.test.ts",
        "export const t = { other: () => \"Only in tests\" };\n",
    )?;
    test.write_file(
        "src/generated/extra.ts",
        "export const g = { other: () => \"Generated\" };\n",
    )?;
    test.write_file(".msgkeyrc.json", r#"{ "ignores": ["**/generated/**"] }"#)?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let source = dictionary(&test, "locales/en.json")?;
    assert_eq!(source.as_object().map(|m| m.len()), Some(1));

    Ok(())
}

#[test]
fn test_build_invalid_config() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;
    test.write_file(".msgkeyrc.json", r#"{ "hashLength": 64 }"#)?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error:"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let help = stdout(&output);
    for command in ["build", "merge", "init"] {
        assert!(help.contains(command), "help should list {command}");
    }

    Ok(())
}
