//! Command interpreter integration tests

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use impress_attrmap::Registries;
use impress_fna::{Renamer, Result, RunError, Runner};
use rstest::rstest;

const MK_V2: &str = "{x=2;x=1;z=Z;z=Y;y=Why}";
const MK_V3: &str = "[x=2; x=1; z=Z; z=Y; y=Why]";
const F1V3: &str = "What? [a=Paul Penman; isbn=9780123456786; edition=2; date=2007]";
const D1: &str = "/home/sfc/books/What? [isbn=9780123456786; edition=2; a=Paul Penman; date=2007].pdf";
const D1V3: &str = "/home/sfc/books/What? [a=Paul Penman; isbn=9780123456786; edition=2; date=2007].pdf";

type Renames = Rc<RefCell<Vec<(PathBuf, PathBuf)>>>;

/// Records renames instead of touching the file system.
#[derive(Default)]
struct RecordingRenamer {
    renames: Renames,
}

impl Renamer for RecordingRenamer {
    fn rename(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.renames
            .borrow_mut()
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }
}

fn fna_with(tokens: &[&str], renames: Renames) -> (Result<()>, String) {
    let renamer = RecordingRenamer { renames };
    let mut runner = Runner::new(Registries::standard(), Vec::new()).with_renamer(Box::new(renamer));
    let result = runner.run(tokens.iter().copied());
    let out = String::from_utf8(runner.into_output()).unwrap();
    (result, out)
}

fn fna(tokens: &[&str]) -> (Result<()>, String) {
    fna_with(tokens, Renames::default())
}

fn fna_ok(tokens: &[&str]) -> String {
    let (result, out) = fna(tokens);
    if let Err(e) = result {
        panic!("{tokens:?} failed: {e}");
    }
    out
}

// === Attribute editing ===

#[rstest]
#[case(&["decode", MK_V3], "[x=2; x=1; z=Z; z=Y; y=Why]\n")]
#[case(&["decode", MK_V3, "delete", "a,z"], "[x=2; x=1; y=Why]\n")]
#[case(&["decode", MK_V3, "extract", "w,x"], "[x=2; x=1]\n")]
#[case(&["decode", MK_V3, "order", "y,z"], "[y=Why; z=Z; z=Y; x=2; x=1]\n")]
#[case(&["decode", MK_V3, "order", "--all"], "[x=2; x=1; y=Why; z=Z; z=Y]\n")]
#[case(&["decode", MK_V3, "remove", "y", "Why"], "[x=2; x=1; z=Z; z=Y]\n")]
#[case(&["decode", MK_V3, "remove", "x", "3"], "[x=2; x=1; z=Z; z=Y; y=Why]\n")]
#[case(&["decode", MK_V3, "set", "x", "7"], "[z=Z; z=Y; y=Why; x=7]\n")]
#[case(&["decode", MK_V3, "sort", "--all"], "[x=1; x=2; z=Y; z=Z; y=Why]\n")]
#[case(&["decode", MK_V3, "sort", "w,x,y"], "[x=1; x=2; z=Z; z=Y; y=Why]\n")]
fn test_editing(#[case] tokens: &[&str], #[case] expected: &str) {
    assert_eq!(fna_ok(tokens), expected);
}

#[test]
fn test_add_and_set() {
    let out = fna_ok(&["add", "y", "7", "set", "y", "8", "add", "y", "9", "set", "x", "7"]);
    assert_eq!(out, "[y=8; y=9; x=7]\n");
}

#[test]
fn test_order_moves_title_into_bracket() {
    let out = fna_ok(&["raw", "add", "a", "b", "add", "title", "T", "order", "a,title"]);
    assert_eq!(out, "[a=b; title=T]\n");
    let again = fna_ok(&["raw", "decode", out.trim_end(), "encode"]);
    assert_eq!(again, out);
}

#[test]
fn test_add_normalizes_isbn() {
    assert_eq!(fna_ok(&["add", "isbn", "1234567890"]), "[isbn=9781234567897]\n");
}

#[test]
fn test_empty_run() {
    assert_eq!(fna_ok(&[]), "");
}

// === Codecs and modes ===

#[test]
fn test_decoder() {
    let out = fna_ok(&["decoder", "v2", "decode", "Mr. Book {a=Paul Penman;lccn=89-456}"]);
    assert_eq!(out, "Mr. Book [a=Paul Penman; lccn=89000456]\n");
}

#[test]
fn test_coder_shortcut_sets_both() {
    assert_eq!(fna_ok(&["v2", "decode", MK_V2, "v3"]), format!("{MK_V3}\n"));
    assert_eq!(fna_ok(&["decode", MK_V3, "v2", "encode"]), format!("{MK_V2}\n"));
}

#[test]
fn test_encoder() {
    let out = fna_ok(&["decode", MK_V3, "encoder", "v2", "encode"]);
    assert_eq!(out, format!("{MK_V2}\n"));
}

#[test]
fn test_encode_clears_report() {
    assert_eq!(fna_ok(&["decode", MK_V3, "encode"]), format!("{MK_V3}\n"));
}

#[test]
fn test_json_encoder() {
    let out = fna_ok(&["decode", "[b=2; a=1]", "json", "encode"]);
    assert_eq!(out, "{\"a\":[\"1\"],\"b\":[\"2\"]}\n");
}

#[test]
fn test_encoder_unknown() {
    let (result, out) = fna(&["encoder", "lalala"]);
    let message = result.unwrap_err().to_string();
    assert!(message.starts_with("encoder: "), "{message}");
    assert!(message.contains("expected one of"), "{message}");
    assert_eq!(out, "");
}

#[rstest]
#[case(&["mode", "long"])]
#[case(&["long"])]
fn test_mode(#[case] select: &[&str]) {
    let mut tokens = vec!["decode", "Title [a=Author; isbn=9780123456786]"];
    tokens.extend_from_slice(select);
    tokens.push("encode");
    assert_eq!(fna_ok(&tokens), "Title [a=Author; isbn=urn:isbn:9780123456786]\n");
}

#[rstest]
#[case(&["factory", "raw", "add", "isbn", "7"])]
#[case(&["raw", "add", "isbn", "7"])]
fn test_factory(#[case] tokens: &[&str]) {
    assert_eq!(fna_ok(tokens), "[isbn=7]\n");
}

#[test]
fn test_strict_factory_rejects_unknown_key() {
    let (result, out) = fna(&["strict", "add", "colour", "red"]);
    assert!(matches!(result, Err(RunError::Command { ref command, .. }) if command == "add"));
    assert_eq!(out, "");
}

// === File names ===

#[test]
fn test_file_report_is_path() {
    let out = fna_ok(&["file", D1, "order", "title,a,isbn,edition"]);
    assert_eq!(out, format!("{D1V3}\n"));
}

#[test]
fn test_filename() {
    let out = fna_ok(&["file", D1, "order", "title,a,isbn,edition", "quiet", "filename"]);
    assert_eq!(out, format!("{D1V3}\n"));
}

#[test]
fn test_compare_different() {
    let out = fna_ok(&["file", D1, "order", "title,a,isbn,edition", "quiet", "compare"]);
    assert_eq!(out, format!("{D1}\n{D1V3}\n"));
}

#[test]
fn test_compare_same() {
    assert_eq!(fna_ok(&["file", D1V3, "quiet", "compare"]), "");
}

#[rstest]
#[case(&["dir", "/blah"], "/blah/whatever.jpg\n")]
#[case(&["suffix", "png"], "whatever.png\n")]
#[case(&["suffix", ".png"], "whatever.png\n")]
fn test_file_parts(#[case] edit: &[&str], #[case] expected: &str) {
    let mut tokens = vec!["file", "whatever.jpg"];
    tokens.extend_from_slice(edit);
    assert_eq!(fna_ok(&tokens), expected);
}

#[test]
fn test_rename() {
    let renames = Renames::default();
    let (result, out) = fna_with(&["file", D1, "order", "title,a,isbn,edition", "rename"], renames.clone());
    assert!(result.is_ok());
    assert_eq!(out, "");
    assert_eq!(
        renames.borrow().as_slice(),
        &[(PathBuf::from(D1), PathBuf::from(D1V3))]
    );
}

#[test]
fn test_rename_unchanged_is_skipped() {
    let renames = Renames::default();
    let (result, _) = fna_with(&["file", D1V3, "quiet", "rename"], renames.clone());
    assert!(result.is_ok());
    assert!(renames.borrow().is_empty());
}

#[test]
fn test_rename_needs_file() {
    let (result, _) = fna(&["decode", MK_V3, "rename"]);
    assert!(matches!(result, Err(RunError::NoFile { ref command }) if command == "rename"));
}

#[test]
fn test_rename_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let from = dir.path().join("Book [isbn=0123456789].txt");
    std::fs::write(&from, "text").unwrap();
    let from_arg = from.to_string_lossy().into_owned();

    let mut runner = Runner::new(Registries::standard(), Vec::new());
    runner.run(["file", from_arg.as_str(), "rename"]).unwrap();

    let to = dir.path().join("Book [isbn=9780123456786].txt");
    assert!(!from.exists());
    assert_eq!(std::fs::read_to_string(to).unwrap(), "text");
}

// === URIs and URLs ===

#[test]
fn test_uri() {
    assert_eq!(fna_ok(&["decode", F1V3, "quiet", "uri"]), "urn:isbn:9780123456786\n");
}

#[rstest]
#[case("T [doi=10.1234/5678-90; a=George]", "https://doi.org/10.1234/5678-90\n")]
#[case(
    "T [doi=10.1234/5678-90; lccn=89456]",
    "https://doi.org/10.1234/5678-90\nhttps://lccn.loc.gov/89456\n"
)]
#[case(F1V3, "")]
fn test_url(#[case] decoded: &str, #[case] expected: &str) {
    assert_eq!(fna_ok(&["decode", decoded, "quiet", "url"]), expected);
}

#[test]
fn test_url_from_text() {
    assert_eq!(fna_ok(&["add", "asdf", "what/a/thing", "url"]), "http://what/a/thing\n");
}

// === Errors ===

#[test]
fn test_missing_argument() {
    let (result, out) = fna(&["add"]);
    assert_eq!(result.unwrap_err().to_string(), "add: expected key");
    assert_eq!(out, "");
}

#[test]
fn test_unknown_command() {
    let (result, out) = fna(&["probably not a command name"]);
    assert!(result.unwrap_err().to_string().contains("probably not"));
    assert_eq!(out, "");
}

#[test]
fn test_error_keeps_earlier_output() {
    let (result, out) = fna(&["decode", MK_V3, "encode", "bogus"]);
    assert!(matches!(result, Err(RunError::UnknownCommand(_))));
    assert_eq!(out, format!("{MK_V3}\n"));
}

// === Help ===

#[test]
fn test_help_lists_commands() {
    let out = fna_ok(&["help"]);
    assert!(out.contains("COMMANDS"));
    for name in ["add", "compare", "rename", "uri", "url"] {
        assert!(out.contains(&format!("  {name} ")), "{name}");
    }
}

#[test]
fn test_help_one() {
    let out = fna_ok(&["help", "help"]);
    assert!(out.contains("Show information"));
    assert!(!out.contains("COMMANDS"));
}

#[test]
fn test_help_unknown_command() {
    let out = fna_ok(&["help", "asdfjkl"]);
    assert!(out.starts_with("No help available for asdfjkl\n\n"));
    assert!(out.contains("COMMANDS"));
}
