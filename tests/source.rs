extern crate oclutil;
extern crate tempfile;

use std::fs;
use std::io::Write;

use oclutil::load_program_source;

const KERNEL: &str = "__kernel void vector_add(__global const int *a,
                                __global const int *b,
                                __global int *c)
{
    int i = get_global_id(0);
    c[i] = a[i] + b[i];
}
";

#[test]
fn loads_whole_file()
{
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(KERNEL.as_bytes()).unwrap();

    let source = load_program_source(file.path()).unwrap();
    assert_eq!(source.as_str(), Some(KERNEL));
    assert_eq!(source.len(), KERNEL.len());
}

#[test]
fn empty_file_is_present_but_empty()
{
    let file = tempfile::NamedTempFile::new().unwrap();

    let source = load_program_source(file.path()).expect("empty file should load");
    assert!(source.is_empty());
    assert_eq!(source.len(), 0);
}

#[test]
fn missing_file_is_absent()
{
    let dir = tempfile::tempdir().unwrap();
    assert!(load_program_source(dir.path().join("missing.cl")).is_none());
}

#[test]
fn directory_is_absent()
{
    let dir = tempfile::tempdir().unwrap();
    assert!(load_program_source(dir.path()).is_none());
}

#[test]
fn length_counts_bytes()
{
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comment.cl");
    fs::write(&path, "// µ\n").unwrap();

    let source = load_program_source(&path).unwrap();
    assert_eq!(source.len(), 6);
    assert_eq!(source.into_bytes(), "// µ\n".as_bytes());
}

#[test]
fn non_utf8_bytes_are_kept_verbatim()
{
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.cl");
    fs::write(&path, b"// caf\xe9\n").unwrap();

    let source = load_program_source(&path).unwrap();
    assert_eq!(source.len(), 8);
    assert_eq!(source.as_bytes(), b"// caf\xe9\n");
    assert!(source.as_str().is_none());
}
