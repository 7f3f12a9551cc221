//! Utility functions

/// Converts a nul-terminated buffer filled in by the driver into a `String`.
///
/// Everything from the first nul byte on is dropped; invalid UTF-8 is
/// replaced rather than rejected.
pub fn c_string(mut buf: Vec<u8>) -> String {
    if let Some(end) = buf.iter().position(|&b| b == 0) {
        buf.truncate(end);
    }
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Integer megabytes, rounded down.
pub fn mbytes(bytes: u64) -> u64 {
    bytes / (1024 * 1024)
}

/// Integer kilobytes, rounded down.
pub fn kbytes(bytes: u64) -> u64 {
    bytes / 1024
}
