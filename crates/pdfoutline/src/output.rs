use std::path::Path;

use serde::Serialize;

use crate::prelude::*;

/// Serialize `value` as JSON indented with four spaces. Non-ASCII text is
/// written as-is.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .wrap_err("failed to serialize output record")?;
    String::from_utf8(buf).wrap_err("serializer produced invalid UTF-8")
}

/// Write `value` to `path` as indented JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = to_json_pretty(value)?;
    std::fs::write(path, json).wrap_err_with(|| f!("failed to write {}", path.display()))
}
