/// Splits a path or pattern into its non-empty `/`-separated parts.
///
/// Empty parts are dropped, so leading, trailing and doubled slashes
/// disappear. A part starting with `*` consumes the rest of the path:
/// it is kept and everything after it is ignored.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = vec![];
    for part in pattern.split('/').filter(|part| !part.is_empty()) {
        parts.push(part);
        if part.starts_with('*') {
            break;
        }
    }
    parts
}
