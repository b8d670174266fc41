/// Returns `true` if `value` can stand as a single path component on every
/// platform a symbol store may run on.
///
/// Empty names, `.`, `..`, separators, NUL and drive/stream colons are refused.
pub fn is_single_component(value: &str) -> bool {
    !(value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0', ':']))
}
