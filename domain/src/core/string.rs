//! String utilities for the domain layer.

/// Split `input` on `delimiter`, keeping every segment (including empty ones).
///
/// Segments are returned root-first, in the order they appear. No validation
/// happens here; [`MemberPath`](crate::scripting::path::MemberPath) decides
/// what a well-formed path looks like.
pub fn explode(input: &str, delimiter: char) -> Vec<&str> {
    input.split(delimiter).collect()
}
