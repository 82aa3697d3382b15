/// Separator used to split a textual path into segments.
pub const DEFAULT_FIELD_SEPARATOR: &str = ".";

/// Indent width used by the pretty printing JSON serializer.
pub const DEFAULT_PRETTY_INDENT: usize = 2;

/// Extension of the sibling file a file engine writes before renaming.
pub const TEMP_FILE_EXTENSION: &str = "tmp";
