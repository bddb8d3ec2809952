/// Device names Windows refuses as filenames regardless of extension.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

/// Result of sanitizing an upload filename.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Nothing usable is left after sanitizing.
    Empty,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Invalid filename: no safe characters left after sanitizing",
        }
    }
}

/// Turn a client-supplied filename into a flat, safe storage key.
///
/// Directory separators become word breaks, whitespace runs become `_`,
/// everything outside `[A-Za-z0-9_.-]` is dropped and leading/trailing
/// `.`/`_` are trimmed. The result never contains a path component, so
/// `../../etc/passwd` becomes `etc_passwd`.
pub fn secure_filename(filename: &str) -> Result<String, FilenameError> {
    let spaced: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if matches!(c, '/' | '\\') { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    let stem = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
    {
        return Ok(format!("_{trimmed}"));
    }

    Ok(trimmed.to_string())
}
