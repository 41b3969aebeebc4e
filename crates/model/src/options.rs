//! Mount option parsing.

use crate::error::OptionsError;
use crate::mode::{FileMode, PERMISSION_MASK};

/// Root directory mode applied when the mount options do not set one.
pub const DEFAULT_ROOT_MODE: u32 = 0o755;

/// Immutable per-mount configuration produced by [`MountConfig::parse`].
///
/// Each mount owns exactly one of these; it is built once at mount time and
/// dropped once at unmount. There is no process-wide configuration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// Mode applied to the root directory.
    root_mode: FileMode,
}

impl MountConfig {
    /// Parse a comma-separated `key[=value]` option string.
    ///
    /// Recognized keys:
    /// - `mode` - octal permission bits for the root directory
    ///
    /// Empty tokens and unknown keys are ignored silently, as is a bare
    /// `mode` with no value. A `mode` value containing anything but octal
    /// digits is rejected; a well-formed value is masked to the permission
    /// bits (`0o7777`).
    ///
    /// # Arguments
    /// * `options` - Raw option string, or None when the mount passed no data
    ///
    /// # Returns
    /// The parsed configuration, with defaults filled in.
    pub fn parse(options: Option<&str>) -> Result<Self, OptionsError> {
        let mut root_mode: u32 = DEFAULT_ROOT_MODE;

        for token in options.unwrap_or("").split(',') {
            if token.is_empty() {
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            };
            match (key, value) {
                ("mode", Some(value)) => {
                    root_mode = parse_octal("mode", value)? & PERMISSION_MASK;
                }
                _ => {}
            }
        }

        Ok(Self {
            root_mode: FileMode::from_raw(root_mode),
        })
    }

    /// Mode applied to the root directory at mount time.
    pub fn root_mode(&self) -> FileMode {
        self.root_mode
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            root_mode: FileMode::from_raw(DEFAULT_ROOT_MODE),
        }
    }
}

/// Parse an octal numeral; every character must be an octal digit.
///
/// # Arguments
/// * `key` - Option key the value belongs to (for the error message)
/// * `value` - Raw value text
fn parse_octal(key: &'static str, value: &str) -> Result<u32, OptionsError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit() && b < b'8') {
        return Err(OptionsError::InvalidOctal {
            key,
            value: value.to_string(),
        });
    }
    u32::from_str_radix(value, 8).map_err(|_| OptionsError::InvalidOctal {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absent_options() {
        let config: MountConfig = MountConfig::parse(None).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o755));
    }

    #[test]
    fn test_parse_empty_string() {
        let config: MountConfig = MountConfig::parse(Some("")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o755));
    }

    #[test]
    fn test_parse_mode() {
        let config: MountConfig = MountConfig::parse(Some("mode=0700")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o700));
    }

    #[test]
    fn test_parse_mode_without_leading_zero() {
        let config: MountConfig = MountConfig::parse(Some("mode=755")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o755));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config: MountConfig = MountConfig::parse(Some("mode=755,foo=bar")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o755));
    }

    #[test]
    fn test_empty_tokens_skipped() {
        let config: MountConfig = MountConfig::parse(Some(",,mode=0700,,")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o700));
    }

    #[test]
    fn test_bare_mode_ignored() {
        // `mode` with no `=` never matches the recognized pattern and is
        // dropped like any other unknown token.
        let config: MountConfig = MountConfig::parse(Some("mode")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o755));
    }

    #[test]
    fn test_malformed_octal_rejected() {
        let result = MountConfig::parse(Some("mode=777x"));
        assert!(matches!(result, Err(OptionsError::InvalidOctal { .. })));
    }

    #[test]
    fn test_empty_mode_value_rejected() {
        let result = MountConfig::parse(Some("mode="));
        assert!(matches!(result, Err(OptionsError::InvalidOctal { .. })));
    }

    #[test]
    fn test_non_octal_digit_rejected() {
        let result = MountConfig::parse(Some("mode=8"));
        assert!(matches!(result, Err(OptionsError::InvalidOctal { .. })));
    }

    #[test]
    fn test_out_of_range_mode_masked() {
        // Values above 0o7777 keep only the permission bits.
        let config: MountConfig = MountConfig::parse(Some("mode=107755")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o7755));
    }

    #[test]
    fn test_later_mode_wins() {
        let config: MountConfig = MountConfig::parse(Some("mode=0700,mode=0750")).unwrap();
        assert_eq!(config.root_mode(), FileMode::from_raw(0o750));
    }
}
