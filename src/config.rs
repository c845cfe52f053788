/// Default capacity of the read buffer (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Options resolved once when a [`FastqReader`](crate::FastqReader) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Initial buffer capacity. The buffer still grows when a single record
    /// does not fit.
    pub buffer_size: usize,
    /// Reject `+` lines whose content is not a copy of the record name.
    pub check_separator: bool,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub fn check_separator(mut self, yes: bool) -> Self {
        self.check_separator = yes;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            check_separator: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert!(!config.check_separator);
    }

    #[test]
    fn test_zero_buffer_size_is_clamped() {
        let config = ReaderConfig::new().buffer_size(0).check_separator(true);
        assert_eq!(config.buffer_size, 1);
        assert!(config.check_separator);
    }
}
