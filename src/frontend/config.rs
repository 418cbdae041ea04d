//! Front end configuration
//!
//! Switches for what the pipeline reports. Nothing here changes what is accepted: a module parses to the same tree
//! under every configuration.

use natparse_core::FileKind;
use natparse_syntax::parser::ParseOptions;

/// Front end configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Report references to undeclared variables (warnings)
    pub report_unresolved_variables: bool,
    /// Check that REDEFINE members fit into the redefined variable
    pub check_redefinition_sizes: bool,
    /// Keep at most this many diagnostics per module
    pub max_diagnostics: Option<usize>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            report_unresolved_variables: true,
            check_redefinition_sizes: true,
            max_diagnostics: None,
        }
    }
}

impl FrontendConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unresolved_variables(mut self, report: bool) -> Self {
        self.report_unresolved_variables = report;
        self
    }

    pub fn with_redefinition_sizes(mut self, check: bool) -> Self {
        self.check_redefinition_sizes = check;
        self
    }

    pub fn with_max_diagnostics(mut self, max: Option<usize>) -> Self {
        self.max_diagnostics = max;
        self
    }

    /// Parser options for a module of `kind`.
    pub fn parse_options(&self, kind: FileKind) -> ParseOptions {
        ParseOptions::new(kind).with_unresolved_variables(self.report_unresolved_variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FrontendConfig::default();
        assert!(config.report_unresolved_variables);
        assert!(config.check_redefinition_sizes);
        assert_eq!(config.max_diagnostics, None);
    }

    #[test]
    fn test_builder_chaining() {
        let config = FrontendConfig::new()
            .with_unresolved_variables(false)
            .with_redefinition_sizes(false)
            .with_max_diagnostics(Some(10));
        assert!(!config.report_unresolved_variables);
        assert!(!config.check_redefinition_sizes);
        assert_eq!(config.max_diagnostics, Some(10));
    }

    #[test]
    fn test_parse_options_follow_config() {
        let options = FrontendConfig::new()
            .with_unresolved_variables(false)
            .parse_options(FileKind::Subprogram);
        assert_eq!(options.file_kind, FileKind::Subprogram);
        assert!(!options.report_unresolved_variables);
    }
}
