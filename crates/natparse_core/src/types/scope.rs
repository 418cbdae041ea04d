//! Variable scopes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Declaration region of a variable.
///
/// ## Notes
/// - The derived ordering is the name resolution priority: `Global` is consulted first, `Independent` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableScope {
    Global,
    Parameter,
    Local,
    Independent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variable scope '{0}'")]
pub struct UnknownScope(pub String);

impl VariableScope {
    /// All scopes in resolution order.
    pub const ALL: [VariableScope; 4] = [
        VariableScope::Global,
        VariableScope::Parameter,
        VariableScope::Local,
        VariableScope::Independent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VariableScope::Global => "GLOBAL",
            VariableScope::Parameter => "PARAMETER",
            VariableScope::Local => "LOCAL",
            VariableScope::Independent => "INDEPENDENT",
        }
    }
}

impl fmt::Display for VariableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableScope::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownScope(s.to_string()))
    }
}
