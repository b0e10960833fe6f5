//! Out-of-band data a session carries for its actions.

/// Offset/context provider for one parse.
///
/// - `base_offset`: where the parsed text begins inside the master document.
///   Every span handed to an action is shifted by it.
/// - `default_module`: identifier substituted when a production omits an
///   optional explicit module name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseContext {
    base_offset: usize,
    default_module: Option<String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_offset(mut self, offset: usize) -> Self {
        self.base_offset = offset;
        self
    }

    pub fn default_module(mut self, name: impl Into<String>) -> Self {
        self.default_module = Some(name.into());
        self
    }

    pub fn get_base_offset(&self) -> usize {
        self.base_offset
    }

    pub fn get_default_module(&self) -> Option<&str> {
        self.default_module.as_deref()
    }
}
