//! Cloner configuration

/// Options for a `Cloner`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Maximum container nesting depth; `None` is unbounded
    pub max_depth: Option<usize>,
}

impl CloneOptions {
    /// Default options (unbounded depth)
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `DepthExceeded` instead of recursing past `depth` containers
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
