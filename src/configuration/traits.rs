use miette::Result;

/// Represents a configuration table that can be validated or resolved,
/// where that process requires some additional context
/// (e.g. already-resolved base paths to expand placeholders against).
pub trait ResolvableConfigurationWithContext {
    type Context;
    type Resolved;

    /// Resolve the configuration into its `Resolved` type.
    /// If the resolution / validation fails, you may return `Err` to indicate
    /// that the configuration is invalid.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved>;
}
