use crate::Result;

/// Format string content collector.
pub trait Visitor {
    /// Finished parser output.
    type Output;

    /// Collect static content.
    ///
    /// Static content may arrive in several chunks, escaped braces are split at.
    fn visit_static(&mut self, source: &str) -> Result<()>;

    /// Collect placeholder content, without the braces.
    fn visit_expr(&mut self, source: &str) -> Result<()>;

    /// Visitor output.
    fn finish(self) -> Result<Self::Output>;
}
