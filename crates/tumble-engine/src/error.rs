//! Error taxonomy for the rendering path.
//!
//! Shader and link failures are returned to the caller as values; the
//! functions producing them also log the diagnostics at `error` level.

use std::fmt;

use crate::shader::ShaderStage;

/// A shader stage failed to parse or validate.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderError {
    pub stage: ShaderStage,
    /// Human-readable diagnostics (may span several lines).
    pub diagnostics: String,
}

impl ShaderError {
    pub(crate) fn new(stage: ShaderStage, diagnostics: impl Into<String>) -> Self {
        Self { stage, diagnostics: diagnostics.into() }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader failed to compile: {}", self.stage, self.diagnostics)
    }
}

impl std::error::Error for ShaderError {}

/// Linking two compiled stages (or binding attributes to the linked program) failed.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkError {
    /// A stage was passed in the wrong slot.
    StageMismatch { expected: ShaderStage, found: ShaderStage },
    /// The fragment stage reads a location the vertex stage never writes.
    MissingVarying { location: u32 },
    /// Vertex output and fragment input disagree on the type at `location`.
    VaryingTypeMismatch { location: u32 },
    /// An attribute binding names an input the vertex stage does not declare.
    UnknownAttribute(String),
    /// The (component type, count, normalized) triple has no GPU vertex format.
    UnsupportedAttributeFormat { name: String, components: u32 },
    /// Only `mat4x4<f32>` uniforms in group 0 can be bound.
    UnsupportedUniform(String),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::StageMismatch { expected, found } => {
                write!(f, "expected a {expected} stage, found a {found} stage")
            }
            LinkError::MissingVarying { location } => {
                write!(f, "fragment input at location {location} is not written by the vertex stage")
            }
            LinkError::VaryingTypeMismatch { location } => {
                write!(f, "vertex output and fragment input types differ at location {location}")
            }
            LinkError::UnknownAttribute(name) => {
                write!(f, "vertex stage declares no attribute named `{name}`")
            }
            LinkError::UnsupportedAttributeFormat { name, components } => {
                write!(f, "attribute `{name}` has no vertex format for {components} components")
            }
            LinkError::UnsupportedUniform(name) => {
                write!(f, "uniform `{name}` is not a group-0 mat4x4<f32>")
            }
        }
    }
}

impl std::error::Error for LinkError {}

/// Top-level error for GPU setup and rendering.
#[derive(Debug)]
pub enum RenderError {
    /// The named surface cannot provide the required graphics capability.
    ContextUnavailable(String),
    ShaderCompile(ShaderError),
    Link(LinkError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ContextUnavailable(reason) => {
                write!(f, "graphics context unavailable: {reason}")
            }
            RenderError::ShaderCompile(e) => e.fmt(f),
            RenderError::Link(e) => write!(f, "program link failed: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ContextUnavailable(_) => None,
            RenderError::ShaderCompile(e) => Some(e),
            RenderError::Link(e) => Some(e),
        }
    }
}

impl From<ShaderError> for RenderError {
    fn from(e: ShaderError) -> Self {
        RenderError::ShaderCompile(e)
    }
}

impl From<LinkError> for RenderError {
    fn from(e: LinkError) -> Self {
        RenderError::Link(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_error_names_stage() {
        let e = ShaderError::new(ShaderStage::Fragment, "expected `;`");
        assert_eq!(e.to_string(), "fragment shader failed to compile: expected `;`");
    }

    #[test]
    fn render_error_exposes_source() {
        use std::error::Error as _;

        let e = RenderError::from(LinkError::MissingVarying { location: 0 });
        assert!(e.source().is_some());
        assert!(RenderError::ContextUnavailable("no adapter".into()).source().is_none());
    }
}
