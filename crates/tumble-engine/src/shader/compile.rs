use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Handle, Module, Type, TypeInner};

use crate::error::ShaderError;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// A user-defined stage input or output bound to a `@location`.
#[derive(Debug, Clone, PartialEq)]
pub struct Varying {
    pub name: Option<String>,
    pub location: u32,
    pub ty: TypeInner,
}

/// A uniform declared by a stage.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DeclaredUniform {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub is_mat4: bool,
}

/// One successfully parsed and validated stage.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    stage: ShaderStage,
    source: String,
    entry_point: String,
    inputs: Vec<Varying>,
    outputs: Vec<Varying>,
    uniforms: Vec<DeclaredUniform>,
}

impl CompiledShader {
    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Validated WGSL text, handed to the GPU when the program is created.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// `@location` inputs of the entry point (vertex attributes or fragment varyings).
    #[inline]
    pub fn inputs(&self) -> &[Varying] {
        &self.inputs
    }

    /// `@location` outputs of the entry point.
    #[inline]
    pub fn outputs(&self) -> &[Varying] {
        &self.outputs
    }

    #[inline]
    pub(crate) fn uniforms(&self) -> &[DeclaredUniform] {
        &self.uniforms
    }
}

/// Parses and validates `source` as a `stage` shader.
///
/// The source must contain exactly one entry point for `stage`; the first one
/// found is used. Diagnostics are logged and returned in the error.
pub fn compile(source: &str, stage: ShaderStage) -> Result<CompiledShader, ShaderError> {
    compile_inner(source, stage).inspect_err(|e| {
        log::error!("{} shader compile failed:\n{}", e.stage, e.diagnostics);
    })
}

fn compile_inner(source: &str, stage: ShaderStage) -> Result<CompiledShader, ShaderError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| ShaderError::new(stage, e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ShaderError::new(stage, e.as_inner().to_string()))?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.to_naga())
        .ok_or_else(|| ShaderError::new(stage, format!("no @{stage} entry point")))?;

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect_locations(&module, arg.ty, arg.name.as_ref(), arg.binding.as_ref(), &mut inputs);
    }

    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_locations(&module, result.ty, None, result.binding.as_ref(), &mut outputs);
    }

    let uniforms = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let rb = var.binding.as_ref()?;
            Some(DeclaredUniform {
                name: var.name.clone()?,
                group: rb.group,
                binding: rb.binding,
                is_mat4: is_mat4_f32(&module.types[var.ty].inner),
            })
        })
        .collect();

    log::debug!(
        "compiled {stage} shader `{}` ({} inputs, {} outputs)",
        entry.name,
        inputs.len(),
        outputs.len()
    );

    Ok(CompiledShader {
        stage,
        source: source.to_owned(),
        entry_point: entry.name.clone(),
        inputs,
        outputs,
        uniforms,
    })
}

/// Flattens an entry-point argument or result into its `@location` bindings.
///
/// Struct members are visited recursively; builtins are skipped.
fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    name: Option<&String>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    if let Some(Binding::Location { location, .. }) = binding {
        out.push(Varying {
            name: name.cloned(),
            location: *location,
            ty: module.types[ty].inner.clone(),
        });
        return;
    }

    if binding.is_none() {
        if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
            for m in members {
                collect_locations(module, m.ty, m.name.as_ref(), m.binding.as_ref(), out);
            }
        }
    }
}

fn is_mat4_f32(ty: &TypeInner) -> bool {
    matches!(
        ty,
        TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            scalar,
        } if *scalar == naga::Scalar::F32
    )
}
