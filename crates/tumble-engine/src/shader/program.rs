use crate::error::LinkError;

use super::compile::{CompiledShader, ShaderStage};

/// A uniform visible to a linked program.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformInfo {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub is_mat4: bool,
    pub in_vertex: bool,
    pub in_fragment: bool,
}

/// A vertex + fragment pair whose interfaces have been checked against each other.
///
/// Attribute and uniform locations can only be queried here, so nothing can
/// look them up before linking succeeded.
#[derive(Debug, Clone)]
pub struct Program {
    vertex: CompiledShader,
    fragment: CompiledShader,
    uniforms: Vec<UniformInfo>,
}

impl Program {
    #[inline]
    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    #[inline]
    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    /// Shader location of the named vertex attribute.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.vertex
            .inputs()
            .iter()
            .find(|v| v.name.as_deref() == Some(name))
            .map(|v| v.location)
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformInfo> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    /// Uniforms sorted by `(group, binding)`.
    #[inline]
    pub fn uniforms(&self) -> &[UniformInfo] {
        &self.uniforms
    }
}

/// Links a vertex and a fragment stage into a [`Program`].
///
/// Every fragment input must be written by the vertex stage at the same
/// location with the same type. Failures are logged and returned.
pub fn link(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<Program, LinkError> {
    link_inner(vertex, fragment).inspect_err(|e| log::error!("program link failed: {e}"))
}

fn link_inner(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<Program, LinkError> {
    expect_stage(vertex, ShaderStage::Vertex)?;
    expect_stage(fragment, ShaderStage::Fragment)?;

    for input in fragment.inputs() {
        let Some(output) = vertex.outputs().iter().find(|o| o.location == input.location) else {
            return Err(LinkError::MissingVarying { location: input.location });
        };
        if output.ty != input.ty {
            return Err(LinkError::VaryingTypeMismatch { location: input.location });
        }
    }

    let mut uniforms: Vec<UniformInfo> = Vec::new();
    for (stage, shader) in [(ShaderStage::Vertex, vertex), (ShaderStage::Fragment, fragment)] {
        for u in shader.uniforms() {
            let idx = match uniforms.iter().position(|x| x.group == u.group && x.binding == u.binding) {
                Some(i) => i,
                None => {
                    uniforms.push(UniformInfo {
                        name: u.name.clone(),
                        group: u.group,
                        binding: u.binding,
                        is_mat4: u.is_mat4,
                        in_vertex: false,
                        in_fragment: false,
                    });
                    uniforms.len() - 1
                }
            };
            let slot = &mut uniforms[idx];
            match stage {
                ShaderStage::Vertex => slot.in_vertex = true,
                ShaderStage::Fragment => slot.in_fragment = true,
            }
        }
    }
    uniforms.sort_by_key(|u| (u.group, u.binding));

    log::debug!(
        "linked program `{}` + `{}` ({} uniforms)",
        vertex.entry_point(),
        fragment.entry_point(),
        uniforms.len()
    );

    Ok(Program {
        vertex: vertex.clone(),
        fragment: fragment.clone(),
        uniforms,
    })
}

fn expect_stage(shader: &CompiledShader, expected: ShaderStage) -> Result<(), LinkError> {
    if shader.stage() == expected {
        Ok(())
    } else {
        Err(LinkError::StageMismatch { expected, found: shader.stage() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{compile, COLOR_FRAGMENT, FLAT_VERTEX, SCENE_VERTEX};

    fn vs(src: &str) -> CompiledShader {
        compile(src, ShaderStage::Vertex).unwrap()
    }

    fn fs(src: &str) -> CompiledShader {
        compile(src, ShaderStage::Fragment).unwrap()
    }

    #[test]
    fn scene_program_exposes_locations() {
        let program = link(&vs(SCENE_VERTEX), &fs(COLOR_FRAGMENT)).unwrap();
        assert_eq!(program.attribute_location("position"), Some(0));
        assert_eq!(program.attribute_location("color"), Some(1));
        assert_eq!(program.attribute_location("normal"), None);

        let world = program.uniform("u_world").unwrap();
        assert!(world.in_vertex && !world.in_fragment);
        let bindings: Vec<_> = program.uniforms().iter().map(|u| u.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2]);
    }

    #[test]
    fn flat_program_links() {
        let program = link(&vs(FLAT_VERTEX), &fs(COLOR_FRAGMENT)).unwrap();
        assert!(program.uniform("u_view").is_none());
    }

    #[test]
    fn swapped_stages_are_rejected() {
        let err = link(&fs(COLOR_FRAGMENT), &fs(COLOR_FRAGMENT)).unwrap_err();
        assert_eq!(
            err,
            LinkError::StageMismatch { expected: ShaderStage::Vertex, found: ShaderStage::Fragment }
        );
    }

    #[test]
    fn missing_varying_is_rejected() {
        let src = "@fragment fn fs_main(@location(3) c: vec3<f32>) -> @location(0) vec4<f32> { return vec4<f32>(c, 1.0); }";
        let err = link(&vs(SCENE_VERTEX), &fs(src)).unwrap_err();
        assert_eq!(err, LinkError::MissingVarying { location: 3 });
    }

    #[test]
    fn mismatched_varying_type_is_rejected() {
        let src = "@fragment fn fs_main(@location(0) c: vec4<f32>) -> @location(0) vec4<f32> { return c; }";
        let err = link(&vs(SCENE_VERTEX), &fs(src)).unwrap_err();
        assert_eq!(err, LinkError::VaryingTypeMismatch { location: 0 });
    }
}
