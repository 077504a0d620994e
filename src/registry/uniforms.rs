//! Automatic Uniforms
//!
//! Automatic uniforms are values the renderer supplies every frame (camera
//! matrices, viewport, frame number, ...). Shaders reference them by their
//! reserved `czm_` name without declaring them; the declaration is generated
//! on demand when the assembler finds a reference.

/// GLSL data type of an automatic uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformDataType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Sampler2D,
    SamplerCube,
}

impl UniformDataType {
    /// The GLSL spelling of this type.
    #[must_use]
    pub const fn glsl_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::FloatVec2 => "vec2",
            Self::FloatVec3 => "vec3",
            Self::FloatVec4 => "vec4",
            Self::Int => "int",
            Self::IntVec2 => "ivec2",
            Self::IntVec3 => "ivec3",
            Self::IntVec4 => "ivec4",
            Self::Bool => "bool",
            Self::BoolVec2 => "bvec2",
            Self::BoolVec3 => "bvec3",
            Self::BoolVec4 => "bvec4",
            Self::FloatMat2 => "mat2",
            Self::FloatMat3 => "mat3",
            Self::FloatMat4 => "mat4",
            Self::Sampler2D => "sampler2D",
            Self::SamplerCube => "samplerCube",
        }
    }
}

/// Generates the declaration text for a reserved uniform name.
///
/// Implemented by [`AutomaticUniform`] and by any `Fn(&str) -> String`
/// closure, so tests and embedders can register ad-hoc generators.
pub trait UniformDeclaration: Send + Sync {
    fn declaration(&self, name: &str) -> String;
}

impl<F> UniformDeclaration for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn declaration(&self, name: &str) -> String {
        self(name)
    }
}

/// An automatic uniform description: its data type and array length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutomaticUniform {
    pub datatype: UniformDataType,
    /// Array length. `1` declares a plain (non-array) uniform.
    pub size: usize,
}

impl AutomaticUniform {
    #[must_use]
    pub const fn new(datatype: UniformDataType) -> Self {
        Self { datatype, size: 1 }
    }

    #[must_use]
    pub const fn array(datatype: UniformDataType, size: usize) -> Self {
        Self { datatype, size }
    }
}

impl UniformDeclaration for AutomaticUniform {
    fn declaration(&self, name: &str) -> String {
        let ty = self.datatype.glsl_name();
        if self.size > 1 {
            format!("uniform {ty} {name}[{}];", self.size)
        } else {
            format!("uniform {ty} {name};")
        }
    }
}

/// The automatic uniforms every renderer built on this crate provides.
#[must_use]
pub fn standard_uniforms() -> Vec<(&'static str, AutomaticUniform)> {
    use UniformDataType as T;

    vec![
        ("czm_viewport", AutomaticUniform::new(T::FloatVec4)),
        ("czm_viewportOrthographic", AutomaticUniform::new(T::FloatMat4)),
        ("czm_viewportTransformation", AutomaticUniform::new(T::FloatMat4)),
        ("czm_globeDepthTexture", AutomaticUniform::new(T::Sampler2D)),
        ("czm_model", AutomaticUniform::new(T::FloatMat4)),
        ("czm_inverseModel", AutomaticUniform::new(T::FloatMat4)),
        ("czm_view", AutomaticUniform::new(T::FloatMat4)),
        ("czm_view3D", AutomaticUniform::new(T::FloatMat4)),
        ("czm_viewRotation", AutomaticUniform::new(T::FloatMat3)),
        ("czm_inverseView", AutomaticUniform::new(T::FloatMat4)),
        ("czm_inverseViewRotation", AutomaticUniform::new(T::FloatMat3)),
        ("czm_projection", AutomaticUniform::new(T::FloatMat4)),
        ("czm_inverseProjection", AutomaticUniform::new(T::FloatMat4)),
        ("czm_modelView", AutomaticUniform::new(T::FloatMat4)),
        ("czm_modelViewRelativeToEye", AutomaticUniform::new(T::FloatMat4)),
        ("czm_inverseModelView", AutomaticUniform::new(T::FloatMat4)),
        ("czm_viewProjection", AutomaticUniform::new(T::FloatMat4)),
        ("czm_inverseViewProjection", AutomaticUniform::new(T::FloatMat4)),
        ("czm_modelViewProjection", AutomaticUniform::new(T::FloatMat4)),
        (
            "czm_modelViewProjectionRelativeToEye",
            AutomaticUniform::new(T::FloatMat4),
        ),
        ("czm_normal", AutomaticUniform::new(T::FloatMat3)),
        ("czm_inverseNormal", AutomaticUniform::new(T::FloatMat3)),
        ("czm_encodedCameraPositionMCHigh", AutomaticUniform::new(T::FloatVec3)),
        ("czm_encodedCameraPositionMCLow", AutomaticUniform::new(T::FloatVec3)),
        ("czm_entireFrustum", AutomaticUniform::new(T::FloatVec2)),
        ("czm_currentFrustum", AutomaticUniform::new(T::FloatVec2)),
        ("czm_frustumPlanes", AutomaticUniform::new(T::FloatVec4)),
        ("czm_sunPositionWC", AutomaticUniform::new(T::FloatVec3)),
        ("czm_sunDirectionEC", AutomaticUniform::new(T::FloatVec3)),
        ("czm_sunDirectionWC", AutomaticUniform::new(T::FloatVec3)),
        ("czm_moonDirectionEC", AutomaticUniform::new(T::FloatVec3)),
        ("czm_viewerPositionWC", AutomaticUniform::new(T::FloatVec3)),
        ("czm_frameNumber", AutomaticUniform::new(T::Float)),
        ("czm_morphTime", AutomaticUniform::new(T::Float)),
        ("czm_sceneMode", AutomaticUniform::new(T::Float)),
        ("czm_temeToPseudoFixed", AutomaticUniform::new(T::FloatMat3)),
        ("czm_resolutionScale", AutomaticUniform::new(T::Float)),
        ("czm_pixelRatio", AutomaticUniform::new(T::Float)),
        ("czm_fogDensity", AutomaticUniform::new(T::Float)),
    ]
}
