use crate::rendering::data::SpriteVertex;
use crate::utils::constants::{SPRITE_FRAG, SPRITE_VERT};
use crate::utils::error::BatchError;
use gl::types::*;
use std::collections::HashMap;
use std::ffi::CString;
use std::fs::read_to_string;
use std::path::Path;
use std::{mem, ptr};

/// shader program to use to render
pub struct ShaderProgram {
    pub(crate) id: GLuint,
    uniform_locations: HashMap<String, GLint>,
}

impl ShaderProgram {
    /// creates a new shader program from a vertex and a fragment shader file
    pub fn from_files(
        vertex_file: impl AsRef<Path>,
        fragment_file: impl AsRef<Path>,
    ) -> Result<Self, BatchError> {
        let vs_src = read_source(vertex_file.as_ref())?;
        let fs_src = read_source(fragment_file.as_ref())?;
        Self::from_sources(&vs_src, &fs_src)
    }

    /// creates the built-in sprite shader program
    pub fn sprite_default() -> Result<Self, BatchError> {
        Self::from_sources(SPRITE_VERT, SPRITE_FRAG)
    }

    /// compiles and links a shader program, diagnostics are logged
    pub fn from_sources(vertex_src: &str, fragment_src: &str) -> Result<Self, BatchError> {
        log::debug!("compiling vertex shader");
        let vs = ShaderStage::compile(vertex_src, gl::VERTEX_SHADER)?;
        log::debug!("compiling fragment shader");
        let fs = ShaderStage::compile(fragment_src, gl::FRAGMENT_SHADER)?;
        log::debug!("linking program");
        let id = link_program(&vs, &fs)?;

        let mut program = Self {
            id,
            uniform_locations: HashMap::new(),
        };
        program.add_unif_location("projection");
        program.add_unif_location("transform");
        program.add_unif_location("tex_sampler");
        Ok(program)
    }

    /// sets an uniform location
    pub fn add_unif_location(&mut self, name: &str) {
        let Ok(c_name) = CString::new(name) else {
            log::warn!("invalid uniform name: {name:?}");
            return;
        };
        let unif = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };
        if unif < 0 {
            log::debug!("uniform {name:?} is not active in program {}", self.id);
        }
        self.uniform_locations.insert(name.to_string(), unif);
    }

    /// gets an uniform location (-1 if unknown, which gl silently ignores)
    pub fn get_unif(&self, name: &str) -> GLint {
        self.uniform_locations.get(name).copied().unwrap_or(-1)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

/// a compiled shader object that is deleted when dropped
struct ShaderStage(GLuint);

impl ShaderStage {
    /// compiles a gl shader
    fn compile(src: &str, ty: GLenum) -> Result<Self, BatchError> {
        let c_str = CString::new(src.as_bytes())
            .map_err(|_| BatchError::ResourceLoad("shader source contains a nul byte".into()))?;
        let stage = unsafe {
            let stage = Self(gl::CreateShader(ty));
            gl::ShaderSource(stage.0, 1, &c_str.as_ptr(), ptr::null());
            gl::CompileShader(stage.0);
            stage
        };

        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(stage.0, gl::COMPILE_STATUS, &mut status) };
        let info_log = shader_info_log(stage.0);
        if status != gl::TRUE as GLint {
            log::error!("shader compilation failed: {info_log}");
            return Err(BatchError::ResourceLoad(info_log));
        }
        if !info_log.is_empty() {
            log::info!("{info_log}");
        }
        Ok(stage)
    }
}

impl Drop for ShaderStage {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.0);
        }
    }
}

/// links a gl shader program
fn link_program(vs: &ShaderStage, fs: &ShaderStage) -> Result<GLuint, BatchError> {
    let c_out_color = CString::new("out_color").unwrap_or_default();
    let program = unsafe {
        let program = gl::CreateProgram();
        gl::AttachShader(program, vs.0);
        gl::AttachShader(program, fs.0);
        gl::BindFragDataLocation(program, 0, c_out_color.as_ptr());
        gl::LinkProgram(program);
        gl::DetachShader(program, fs.0);
        gl::DetachShader(program, vs.0);
        program
    };

    let mut status = gl::FALSE as GLint;
    unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
    let info_log = program_info_log(program);
    if status != gl::TRUE as GLint {
        log::error!("shader program linking failed: {info_log}");
        unsafe { gl::DeleteProgram(program) };
        return Err(BatchError::ResourceLoad(info_log));
    }
    if !info_log.is_empty() {
        log::info!("{info_log}");
    }
    Ok(program)
}

/// binds the vertex attributes of ``SpriteVertex`` to the locations used by the sprite shader
pub(crate) unsafe fn bind_sprite_attribs() {
    let stride = mem::size_of::<SpriteVertex>() as GLsizei;
    // position
    gl::EnableVertexAttribArray(0);
    gl::VertexAttribPointer(
        0,
        2,
        gl::FLOAT,
        gl::FALSE as GLboolean,
        stride,
        mem::offset_of!(SpriteVertex, position) as *const GLvoid,
    );
    // texture coordinates
    gl::EnableVertexAttribArray(1);
    gl::VertexAttribPointer(
        1,
        2,
        gl::FLOAT,
        gl::FALSE as GLboolean,
        stride,
        mem::offset_of!(SpriteVertex, tex_coords) as *const GLvoid,
    );
    // color
    gl::EnableVertexAttribArray(2);
    gl::VertexAttribPointer(
        2,
        4,
        gl::FLOAT,
        gl::FALSE as GLboolean,
        stride,
        mem::offset_of!(SpriteVertex, color) as *const GLvoid,
    );
}

/// reads a shader source file
fn read_source(path: &Path) -> Result<String, BatchError> {
    read_to_string(path).map_err(|err| {
        BatchError::ResourceLoad(format!("could not open {}: {err}", path.display()))
    })
}

fn shader_info_log(shader: GLuint) -> String {
    let mut len: GLint = 0;
    unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    unsafe {
        gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    }
    info_log_to_string(&buf)
}

fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;
    unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    unsafe {
        gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    }
    info_log_to_string(&buf)
}

/// converts a nul terminated gl info log
fn info_log_to_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_conversion() {
        assert_eq!(info_log_to_string(b"0:1: error\n\0\0"), "0:1: error");
        assert_eq!(info_log_to_string(b"no terminator"), "no terminator");
        assert_eq!(info_log_to_string(b"\0"), "");
    }

    #[test]
    fn missing_shader_file() {
        let res = ShaderProgram::from_files("missing.vert", "missing.frag");
        assert!(matches!(res, Err(BatchError::ResourceLoad(_))));
    }

    #[test]
    fn embedded_sources_declare_interface() {
        for name in ["position", "tex_coords", "color", "projection", "transform"] {
            assert!(SPRITE_VERT.contains(name));
        }
        assert!(SPRITE_FRAG.contains("tex_sampler"));
        assert!(SPRITE_FRAG.contains("out_color"));
    }
}
