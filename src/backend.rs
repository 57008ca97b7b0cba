// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glow-program`.
//
// `glow-program` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glow-program` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glow-program`. If not, see <https://www.gnu.org/licenses/>.

//! The production [`GpuContext`] backend over a [`glow`] context.
//!
//! [`glow`]: https://crates.io/crates/glow

use crate::context::{GpuContext, ShaderStage};

use glow::HasContext;

use std::fmt;

/// An adapter that exposes a [`glow`] context as a [`GpuContext`].
///
/// The wrapped context must be current on the calling thread whenever a method on
/// this adapter (or on a [`ShaderProgram`] built on it) is invoked.
///
/// [`glow`]: https://crates.io/crates/glow
/// [`ShaderProgram`]: crate::ShaderProgram
pub struct GlowContext<H: HasContext + ?Sized> {
    context: H,
}

impl<H: HasContext> GlowContext<H> {
    /// Wrap a `glow` context.
    pub fn new(context: H) -> Self {
        Self { context }
    }

    /// Consume this adapter and return the underlying context.
    pub fn into_inner(self) -> H {
        self.context
    }
}

impl<H: HasContext + ?Sized> GlowContext<H> {
    /// Get a reference to the underlying context.
    pub fn get_ref(&self) -> &H {
        &self.context
    }

    /// Check the context's error flag, reporting anything found through `tracing`.
    pub fn check_errors(&self) {
        let err = unsafe { self.context.get_error() };

        if err != glow::NO_ERROR {
            let error_str = match err {
                glow::INVALID_ENUM => "GL_INVALID_ENUM",
                glow::INVALID_VALUE => "GL_INVALID_VALUE",
                glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
                glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
                glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
                glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
                glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
                glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
                _ => "Unknown GL error",
            };

            tracing::error!("GL error: {}", error_str);
        }
    }
}

impl<H: HasContext + ?Sized> fmt::Debug for GlowContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowContext").finish_non_exhaustive()
    }
}

fn stage_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl<H: HasContext + ?Sized> GpuContext for GlowContext<H> {
    type Shader = H::Shader;
    type Program = H::Program;
    type Uniform = H::UniformLocation;
    type Error = GlError;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Error> {
        unsafe { self.context.create_shader(stage_type(stage)).gl_err() }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.context.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.context.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.context.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.context.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.context.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, Self::Error> {
        unsafe { self.context.create_program().gl_err() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.context.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.context.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.context.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.context.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.context.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.context.delete_program(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.context.use_program(program) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Uniform> {
        unsafe { self.context.get_uniform_location(program, name) }
    }

    fn set_uniform_i32(&self, location: &Self::Uniform, value: i32) {
        unsafe { self.context.uniform_1_i32(Some(location), value) }
    }

    fn set_uniform_f32(&self, location: &Self::Uniform, value: f32) {
        unsafe { self.context.uniform_1_f32(Some(location), value) }
    }

    fn set_uniform_f32_4(&self, location: &Self::Uniform, value: [f32; 4]) {
        unsafe {
            self.context
                .uniform_4_f32(Some(location), value[0], value[1], value[2], value[3])
        }
    }
}

/// An error reported by the underlying `glow` context.
#[derive(Debug)]
pub struct GlError(String);

impl From<String> for GlError {
    fn from(s: String) -> Self {
        GlError(s)
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gl error: {}", self.0)
    }
}

impl std::error::Error for GlError {}

trait ResultExt<T, E> {
    fn gl_err(self) -> Result<T, GlError>;
}

impl<T, E: Into<GlError>> ResultExt<T, E> for Result<T, E> {
    fn gl_err(self) -> Result<T, GlError> {
        self.map_err(Into::into)
    }
}
