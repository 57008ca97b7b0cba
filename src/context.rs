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

//! Defines the graphics-context capability that shader programs are built on.

use std::error::Error;
use std::fmt;

/// A single programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex stage.
    Vertex,

    /// The fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// The graphics context that owns shader and program objects.
///
/// This is the create/compile/link/query surface that [`ShaderProgram`] needs from
/// an immediate-mode graphics API. The production implementation is [`GlowContext`];
/// tests implement it with an in-memory object table.
///
/// All methods take `&self`: the underlying API is a thread-local state machine and
/// its bindings are interior state of the context, not of any Rust value.
///
/// [`ShaderProgram`]: crate::ShaderProgram
/// [`GlowContext`]: crate::GlowContext
pub trait GpuContext {
    /// An unlinked, single-stage shader object.
    type Shader: Copy;

    /// A linked program object.
    type Program: Copy;

    /// A resolved uniform location on a program.
    type Uniform;

    /// The error type for handle allocation failures.
    type Error: Error + 'static;

    /// Create a new shader object for the given stage.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Error>;

    /// Replace the source text of a shader object.
    fn shader_source(&self, shader: Self::Shader, source: &str);

    /// Compile a shader object from its current source text.
    fn compile_shader(&self, shader: Self::Shader);

    /// Whether the last compilation of this shader object succeeded.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;

    /// The compiler's diagnostic log for this shader object.
    fn shader_info_log(&self, shader: Self::Shader) -> String;

    /// Delete a shader object.
    fn delete_shader(&self, shader: Self::Shader);

    /// Create a new, empty program object.
    fn create_program(&self) -> Result<Self::Program, Self::Error>;

    /// Attach a shader object to a program.
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// Detach a shader object from a program.
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// Link the attached shader objects into an executable program.
    fn link_program(&self, program: Self::Program);

    /// Whether the last link of this program succeeded.
    fn program_link_status(&self, program: Self::Program) -> bool;

    /// The linker's diagnostic log for this program.
    fn program_info_log(&self, program: Self::Program) -> String;

    /// Delete a program object.
    fn delete_program(&self, program: Self::Program);

    /// Make a program the context's current one, or unbind with `None`.
    fn use_program(&self, program: Option<Self::Program>);

    /// Resolve a uniform name on a program, or `None` if the program has no active
    /// uniform with that name.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Uniform>;

    /// Store an `i32` into a uniform of the current program.
    fn set_uniform_i32(&self, location: &Self::Uniform, value: i32);

    /// Store an `f32` into a uniform of the current program.
    fn set_uniform_f32(&self, location: &Self::Uniform, value: f32);

    /// Store a `vec4` into a uniform of the current program.
    fn set_uniform_f32_4(&self, location: &Self::Uniform, value: [f32; 4]);
}
