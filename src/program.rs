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

//! Building shader programs and pushing uniform values to them.

use crate::context::{GpuContext, ShaderStage};
use crate::CallOnDrop;

use std::fmt;
use std::fs;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A linked vertex + fragment shader program.
///
/// A value of this type always holds a fully linked, usable program handle;
/// constructors fail with [`ProgramError`] otherwise. The handle is deleted on the
/// owning context when the value is dropped.
pub struct ShaderProgram<C: GpuContext + ?Sized> {
    context: Rc<C>,
    id: C::Program,
}

impl<C: GpuContext + ?Sized> ShaderProgram<C> {
    /// Build a program from two GLSL source files.
    ///
    /// Both files are read fully into memory, then compiled and linked as in
    /// [`from_source`]. A missing or unreadable file fails with
    /// [`ProgramError::Read`] naming the offending path.
    ///
    /// [`from_source`]: Self::from_source
    pub fn from_paths(
        context: Rc<C>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ProgramError> {
        let vertex_source = read_source(vertex_path.as_ref())?;
        let fragment_source = read_source(fragment_path.as_ref())?;
        Self::from_source(context, &vertex_source, &fragment_source)
    }

    /// Build a program from in-memory GLSL source text.
    ///
    /// Each stage is compiled independently; the first failure aborts construction
    /// with [`ProgramError::Compile`] carrying the compiler's full diagnostic log.
    /// Linking the two stages can fail with [`ProgramError::Link`]. The transient
    /// stage objects are detached and deleted on every path, success or failure.
    pub fn from_source(
        context: Rc<C>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ProgramError> {
        let id = link_stages(&*context, vertex_source, fragment_source)?;
        Ok(Self { context, id })
    }

    /// Make this program the context's current one.
    ///
    /// The current-program bind is global context state with no scoping; a caller
    /// switching between several programs must re-activate before each batch of
    /// draw calls or uniform writes.
    pub fn activate(&self) {
        self.context.use_program(Some(self.id));
    }

    /// Set a boolean uniform, encoded as integer 0/1.
    ///
    /// Like all setters, this resolves `name` on this program at call time and is a
    /// silent no-op if the program has no active uniform with that name. The write
    /// itself lands on the context's *current* program, so this program must be
    /// [`activate`]d first. Locations are not cached; at per-frame call rates the
    /// lookup is not worth a table.
    ///
    /// [`activate`]: Self::activate
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    /// Set an `i32` uniform. Also used for sampler bindings ("texture unit N").
    pub fn set_int(&self, name: &str, value: i32) {
        if let Some(location) = self.context.uniform_location(self.id, name) {
            self.context.set_uniform_i32(&location, value);
        }
    }

    /// Set an `f32` uniform.
    pub fn set_float(&self, name: &str, value: f32) {
        if let Some(location) = self.context.uniform_location(self.id, name) {
            self.context.set_uniform_f32(&location, value);
        }
    }

    /// Set a `vec4` uniform.
    pub fn set_vec4(&self, name: &str, value: [f32; 4]) {
        if let Some(location) = self.context.uniform_location(self.id, name) {
            self.context.set_uniform_f32_4(&location, value);
        }
    }

    /// The opaque program handle, for raw calls on the underlying context.
    pub fn id(&self) -> C::Program {
        self.id
    }
}

impl<C: GpuContext + ?Sized> fmt::Debug for ShaderProgram<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram").finish_non_exhaustive()
    }
}

impl<C: GpuContext + ?Sized> Drop for ShaderProgram<C> {
    fn drop(&mut self) {
        self.context.delete_program(self.id);
    }
}

/// A failure to construct a [`ShaderProgram`].
#[derive(Debug)]
pub enum ProgramError {
    /// A shader source file could not be read.
    Read {
        /// The path that failed.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// A shader stage was rejected by the context's compiler.
    Compile {
        /// The stage that failed.
        stage: ShaderStage,

        /// The compiler's diagnostic log, verbatim.
        log: String,
    },

    /// The compiled stages could not be linked into a program.
    Link {
        /// The linker's diagnostic log, verbatim.
        log: String,
    },

    /// The context failed to allocate a shader or program handle.
    Backend(Box<dyn std::error::Error>),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Read { path, .. } => {
                write!(f, "failed to read shader source from {}", path.display())
            }
            ProgramError::Compile { stage, log } => {
                write!(f, "{stage} shader compilation failed: {log}")
            }
            ProgramError::Link { log } => write!(f, "program linking failed: {log}"),
            ProgramError::Backend(err) => write!(f, "graphics context error: {err}"),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Read { source, .. } => Some(source),
            ProgramError::Backend(err) => Some(&**err),
            _ => None,
        }
    }
}

fn read_source(path: &Path) -> Result<String, ProgramError> {
    fs::read_to_string(path).map_err(|source| {
        tracing::error!("failed to read shader source from {}: {source}", path.display());
        ProgramError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn link_stages<C: GpuContext + ?Sized>(
    context: &C,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<C::Program, ProgramError> {
    let vertex = compile_stage(context, ShaderStage::Vertex, vertex_source)?;
    let _delete_vertex = CallOnDrop(|| context.delete_shader(vertex));
    let fragment = compile_stage(context, ShaderStage::Fragment, fragment_source)?;
    let _delete_fragment = CallOnDrop(|| context.delete_shader(fragment));

    let program = context
        .create_program()
        .map_err(|err| ProgramError::Backend(Box::new(err)))?;
    let _delete_program = CallOnDrop(|| context.delete_program(program));

    context.attach_shader(program, vertex);
    context.attach_shader(program, fragment);
    let _detach_stages = CallOnDrop(|| {
        context.detach_shader(program, vertex);
        context.detach_shader(program, fragment);
    });
    context.link_program(program);

    if !context.program_link_status(program) {
        let log = context.program_info_log(program);
        tracing::error!("program linking failed: {log}");
        return Err(ProgramError::Link { log });
    }

    drop(_detach_stages);
    mem::forget(_delete_program);
    Ok(program)
}

fn compile_stage<C: GpuContext + ?Sized>(
    context: &C,
    stage: ShaderStage,
    source: &str,
) -> Result<C::Shader, ProgramError> {
    let shader = context
        .create_shader(stage)
        .map_err(|err| ProgramError::Backend(Box::new(err)))?;
    let _delete_shader = CallOnDrop(|| context.delete_shader(shader));

    context.shader_source(shader, source);
    context.compile_shader(shader);

    if !context.shader_compile_status(shader) {
        let log = context.shader_info_log(shader);
        tracing::error!("{stage} shader compilation failed: {log}");
        return Err(ProgramError::Compile { stage, log });
    }

    mem::forget(_delete_shader);
    Ok(shader)
}
