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

//! Shader-program construction and uniform access for [`glow`]-style contexts.
//!
//! The centerpiece of this crate is [`ShaderProgram`]: it reads a vertex/fragment
//! GLSL source pair, compiles both stages on a graphics context, links them into a
//! single program object and exposes typed, name-keyed uniform setters. Compile and
//! link diagnostics are surfaced as [`ProgramError`] values rather than being logged
//! and swallowed, so a [`ShaderProgram`] that construction hands back is always fully
//! linked and usable.
//!
//! The graphics context is an injected capability: [`ShaderProgram`] is generic over
//! the [`GpuContext`] trait, and [`GlowContext`] adapts anything implementing glow's
//! [`HasContext`] to it. Tests substitute an in-memory double implementing the same
//! surface.
//!
//! The "current program" bind is global state on the underlying context.
//! [`ShaderProgram::activate`] overwrites it and nothing scopes or restores it;
//! callers that juggle several logical renderers must re-activate before each batch
//! of draw calls or uniform writes, since the uniform setters also act on whichever
//! program is currently bound.
//!
//! [`glow`]: https://crates.io/crates/glow
//! [`HasContext`]: https://docs.rs/glow/latest/glow/trait.HasContext.html

mod backend;
mod context;
mod program;

pub use backend::{GlError, GlowContext};
pub use context::{GpuContext, ShaderStage};
pub use program::{ProgramError, ShaderProgram};

pub(crate) struct CallOnDrop<F: FnMut()>(pub(crate) F);

impl<F: FnMut()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}
