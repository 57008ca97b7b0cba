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

//! A colored triangle with a time-driven `vec4` tint uniform.

#[path = "util/setup_context.rs"]
mod setup_context;

use glow::HasContext;
use glow_program::{GlowContext, ShaderProgram};
use glutin::prelude::GlSurface;

use std::error::Error;
use std::num::NonZeroU32;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use winit::event::{Event, WindowEvent};

fn main() -> Result<(), Box<dyn Error>> {
    let (event_loop, demo, gl) = setup_context::init("glow-program triangle")?;
    let context = Rc::new(GlowContext::new(gl));

    let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/shaders");
    let program = ShaderProgram::from_paths(
        context.clone(),
        shader_dir.join("triangle.v.glsl"),
        shader_dir.join("triangle.f.glsl"),
    )?;

    // x, y, z, r, g, b
    let vertices: [f32; 18] = [
        -0.5, -0.5, 0.0, 1.0, 0.0, 0.0, //
        0.5, -0.5, 0.0, 0.0, 1.0, 0.0, //
        0.0, 0.5, 0.0, 0.0, 0.0, 1.0, //
    ];

    let vao = unsafe {
        let gl = context.get_ref();

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&vertices),
            glow::STATIC_DRAW,
        );

        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));
        let stride = 6 * std::mem::size_of::<f32>() as i32;
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(
            1,
            3,
            glow::FLOAT,
            false,
            stride,
            3 * std::mem::size_of::<f32>() as i32,
        );
        gl.enable_vertex_attrib_array(1);

        vao
    };
    context.check_errors();

    let started = Instant::now();
    event_loop.run(move |event, _, control_flow| {
        control_flow.set_poll();
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) if size.width != 0 && size.height != 0 => {
                    demo.surface.resize(
                        &demo.context,
                        NonZeroU32::new(size.width).unwrap(),
                        NonZeroU32::new(size.height).unwrap(),
                    );
                    unsafe {
                        context
                            .get_ref()
                            .viewport(0, 0, size.width as i32, size.height as i32)
                    };
                }
                WindowEvent::CloseRequested => control_flow.set_exit(),
                _ => (),
            },
            Event::RedrawEventsCleared => {
                let green = (started.elapsed().as_secs_f32().sin() / 2.0) + 0.5;

                unsafe {
                    let gl = context.get_ref();
                    gl.clear_color(0.2, 0.3, 0.3, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT);

                    program.activate();
                    program.set_vec4("tint", [1.0, green, 1.0, 1.0]);
                    gl.bind_vertex_array(Some(vao));
                    gl.draw_arrays(glow::TRIANGLES, 0, 3);
                }

                demo.surface.swap_buffers(&demo.context).unwrap();
                demo.window.request_redraw();
            }
            _ => (),
        }
    })
}
