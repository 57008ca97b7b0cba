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

//! A quad blending two textures, with sampler and blend-factor uniforms.

#[path = "util/setup_context.rs"]
mod setup_context;

use glow::HasContext;
use glutin::prelude::GlSurface;
use glow_program::{GlowContext, ShaderProgram};

use std::error::Error;
use std::num::NonZeroU32;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use winit::event::{Event, WindowEvent};

/// An 8x8 two-color check pattern, scaled up to 64x64 RGB texels.
fn checkerboard(even: [u8; 3], odd: [u8; 3]) -> Vec<u8> {
    let mut data = Vec::with_capacity(64 * 64 * 3);
    for y in 0..64 {
        for x in 0..64 {
            let cell = ((x / 8) + (y / 8)) % 2 == 0;
            data.extend_from_slice(if cell { &even } else { &odd });
        }
    }
    data
}

unsafe fn upload_texture(gl: &glow::Context, pixels: &[u8]) -> Result<glow::NativeTexture, String> {
    let texture = gl.create_texture()?;
    gl.bind_texture(glow::TEXTURE_2D, Some(texture));
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
    gl.tex_parameter_i32(
        glow::TEXTURE_2D,
        glow::TEXTURE_MIN_FILTER,
        glow::LINEAR as i32,
    );
    gl.tex_parameter_i32(
        glow::TEXTURE_2D,
        glow::TEXTURE_MAG_FILTER,
        glow::LINEAR as i32,
    );
    gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::RGB8 as i32,
        64,
        64,
        0,
        glow::RGB,
        glow::UNSIGNED_BYTE,
        Some(pixels),
    );
    gl.generate_mipmap(glow::TEXTURE_2D);
    Ok(texture)
}

fn main() -> Result<(), Box<dyn Error>> {
    let (event_loop, demo, gl) = setup_context::init("glow-program textured quad")?;
    let context = Rc::new(GlowContext::new(gl));

    let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/shaders");
    let program = ShaderProgram::from_paths(
        context.clone(),
        shader_dir.join("textured_quad.v.glsl"),
        shader_dir.join("textured_quad.f.glsl"),
    )?;

    // x, y, z, r, g, b, u, v
    let vertices: [f32; 32] = [
        0.5, 0.5, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, // top right
        0.5, -0.5, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, // bottom right
        -0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, // bottom left
        -0.5, 0.5, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, // top left
    ];
    let indices: [u32; 6] = [0, 1, 3, 1, 2, 3];

    let (vao, texture1, texture2) = unsafe {
        let gl = context.get_ref();

        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&vertices),
            glow::STATIC_DRAW,
        );

        let ebo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&indices),
            glow::STATIC_DRAW,
        );

        let stride = 8 * std::mem::size_of::<f32>() as i32;
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
        gl.vertex_attrib_pointer_f32(
            2,
            2,
            glow::FLOAT,
            false,
            stride,
            6 * std::mem::size_of::<f32>() as i32,
        );
        gl.enable_vertex_attrib_array(2);

        let texture1 = upload_texture(gl, &checkerboard([160, 110, 60], [90, 60, 30]))?;
        let texture2 = upload_texture(gl, &checkerboard([240, 240, 240], [40, 120, 200]))?;

        (vao, texture1, texture2)
    };
    context.check_errors();

    // Sampler bindings are fixed; the blend factor is pushed every frame.
    program.activate();
    program.set_int("texture1", 0);
    program.set_int("texture2", 1);

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
                let mix = (started.elapsed().as_secs_f32().sin() / 2.0) + 0.5;

                unsafe {
                    let gl = context.get_ref();
                    gl.clear_color(0.2, 0.3, 0.3, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT);

                    gl.active_texture(glow::TEXTURE0);
                    gl.bind_texture(glow::TEXTURE_2D, Some(texture1));
                    gl.active_texture(glow::TEXTURE1);
                    gl.bind_texture(glow::TEXTURE_2D, Some(texture2));

                    program.activate();
                    program.set_float("mixAmount", mix);
                    gl.bind_vertex_array(Some(vao));
                    gl.draw_elements(glow::TRIANGLES, 6, glow::UNSIGNED_INT, 0);
                }

                demo.surface.swap_buffers(&demo.context).unwrap();
                demo.window.request_redraw();
            }
            _ => (),
        }
    })
}
