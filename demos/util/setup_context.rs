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

// Shared window and GL 3.3 core context setup for the demo programs.

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};

use raw_window_handle::HasRawWindowHandle;

use std::error::Error;
use std::num::NonZeroU32;

use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

pub(crate) struct DemoWindow {
    pub(crate) window: Window,
    pub(crate) surface: Surface<WindowSurface>,
    pub(crate) context: PossiblyCurrentContext,
}

pub(crate) fn init(title: &str) -> Result<(EventLoop<()>, DemoWindow, glow::Context), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let event_loop = EventLoop::new();
    let window_builder = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(LogicalSize::new(800.0, 600.0));

    // Build the window and pick a config in one go; prefer the highest sample count.
    let display = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let (window, gl_config) = display.build(
        &event_loop,
        ConfigTemplateBuilder::new(),
        |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .unwrap()
        },
    )?;
    let window = window.ok_or("the display builder did not produce a window")?;

    let display = gl_config.display();
    let attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(window.raw_window_handle()));
    let not_current = unsafe { display.create_context(&gl_config, &attributes)? };

    let surface_attributes = window.build_surface_attributes(<_>::default());
    let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes)? };
    let context = not_current.make_current(&surface)?;

    if let Err(err) =
        surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
    {
        eprintln!("Error setting vsync: {err:?}");
    }

    let gl = unsafe {
        glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name) as *const _)
    };

    Ok((event_loop, DemoWindow { window, surface, context }, gl))
}
