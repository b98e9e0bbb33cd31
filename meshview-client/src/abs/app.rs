//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context the viewer window renders into.

use std::sync::Arc;

use meshview_core::catalog::WindowConfig;

use crate::error::ViewerError;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Opens a window with an OpenGL 3.3 core context.
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    pub fn new(config: &WindowConfig) -> Result<Self, ViewerError> {
        let sdl = sdl2::init().map_err(ViewerError::Window)?;
        let video_subsystem = sdl.video().map_err(ViewerError::Window)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let (width, height) = if config.fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(ViewerError::Window)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (config.width, config.height)
        };

        let mut window = video_subsystem
            .window(&config.title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| ViewerError::Window(e.to_string()))?;
        window
            .set_fullscreen(if config.fullscreen {
                sdl2::video::FullscreenType::Desktop
            } else {
                sdl2::video::FullscreenType::Off
            })
            .map_err(ViewerError::Window)?;
        let gl_context = window.gl_create_context().map_err(ViewerError::Window)?;
        window
            .gl_make_current(&gl_context)
            .map_err(ViewerError::Window)?;
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(ViewerError::Window)?;
        let gl = Arc::new(gl);

        log::info!("Opened {}x{} window", width, height);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }

    /// The drawable size of the window in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
