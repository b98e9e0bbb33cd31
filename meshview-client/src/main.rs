use std::path::PathBuf;

use glow::HasContext;
use meshview_client::{
    abs::{App, GlowContext},
    controller::ViewerController,
    error::ViewerError,
    input::{Action, MouseState},
    logging, viewer,
};
use meshview_core::{camera::OrbitCamera, catalog::ViewerConfig};

/// The configuration named on the command line, else the one in the user's config directory.
fn config_path() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from).or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("meshview").join("viewer.json"))
            .filter(|path| path.is_file())
    })
}

fn set_title(app: &mut App, base: &str, controller: &ViewerController) {
    let title = format!("{} - {}", base, controller.selection());
    if let Err(err) = app.window.set_title(&title) {
        log::warn!("Could not set the window title: {}", err);
    }
}

fn main() -> Result<(), ViewerError> {
    run().inspect_err(|err| log::error!("{}", err))
}

fn run() -> Result<(), ViewerError> {
    let path = config_path();
    let config = match &path {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    logging::init(&config.log_level)?;
    match &path {
        Some(path) => log::info!(
            "Loaded configuration {} ({} models, {} textures)",
            path.display(),
            config.models.len(),
            config.textures.len()
        ),
        None => log::info!("No configuration file, using the built-in catalogue"),
    }

    let mut app = App::new(&config.window)?;
    let mut gl = GlowContext::new(&app.gl)?;
    let mut controller = viewer::build(&mut gl, &config)?;

    let (width, height) = app.drawable_size();
    let mut camera = OrbitCamera::new(&config.camera, width as f32 / height.max(1) as f32);
    let background = config.background;
    unsafe {
        gl.gl().viewport(0, 0, width as i32, height as i32);
        gl.gl().clear_color(background.x, background.y, background.z, 1.0);
    }
    set_title(&mut app, &config.window.title, &controller);

    let mut mouse = MouseState::default();

    'running: loop {
        let actions: Vec<Action> = app
            .event_pump
            .poll_iter()
            .filter_map(|event| mouse.handle(&event))
            .collect();

        for action in actions {
            match action {
                Action::Quit => break 'running,
                Action::Resize(width, height) => {
                    unsafe { gl.gl().viewport(0, 0, width as i32, height as i32) };
                    camera.update_aspect_ratio(width as f32, height as f32);
                    continue;
                }
                Action::Orbit(delta) => {
                    camera.orbit(delta.x, delta.y);
                    continue;
                }
                Action::Zoom(amount) => {
                    camera.zoom(amount);
                    continue;
                }
                Action::Style(style) => controller.select_style(style),
                Action::CycleModel(step) => controller.cycle_model(step),
                Action::CycleTexture => controller.cycle_texture(),
                Action::CycleLight => controller.cycle_light(),
            }
            set_title(&mut app, &config.window.title, &controller);
        }

        unsafe {
            gl.gl().clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        controller.render(&mut gl, &camera);
        app.window.gl_swap_window();
    }

    log::info!("Exiting");
    Ok(())
}
