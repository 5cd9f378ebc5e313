use anyhow::Result;
use glam::Vec2;
use log::{debug, error, info};
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::game_loop::{FrameScheduler, SystemClock};
use engine::renderer::{Lighting, Renderer};
use game::{City, GameConfig, GameSession};

/// Log the frame rate every this many frames
const FPS_LOG_INTERVAL: u64 = 600;

fn screen_size(size: PhysicalSize<u32>) -> Vec2 {
    Vec2::new(size.width as f32, size.height as f32)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = GameConfig::from_env()?;
    info!("Starting City Drive ({} build)...", config.variant);

    let city = City::generate();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("City Drive")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(
        window.clone(),
        &city.static_scene(),
        Lighting::from(city.atmosphere),
        city.car.len(),
        config.wide_aspect,
    ))?;

    let mut scheduler = FrameScheduler::new(SystemClock::new(), config.frame_cap);
    let mut session = GameSession::new(config, city.car);
    let mut title = String::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(physical_size);
                }
                WindowEvent::Focused(false) => {
                    // Keys released while unfocused never reach us
                    session.controls_mut().reset();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(command) = session.controls_mut().process_keyboard_event(&event) {
                        session.handle_command(command);
                    }
                }
                WindowEvent::Touch(touch) => {
                    let screen = screen_size(renderer.size());
                    session.controls_mut().process_touch(&touch, screen);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let screen = screen_size(renderer.size());
                    let pos = Vec2::new(position.x as f32, position.y as f32);
                    session.controls_mut().process_cursor_moved(pos, screen);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let screen = screen_size(renderer.size());
                    session
                        .controls_mut()
                        .process_mouse_button(button, state, screen);
                }
                WindowEvent::RedrawRequested => {
                    scheduler.run_frame(&mut session, &*window);

                    let frame = session.frame();
                    if let Err(e) = renderer.render(frame.camera.into(), &frame.car) {
                        error!("Render failed: {}", e);
                        elwt.exit();
                        return;
                    }

                    let hud = session.hud_title();
                    if hud != title {
                        window.set_title(&hud);
                        title = hud;
                    }

                    if scheduler.frame_count() % FPS_LOG_INTERVAL == 0 {
                        debug!("FPS: {:.1}", scheduler.fps());
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Keep frames coming even if nothing requested one
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
