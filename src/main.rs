// --- File: main.rs ---
mod audio;
mod config;
mod constants;
mod draw;
mod error;
mod font;
mod gate;
mod placement;
mod presentation;
mod renderer;
mod simulation;
mod utils;

use audio::KiraAudio;
use clap::Parser;
use config::SceneConfig;
use error::FloresError;
use constants::*;
use gate::InteractionGate;
use presentation::CanvasRect;
use renderer::Renderer;
use simulation::SceneState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, TouchPhase, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::WindowBuilder,
};

#[derive(Parser)]
#[command(name = "flores")]
#[command(about = "A field of flowers that grows around a message", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a TOML scene config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible scene
    #[arg(long)]
    seed: Option<u64>,

    /// Background music file (ogg, mp3 or wav)
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Music volume as linear amplitude
    #[arg(long)]
    volume: Option<f64>,

    /// Initial window width in pixels
    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,
}

impl Args {
    fn scene_config(&self) -> error::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(path) = &self.audio {
            config.audio.path = Some(path.clone());
        }
        if let Some(volume) = self.volume {
            config.audio.volume = volume;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> error::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let scene_config = args.scene_config()?;
    let canvas_fraction = scene_config.canvas_fraction;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(args.width.max(1), args.height.max(1)))
            .build(&event_loop)?,
    );

    let mut canvas = CanvasRect::fit(window.inner_size(), window.scale_factor(), canvas_fraction)
        .ok_or(FloresError::EmptyWindow)?;
    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &canvas))?;
    let mut audio = KiraAudio::new(&scene_config.audio);
    let mut gate = InteractionGate::default();
    let mut scene = SceneState::new(canvas.size, scene_config);
    log::info!("Scene starts in {:?}", scene.mode());

    let mut last_update_time = Instant::now();
    let mut time_accumulator = 0.0;
    let mut last_fps_update_time = Instant::now();
    let mut frames_since_last_fps_update = 0;
    let mut current_fps = 0.0;
    let mut torn_down = false;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => {
                if torn_down {
                    return;
                }
                if !scene.is_paused() {
                    let now = Instant::now();
                    time_accumulator += now.duration_since(last_update_time).as_secs_f64();
                    last_update_time = now;
                    let mut ticks = 0;
                    while time_accumulator >= FIXED_TIMESTEP && ticks < MAX_TICKS_PER_REDRAW {
                        scene.update();
                        time_accumulator -= FIXED_TIMESTEP;
                        ticks += 1;
                    }
                    // Drop the backlog after a long stall instead of fast-forwarding.
                    if ticks == MAX_TICKS_PER_REDRAW {
                        time_accumulator = time_accumulator.min(FIXED_TIMESTEP);
                    }
                } else {
                    last_update_time = Instant::now();
                    time_accumulator = 0.0;
                }
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    torn_down = true;
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    // Minimized: keep the last canvas so new flowers still land on it.
                    if let Some(fitted) =
                        CanvasRect::fit(physical_size, window.scale_factor(), canvas_fraction)
                    {
                        canvas = fitted;
                        renderer.resize(physical_size);
                        renderer.set_canvas(&canvas);
                        scene.resize(canvas.size);
                    }
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    let new_inner_size = window.inner_size();
                    if let Some(fitted) = CanvasRect::fit(new_inner_size, scale_factor, canvas_fraction)
                    {
                        canvas = fitted;
                        renderer.resize(new_inner_size);
                        renderer.set_canvas(&canvas);
                        scene.resize(canvas.size);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    scene.on_pointer_moved(canvas.to_canvas(position));
                }
                WindowEvent::CursorLeft { .. } => scene.on_pointer_left(),
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    ..
                } => {
                    gate.on_gesture(&mut audio);
                    scene.on_gesture();
                }
                WindowEvent::Touch(touch) => match touch.phase {
                    TouchPhase::Started => {
                        gate.on_gesture(&mut audio);
                        scene.on_gesture();
                        scene.on_pointer_moved(canvas.to_canvas(touch.location));
                    }
                    TouchPhase::Moved => {
                        scene.on_pointer_moved(canvas.to_canvas(touch.location));
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => scene.on_pointer_left(),
                },
                WindowEvent::RedrawRequested => {
                    if torn_down {
                        return;
                    }
                    frames_since_last_fps_update += 1;
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                    if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                        current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                        last_fps_update_time = now;
                        frames_since_last_fps_update = 0;
                    }

                    let shapes = draw::build_frame(&scene);
                    match renderer.render(&shapes) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU Error: OutOfMemory");
                            torn_down = true;
                            elwt.exit();
                        }
                        Err(e) => log::warn!("WGPU Error: {:?}", e),
                    }

                    let paused_text = if scene.is_paused() { " [PAUSED]" } else { "" };
                    window.set_title(&format!(
                        "{} - Flowers: {}, Petals: {} - FPS: {:.1}{}",
                        WINDOW_TITLE,
                        scene.flowers().len(),
                        scene.petals().len(),
                        current_fps,
                        paused_text
                    ));
                }
                _ => {}
            },
            Event::LoopExiting => {
                audio.stop();
                log::info!("Scene torn down after {} frames", scene.frame());
            }
            _ => {}
        }
    })?;
    Ok(())
}
// --- End of File: main.rs ---
