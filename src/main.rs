use std::{sync::Arc, time::Instant};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use worms::config::SimulationConfig;
use worms::constants::*;
use worms::renderer::Renderer;
use worms::simulation::SimulationState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Worms")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );
    let mut renderer = pollster::block_on(Renderer::new(window.clone()));
    let mut simulation = SimulationState::new(SimulationConfig::new(), &mut renderer)?;

    let mut last_update_time = Instant::now();
    let mut time_accumulator = 0.0_f64;
    let mut finished = false;
    let mut last_fps_update_time = Instant::now();
    let mut frames_since_last_fps_update = 0;
    let mut current_fps = 0.0;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => {
                if !simulation.is_paused() && !finished {
                    let now = Instant::now();
                    let delta_time = now.duration_since(last_update_time).as_secs_f64();
                    last_update_time = now;
                    time_accumulator +=
                        delta_time * simulation.speed_multiplier() as f64 * BASE_TICKS_PER_SEC;
                    while time_accumulator >= 1.0 {
                        time_accumulator -= 1.0;
                        if !simulation.step(&mut renderer) {
                            finished = true;
                            println!("Game over");
                            elwt.exit();
                            break;
                        }
                    }
                } else {
                    last_update_time = Instant::now();
                    time_accumulator = 0.0;
                }
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(physical_size);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    renderer.resize(window.inner_size());
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::ArrowUp) => simulation.adjust_speed(true),
                            PhysicalKey::Code(KeyCode::ArrowDown) => simulation.adjust_speed(false),
                            PhysicalKey::Code(KeyCode::Space) => simulation.toggle_pause(),
                            PhysicalKey::Code(KeyCode::KeyR) => {
                                renderer.clear();
                                simulation.restart(&mut renderer);
                            }
                            PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    frames_since_last_fps_update += 1;
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                    if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                        current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                        last_fps_update_time = now;
                        frames_since_last_fps_update = 0;
                    }
                    match renderer.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("WGPU Error: OutOfMemory");
                            elwt.exit();
                        }
                        Err(e) => eprintln!("WGPU Error: {:?}", e),
                    }
                    let scores = if simulation.worms.is_empty() {
                        String::from("all worms transcended")
                    } else {
                        simulation
                            .worms
                            .iter()
                            .map(|worm| format!("{} IQ={}", worm.name, worm.iq))
                            .collect::<Vec<_>>()
                            .join(" | ")
                    };
                    let paused_text = if simulation.is_paused() {
                        " [PAUSED]"
                    } else {
                        ""
                    };
                    window.set_title(&format!(
                        "Worms - {} - Food: {} - Tick: {} - Speed: {:.1}x - FPS: {:.1}{}",
                        scores,
                        simulation.food.len(),
                        simulation.ticks(),
                        simulation.speed_multiplier(),
                        current_fps,
                        paused_text
                    ));
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}
