use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::error::RenderError;
use crate::time::{FrameClock, FrameTime};

use super::alert;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Name of the drawing surface; also used as the window title.
    pub surface_id: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            surface_id: "main-canvas".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the surface, drives `app` until the window closes and returns
    /// the first fatal error, if any.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(e) => Err(anyhow::Error::new(e).context("rendering aborted")),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    failure: Option<RenderError>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Records a fatal error and stops the loop. Missing graphics support is
    /// also reported to the user.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{err}");
        if let RenderError::ContextUnavailable(_) = &err {
            alert::show_blocking_alert(
                &self.config.surface_id,
                &format!("Unable to initialize the graphics context.\n\n{err}"),
            );
        }
        self.entry = None;
        self.failure.get_or_insert(err);
        self.request_exit(event_loop);
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry, RenderError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.surface_id.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop.create_window(attrs).map_err(|e| {
            RenderError::ContextUnavailable(format!(
                "failed to create surface `{}`: {e}",
                self.config.surface_id
            ))
        })?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        let entry = match self.create_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => return self.fail(event_loop, e),
        };

        let ready = entry.with_gpu(|gpu| self.app.on_surface_ready(&gpu.render_ctx()));
        if let Err(e) = ready {
            return self.fail(event_loop, e);
        }

        log::info!("surface `{}` ready", self.config.surface_id);
        event_loop.set_control_flow(ControlFlow::Wait);

        // First frame; every later one is requested by the frame before it.
        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            return self.request_exit(event_loop);
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("surface `{}` closed", self.config.surface_id);
                self.entry = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                let new_size = *new_size;
                entry.with_gpu_mut(|gpu| {
                    gpu.resize(new_size);
                    if new_size.width > 0 && new_size.height > 0 {
                        app.on_resized(&gpu.render_ctx());
                    }
                });
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| {
                    gpu.resize(new_size);
                    if new_size.width > 0 && new_size.height > 0 {
                        app.on_resized(&gpu.render_ctx());
                    }
                });
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                entry.with_mut(|fields| {
                    let ft: FrameTime = fields.clock.tick();
                    let mut ctx = FrameCtx {
                        window: fields.window,
                        gpu: fields.gpu,
                        time: ft,
                        runtime: &mut runtime_ctx,
                    };
                    app_control = app.on_frame(&mut ctx);
                });

                if app_control == AppControl::Exit || runtime_ctx.exit {
                    return self.request_exit(event_loop);
                }

                // Unconditional rescheduling.
                entry.with_window(|w| w.request_redraw());
            }

            _ => {}
        }
    }
}
