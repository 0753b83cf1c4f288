// ABOUTME: Resize coordinator owning the frozen image set and the render state machine
// ABOUTME: Coalesces resize notifications into at most one pending re-render

use crate::encoder::ImageSet;
use crate::error::GridError;
use crate::geometry::{GeometryProvider, TerminalGeometry};
use crate::layout::{GridLayout, compute_layout};
use crate::render::Renderer;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

pub const RESIZE_MESSAGE: &str = "Handling window size change";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    Startup,
    Resize,
}

#[derive(Debug, Default)]
struct ResizeSlot {
    pending: AtomicBool,
    closed: AtomicBool,
    wake: Notify,
}

/// Sending half of the resize slot. Cheap to clone into signal tasks.
#[derive(Debug, Clone)]
pub struct ResizeNotifier {
    slot: Arc<ResizeSlot>,
}

impl ResizeNotifier {
    /// Mark a re-render as owed. Returns `false` when one was already pending
    /// and this notification was folded into it.
    pub fn notify(&self) -> bool {
        let fresh = !self.slot.pending.swap(true, Ordering::AcqRel);
        if fresh {
            self.slot.wake.notify_one();
        } else {
            log::debug!("Resize notification coalesced into pending re-render");
        }
        fresh
    }

    /// Stop the coordinator loop once pending work is drained.
    pub fn close(&self) {
        self.slot.closed.store(true, Ordering::Release);
        self.slot.wake.notify_one();
    }
}

/// Receiving half of the resize slot, consumed by [`Coordinator::run`].
#[derive(Debug)]
pub struct ResizeReceiver {
    slot: Arc<ResizeSlot>,
}

impl ResizeReceiver {
    pub fn is_pending(&self) -> bool {
        self.slot.pending.load(Ordering::Acquire)
    }

    /// Clear and return the pending flag.
    pub fn take_pending(&self) -> bool {
        self.slot.pending.swap(false, Ordering::AcqRel)
    }

    /// Wait for the next owed re-render. Returns `false` once closed and drained.
    pub async fn wait(&self) -> bool {
        loop {
            if self.take_pending() {
                return true;
            }
            if self.slot.closed.load(Ordering::Acquire) {
                return false;
            }
            self.slot.wake.notified().await;
        }
    }
}

/// Single-slot coalescing channel for resize notifications.
pub fn resize_channel() -> (ResizeNotifier, ResizeReceiver) {
    let slot = Arc::new(ResizeSlot::default());
    (
        ResizeNotifier {
            slot: Arc::clone(&slot),
        },
        ResizeReceiver { slot },
    )
}

pub struct Coordinator<G: GeometryProvider, W: Write> {
    images: ImageSet,
    geometry: G,
    renderer: Renderer<W>,
    state: CoordinatorState,
    last_geometry: Option<TerminalGeometry>,
    last_layout: Option<GridLayout>,
    renders: usize,
}

impl<G: GeometryProvider, W: Write> Coordinator<G, W> {
    pub fn new(images: ImageSet, geometry: G, renderer: Renderer<W>) -> Self {
        Self {
            images: images.freeze(),
            geometry,
            renderer,
            state: CoordinatorState::Idle,
            last_geometry: None,
            last_layout: None,
            renders: 0,
        }
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn renderer(&self) -> &Renderer<W> {
        &self.renderer
    }

    pub fn into_renderer(self) -> Renderer<W> {
        self.renderer
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn last_geometry(&self) -> Option<TerminalGeometry> {
        self.last_geometry
    }

    pub fn last_layout(&self) -> Option<GridLayout> {
        self.last_layout
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Run one full render: fetch geometry, compute layout, write the grid.
    pub fn render(&mut self, trigger: RenderTrigger) -> Result<(), GridError> {
        self.state = CoordinatorState::Rendering;
        let result = self.render_cycle(trigger);
        self.state = CoordinatorState::Idle;
        result
    }

    /// Render for `trigger`, then service any re-render owed by notifications
    /// that arrived meanwhile. Returns the number of renders performed.
    pub fn render_and_drain(
        &mut self,
        trigger: RenderTrigger,
        resizes: &ResizeReceiver,
    ) -> Result<usize, GridError> {
        self.render(trigger)?;
        let mut count = 1;
        while resizes.take_pending() {
            self.render(RenderTrigger::Resize)?;
            count += 1;
        }
        Ok(count)
    }

    /// Render at startup, then once per owed re-render until the notifier closes.
    pub async fn run(&mut self, resizes: &ResizeReceiver) -> Result<(), GridError> {
        self.render_and_drain(RenderTrigger::Startup, resizes)?;

        while resizes.wait().await {
            self.render_and_drain(RenderTrigger::Resize, resizes)?;
        }

        log::debug!("Resize channel closed after {} renders", self.renders);
        Ok(())
    }

    fn render_cycle(&mut self, trigger: RenderTrigger) -> Result<(), GridError> {
        let geometry = self.geometry.geometry()?;

        if trigger == RenderTrigger::Resize {
            self.renderer.begin_redraw()?;
            self.renderer
                .write_line(&format!("{} ({})", RESIZE_MESSAGE, geometry))?;
        }

        let layout = compute_layout(self.images.len(), geometry);
        log::debug!(
            "{:?} render: {} images in {}x{} grid at {}",
            trigger,
            self.images.len(),
            layout.rows,
            layout.columns,
            geometry
        );

        self.renderer.render(&self.images, &layout)?;

        self.last_geometry = Some(geometry);
        self.last_layout = Some(layout);
        self.renders += 1;
        Ok(())
    }
}
