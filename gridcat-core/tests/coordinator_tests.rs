// ABOUTME: Integration tests for the resize coordinator and its coalescing notification slot
// ABOUTME: Uses a scripted geometry provider to simulate terminal resizes mid-render

use gridcat_core::coordinator::RESIZE_MESSAGE;
use gridcat_core::{
    Coordinator, CoordinatorState, EncodedImage, GeometryProvider, GridError, ImageEntry,
    ImageSet, Renderer, ResizeNotifier, TerminalGeometry, resize_channel,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Returns geometries in order, repeating the last one once exhausted.
/// Optionally fires resize notifications while the first render is in progress.
struct ScriptedGeometry {
    sizes: Mutex<VecDeque<TerminalGeometry>>,
    last: Mutex<TerminalGeometry>,
    burst: Mutex<Option<(ResizeNotifier, usize)>>,
}

impl ScriptedGeometry {
    fn new(sizes: &[(u16, u16)]) -> Self {
        let sizes: VecDeque<TerminalGeometry> = sizes
            .iter()
            .map(|&(c, r)| TerminalGeometry::new(c, r))
            .collect();
        let last = *sizes.back().expect("At least one size");
        Self {
            sizes: Mutex::new(sizes),
            last: Mutex::new(last),
            burst: Mutex::new(None),
        }
    }

    fn with_burst(self, notifier: ResizeNotifier, count: usize) -> Self {
        *self.burst.lock().unwrap() = Some((notifier, count));
        self
    }
}

impl GeometryProvider for ScriptedGeometry {
    fn geometry(&self) -> Result<TerminalGeometry, GridError> {
        if let Some((notifier, count)) = self.burst.lock().unwrap().take() {
            for _ in 0..count {
                notifier.notify();
            }
        }

        let mut sizes = self.sizes.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = sizes.pop_front() {
            *last = next;
        }
        Ok(*last)
    }
}

fn images(count: usize) -> ImageSet {
    let mut set = ImageSet::new();
    for i in 0..count {
        set.push(ImageEntry::new(
            format!("img{}.png", i),
            EncodedImage {
                width: 8,
                height: 8,
                payload: vec![i as u8; 4],
            },
        ));
    }
    set.freeze()
}

fn output<G: GeometryProvider>(coordinator: Coordinator<G, Vec<u8>>) -> String {
    String::from_utf8(coordinator.into_renderer().into_writer()).unwrap()
}

#[tokio::test]
async fn test_startup_render_then_close() {
    let (notifier, receiver) = resize_channel();
    notifier.close();

    let geometry = ScriptedGeometry::new(&[(80, 24)]);
    let mut coordinator = Coordinator::new(images(3), geometry, Renderer::plain(Vec::new()));
    coordinator.run(&receiver).await.unwrap();

    assert_eq!(coordinator.render_count(), 1);
    assert_eq!(coordinator.state(), CoordinatorState::Idle);
    let text = output(coordinator);
    assert!(text.starts_with("rows: 1 columns: 3"));
    assert!(!text.contains(RESIZE_MESSAGE));
    assert_eq!(text.matches("data:image/png;base64,").count(), 3);
}

#[tokio::test]
async fn test_notifications_during_render_coalesce_into_one() {
    let (notifier, receiver) = resize_channel();
    let geometry = ScriptedGeometry::new(&[(80, 24), (48, 24)]).with_burst(notifier.clone(), 5);
    notifier.close();

    let mut coordinator = Coordinator::new(images(4), geometry, Renderer::plain(Vec::new()));
    coordinator.run(&receiver).await.unwrap();

    assert_eq!(coordinator.render_count(), 2);
    let text = output(coordinator);
    assert_eq!(text.matches(RESIZE_MESSAGE).count(), 1);
    assert_eq!(text.matches("data:image/png;base64,").count(), 8);
}

#[tokio::test]
async fn test_resize_recomputes_layout_from_fresh_geometry() {
    let (notifier, receiver) = resize_channel();
    let geometry = ScriptedGeometry::new(&[(160, 40), (40, 20)]);
    let mut coordinator = Coordinator::new(images(6), geometry, Renderer::plain(Vec::new()));

    let runner = async {
        coordinator.run(&receiver).await.unwrap();
        coordinator
    };
    let driver = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        notifier.notify();
        notifier.close();
    };
    let (coordinator, ()) = tokio::join!(runner, driver);

    assert_eq!(coordinator.render_count(), 2);
    assert_eq!(coordinator.last_geometry(), Some(TerminalGeometry::new(40, 20)));
    let layout = coordinator.last_layout().unwrap();
    assert_eq!((layout.rows, layout.columns), (3, 2));
    assert_eq!(layout.cell_width, 20);

    let text = output(coordinator);
    assert!(text.starts_with("rows: 1 columns: 6 cell: 26x13\n"));
    assert!(text.contains("Handling window size change (40x20)\nrows: 3 columns: 2 cell: 20x10\n"));
}

#[tokio::test]
async fn test_empty_set_rerenders_message() {
    let (notifier, receiver) = resize_channel();
    notifier.notify();
    notifier.close();

    let geometry = ScriptedGeometry::new(&[(80, 24)]);
    let mut coordinator = Coordinator::new(ImageSet::new(), geometry, Renderer::plain(Vec::new()));
    coordinator.run(&receiver).await.unwrap();

    let text = output(coordinator);
    assert_eq!(text.matches("No images found").count(), 2);
}

#[test]
fn test_render_and_drain_services_pending_flag() {
    let (notifier, receiver) = resize_channel();
    let geometry = ScriptedGeometry::new(&[(80, 24)]).with_burst(notifier.clone(), 3);
    let mut coordinator = Coordinator::new(images(2), geometry, Renderer::plain(Vec::new()));

    let renders = coordinator
        .render_and_drain(gridcat_core::RenderTrigger::Startup, &receiver)
        .unwrap();
    assert_eq!(renders, 2);
    assert!(!receiver.is_pending());
}
