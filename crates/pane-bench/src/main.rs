use std::io;
use std::time::{Duration, Instant};

use clap::Parser;

use pane_wm::layout::Rectangle;
use pane_wm::{Document, ManagerOptions, PaneId, PaneSpec, PointerEvent, WindowManager};

const CONTAINER_ID: &str = "bench-desktop";

#[derive(Parser, Debug)]
#[command(
    name = "pane-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless benchmark for pane lifecycle and pointer gestures"
)]
struct BenchCli {
    /// Panes kept open while gestures run.
    #[arg(short = 'p', long = "panes", value_name = "COUNT", default_value_t = 16)]
    panes: usize,

    /// Drag-then-resize rounds over every pane.
    #[arg(short = 'r', long = "rounds", value_name = "COUNT", default_value_t = 200)]
    rounds: usize,

    /// Desktop size in pixels.
    #[arg(long = "width", default_value_t = 1920.0)]
    width: f64,

    #[arg(long = "height", default_value_t = 1080.0)]
    height: f64,
}

struct BenchConfig {
    panes: usize,
    rounds: usize,
    width: f64,
    height: f64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=512).contains(&cli.panes) {
            return Err("panes must be between 1 and 512".to_string());
        }
        if !(1..=100_000).contains(&cli.rounds) {
            return Err("rounds must be between 1 and 100000".to_string());
        }
        if cli.width < 320.0 || cli.height < 240.0 {
            return Err("desktop must be at least 320x240".to_string());
        }
        Ok(Self {
            panes: cli.panes,
            rounds: cli.rounds,
            width: cli.width,
            height: cli.height,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let mut wm = desktop(&config).map_err(io::Error::other)?;
    let stats = run_benchmark(&mut wm, &config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn desktop(config: &BenchConfig) -> Result<WindowManager, pane_wm::ConfigError> {
    let mut document = Document::new();
    let container = document.create_element("div");
    document.set_attribute(container, "id", CONTAINER_ID);
    document.set_size(container, config.width, config.height);
    let body = document.body();
    document.append_child(body, container);
    WindowManager::new(document, CONTAINER_ID, ManagerOptions::default())
}

fn run_benchmark(wm: &mut WindowManager, config: &BenchConfig) -> BenchStats {
    let mut stats = BenchStats::new();

    let open_start = Instant::now();
    let panes: Vec<PaneId> = (0..config.panes)
        .filter_map(|i| {
            wm.show_window(PaneSpec {
                width: Some(240.0),
                height: Some(160.0),
                top: Some(20.0 + (i % 16) as f64 * 24.0),
                left: Some(20.0 + (i % 16) as f64 * 32.0),
                ..PaneSpec::new(format!("Bench {i}"), "<p>bench</p>")
            })
        })
        .collect();
    wm.settle();
    stats.open_time = open_start.elapsed();

    for _ in 0..config.rounds {
        for id in &panes {
            let Some(rect) = wm.pane(*id).map(|p| p.geometry()) else {
                continue;
            };
            let start = Instant::now();
            stats.moved += drag(wm, rect) as u64;
            stats.record_gesture(start.elapsed());

            let Some(rect) = wm.pane(*id).map(|p| p.geometry()) else {
                continue;
            };
            let start = Instant::now();
            stats.resized += resize(wm, rect) as u64;
            stats.record_gesture(start.elapsed());
        }
    }

    let close_start = Instant::now();
    for id in panes {
        wm.close_window(id, None);
    }
    wm.settle();
    stats.close_time = close_start.elapsed();
    stats.mark_completed();
    stats
}

/// Grabs the titlebar and wiggles the pane. Returns whether the release
/// reached a listener.
fn drag(wm: &mut WindowManager, rect: Rectangle) -> bool {
    let (x, y) = (rect.left() + 12.0, rect.top() + 10.0);
    wm.handle_pointer(PointerEvent::down(x, y));
    wm.handle_pointer(PointerEvent::moved(x + 6.0, y + 4.0));
    wm.handle_pointer(PointerEvent::moved(x, y));
    wm.handle_pointer(PointerEvent::up(x, y))
}

/// Grabs the bottom-right corner, grows the pane, then shrinks it back.
fn resize(wm: &mut WindowManager, rect: Rectangle) -> bool {
    let (x, y) = (rect.right() - 2.0, rect.bottom() - 2.0);
    wm.handle_pointer(PointerEvent::down(x, y));
    wm.handle_pointer(PointerEvent::moved(x + 8.0, y + 8.0));
    wm.handle_pointer(PointerEvent::moved(x, y));
    wm.handle_pointer(PointerEvent::up(x, y))
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    open_time: Duration,
    close_time: Duration,
    gestures: u64,
    moved: u64,
    resized: u64,
    total_gesture_time: Duration,
    fastest_gesture: Duration,
    slowest_gesture: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            open_time: Duration::ZERO,
            close_time: Duration::ZERO,
            gestures: 0,
            moved: 0,
            resized: 0,
            total_gesture_time: Duration::ZERO,
            fastest_gesture: Duration::MAX,
            slowest_gesture: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_gesture(&mut self, time: Duration) {
        self.gestures = self.gestures.saturating_add(1);
        self.total_gesture_time += time;
        self.fastest_gesture = self.fastest_gesture.min(time);
        self.slowest_gesture = self.slowest_gesture.max(time);
    }

    fn average_gesture_us(&self) -> f64 {
        if self.gestures == 0 {
            return 0.0;
        }
        self.total_gesture_time.as_secs_f64() / self.gestures as f64 * 1_000_000.0
    }

    fn fastest_gesture_us(&self) -> f64 {
        if self.gestures == 0 {
            return 0.0;
        }
        self.fastest_gesture.as_secs_f64() * 1_000_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        indoc::formatdoc!(
            r#"
            Pane bench finished in {elapsed:.2}s.
            Desktop: {width}x{height} px | Panes: {panes} | Rounds: {rounds}
            Open + settle: {open:.2} ms | Close + settle: {close:.2} ms
            Gestures: {gestures} ({moved} drags, {resized} resizes handled)
            Per gesture: avg {avg:.1} us | best {best:.1} us | worst {worst:.1} us
            "#,
            elapsed = self.elapsed().as_secs_f64(),
            width = config.width,
            height = config.height,
            panes = config.panes,
            rounds = config.rounds,
            open = self.open_time.as_secs_f64() * 1_000.0,
            close = self.close_time.as_secs_f64() * 1_000.0,
            gestures = self.gestures,
            moved = self.moved,
            resized = self.resized,
            avg = self.average_gesture_us(),
            best = self.fastest_gesture_us(),
            worst = self.slowest_gesture.as_secs_f64() * 1_000_000.0,
        )
    }
}
