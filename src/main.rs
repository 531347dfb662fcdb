// What you SEE:
// • Colored bands with a grid slowly scroll upward.
// • The top of the window is blurred, fading to sharp toward the bottom.
// • B toggles the blur. Up/Down change the radius. M pins the blur to the top 96 px
//   (mirrored bottom inset) or releases it. ESC quits.
// • Resize the window: the mask is rebuilt once per frame for the new size.
//
// Optional first argument: path to a TOML config (blur_radius, insets, is_active).

mod draw;

use std::time::{Duration, Instant};

use minifb::Key;
use tracing::info;
use tracing_subscriber::EnvFilter;

use draw::{Drawer, draw_content, draw_text_5x7};
use progressive_blur::{
    Content, Error, FrameBuffer, Inset, Insets, LinearGradient, MorphConfig, ProgressiveBlurView,
    SoftwareBlur,
};

const RADIUS_STEP: f32 = 2.0;
const PINNED_BAND: f32 = 96.0;

/// The content being blurred: scrolling bands.
struct Bands {
    scroll: usize,
}

impl Content for Bands {
    fn render(&self, out: &mut FrameBuffer) {
        draw_content(out, self.scroll);
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MorphConfig::load(path)?,
        None => MorphConfig { blur_radius: 16.0, ..MorphConfig::default() },
    };
    info!(?config, "starting progressive blur demo");

    /* --- Window + view ---
       Visual: window opens; content appears with the gradient blur on top. */
    let mut drawer = Drawer::new("Progressive Blur", 640, 480)?;
    let mut view = ProgressiveBlurView::new(
        config,
        Bands { scroll: 0 },
        LinearGradient::top_to_bottom(),
    );
    let mut blur = SoftwareBlur::new();

    let mut active = config.is_active;
    let mut radius = config.blur_radius;
    let mut pinned = false;

    let mut size = drawer.size();
    view.on_resize(size);
    let mut screen = FrameBuffer::new(0, 0);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Inputs */
        if drawer.pressed_once(Key::B) {
            active = !active;
            view.set_active(active); // visual: blur disappears/reappears immediately
        }
        if drawer.pressed_repeating(Key::Up) {
            radius += RADIUS_STEP;
            view.set_radius(radius);
        }
        if drawer.pressed_repeating(Key::Down) {
            radius = (radius - RADIUS_STEP).max(0.0);
            view.set_radius(radius);
        }
        if drawer.pressed_once(Key::M) {
            pinned = !pinned;
            let insets = if pinned {
                Insets::default().with_bottom(Inset::Fixed(PINNED_BAND).mirrored())
            } else {
                config.insets
            };
            view.set_insets(insets); // visual: blur shrinks to a top band (or grows back)
        }

        /* 2) Resize notifications; the view coalesces them until the turn below */
        let current = drawer.size();
        if current != size {
            size = current;
            view.on_resize(size);
        }

        /* 3) One layout turn per frame */
        view.run_turn();

        /* 4) Content + blur */
        view.content_mut().scroll += 1;
        // A minimized window reports 0x0; keep presenting a single pixel
        screen.resize((size.width as usize).max(1), (size.height as usize).max(1));
        view.render(&mut blur, &mut screen)?;

        /* 5) HUD */
        let status = if active { "BLUR ON" } else { "BLUR OFF" };
        let band = if pinned { "TOP BAND" } else { "FULL" };
        let hud = format!("{status} | R: {radius:.0} | {band} | {hud_fps_text}");
        let hud_y = screen.height as i32 - 16;
        draw_text_5x7(&mut screen, 8, hud_y, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        /* 6) FPS counter */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            hud_fps_text = format!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
