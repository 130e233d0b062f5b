use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use raylib::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crossfade::constants::*;
use crossfade::texture_loader::is_decodable;
use crossfade::{ImageList, ImageSources, Layer, MemoryHost, SliderController, Stage};

/// Crossfade through a directory of images on two alternating layers.
#[derive(Parser, Debug)]
#[command(name = "crossfade", version)]
struct Args {
    /// Directory holding the slideshow images
    dir: Option<PathBuf>,

    /// Raw JSON image list, used instead of directory discovery
    #[arg(long, value_name = "JSON")]
    images: Option<String>,

    /// Directory used when DIR has fewer than two images
    #[arg(long, value_name = "DIR")]
    fallback_dir: Option<PathBuf>,

    /// Single image used when no directory has enough images
    #[arg(long, value_name = "PATH")]
    fallback_image: Option<PathBuf>,

    /// Randomize the image order
    #[arg(long)]
    shuffle: bool,

    /// Print layer changes instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = 4)]
    ticks: u64,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // The window can only show what raylib decodes
    let attribute = images_attribute(&args, !args.headless);
    if args.headless {
        run_headless(&attribute, args.ticks)
    } else {
        run_window(&attribute)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The value handed to the slider as its image list attribute. An explicit
/// `--images` value is passed through untouched unless it has to be shuffled.
fn images_attribute(args: &Args, decodable_only: bool) -> String {
    if let Some(raw) = &args.images {
        if !args.shuffle {
            return raw.clone();
        }
        return match ImageList::parse(raw) {
            Ok(mut list) => {
                list.shuffle(&mut rand::rng());
                list.to_attribute()
            }
            Err(_) => raw.clone(),
        };
    }

    let sources = ImageSources {
        primary_dir: args.dir.clone(),
        fallback_dir: args.fallback_dir.clone(),
        fallback_image: args.fallback_image.clone(),
    };
    let mut list = if decodable_only {
        sources.resolve_with(is_decodable)
    } else {
        sources.resolve()
    };
    if args.shuffle {
        list.shuffle(&mut rand::rng());
    }
    list.to_attribute()
}

fn run_headless(attribute: &str, ticks: u64) -> Result<()> {
    let host = MemoryHost::new().with_attribute(IMAGES_ATTRIBUTE, attribute);
    let Some(mut slider) = SliderController::mount(Some(host)) else {
        info!("slider inactive");
        return Ok(());
    };

    let mut now = Duration::ZERO;
    print_layers(&slider, now);

    while slider.ticks() < ticks || slider.pending_swap().is_some() {
        let Some(next_tick) = slider.next_tick() else { break };
        let step = slider.pending_swap().map_or(next_tick, |swap| swap.min(next_tick));
        slider.update(step);
        now += step;
        print_layers(&slider, now);
    }

    slider.stop();
    Ok(())
}

fn print_layers(slider: &SliderController<MemoryHost>, now: Duration) {
    let describe = |layer: Layer| {
        slider
            .host()
            .layer(layer)
            .map(|l| format!("{}{}", l.image().unwrap_or("-"), if l.is_visible() { " *" } else { "" }))
            .unwrap_or_default()
    };
    println!(
        "{:>7}ms  index {:<3} A: {:<30} B: {}",
        now.as_millis(),
        slider.state().index(),
        describe(Layer::A),
        describe(Layer::B)
    );
}

fn run_window(attribute: &str) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Crossfade Slideshow")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let Some(mut slider) = SliderController::mount(Some(Stage::new(attribute))) else {
        info!("slider inactive");
        return Ok(());
    };

    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow!("failed to create render texture: {}", e))?;

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        slider.update(Duration::from_secs_f32(dt.max(0.0)));

        let stage = slider.host_mut();
        stage.update(dt);
        stage.load_textures(&mut rl, &thread);

        // --- Render into the fixed size framebuffer ---
        let stage = slider.host();
        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            stage.draw(&mut d);
        });

        // Render textures are stored upside down, draw it flipped to the window
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }

    slider.stop();
    Ok(())
}
