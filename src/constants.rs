use std::time::Duration;

pub const RENDER_WIDTH: i32 = 1920;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the render texture
pub const FPS: u32 = 60;                      // Frames per second

pub const TICK_INTERVAL: Duration = Duration::from_millis(6000); // Time between two crossfades
pub const SWAP_DELAY: Duration = Duration::from_millis(350);     // Outgoing layer keeps its image this long after a tick
pub const FADE_DURATION: f32 = 0.3;                              // Opacity transition of a stage layer (seconds), must end before SWAP_DELAY

// Structural markers of the slider element and its two layers
pub const IMAGES_ATTRIBUTE: &str = "data-hero-images";
pub const LAYER_A_SELECTOR: &str = ".hero-bg.hero-bg-a";
pub const LAYER_B_SELECTOR: &str = ".hero-bg.hero-bg-b";
pub const VISIBLE_CLASS: &str = "is-visible";

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];
pub const DECODABLE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"]; // What the raylib stage can turn into textures
pub const FALLBACK_DIR_LIMIT: usize = 6;      // Images taken from the fallback directory
pub const MIN_DIR_IMAGES: usize = 2;          // A directory with fewer images falls through to the next source
