mod ffprobe_info;
mod font_locator;
mod path_validator;

pub use ffprobe_info::{VideoInfo, get_video_info};
pub use font_locator::{
    DEFAULT_FONT_PATHS, FONT_PATH_ENV, LoadedFont, font_candidates, locate_font,
};
pub use path_validator::{ensure_directory_exists, ensure_parent_directory, validate_file_exists};
