//! 字幕疊加元件
//!
//! 將文字切成固定單字數的字幕行，繪製成半透明底框 PNG，
//! 再以 ffmpeg overlay 濾鏡依時間區間燒錄到影片上

mod caption_renderer;
mod encode_runner;
mod ffmpeg_command;
mod filter_graph;
mod font_fitter;
mod main;
mod text_chunker;
mod timeline;

pub use caption_renderer::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CaptionRenderer, RenderedCaption, caption_file_name,
};
pub use encode_runner::EncodeRunner;
pub use ffmpeg_command::OverlayCommand;
pub use filter_graph::{VIDEO_OUTPUT_LABEL, build_filter_graph, overlay_position};
pub use font_fitter::{FONT_SIZE_CANDIDATES, MIN_FONT_SIZE, fit_font_size};
pub use main::{CaptionOverlay, OverlayRequest, OverlayResult};
pub use text_chunker::{EMPTY_PLACEHOLDER, split_words};
pub use timeline::{CaptionWindow, DurationPlan, compute_windows};
