pub mod load;
pub mod types;

pub use types::{
    DEFAULT_BOTTOM_MARGIN, DEFAULT_TARGET_SECONDS, DEFAULT_WORDS_PER_LINE, EncoderSettings,
    OverlaySettings,
};
