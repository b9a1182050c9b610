use serde::{Deserialize, Serialize};

pub const DEFAULT_WORDS_PER_LINE: usize = 5;
pub const DEFAULT_BOTTOM_MARGIN: u32 = 250;
pub const DEFAULT_TARGET_SECONDS: f64 = 10.0;

/// 字幕疊加的可調整設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// 每行字幕的單字數
    pub words_per_line: usize,
    /// 字幕圖片底緣距離畫面底部的像素
    pub bottom_margin: u32,
    pub encoder: EncoderSettings,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            words_per_line: DEFAULT_WORDS_PER_LINE,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
            encoder: EncoderSettings::default(),
        }
    }
}

/// 輸出編碼參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 20,
            audio_codec: "aac".to_string(),
            audio_bitrate: "160k".to_string(),
        }
    }
}
