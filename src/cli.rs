use crate::component::caption_overlay::OverlayRequest;
use crate::config::{DEFAULT_TARGET_SECONDS, OverlaySettings};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// 將文字字幕渲染成圖片並燒錄到影片
#[derive(Parser, Debug)]
#[command(name = "caption-overlay", version)]
#[command(about = "Render caption overlays as PNG and burn them into a video")]
pub struct Cli {
    /// 來源影片
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// 輸出影片
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// 字幕文字
    #[arg(long)]
    pub text: String,

    /// 輸出長度（秒），小於等於 0 時沿用來源長度
    #[arg(long, default_value_t = DEFAULT_TARGET_SECONDS, allow_negative_numbers = true)]
    pub target_seconds: f64,

    /// 字型檔路徑，未指定時依序嘗試 CAPTION_FONT_PATH 與系統預設字型
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// JSON 設定檔
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 每行字幕的單字數（覆寫設定檔）
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub words_per_line: Option<u16>,

    /// 顯示除錯日誌
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 載入設定檔並套用命令列覆寫
    pub fn settings(&self) -> Result<OverlaySettings> {
        let mut settings = OverlaySettings::load(self.config.as_deref())?;
        if let Some(words) = self.words_per_line {
            settings.words_per_line = usize::from(words);
        }
        Ok(settings)
    }

    #[must_use]
    pub fn request(&self) -> OverlayRequest {
        OverlayRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            text: self.text.clone(),
            target_seconds: self.target_seconds,
            font: self.font.clone(),
        }
    }
}
