use super::caption_renderer::CaptionRenderer;
use super::encode_runner::EncodeRunner;
use super::ffmpeg_command::OverlayCommand;
use super::filter_graph::build_filter_graph;
use super::text_chunker::split_words;
use super::timeline::{CaptionWindow, DurationPlan, compute_windows};
use crate::config::OverlaySettings;
use crate::tools::{ensure_parent_directory, get_video_info, locate_font, validate_file_exists};
use anyhow::{Context, Result, bail};
use console::style;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 暫存資料夾前綴
const TEMP_DIR_PREFIX: &str = "caption_overlay_";

/// 一次疊加作業的輸入
#[derive(Debug, Clone)]
pub struct OverlayRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub text: String,
    /// `<= 0` 表示沿用來源長度
    pub target_seconds: f64,
    /// 明確指定的字型檔
    pub font: Option<PathBuf>,
}

/// 疊加作業結果
#[derive(Debug)]
pub struct OverlayResult {
    pub output_path: PathBuf,
    pub plan: DurationPlan,
    pub lines: Vec<String>,
    pub windows: Vec<CaptionWindow>,
}

/// 字幕疊加流程
///
/// 1. ffprobe 取得來源長度
/// 2. 切分字幕行
/// 3. 繪製字幕圖片到暫存資料夾
/// 4. 計算每行的顯示區間
/// 5. 組合 filter_complex 並執行 ffmpeg
pub struct CaptionOverlay {
    settings: OverlaySettings,
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl CaptionOverlay {
    pub const fn new(settings: OverlaySettings, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            settings,
            shutdown_signal,
            show_progress: true,
        }
    }

    /// 關閉終端機進度條（測試或非互動環境使用）
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn run(&self, request: &OverlayRequest) -> Result<OverlayResult> {
        if !request.target_seconds.is_finite() {
            bail!("目標長度必須是有效數字: {}", request.target_seconds);
        }
        validate_file_exists(&request.input)?;
        if request.input == request.output {
            bail!("輸出檔案不可與輸入相同: {}", request.output.display());
        }
        ensure_parent_directory(&request.output)?;

        let video_info = get_video_info(&request.input)?;
        let plan = DurationPlan::new(video_info.duration_seconds, request.target_seconds);
        info!(
            "來源長度 {:.3}s，輸出長度 {:.3}s，補長 {:.3}s",
            plan.source_seconds, plan.final_seconds, plan.pad_seconds
        );

        let lines = split_words(&request.text, self.settings.words_per_line);
        info!("字幕共 {} 行", lines.len());

        let font = locate_font(request.font.as_deref())?;

        // TempDir 在離開作用域時自動刪除，包含錯誤路徑
        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .context("無法建立暫存資料夾")?;

        let renderer = CaptionRenderer::new(&font.font);
        let captions = renderer.render_all(&lines, temp_dir.path())?;

        let windows = compute_windows(captions.len(), plan.final_seconds);
        for (caption, window) in captions.iter().zip(&windows) {
            debug!(
                "字幕 [{}] {:.3}s - {:.3}s, {}px ({}): {}",
                caption.index,
                window.start,
                window.end,
                caption.font_size,
                font.path.display(),
                caption.text
            );
        }
        let filter_graph =
            build_filter_graph(&windows, plan.pad_seconds, self.settings.bottom_margin);

        let command = OverlayCommand::new(
            &request.input,
            &request.output,
            captions.iter().map(|c| c.path.clone()).collect(),
            filter_graph,
            plan,
            video_info.has_audio,
            self.settings.encoder.clone(),
        );

        println!("{}", style("開始疊加字幕...").cyan());
        EncodeRunner::new(Arc::clone(&self.shutdown_signal), self.show_progress).run(&command)?;

        Ok(OverlayResult {
            output_path: request.output.clone(),
            plan,
            lines,
            windows,
        })
    }

    pub fn print_summary(&self, result: &OverlayResult) {
        println!();
        println!("{}", style("=== 字幕疊加摘要 ===").cyan().bold());
        println!("  輸出: {}", style(result.output_path.display()).green());
        println!("  字幕行數: {}", result.lines.len());
        println!(
            "  長度: {:.3}s（來源 {:.3}s）",
            result.plan.final_seconds, result.plan.source_seconds
        );
        if result.plan.needs_padding() {
            println!(
                "  {}",
                style(format!("已補長 {:.3}s", result.plan.pad_seconds)).yellow()
            );
        }
        for (line, window) in result.lines.iter().zip(&result.windows) {
            println!(
                "  {}",
                style(format!("[{:>7.3} - {:>7.3}] {line}", window.start, window.end)).dim()
            );
        }

        info!(
            "字幕疊加完成 - {} 行, {:.3}s -> {}",
            result.lines.len(),
            result.plan.final_seconds,
            result.output_path.display()
        );
    }
}
