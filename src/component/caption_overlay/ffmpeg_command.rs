use super::filter_graph::VIDEO_OUTPUT_LABEL;
use super::timeline::DurationPlan;
use crate::config::EncoderSettings;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 將字幕圖片疊加到影片上的 ffmpeg 命令
pub struct OverlayCommand {
    program: String,
    program_args: Vec<String>,
    source_path: PathBuf,
    destination_path: PathBuf,
    caption_images: Vec<PathBuf>,
    filter_graph: String,
    plan: DurationPlan,
    has_audio: bool,
    encoder: EncoderSettings,
}

impl OverlayCommand {
    #[must_use]
    pub fn new(
        source_path: &Path,
        destination_path: &Path,
        caption_images: Vec<PathBuf>,
        filter_graph: String,
        plan: DurationPlan,
        has_audio: bool,
        encoder: EncoderSettings,
    ) -> Self {
        Self {
            program: "ffmpeg".to_string(),
            program_args: Vec::new(),
            source_path: source_path.to_path_buf(),
            destination_path: destination_path.to_path_buf(),
            caption_images,
            filter_graph,
            plan,
            has_audio,
            encoder,
        }
    }

    /// 改用其他執行檔，`leading_args` 會放在 ffmpeg 參數之前
    #[must_use]
    pub fn with_program(mut self, program: &str, leading_args: &[&str]) -> Self {
        self.program = program.to_string();
        self.program_args = leading_args.iter().map(|a| (*a).to_string()).collect();
        self
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    #[must_use]
    pub fn plan(&self) -> &DurationPlan {
        &self.plan
    }

    /// 完整參數列表（不含程式名稱）
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let final_duration = format!("{:.3}", self.plan.final_seconds);

        let mut args: Vec<String> = [
            "-hide_banner",
            "-nostdin",
            "-loglevel",
            "error",
            "-progress",
            "pipe:1",
            "-nostats",
            "-y",
            "-i",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        args.push(self.source_path.to_string_lossy().to_string());

        // 每張字幕圖片以 loop 方式作為獨立輸入，長度與輸出相同
        for image in &self.caption_images {
            args.extend([
                "-loop".to_string(),
                "1".to_string(),
                "-t".to_string(),
                final_duration.clone(),
                "-i".to_string(),
                image.to_string_lossy().to_string(),
            ]);
        }

        args.extend([
            "-filter_complex".to_string(),
            self.filter_graph.clone(),
            "-map".to_string(),
            VIDEO_OUTPUT_LABEL.to_string(),
        ]);

        if self.has_audio {
            args.extend(["-map".to_string(), "0:a".to_string()]);
            if self.plan.needs_padding() {
                args.extend([
                    "-af".to_string(),
                    format!("apad=pad_dur={:.3}", self.plan.pad_seconds),
                ]);
            }
        } else {
            args.push("-an".to_string());
        }

        args.extend([
            "-t".to_string(),
            final_duration,
            "-c:v".to_string(),
            self.encoder.video_codec.clone(),
            "-preset".to_string(),
            self.encoder.preset.clone(),
            "-crf".to_string(),
            self.encoder.crf.to_string(),
        ]);

        if self.has_audio {
            args.extend([
                "-c:a".to_string(),
                self.encoder.audio_codec.clone(),
                "-b:a".to_string(),
                self.encoder.audio_bitrate.clone(),
            ]);
        }

        args.push(self.destination_path.to_string_lossy().to_string());
        args
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.program_args);
        cmd.args(self.build_args());
        cmd
    }
}
