use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// 來源影片的探測結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub has_audio: bool,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片長度與是否含音訊
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let info = parse_ffprobe_json(&stdout)
        .with_context(|| format!("無法解析影片資訊: {}", path.display()))?;

    debug!(
        "ffprobe: {} 長度 {:.3}s, 音訊: {}",
        path.display(),
        info.duration_seconds,
        info.has_audio
    );

    Ok(info)
}

/// 解析 ffprobe 的 JSON 輸出
///
/// 長度優先取 format，其次取第一個視訊串流
fn parse_ffprobe_json(raw: &str) -> Result<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_str(raw).context("無法解析 ffprobe 輸出")?;
    let streams = probe.streams.unwrap_or_default();

    let stream_duration = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .and_then(|s| s.duration.as_deref());

    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(stream_duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| anyhow::anyhow!("無法取得影片長度"))?;

    let has_audio = streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoInfo {
        duration_seconds,
        has_audio,
    })
}
