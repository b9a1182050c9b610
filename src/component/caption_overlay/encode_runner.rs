use super::ffmpeg_command::OverlayCommand;
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{ChildStderr, ChildStdout, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 執行疊加編碼並回報進度
pub struct EncodeRunner {
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl EncodeRunner {
    #[must_use]
    pub const fn new(shutdown_signal: Arc<AtomicBool>, show_progress: bool) -> Self {
        Self {
            shutdown_signal,
            show_progress,
        }
    }

    /// 執行 ffmpeg 直到結束；失敗或中斷時刪除不完整的輸出檔
    pub fn run(&self, command: &OverlayCommand) -> Result<()> {
        let destination = command.destination_path();
        let total_ms = (command.plan().final_seconds * 1000.0).round() as u64;

        let mut cmd = command.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        debug!("ffmpeg 命令: {cmd:?}");

        let mut child = cmd.spawn().context("無法執行 ffmpeg")?;
        info!("啟動編碼 [{}] -> {}", child.id(), destination.display());

        let progress = self.create_progress_bar(total_ms)?;
        let progress_reader = Self::spawn_progress_reader(child.stdout.take(), progress.clone());
        let stderr_reader = Self::spawn_stderr_reader(child.stderr.take());

        let status: ExitStatus = loop {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷信號，終止 ffmpeg [{}]", child.id());
                let _ = child.kill();
                let _ = child.wait();
                progress.abandon();
                remove_partial_output(destination);
                bail!("操作已取消");
            }

            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    progress.abandon();
                    remove_partial_output(destination);
                    return Err(e).context("無法檢查 ffmpeg 程序狀態");
                }
            }
        };

        if let Some(handle) = progress_reader {
            let _ = handle.join();
        }
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            progress.abandon();
            remove_partial_output(destination);
            let detail = stderr.trim();
            error!("ffmpeg 編碼失敗 ({status}): {detail}");
            bail!(
                "ffmpeg 編碼失敗 ({status}): {}",
                if detail.is_empty() { "未知錯誤" } else { detail }
            );
        }

        progress.finish_and_clear();
        if !stderr.trim().is_empty() {
            warn!("ffmpeg 輸出訊息: {}", stderr.trim());
        }
        info!("編碼完成: {}", destination.display());
        Ok(())
    }

    fn create_progress_bar(&self, total_ms: u64) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let bar = ProgressBar::new(total_ms.max(1));
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {msg}",
            )?
            .progress_chars("=>-"),
        );
        bar.set_message("編碼中");
        Ok(bar)
    }

    /// 從 ffmpeg `-progress` 輸出讀取目前時間
    fn spawn_progress_reader(
        stdout: Option<ChildStdout>,
        progress: ProgressBar,
    ) -> Option<JoinHandle<()>> {
        let stdout = stdout?;

        Some(thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            while let Ok(bytes) = reader.read_line(&mut line) {
                if bytes == 0 {
                    break;
                }

                match parse_progress_line(line.trim()) {
                    Some(ProgressUpdate::Position(ms)) => progress.set_position(ms),
                    Some(ProgressUpdate::End) => {
                        if let Some(len) = progress.length() {
                            progress.set_position(len);
                        }
                    }
                    None => {}
                }

                line.clear();
            }
        }))
    }

    fn spawn_stderr_reader(stderr: Option<ChildStderr>) -> Option<JoinHandle<String>> {
        let mut stderr = stderr?;

        Some(thread::spawn(move || {
            let mut buffer = String::new();
            let _ = stderr.read_to_string(&mut buffer);
            buffer
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressUpdate {
    Position(u64),
    End,
}

/// 解析 `-progress` 的 `key=value` 行
fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let (key, value) = line.split_once('=')?;
    match key {
        // ffmpeg 的 out_time_ms 實際單位為微秒
        "out_time_us" | "out_time_ms" => value
            .parse::<u64>()
            .ok()
            .map(|us| ProgressUpdate::Position(us / 1000)),
        "out_time" => parse_clock_ms(value).map(ProgressUpdate::Position),
        "progress" if value == "end" => Some(ProgressUpdate::End),
        _ => None,
    }
}

/// 解析 `HH:MM:SS.micro` 為毫秒
fn parse_clock_ms(raw: &str) -> Option<u64> {
    let mut parts = raw.split(':');
    let h = parts.next()?.parse::<u64>().ok()?;
    let m = parts.next()?.parse::<u64>().ok()?;
    let s_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (s, micros) = match s_part.split_once('.') {
        Some((sec, frac)) => (sec.parse::<u64>().ok()?, parse_fraction_micros(frac)),
        None => (s_part.parse::<u64>().ok()?, 0),
    };
    Some((h * 3600 + m * 60 + s) * 1000 + micros / 1000)
}

/// 小數部分換算成微秒，不足 6 位補零、超過則截斷
fn parse_fraction_micros(frac: &str) -> u64 {
    let digits: String = frac.chars().take(6).collect();
    format!("{digits:0<6}").parse().unwrap_or(0)
}

fn remove_partial_output(path: &Path) {
    if !path.exists() {
        return;
    }

    match fs::remove_file(path) {
        Ok(()) => info!("已刪除不完整的輸出檔案: {}", path.display()),
        Err(e) => error!("無法刪除不完整的輸出檔案 {}: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::caption_overlay::timeline::DurationPlan;
    use crate::config::EncoderSettings;
    use tempfile::TempDir;

    /// 以 `sh -c script` 取代 ffmpeg，script 的 `$@` 為完整 ffmpeg 參數
    fn scripted_command(dir: &TempDir, script: &str) -> OverlayCommand {
        OverlayCommand::new(
            &dir.path().join("in.mp4"),
            &dir.path().join("out.mp4"),
            vec![dir.path().join("cap_1.png")],
            "[0:v][1:v]overlay[vout]".to_string(),
            DurationPlan::new(2.0, 2.0),
            true,
            EncoderSettings::default(),
        )
        .with_program("sh", &["-c", script])
    }

    fn runner(cancelled: bool) -> EncodeRunner {
        EncodeRunner::new(Arc::new(AtomicBool::new(cancelled)), false)
    }

    #[test]
    fn test_run_success_keeps_output() {
        let dir = TempDir::new().unwrap();
        let command = scripted_command(
            &dir,
            r#"for last; do :; done; echo video > "$last"; echo out_time_us=2000000; echo progress=end"#,
        );

        runner(false).run(&command).unwrap();
        assert!(command.destination_path().exists());
    }

    #[test]
    fn test_run_failure_removes_output_and_reports_stderr() {
        let dir = TempDir::new().unwrap();
        let command = scripted_command(
            &dir,
            r#"for last; do :; done; echo partial > "$last"; echo "encoder exploded" >&2; exit 1"#,
        );

        let err = runner(false).run(&command).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ffmpeg 編碼失敗"), "{message}");
        assert!(message.contains("encoder exploded"), "{message}");
        assert!(!command.destination_path().exists(), "失敗時應刪除不完整的輸出");
    }

    #[test]
    fn test_run_failure_without_stderr() {
        let dir = TempDir::new().unwrap();
        let command = scripted_command(&dir, "exit 3");

        let err = runner(false).run(&command).unwrap_err();
        assert!(err.to_string().contains("未知錯誤"));
    }

    #[test]
    fn test_run_cancelled_kills_and_removes_output() {
        let dir = TempDir::new().unwrap();
        let command = scripted_command(&dir, "sleep 5");
        fs::write(command.destination_path(), b"partial").unwrap();

        let err = runner(true).run(&command).unwrap_err();
        assert!(err.to_string().contains("操作已取消"));
        assert!(!command.destination_path().exists(), "中斷時應刪除不完整的輸出");
    }

    #[test]
    fn test_run_missing_program() {
        let dir = TempDir::new().unwrap();
        let command = scripted_command(&dir, "exit 0").with_program("/nonexistent/ffmpeg", &[]);

        let err = runner(false).run(&command).unwrap_err();
        assert!(err.to_string().contains("無法執行 ffmpeg"));
    }

    #[test]
    fn test_parse_out_time_microseconds() {
        assert_eq!(
            parse_progress_line("out_time_us=2500000"),
            Some(ProgressUpdate::Position(2500))
        );
        assert_eq!(
            parse_progress_line("out_time_ms=1000000"),
            Some(ProgressUpdate::Position(1000))
        );
    }

    #[test]
    fn test_parse_out_time_clock() {
        assert_eq!(
            parse_progress_line("out_time=00:01:02.500000"),
            Some(ProgressUpdate::Position(62_500))
        );
        assert_eq!(parse_clock_ms("01:00:00"), Some(3_600_000));
        assert_eq!(parse_clock_ms("00:00:01.5"), Some(1500));
        assert_eq!(parse_clock_ms("00:00:02.25"), Some(2250));
        assert_eq!(parse_clock_ms("00:00:00.1234567"), Some(123));
        assert_eq!(parse_clock_ms("bad"), None);
        assert_eq!(parse_clock_ms("00:00:01:00"), None);
    }

    #[test]
    fn test_parse_progress_end_and_noise() {
        assert_eq!(parse_progress_line("progress=end"), Some(ProgressUpdate::End));
        assert_eq!(parse_progress_line("progress=continue"), None);
        assert_eq!(parse_progress_line("speed=1.5x"), None);
        assert_eq!(parse_progress_line("out_time_us=N/A"), None);
        assert_eq!(parse_progress_line("garbage"), None);
    }

    #[test]
    fn test_remove_partial_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.mp4");
        fs::write(&path, b"partial").unwrap();

        remove_partial_output(&path);
        assert!(!path.exists());
        // 不存在時不應出錯
        remove_partial_output(&path);
    }
}
