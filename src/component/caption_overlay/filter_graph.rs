use super::timeline::CaptionWindow;

/// filter_complex 最終輸出的視訊標籤
pub const VIDEO_OUTPUT_LABEL: &str = "[vout]";

const SOURCE_VIDEO_LABEL: &str = "[0:v]";
const PADDED_VIDEO_LABEL: &str = "[vbase]";

/// 字幕圖片水平置中、距底部 `bottom_margin` 像素
#[must_use]
pub fn overlay_position(bottom_margin: u32) -> String {
    format!("x=(W-w)/2:y=H-h-{bottom_margin}")
}

/// 建立 filter_complex 字串
///
/// 第 i 張字幕圖片（ffmpeg 輸入 `i`，從 1 開始）只在對應區間顯示，
/// 逐層疊加在前一層輸出上。需要補長度時先以 tpad 複製最後一幀。
#[must_use]
pub fn build_filter_graph(windows: &[CaptionWindow], pad_seconds: f64, bottom_margin: u32) -> String {
    let mut chain = Vec::with_capacity(windows.len() + 1);

    let mut prev = if pad_seconds > 0.0 {
        chain.push(format!(
            "{SOURCE_VIDEO_LABEL}tpad=stop_mode=clone:stop_duration={pad_seconds:.3}{PADDED_VIDEO_LABEL}"
        ));
        PADDED_VIDEO_LABEL.to_string()
    } else {
        SOURCE_VIDEO_LABEL.to_string()
    };

    if windows.is_empty() {
        chain.push(format!("{prev}null{VIDEO_OUTPUT_LABEL}"));
        return chain.join(";");
    }

    let position = overlay_position(bottom_margin);
    for (i, window) in windows.iter().enumerate() {
        let input = i + 1;
        let out = if input == windows.len() {
            VIDEO_OUTPUT_LABEL.to_string()
        } else {
            format!("[v{input}]")
        };

        chain.push(format!(
            "{prev}[{input}:v]overlay={position}:enable='between(t,{:.3},{:.3})'{out}",
            window.start, window.end
        ));
        prev = out;
    }

    chain.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::caption_overlay::timeline::compute_windows;

    #[test]
    fn test_single_caption_without_padding() {
        let graph = build_filter_graph(&compute_windows(1, 8.0), 0.0, 250);
        assert_eq!(
            graph,
            "[0:v][1:v]overlay=x=(W-w)/2:y=H-h-250:enable='between(t,0.000,8.000)'[vout]"
        );
    }

    #[test]
    fn test_chain_with_padding() {
        let graph = build_filter_graph(&compute_windows(3, 9.0), 2.5, 250);
        let parts: Vec<&str> = graph.split(';').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "[0:v]tpad=stop_mode=clone:stop_duration=2.500[vbase]");
        assert_eq!(
            parts[1],
            "[vbase][1:v]overlay=x=(W-w)/2:y=H-h-250:enable='between(t,0.000,3.000)'[v1]"
        );
        assert_eq!(
            parts[2],
            "[v1][2:v]overlay=x=(W-w)/2:y=H-h-250:enable='between(t,3.000,6.000)'[v2]"
        );
        assert_eq!(
            parts[3],
            "[v2][3:v]overlay=x=(W-w)/2:y=H-h-250:enable='between(t,6.000,9.000)'[vout]"
        );
    }

    #[test]
    fn test_custom_bottom_margin() {
        let graph = build_filter_graph(&compute_windows(1, 1.0), 0.0, 80);
        assert!(graph.contains("y=H-h-80"));
    }

    #[test]
    fn test_no_captions_passes_video_through() {
        assert_eq!(build_filter_graph(&[], 0.0, 250), "[0:v]null[vout]");
        assert_eq!(
            build_filter_graph(&[], 1.0, 250),
            "[0:v]tpad=stop_mode=clone:stop_duration=1.000[vbase];[vbase]null[vout]"
        );
    }
}
