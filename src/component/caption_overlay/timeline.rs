/// 單行字幕的顯示區間 `[start, end)`，單位秒
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionWindow {
    pub start: f64,
    pub end: f64,
}

impl CaptionWindow {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// 來源長度、輸出長度與需要補足的長度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationPlan {
    pub source_seconds: f64,
    pub final_seconds: f64,
    pub pad_seconds: f64,
}

impl DurationPlan {
    /// `target_seconds <= 0` 時沿用來源長度
    #[must_use]
    pub fn new(source_seconds: f64, target_seconds: f64) -> Self {
        let final_seconds = if target_seconds > 0.0 {
            target_seconds
        } else {
            source_seconds
        };
        let pad_seconds = (final_seconds - source_seconds).max(0.0);

        Self {
            source_seconds,
            final_seconds,
            pad_seconds,
        }
    }

    #[must_use]
    pub fn needs_padding(&self) -> bool {
        self.pad_seconds > 0.0
    }
}

/// 將 `[0, total_seconds]` 平均切成 `count` 個連續區間
///
/// 相鄰區間以同一個 `i * step` 為界，最後一段結束時間固定為 `total_seconds`
#[must_use]
pub fn compute_windows(count: usize, total_seconds: f64) -> Vec<CaptionWindow> {
    if count == 0 {
        return Vec::new();
    }

    let step = total_seconds / count as f64;
    let mut windows: Vec<CaptionWindow> = (0..count)
        .map(|i| CaptionWindow {
            start: i as f64 * step,
            end: (i + 1) as f64 * step,
        })
        .collect();

    if let Some(last) = windows.last_mut() {
        last.end = total_seconds;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_pads_when_target_longer() {
        let plan = DurationPlan::new(6.5, 10.0);
        assert!((plan.final_seconds - 10.0).abs() < 1e-9);
        assert!((plan.pad_seconds - 3.5).abs() < 1e-9);
        assert!(plan.needs_padding());
    }

    #[test]
    fn test_plan_trims_without_padding() {
        let plan = DurationPlan::new(20.0, 10.0);
        assert!((plan.final_seconds - 10.0).abs() < 1e-9);
        assert_eq!(plan.pad_seconds, 0.0);
        assert!(!plan.needs_padding());
    }

    #[test]
    fn test_plan_non_positive_target_keeps_source() {
        for target in [0.0, -3.0] {
            let plan = DurationPlan::new(12.25, target);
            assert!((plan.final_seconds - 12.25).abs() < 1e-9);
            assert!(!plan.needs_padding());
        }
    }

    #[test]
    fn test_windows_even_split() {
        let windows = compute_windows(4, 10.0);
        assert_eq!(windows.len(), 4);
        assert!((windows[0].start - 0.0).abs() < 1e-9);
        assert!((windows[0].end - 2.5).abs() < 1e-9);
        assert!((windows[2].start - 5.0).abs() < 1e-9);
        assert_eq!(windows[3].end, 10.0);
    }

    #[test]
    fn test_windows_partition_total() {
        for count in 1..=17 {
            let total = 9.73;
            let windows = compute_windows(count, total);
            assert_eq!(windows.len(), count);
            assert_eq!(windows[0].start, 0.0);
            assert_eq!(windows[count - 1].end, total);
            for pair in windows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            let sum: f64 = windows.iter().map(CaptionWindow::duration).sum();
            assert!((sum - total).abs() < 1e-9);
        }
    }

    #[test]
    fn test_windows_zero_count() {
        assert!(compute_windows(0, 10.0).is_empty());
    }
}
