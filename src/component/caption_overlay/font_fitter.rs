/// 字型大小候選，由大到小
pub const FONT_SIZE_CANDIDATES: [u32; 8] = [62, 58, 54, 50, 46, 42, 38, 34];

/// 所有候選都放不下時使用的字型大小
pub const MIN_FONT_SIZE: u32 = 30;

/// 選出寬度不超過 `max_width` 的最大字型大小
///
/// `measure` 回傳指定大小下的文字寬度（含描邊）
pub fn fit_font_size<F>(max_width: u32, mut measure: F) -> u32
where
    F: FnMut(u32) -> u32,
{
    FONT_SIZE_CANDIDATES
        .into_iter()
        .find(|&size| measure(size) <= max_width)
        .unwrap_or(MIN_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 每個字元寬度約為字型大小的一半
    fn half_em(chars: u32) -> impl FnMut(u32) -> u32 {
        move |size| chars * size / 2
    }

    #[test]
    fn test_short_text_gets_largest() {
        assert_eq!(fit_font_size(910, half_em(10)), 62);
    }

    #[test]
    fn test_picks_first_fitting_size() {
        // 30 字元: 62 -> 930, 58 -> 870
        assert_eq!(fit_font_size(910, half_em(30)), 58);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        // 20 字元 * 46 / 2 = 460
        assert_eq!(fit_font_size(460, half_em(20)), 46);
    }

    #[test]
    fn test_falls_back_to_minimum() {
        assert_eq!(fit_font_size(100, half_em(80)), MIN_FONT_SIZE);
    }

    #[test]
    fn test_stops_at_first_fit() {
        let mut calls = Vec::new();
        let size = fit_font_size(500, |size| {
            calls.push(size);
            if size <= 50 { 400 } else { 600 }
        });
        assert_eq!(size, 50);
        assert_eq!(calls, vec![62, 58, 54, 50]);
    }

    #[test]
    fn test_candidates_are_descending() {
        assert!(FONT_SIZE_CANDIDATES.windows(2).all(|w| w[0] > w[1]));
        assert!(FONT_SIZE_CANDIDATES.iter().all(|&s| s > MIN_FONT_SIZE));
    }
}
