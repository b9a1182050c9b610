use ab_glyph::FontVec;
use anyhow::{Result, bail};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 指定字型檔的環境變數
pub const FONT_PATH_ENV: &str = "CAPTION_FONT_PATH";

/// 各平台預設字型位置，依序嘗試
pub const DEFAULT_FONT_PATHS: [&str; 4] = [
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
];

/// 已載入的字型與其來源路徑
pub struct LoadedFont {
    pub path: PathBuf,
    pub font: FontVec,
}

/// 建立字型候選清單：明確指定 > 環境變數 > 平台預設
///
/// 空字串會被略過
#[must_use]
pub fn font_candidates(explicit: Option<&Path>, env_value: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(DEFAULT_FONT_PATHS.len() + 2);

    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        candidates.push(path.to_path_buf());
    }
    if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(value));
    }
    candidates.extend(DEFAULT_FONT_PATHS.iter().map(PathBuf::from));

    candidates
}

/// 找到第一個存在且可解析的字型檔
pub fn locate_font(explicit: Option<&Path>) -> Result<LoadedFont> {
    let env_value = env::var(FONT_PATH_ENV).ok();
    let candidates = font_candidates(explicit, env_value.as_deref());

    for candidate in &candidates {
        if !candidate.exists() {
            debug!("字型不存在，略過: {}", candidate.display());
            continue;
        }

        match load_font_file(candidate) {
            Ok(font) => {
                info!("使用字型: {}", candidate.display());
                return Ok(LoadedFont {
                    path: candidate.clone(),
                    font,
                });
            }
            Err(e) => {
                warn!("無法載入字型 {}: {e}", candidate.display());
            }
        }
    }

    bail!(
        "找不到可用的字型檔，請以 --font 或環境變數 {FONT_PATH_ENV} 指定 TrueType 字型 (已嘗試 {} 個位置)",
        candidates.len()
    )
}

fn load_font_file(path: &Path) -> Result<FontVec> {
    let bytes = fs::read(path)?;
    FontVec::try_from_vec(bytes).map_err(|e| anyhow::anyhow!("字型格式無效: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidates_order() {
        let candidates = font_candidates(Some(Path::new("/fonts/a.ttf")), Some("/fonts/b.ttf"));
        assert_eq!(candidates[0], PathBuf::from("/fonts/a.ttf"));
        assert_eq!(candidates[1], PathBuf::from("/fonts/b.ttf"));
        assert_eq!(candidates.len(), DEFAULT_FONT_PATHS.len() + 2);
        assert_eq!(candidates[2], PathBuf::from(DEFAULT_FONT_PATHS[0]));
    }

    #[test]
    fn test_candidates_skip_empty() {
        let candidates = font_candidates(Some(Path::new("")), Some("  "));
        assert_eq!(candidates.len(), DEFAULT_FONT_PATHS.len());
    }

    #[test]
    fn test_load_font_file_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        assert!(load_font_file(&path).is_err());
    }
}
