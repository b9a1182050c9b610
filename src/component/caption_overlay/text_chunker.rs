/// 文字為空時使用的佔位字幕
pub const EMPTY_PLACEHOLDER: &str = "...";

/// 將文字依固定單字數切成字幕行
///
/// 換行視為空白；結果行數為 `ceil(單字數 / words_per_line)`
#[must_use]
pub fn split_words(text: &str, words_per_line: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![EMPTY_PLACEHOLDER.to_string()];
    }

    words
        .chunks(words_per_line.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}
