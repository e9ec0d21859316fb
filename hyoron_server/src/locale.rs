//! Notice message catalog and review-body locale detection.
//!
//! Success responses carry a human-readable notice string; the catalog
//! holds English and Japanese variants.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    Ja,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Locale::En),
            "ja" => Some(Locale::Ja),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the requester's locale: explicit `?locale=` wins, then the first
/// `Accept-Language` tag's primary subtag. `None` means no preference.
pub fn negotiate(query_locale: Option<&str>, accept_language: Option<&str>) -> Option<Locale> {
    if let Some(l) = query_locale.and_then(Locale::parse) {
        return Some(l);
    }
    let header = accept_language?;
    let first = header.split(',').next()?.trim();
    let primary = first.split(['-', ';']).next()?.trim();
    Locale::parse(primary)
}

/// Detect the locale of a review body from its script: any kana or CJK
/// ideograph means Japanese, otherwise English.
pub fn detect_body_locale(body: &str) -> Locale {
    let japanese = body.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}'   // hiragana
            | '\u{30A0}'..='\u{30FF}' // katakana
            | '\u{4E00}'..='\u{9FFF}' // CJK ideographs
        )
    });
    if japanese {
        Locale::Ja
    } else {
        Locale::En
    }
}

/// Look up a notice message. Unknown keys fall back to the key itself so a
/// missing catalog entry never breaks a response.
pub fn notice(locale: Locale, key: &str) -> String {
    let catalog: &[(&str, &str)] = match locale {
        Locale::En => &[
            ("review.posted", "Posted the review."),
            ("review.updated", "Updated the review."),
            ("review.deleted", "Deleted the review."),
            ("program.created", "Registered the broadcast schedule."),
            ("program.updated", "Updated the broadcast schedule."),
            ("program.deleted", "Deleted the broadcast schedule."),
            ("edit_request.created", "Submitted the edit request."),
            ("edit_request.updated", "Updated the edit request."),
        ],
        Locale::Ja => &[
            ("review.posted", "投稿しました"),
            ("review.updated", "更新しました"),
            ("review.deleted", "削除しました"),
            ("program.created", "放送予定を登録しました"),
            ("program.updated", "放送予定を更新しました"),
            ("program.deleted", "放送予定を削除しました"),
            ("edit_request.created", "編集リクエストを送信しました"),
            ("edit_request.updated", "編集リクエストを更新しました"),
        ],
    };

    catalog
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| (*v).to_string())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_japanese_from_kana() {
        assert_eq!(detect_body_locale("とても面白かった"), Locale::Ja);
        assert_eq!(detect_body_locale("カタカナだけ"), Locale::Ja);
    }

    #[test]
    fn detects_japanese_from_kanji_in_mixed_text() {
        assert_eq!(detect_body_locale("Great anime! 最高"), Locale::Ja);
    }

    #[test]
    fn plain_ascii_is_english() {
        assert_eq!(detect_body_locale("A solid first episode."), Locale::En);
    }

    #[test]
    fn negotiate_prefers_query_param() {
        assert_eq!(negotiate(Some("ja"), Some("en-US,en;q=0.9")), Some(Locale::Ja));
    }

    #[test]
    fn negotiate_falls_back_to_accept_language() {
        assert_eq!(negotiate(None, Some("ja-JP,ja;q=0.9,en;q=0.5")), Some(Locale::Ja));
        assert_eq!(negotiate(None, Some("en-US,en;q=0.9")), Some(Locale::En));
    }

    #[test]
    fn negotiate_unknown_is_none() {
        assert_eq!(negotiate(Some("fr"), None), None);
        assert_eq!(negotiate(None, Some("de-DE,de;q=0.9")), None);
        assert_eq!(negotiate(None, None), None);
    }

    #[test]
    fn notice_lookup_and_fallback() {
        assert_eq!(notice(Locale::Ja, "edit_request.created"), "編集リクエストを送信しました");
        assert_eq!(notice(Locale::En, "review.posted"), "Posted the review.");
        assert_eq!(notice(Locale::En, "no.such.key"), "no.such.key");
    }
}
