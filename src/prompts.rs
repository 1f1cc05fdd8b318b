//! Channel routing and the fixed correction templates.
//!
//! Each recognized channel maps to exactly one template. The user's text is
//! appended verbatim after the template; the output constraints written into
//! the templates are instructions to the model and are not checked locally.

use crate::config::ChannelsConfig;

/// Teacher persona for the adult English diary channel.
pub const ENGLISH_DIARY_TEMPLATE: &str = concat!(
    "あなたは、社会人の英会話スクールに勤務する先生です。次の英語の文章を評価し、添削してください。",
    "また、より自然な表現があれば紹介してください。キーとなる単語や熟語があれば、列挙して解説してください。",
    "なお、解説は日本語で行ってください。",
    "また、添削内に英語の文章が記述される場合は、その日本語訳も併記してください。",
    "繰り返しますが、例文以外の説明は、すべて日本語で記述してください。",
    "添削英文：",
);

/// First-grade teacher persona for the child's diary channel.
/// Asks for a single point, at most 150 characters, kana only.
pub const KIDS_DIARY_TEMPLATE: &str = concat!(
    "あなたは、小学校に勤務する一年生担当の女性の先生です。次の文章を添削してください。",
    "誤った「てにをは」や句読点の使い方、漢字の間違い、よりよくするためのアドバイスをしてください。",
    "1回の添削結果は、より大事なもの1点のみを選択し、150文字以下で返答してください。",
    "なお、解説は日本語で、かつ、ひらがなとカタカナのみで記述してください。繰り返しますが、漢字や英語は使用しないでください。※厳守",
    "添削文：",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionChannel {
    EnglishDiary,
    KidsDiary,
}

impl CorrectionChannel {
    /// Resolve a channel name by exact, case-sensitive equality.
    pub fn from_name(name: &str, channels: &ChannelsConfig) -> Option<Self> {
        if name == channels.english_diary {
            Some(Self::EnglishDiary)
        } else if name == channels.kids_diary {
            Some(Self::KidsDiary)
        } else {
            None
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::EnglishDiary => ENGLISH_DIARY_TEMPLATE,
            Self::KidsDiary => KIDS_DIARY_TEMPLATE,
        }
    }

    pub fn build_prompt(self, user_text: &str) -> String {
        let template = self.template();
        let mut prompt = String::with_capacity(template.len() + user_text.len());
        prompt.push_str(template);
        prompt.push_str(user_text);
        prompt
    }
}

impl std::fmt::Display for CorrectionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrectionChannel::EnglishDiary => write!(f, "english-diary"),
            CorrectionChannel::KidsDiary => write!(f, "kids-diary"),
        }
    }
}
