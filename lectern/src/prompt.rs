//! Narration prompt construction.
//!
//! Pure functions: given the extracted slide text and a target language this
//! builds the user prompt for the chat-completion call. The templates push
//! the model away from templated lecture openings and toward a direct,
//! spoken-style 30-60 second treatment of each slide.

use std::fmt;

/// Fixed system role for script generation.
pub const SYSTEM_ROLE: &str = "You are a professional assistant for generating lecture scripts.";

/// Target narration language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Mandarin Chinese narration (default).
    #[default]
    Zh,
    /// English narration.
    En,
}

impl Language {
    /// Parses a language tag, case-insensitively.
    ///
    /// `"en"` selects English; every other tag falls back to Chinese.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("en") {
            Self::En
        } else {
            Self::Zh
        }
    }

    /// The canonical tag for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the narration prompt for one slide.
///
/// The slide text is embedded verbatim; the surrounding template depends on
/// the target language. Deterministic, no I/O.
#[must_use]
pub fn build_prompt(slide_text: &str, language: Language) -> String {
    match language {
        Language::En => format!(
            "\
You are a professional lecturer. Please generate a natural, smooth, content-rich speech based on the slide content.
Requirements:
- Avoid template openings like \"Okay, next we will see...\" or \"Let's look at...\".
- Dive directly into the topic in a natural, spoken style.
- Explain the texts, images, and formulas in depth.
- Control each slide's speech to around 30-60 seconds.
- Ensure smooth transitions and clear logical structure.

Here is the slide content:

Slide text:
{slide_text}

Slide image description:
Please infer based on the image content.

Please generate the speech text:
"
        ),
        Language::Zh => format!(
            "\
你是一名专业讲师，需要根据幻灯片内容，生成一段正式自然、内容丰富的演讲稿。
要求：
- 不要出现\"好的，接下来\"、\"让我们来看一下\"等模板化开场。
- 直接进入主题讲解，保持口语化。
- 结合文字、图片、公式深入讲解。
- 每页时长控制30秒到60秒，保证信息密度。
- 用流畅自然的过渡衔接上下文。
- 文字清晰有条理，避免空洞描述。

下面是幻灯片内容：

幻灯片文字内容：
{slide_text}

幻灯片图片描述：
请根据图片推理补充讲解。

请直接输出正式演讲稿内容：
"
        ),
    }
}
