pub const MODEL: &str = "nova-2-general";

const MANDARIN_HINT: &str = "zh";
const MANDARIN: &str = "zh-CN";
const ENGLISH: &str = "en-US";

/// Maps the caller's hint to a provider locale. Only the exact hint `"zh"`
/// selects Mandarin; everything else, including no hint, is English.
pub fn resolve_language(hint: Option<&str>) -> &'static str {
    match hint {
        Some(MANDARIN_HINT) => MANDARIN,
        _ => ENGLISH,
    }
}

/// Query parameters sent with every listen request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub model: &'static str,
    pub language: &'static str,
    pub smart_format: bool,
    pub punctuate: bool,
}

impl ProviderQuery {
    pub fn for_hint(hint: Option<&str>) -> Self {
        Self {
            model: MODEL,
            language: resolve_language(hint),
            smart_format: true,
            punctuate: true,
        }
    }

    pub fn params(&self) -> [(&'static str, &'static str); 4] {
        [
            ("model", self.model),
            ("language", self.language),
            ("smart_format", bool_param(self.smart_format)),
            ("punctuate", bool_param(self.punctuate)),
        ]
    }
}

fn bool_param(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
