use clap::ValueEnum;

/// Named model lists selectable with `--preset`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Preset {
    #[default]
    Default,
    Creative,
    Fast,
    Coding,
}

const DEFAULT_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-3.5-turbo",
    "claude-3-5-sonnet-20241022",
    "gemini/gemini-1.5-flash",
];

const CREATIVE_MODELS: &[&str] = &[
    "gpt-4o",
    "claude-3-5-sonnet-20241022",
    "gemini/gemini-1.5-pro",
];

const FAST_MODELS: &[&str] = &["gpt-4o-mini", "gpt-3.5-turbo", "gemini/gemini-1.5-flash"];

const CODING_MODELS: &[&str] = &["gpt-4o", "claude-3-5-sonnet-20241022"];

impl Preset {
    pub fn models(self) -> Vec<String> {
        let list = match self {
            Self::Default => DEFAULT_MODELS,
            Self::Creative => CREATIVE_MODELS,
            Self::Fast => FAST_MODELS,
            Self::Coding => CODING_MODELS,
        };
        list.iter().map(|m| m.to_string()).collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Creative => "creative",
            Self::Fast => "fast",
            Self::Coding => "coding",
        }
    }
}
