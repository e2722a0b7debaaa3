//! Static per-model pricing and cost estimation.

/// Cost in USD per one million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_1m: f64,
    pub output_per_1m: f64,
}

const fn price(input_per_1m: f64, output_per_1m: f64) -> ModelPricing {
    ModelPricing {
        input_per_1m,
        output_per_1m,
    }
}

/// Provider prefixes stripped before lookup.
const PROVIDER_PREFIXES: [&str; 4] = ["openai/", "anthropic/", "google/", "azure/"];

/// Known prices, January 2025. Order matters for the prefix fallback.
pub static MODEL_COSTS: &[(&str, ModelPricing)] = &[
    ("gpt-4o", price(2.50, 10.00)),
    ("gpt-4o-2024-11-20", price(2.50, 10.00)),
    ("gpt-4o-2024-08-06", price(2.50, 10.00)),
    ("gpt-4o-2024-05-13", price(5.00, 15.00)),
    ("gpt-4o-mini", price(0.15, 0.60)),
    ("gpt-4o-mini-2024-07-18", price(0.15, 0.60)),
    ("gpt-4-turbo", price(10.00, 30.00)),
    ("gpt-4-turbo-2024-04-09", price(10.00, 30.00)),
    ("gpt-4-turbo-preview", price(10.00, 30.00)),
    ("gpt-4", price(30.00, 60.00)),
    ("gpt-4-0613", price(30.00, 60.00)),
    ("gpt-4-0314", price(30.00, 60.00)),
    ("gpt-3.5-turbo", price(0.50, 1.50)),
    ("gpt-3.5-turbo-0125", price(0.50, 1.50)),
    ("gpt-3.5-turbo-1106", price(1.00, 2.00)),
    ("claude-3-5-sonnet-20241022", price(3.00, 15.00)),
    ("claude-3-5-sonnet-20240620", price(3.00, 15.00)),
    ("claude-3-opus-20240229", price(15.00, 75.00)),
    ("claude-3-sonnet-20240229", price(3.00, 15.00)),
    ("claude-3-haiku-20240307", price(0.25, 1.25)),
    ("gemini/gemini-1.5-pro", price(1.25, 5.00)),
    ("gemini/gemini-1.5-pro-latest", price(1.25, 5.00)),
    ("gemini/gemini-1.5-flash", price(0.075, 0.30)),
    ("gemini/gemini-1.5-flash-latest", price(0.075, 0.30)),
    ("gemini/gemini-pro", price(0.50, 1.50)),
];

/// Lowercases and strips each known provider prefix in table order.
fn normalize(model: &str) -> String {
    let lowered = model.to_lowercase();
    PROVIDER_PREFIXES
        .iter()
        .fold(lowered.as_str(), |name, prefix| {
            name.strip_prefix(prefix).unwrap_or(name)
        })
        .to_string()
}

/// Finds the pricing entry for `model`.
///
/// Falls back to the first table key that is a prefix of the normalized name,
/// so dated variants pick up their family price. Because the table is scanned
/// in order, `gpt-4o-mini-2025-01-01` resolves to `gpt-4o`, not `gpt-4o-mini`.
pub fn pricing_for(model: &str) -> Option<ModelPricing> {
    let normalized = normalize(model);
    MODEL_COSTS
        .iter()
        .find(|(name, _)| *name == normalized)
        .or_else(|| {
            MODEL_COSTS
                .iter()
                .find(|(name, _)| normalized.starts_with(name))
        })
        .map(|(_, pricing)| *pricing)
}

/// Estimated USD cost of one call, or `None` when usage is incomplete or the
/// model is unknown.
pub fn estimate_cost(
    model: &str,
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
) -> Option<f64> {
    let (prompt_tokens, completion_tokens) = (prompt_tokens?, completion_tokens?);
    let pricing = pricing_for(model)?;
    let input = f64::from(prompt_tokens) / 1_000_000.0 * pricing.input_per_1m;
    let output = f64::from(completion_tokens) / 1_000_000.0 * pricing.output_per_1m;
    Some(input + output)
}

/// Renders a cost with precision scaled to its magnitude.
pub fn format_cost(cost: Option<f64>) -> String {
    match cost {
        None => "N/A".to_string(),
        Some(cost) if cost < 0.0001 => format!("${cost:.6}"),
        Some(cost) if cost < 0.01 => format!("${cost:.4}"),
        Some(cost) => format!("${cost:.2}"),
    }
}
