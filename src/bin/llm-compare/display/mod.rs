mod table;

use crossterm::style::Stylize;
use textwrap::{Options, WordSplitter};

use llm_compare::analytics::AnalyticsSummary;
use llm_compare::pricing::format_cost;
use llm_compare::{ModelResult, ProgressEvent};

pub use table::render_table;

const RULE_WIDTH: usize = 80;
const MAX_TEXT_WIDTH: usize = 120;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

fn text_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(RULE_WIDTH)
        .clamp(20, MAX_TEXT_WIDTH)
}

fn wrap(text: &str) -> String {
    let options = Options::new(text_width()).word_splitter(WordSplitter::NoHyphenation);
    textwrap::fill(text, options)
}

pub fn error(message: &str) {
    eprintln!("{}", message.red());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}

pub fn info(message: &str) {
    println!("{}", message.blue());
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn header(prompt: &str, system_prompt: Option<&str>, model_count: usize) {
    println!("\n{}", rule('='));
    println!("{} {prompt}", "Prompt:".bold().cyan());
    if let Some(system) = system_prompt {
        println!("{} {system}", "System Prompt:".bold().cyan());
    }
    println!("{}\n", rule('='));
    let plural = if model_count == 1 { "" } else { "s" };
    println!(
        "{}\n",
        format!("Querying {model_count} model{plural} in parallel...").bold()
    );
}

pub fn progress(event: &ProgressEvent) {
    let counter = format!("[{}/{}] {}:", event.completed, event.total, event.model);
    if event.success {
        let time = event
            .response_time
            .map_or_else(|| "N/A".to_string(), |t| format!("{t:.2}s"));
        let tokens = event
            .total_tokens
            .map_or_else(|| "N/A".to_string(), |t| format!("{t} tokens"));
        println!("{} ({time}, {tokens})", format!("{counter} ✓").green());
    } else {
        let reason = event.error.as_deref().unwrap_or("unknown error");
        println!("{} Error: {reason}", format!("{counter} ✗").red());
    }
}

fn metrics_line(result: &ModelResult) -> Option<String> {
    let mut metrics = Vec::new();
    if let Some(time) = result.response_time() {
        metrics.push(format!("Time: {time:.2}s"));
    }
    if let Some(total) = result.total_tokens() {
        let part = |t: Option<u32>| t.map_or_else(|| "N/A".to_string(), |t| t.to_string());
        metrics.push(format!(
            "Tokens: {total} (prompt: {}, completion: {})",
            part(result.prompt_tokens()),
            part(result.completion_tokens())
        ));
    }
    if result.estimated_cost().is_some() {
        metrics.push(format!("Cost: {}", format_cost(result.estimated_cost())));
    }
    (!metrics.is_empty()).then(|| metrics.join(" | "))
}

pub fn results(results: &[ModelResult]) {
    println!("\n{}", rule('='));
    println!("{}", "RESULTS".bold().green());
    println!("{}\n", rule('='));

    for (i, result) in results.iter().enumerate() {
        println!("\n{}", rule('─'));
        println!("{} {}", format!("Model {}:", i + 1).bold(), result.model().cyan());
        if let Some(metrics) = metrics_line(result) {
            println!("{}", metrics.dim());
        }
        println!("{}", rule('─'));
        match (result.error(), result.response()) {
            (Some(error), _) => println!("\n{}\n", format!("Error: {error}").red()),
            (None, response) => println!("\n{}\n", wrap(response.unwrap_or_default())),
        }
    }
}

pub fn table(results: &[ModelResult]) {
    println!("\n{}", "Model Comparison Summary".bold().cyan());
    println!("{}\n", render_table(results));
}

pub fn summary(summary: &AnalyticsSummary) {
    println!("\n{summary}");
}

pub fn welcome(models: &[String], system_prompt: Option<&str>) {
    println!("{}", rule('─').cyan());
    println!("{}\n", "LLM Model Comparison Tool".bold().cyan());
    println!("{}", "Comparing models:".bold());
    for model in models {
        println!("  • {model}");
    }
    if let Some(system) = system_prompt {
        println!("\n{} {system}", "System prompt:".bold());
    }
    println!("\n{}", "Enter your prompts (or 'quit' to exit)".dim());
    println!("{}", rule('─').cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_compare::chat::Usage;

    #[test]
    fn metrics_line_lists_available_figures() {
        let usage = Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        let result = ModelResult::success("unpriced-model", "hi", 0.5, Some(usage));

        assert_eq!(
            metrics_line(&result).as_deref(),
            Some("Time: 0.50s | Tokens: 15 (prompt: 10, completion: 5)")
        );
        assert_eq!(metrics_line(&ModelResult::failure("m", "e")), None);
    }
}
