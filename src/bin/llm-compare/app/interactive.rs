use std::io::Write;

use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use llm_compare::analytics::ComparisonAnalytics;
use llm_compare::validate::{validate_prompt, PromptKind};
use llm_compare::ModelComparator;

use crate::display;

use super::settings::Settings;
use super::{batch_for, compare_with_progress};

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Skip,
    Quit,
    Prompt(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let prompt = line.trim();
    if prompt.is_empty() {
        return Input::Skip;
    }
    match prompt.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Prompt(prompt),
    }
}

/// Reads prompts from stdin until `quit` or end of input. A failing round is
/// reported and the loop continues.
pub(super) async fn run(comparator: &ModelComparator, settings: &Settings) -> anyhow::Result<()> {
    display::welcome(&settings.models, settings.system_prompt.as_deref());
    let mut lines = BufReader::new(stdin()).lines();

    loop {
        print!("\nPrompt: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let prompt = match classify(&line) {
            Input::Skip => continue,
            Input::Quit => break,
            Input::Prompt(prompt) => prompt,
        };
        if let Err(err) = validate_prompt(prompt, PromptKind::Prompt) {
            display::error(&err.to_string());
            continue;
        }

        let batch = batch_for(settings, prompt);
        match compare_with_progress(comparator, &batch).await {
            Ok(results) => {
                display::results(&results);
                display::summary(&ComparisonAnalytics::new(&results).summary());
            }
            Err(err) => display::error(&format!("Error: {err}")),
        }
    }

    display::info("\nGoodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_words_are_case_insensitive() {
        for word in ["quit", "EXIT", " q "] {
            assert_eq!(classify(word), Input::Quit);
        }
    }

    #[test]
    fn blank_lines_are_skipped_and_prompts_trimmed() {
        assert_eq!(classify("   "), Input::Skip);
        assert_eq!(classify("  hello \n"), Input::Prompt("hello"));
    }
}
