use llm_compare::analytics::ComparisonAnalytics;
use llm_compare::export::{export_results, ExportFormat};
use llm_compare::ModelComparator;

use crate::args::CliArgs;
use crate::display;

use super::settings::Settings;
use super::{batch_for, compare_with_progress};

pub(super) async fn run(
    comparator: &ModelComparator,
    settings: &Settings,
    args: &CliArgs,
    prompt: &str,
) -> anyhow::Result<()> {
    let batch = batch_for(settings, prompt);
    let results = compare_with_progress(comparator, &batch).await?;

    if args.table {
        display::table(&results);
    }
    display::results(&results);
    display::summary(&ComparisonAnalytics::new(&results).summary());

    let Some(output) = &args.output else {
        return Ok(());
    };
    let format = match args.export_format() {
        Some(format) => format,
        None => {
            let (format, fell_back) = ExportFormat::from_path(output);
            if fell_back {
                display::warn(&format!(
                    "Warning: Unknown format for '{}', defaulting to JSON",
                    output.display()
                ));
            }
            format
        }
    };
    // Results are already on screen, so a failed export is only reported.
    match export_results(
        &results,
        prompt,
        settings.system_prompt.as_deref(),
        format,
        output,
    ) {
        Ok(()) => display::success(&format!("Results exported to: {}", output.display())),
        Err(err) => {
            log::error!("Export failed: {err}");
            display::error(&format!("Error: {err}"));
        }
    }
    Ok(())
}
