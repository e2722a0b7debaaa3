//! Aggregate statistics over one batch of results.

use std::fmt;

use serde::Serialize;

use crate::result::ModelResult;

/// Read-only view computing statistics over a batch's results.
///
/// Timing, token and cost figures only consider successful results that
/// carry the metric. Ties go to the result listed first.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonAnalytics<'a> {
    results: &'a [ModelResult],
}

/// A model name paired with the metric that selected it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub model: String,
    pub value: T,
}

impl<'a> ComparisonAnalytics<'a> {
    pub fn new(results: &'a [ModelResult]) -> Self {
        Self { results }
    }

    fn successful(&self) -> impl Iterator<Item = &'a ModelResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Picks the successful result whose metric beats every earlier one.
    fn pick<T, M, B>(&self, metric: M, beats: B) -> Option<Ranked<T>>
    where
        T: Copy,
        M: Fn(&ModelResult) -> Option<T>,
        B: Fn(T, T) -> bool,
    {
        let mut best: Option<(&ModelResult, T)> = None;
        for result in self.successful() {
            let Some(value) = metric(result) else {
                continue;
            };
            match best {
                Some((_, current)) if !beats(value, current) => {}
                _ => best = Some((result, value)),
            }
        }
        best.map(|(result, value)| Ranked {
            model: result.model().to_string(),
            value,
        })
    }

    fn fastest_ranked(&self) -> Option<Ranked<f64>> {
        self.pick(ModelResult::response_time, |a, b| a < b)
    }

    fn slowest_ranked(&self) -> Option<Ranked<f64>> {
        self.pick(ModelResult::response_time, |a, b| a > b)
    }

    fn most_token_efficient_ranked(&self) -> Option<Ranked<u32>> {
        self.pick(ModelResult::total_tokens, |a, b| a < b)
    }

    fn cheapest_ranked(&self) -> Option<Ranked<f64>> {
        self.pick(ModelResult::estimated_cost, |a, b| a < b)
    }

    pub fn fastest(&self) -> Option<String> {
        self.fastest_ranked().map(|r| r.model)
    }

    pub fn slowest(&self) -> Option<String> {
        self.slowest_ranked().map(|r| r.model)
    }

    /// Mean response time in seconds.
    pub fn average_response_time(&self) -> Option<f64> {
        let times: Vec<f64> = self.successful().filter_map(|r| r.response_time()).collect();
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<f64>() / times.len() as f64)
    }

    /// Model that used the fewest total tokens.
    pub fn most_token_efficient(&self) -> Option<String> {
        self.most_token_efficient_ranked().map(|r| r.model)
    }

    pub fn cheapest(&self) -> Option<String> {
        self.cheapest_ranked().map(|r| r.model)
    }

    /// Sum of estimated costs in USD.
    pub fn total_cost(&self) -> Option<f64> {
        self.successful()
            .filter_map(|r| r.estimated_cost())
            .fold(None, |acc, cost| Some(acc.unwrap_or(0.0) + cost))
    }

    /// Percentage of results without an error; `0.0` for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        100.0 * self.successful().count() as f64 / self.results.len() as f64
    }

    pub fn summary(&self) -> AnalyticsSummary {
        AnalyticsSummary {
            total: self.results.len(),
            successes: self.successful().count(),
            success_rate: self.success_rate(),
            average_response_time: self.average_response_time(),
            fastest: self.fastest_ranked(),
            slowest: self.slowest_ranked(),
            most_token_efficient: self.most_token_efficient_ranked(),
            total_cost: self.total_cost(),
            cheapest: self.cheapest_ranked(),
        }
    }
}

/// Snapshot of every statistic, ready for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub average_response_time: Option<f64>,
    pub fastest: Option<Ranked<f64>>,
    pub slowest: Option<Ranked<f64>>,
    pub most_token_efficient: Option<Ranked<u32>>,
    pub total_cost: Option<f64>,
    pub cheapest: Option<Ranked<f64>>,
}

impl fmt::Display for AnalyticsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comparison Analytics")?;
        writeln!(f, "{}", "-".repeat(80))?;
        writeln!(
            f,
            "Success Rate: {:.1}% ({}/{} models)",
            self.success_rate, self.successes, self.total
        )?;
        if let Some(avg) = self.average_response_time {
            writeln!(f, "Average Response Time: {avg:.2}s")?;
        }
        if let Some(fastest) = &self.fastest {
            writeln!(f, "Fastest Model: {} ({:.2}s)", fastest.model, fastest.value)?;
        }
        if let Some(slowest) = &self.slowest {
            writeln!(f, "Slowest Model: {} ({:.2}s)", slowest.model, slowest.value)?;
        }
        if let Some(efficient) = &self.most_token_efficient {
            writeln!(
                f,
                "Most Token Efficient: {} ({} tokens)",
                efficient.model, efficient.value
            )?;
        }
        if let Some(total) = self.total_cost {
            writeln!(f, "Total Cost: ${total:.6}")?;
        }
        if let Some(cheapest) = &self.cheapest {
            writeln!(
                f,
                "Cheapest Model: {} (${:.6})",
                cheapest.model, cheapest.value
            )?;
        }
        Ok(())
    }
}
