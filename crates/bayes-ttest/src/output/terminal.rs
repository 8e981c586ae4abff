//! Terminal output formatting with colors and text density plots.

use std::io::{self, Write};
use std::sync::Mutex;

use bayes_ttest_core::{ComparisonResult, Parameter, QuantitySummary, Trace};
use colored::Colorize;

use super::{DensityPanel, PosteriorRenderer, VisualizationError};

/// Sparkline glyphs from empty to full.
const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Fraction of draws clipped from each end of the plotted range.
const TAIL_CLIP: f64 = 0.005;

/// Format a result for human-readable terminal output.
pub fn format_result(result: &ComparisonResult) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(62);
    let mass_pct = result.credible_mass * 100.0;
    let draws = result
        .traces
        .as_ref()
        .map(|t| t.group1_mean.len())
        .unwrap_or(result.run.retained_len() * result.chains);

    out.push('\n');
    out.push_str(&sep);
    out.push_str("\n\n");
    out.push_str(&format!(
        "  {} ({}, {} chain{}, {} draws)\n\n",
        "Bayesian two-group comparison".bold(),
        result.engine,
        result.chains,
        if result.chains == 1 { "" } else { "s" },
        draws
    ));

    let row = |label: &str, s: &QuantitySummary| -> String {
        format!(
            "    {:<18}{:>10.4}  [{:.0}% HPD {:.4}, {:.4}]\n",
            label, s.mean, mass_pct, s.hpd.0, s.hpd.1
        )
    };

    for (label, parameter) in [("Group 1 mean:", Parameter::Mu1), ("Group 2 mean:", Parameter::Mu2)] {
        if let Some(s) = result.parameters.get(&parameter) {
            out.push_str(&row(label, s));
        }
    }

    let diff_row = row("Difference:", &result.derived.difference_of_means);
    if result.credible_difference() {
        out.push_str(&diff_row.green().to_string());
    } else {
        out.push_str(&diff_row);
    }
    out.push_str(&format!(
        "    {:<18}{:>9.1}%\n",
        "P(mu_1 > mu_2):",
        result.prob_group1_greater() * 100.0
    ));
    out.push_str(&row("Effect size:", &result.derived.effect_size));
    out.push_str(&row("Scale difference:", &result.derived.difference_of_scales));
    out.push_str(&row("Normality (ln nu):", &result.derived.normality));

    if let Some(welch) = &result.frequentist {
        out.push_str(&format!("\n  {}\n", "Frequentist contrast (Welch)".bold()));
        out.push_str(&format!(
            "    t = {:.3}, df = {:.1}, p = {:.4}\n",
            welch.t, welch.df, welch.p_value
        ));
    }

    out.push_str(&format!("\n  {}\n", "Diagnostics".bold()));
    for (parameter, diag) in &result.diagnostics {
        let rhat = diag
            .rhat
            .map(|r| format!("{:.3}", r))
            .unwrap_or_else(|| "-".to_string());
        let accept = diag
            .acceptance_rate
            .map(|a| format!("{:.0}%", a * 100.0))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "    {:<8} ESS {:>8.0}   R-hat {:>6}   accept {:>4}\n",
            parameter.name(),
            diag.ess,
            rhat,
            accept
        ));
    }

    if !result.warnings.is_empty() {
        out.push_str(&format!("\n  {} Warnings\n", "\u{26A0}".yellow()));
        for warning in &result.warnings {
            out.push_str(&format!("    \u{2022} {}\n", warning));
        }
    }

    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    out
}

/// Draws text histograms of posterior traces, one sparkline per series.
pub struct TerminalRenderer {
    sink: Mutex<Box<dyn Write + Send>>,
    width: usize,
}

impl std::fmt::Debug for TerminalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRenderer")
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::stdout()
    }
}

impl TerminalRenderer {
    /// Render to standard output.
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    /// Render to any writer.
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
            width: 60,
        }
    }

    /// Number of histogram bins (characters per sparkline).
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(8);
        self
    }

    fn draw_panel(&self, panel: &DensityPanel<'_>) -> Result<String, VisualizationError> {
        if panel.series.is_empty() {
            return Err(VisualizationError::EmptyTrace {
                label: panel.title.clone(),
            });
        }
        if let Some((label, _)) = panel.series.iter().find(|(_, t)| t.is_empty()) {
            return Err(VisualizationError::EmptyTrace {
                label: label.to_string(),
            });
        }

        let (lo, hi) = plot_range(panel.series.iter().map(|(_, t)| *t));
        let bins = self.width;
        let bin_of = |x: f64| -> Option<usize> {
            if x < lo || x > hi {
                return None;
            }
            Some((((x - lo) / (hi - lo)) * bins as f64).floor().min((bins - 1) as f64) as usize)
        };

        let histograms: Vec<Vec<usize>> = panel
            .series
            .iter()
            .map(|(_, trace)| {
                let mut counts = vec![0usize; bins];
                for &x in trace.values() {
                    if let Some(b) = bin_of(x) {
                        counts[b] += 1;
                    }
                }
                counts
            })
            .collect();
        let peak = histograms
            .iter()
            .flat_map(|h| h.iter().copied())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut out = format!("\n  {}\n", panel.title.bold());
        for (i, ((label, trace), counts)) in panel.series.iter().zip(&histograms).enumerate() {
            let line: String = counts
                .iter()
                .map(|&c| {
                    let level = (c * (LEVELS.len() - 1)).div_ceil(peak);
                    LEVELS[level.min(LEVELS.len() - 1)]
                })
                .collect();
            out.push_str(&format!(
                "  {:>10} \u{2502}{}\u{2502} mean {:.4}\n",
                label,
                paint(i, &line),
                trace.mean()
            ));
        }

        let mut axis = vec![' '; bins];
        if let Some(b) = panel.reference.and_then(bin_of) {
            axis[b] = '^';
        }
        out.push_str(&format!(
            "  {:>10}  {}\n  {:>10}  {:<w$.3}{:>w2$.3}\n",
            "",
            axis.into_iter().collect::<String>(),
            "",
            lo,
            hi,
            w = bins / 2,
            w2 = bins - bins / 2
        ));
        Ok(out)
    }
}

impl PosteriorRenderer for TerminalRenderer {
    fn render(&self, panels: &[DensityPanel<'_>], show: bool) -> Result<(), VisualizationError> {
        if panels.is_empty() {
            return Err(VisualizationError::NoPanels);
        }
        let mut text = String::new();
        for panel in panels {
            text.push_str(&self.draw_panel(panel)?);
        }
        if !show {
            return Ok(());
        }

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| VisualizationError::Io(io::Error::other("renderer sink poisoned")))?;
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

/// Shared x-range of several traces with the outer 0.5% of each clipped.
fn plot_range<'a>(traces: impl Iterator<Item = &'a Trace>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for trace in traces {
        let mut sorted = trace.values().to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        let clip = ((n as f64) * TAIL_CLIP).floor() as usize;
        lo = lo.min(sorted[clip.min(n - 1)]);
        hi = hi.max(sorted[(n - 1).saturating_sub(clip)]);
    }
    if !(hi > lo) {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

fn paint(series: usize, text: &str) -> String {
    match series % 4 {
        0 => text.cyan().to_string(),
        1 => text.magenta().to_string(),
        2 => text.yellow().to_string(),
        _ => text.green().to_string(),
    }
}
