use cell_core::error::Result;
use cell_core::models::Trace;

// ── Figure specification ──────────────────────────────────────────────────────

/// How one series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Connected line through the points in order.
    Line,
    /// Unconnected markers.
    Scatter,
}

/// One drawable series: a trace plus its style.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub trace: Trace,
    pub style: SeriesStyle,
}

/// A complete figure ready for rendering.
#[derive(Debug, Clone)]
pub struct FigureSpec {
    /// File-name slug, unique within a run, e.g. `"cell-A_capacity_fade"`.
    pub slug: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesSpec>,
}

impl FigureSpec {
    /// Create an empty figure with the given identity and axis labels.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    /// Append a line series.
    pub fn line(mut self, trace: Trace) -> Self {
        self.series.push(SeriesSpec {
            trace,
            style: SeriesStyle::Line,
        });
        self
    }

    /// Append a scatter series.
    pub fn scatter(mut self, trace: Trace) -> Self {
        self.series.push(SeriesSpec {
            trace,
            style: SeriesStyle::Scatter,
        });
        self
    }
}

// ── Sink trait ────────────────────────────────────────────────────────────────

/// A surface that accepts figures and displays or saves them.
pub trait ChartSink {
    /// Render one figure. Implementations decide where it ends up.
    fn render(&mut self, figure: &FigureSpec) -> Result<()>;
}

/// Sink that records figures in memory instead of drawing them.
///
/// Used by tests that assert on figure enumeration and series content.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub figures: Vec<FigureSpec>,
}

impl ChartSink for RecordingSink {
    fn render(&mut self, figure: &FigureSpec) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_builder_appends_series_in_order() {
        let figure = FigureSpec::new("slug", "Title", "x", "y")
            .line(Trace::from_xy("a", &[1.0], &[2.0]))
            .scatter(Trace::from_xy("b", &[3.0], &[4.0]));

        assert_eq!(figure.series.len(), 2);
        assert_eq!(figure.series[0].style, SeriesStyle::Line);
        assert_eq!(figure.series[1].style, SeriesStyle::Scatter);
        assert_eq!(figure.series[1].trace.label, "b");
    }

    #[test]
    fn test_recording_sink_captures_figures() {
        let mut sink = RecordingSink::default();
        sink.render(&FigureSpec::new("one", "One", "x", "y")).unwrap();
        sink.render(&FigureSpec::new("two", "Two", "x", "y")).unwrap();

        let slugs: Vec<&str> = sink.figures.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, vec!["one", "two"]);
    }
}
