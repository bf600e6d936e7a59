//! Renderer-ready primitives and the deferred render action.
//!
//! The rendering surface itself (terminal grid, colors, redraw) is an
//! external collaborator; this module only defines what it is handed. The
//! deferred action makes "fetch now, render later" an explicit value: it
//! holds one already-fetched primitive and is side-effect-free until the
//! draw pass invokes it.

use crate::options::Options;

/// Hard cap on stacked-bar series; the rendering surface has exactly this
/// many slots. Overflow series are dropped, never silently reshuffled.
pub const MAX_STACKED_SERIES: usize = 8;

/// Default stacked-bar palette, assigned in series-encounter order.
pub const DEFAULT_PALETTE: [Color; 5] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Magenta,
];

/// Named terminal colors understood by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
        }
    }

    pub fn from_name(name: &str) -> Option<Color> {
        match name.trim() {
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "magenta" => Some(Color::Magenta),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            _ => None,
        }
    }
}

/// A bounded ordered sequence of named value series, capacity
/// [`MAX_STACKED_SERIES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackedSeries {
    entries: Vec<(String, Vec<i64>)>,
}

impl StackedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a series. Returns false when the capacity is exhausted, in
    /// which case the entry is dropped; the caller decides how to report it.
    pub fn push(&mut self, name: String, values: Vec<i64>) -> bool {
        if self.entries.len() == MAX_STACKED_SERIES {
            return false;
        }

        self.entries.push((name, values));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Vec<i64>)> {
        self.entries.iter()
    }
}

/// What one widget draws. Produced by the result shaper, consumed only by
/// the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPrimitive {
    Text(String),
    Bar {
        values: Vec<i64>,
        labels: Vec<String>,
    },
    StackedBar {
        series: StackedSeries,
        labels: Vec<String>,
        colors: Vec<Color>,
    },
    Table {
        /// Row 0 is the header.
        rows: Vec<Vec<String>>,
    },
}

/// The rendering surface boundary: queues a primitive into the current draw
/// pass. Does not fetch or validate data.
pub trait RenderSurface {
    fn queue(
        &mut self,
        primitive: &RenderPrimitive,
        title: &str,
        options: &Options,
    ) -> anyhow::Result<()>;
}

/// A pre-fetched unit of drawing work for one widget.
///
/// All fetching completed when the dispatcher built this value; rendering it
/// is the only side-effecting step and never re-fetches, so a dashboard
/// refresh presents a consistent snapshot.
#[derive(Debug, Clone)]
pub struct DeferredRenderAction {
    primitive: RenderPrimitive,
    title: String,
    options: Options,
}

impl DeferredRenderAction {
    pub fn new(primitive: RenderPrimitive, title: impl Into<String>, options: Options) -> Self {
        Self {
            primitive,
            title: title.into(),
            options,
        }
    }

    pub fn primitive(&self) -> &RenderPrimitive {
        &self.primitive
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Hand the captured primitive to the rendering surface.
    pub fn render(&self, surface: &mut dyn RenderSurface) -> anyhow::Result<()> {
        surface.queue(&self.primitive, &self.title, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stacked_series_caps_at_eight() {
        let mut series = StackedSeries::new();
        for i in 0..10 {
            let accepted = series.push(format!("s{i}"), vec![i]);
            assert_eq!(accepted, i < MAX_STACKED_SERIES as i64);
        }
        assert_eq!(series.len(), MAX_STACKED_SERIES);

        // The accepted entries are intact and in encounter order.
        let names: Vec<&str> = series.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
    }

    #[test]
    fn color_names_round_trip() {
        for color in DEFAULT_PALETTE {
            assert_eq!(Color::from_name(color.name()), Some(color));
        }
        assert_eq!(Color::from_name("mauve"), None);
    }
}
