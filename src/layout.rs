//! Spiral placement of weighted labels.
//!
//! Every word of a batch is given a font-size tier and then walked around an
//! expanding spiral from the canvas centre until its bounding box clears all
//! previously placed labels. Placement is greedy and order dependent: the
//! spiral radius grows across the whole batch, so later words start further
//! out.

use std::f64::consts::FRAC_PI_4;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use crate::measure::TextMeasure;
use crate::{Error, PlacedLabel, Result, WeightedWord, DEFAULT_FONT_SIZES};

// =============================================================================
// Options
// =============================================================================

/// Knobs of the spiral search. One instance drives one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub width: u32,
    pub height: u32,
    /// Radius the spiral starts from for the first collision of the batch.
    pub initial_radius: f64,
    /// Radius increment applied every `steps_per_growth` collisions.
    pub radius_step: f64,
    pub steps_per_growth: u32,
    /// Angle advanced per collision, in radians.
    pub angle_step: f64,
    /// Font size per tier, smallest first.
    pub font_sizes: Vec<f32>,
    /// Number of palette entries a label colour index is drawn from.
    pub palette_size: usize,
    /// Candidate positions tried per label before giving up. `None` never gives up.
    pub max_iterations: Option<usize>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            initial_radius: 25.0,
            radius_step: 5.0,
            steps_per_growth: 8,
            angle_step: FRAC_PI_4,
            font_sizes: DEFAULT_FONT_SIZES.to_vec(),
            palette_size: crate::ColorScheme::Classic.colors().len(),
            max_iterations: None,
        }
    }
}

impl LayoutOptions {
    pub fn tier_count(&self) -> usize {
        self.font_sizes.len()
    }

    pub fn top_tier(&self) -> usize {
        self.font_sizes.len().saturating_sub(1)
    }

    fn validate(&self) -> Result<()> {
        if self.font_sizes.is_empty() {
            return Err(Error::Input("At least one font size tier is required".into()));
        }
        if self.palette_size == 0 {
            return Err(Error::Input("Palette cannot be empty".into()));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::Input("max_iterations must be at least 1".into()));
        }
        if self.steps_per_growth == 0 {
            return Err(Error::Input("steps_per_growth must be positive".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Size Bucketer
// =============================================================================

/// Linearly rescale `weight` from `[min_weight, max_weight]` onto tier
/// indices `0..tier_count`, rounding to nearest.
///
/// A degenerate range (`max_weight == min_weight`) maps to the top tier.
/// Out-of-range weights are clamped.
pub fn bucket(weight: i64, max_weight: i64, min_weight: i64, tier_count: usize) -> usize {
    let top = tier_count.saturating_sub(1);
    if max_weight == min_weight {
        return top;
    }

    let span = max_weight as f64 - min_weight as f64;
    let scaled = (top as f64 * (weight as f64 - min_weight as f64) / span).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(top)
    }
}

// =============================================================================
// Overlap Detector
// =============================================================================

/// Axis-aligned rectangle, `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Boxes that merely touch along an edge still intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }
}

/// True when `candidate` intersects any already placed label.
pub fn overlaps(candidate: &BoundingBox, placed: &[PlacedLabel]) -> bool {
    placed
        .iter()
        .any(|label| candidate.intersects(&label.bounds()))
}

// =============================================================================
// Boundary Filter
// =============================================================================

/// True when the label lies entirely inside a `width` x `height` canvas.
pub fn in_boundary(label: &PlacedLabel, width: u32, height: u32) -> bool {
    label.x >= 0.0
        && label.x + label.width <= width as f32
        && label.y >= 0.0
        && label.y + label.height <= height as f32
}

// =============================================================================
// Spiral Walk
// =============================================================================

/// Which way a label walks around the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Even batch positions turn one way, odd positions the other.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }
}

/// Candidate positions for one label.
///
/// The first item is the canvas centre itself; each following item is one
/// collision further along the spiral. The radius is borrowed from the
/// session so growth carries over to later labels.
pub struct SpiralWalk<'a> {
    center_x: f64,
    center_y: f64,
    radius: &'a mut f64,
    angle: f64,
    angle_step: f64,
    radius_step: f64,
    steps_per_growth: u32,
    count: u32,
    started: bool,
}

impl<'a> SpiralWalk<'a> {
    pub fn new(
        options: &LayoutOptions,
        radius: &'a mut f64,
        start_angle: f64,
        direction: Direction,
    ) -> Self {
        Self {
            center_x: options.width as f64 / 2.0,
            center_y: options.height as f64 / 2.0,
            radius,
            angle: start_angle,
            angle_step: options.angle_step * direction.sign(),
            radius_step: options.radius_step,
            steps_per_growth: options.steps_per_growth,
            count: 1,
            started: false,
        }
    }
}

impl Iterator for SpiralWalk<'_> {
    type Item = (f32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some((self.center_x as f32, self.center_y as f32));
        }

        if self.count % self.steps_per_growth == 0 {
            *self.radius += self.radius_step;
            trace!(radius = *self.radius, "spiral radius grown");
        }
        self.count = self.count.wrapping_add(1);
        self.angle += self.angle_step;

        let x = self.center_x + *self.radius * self.angle.cos();
        let y = self.center_y + *self.radius * self.angle.sin();
        Some((x as f32, y as f32))
    }
}

// =============================================================================
// Layout Session
// =============================================================================

/// Mutable state of one batch: the labels placed so far, the shared spiral
/// radius and the random source. Build a fresh session per batch.
pub struct LayoutSession {
    options: LayoutOptions,
    spiral_radius: f64,
    placed: Vec<PlacedLabel>,
    rng: ChaCha8Rng,
}

impl LayoutSession {
    pub fn new(options: LayoutOptions, rng: ChaCha8Rng) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            spiral_radius: options.initial_radius,
            options,
            placed: Vec::new(),
            rng,
        })
    }

    pub fn spiral_radius(&self) -> f64 {
        self.spiral_radius
    }

    /// Labels accepted so far, in placement order, boundary not yet checked.
    pub fn placed(&self) -> &[PlacedLabel] {
        &self.placed
    }

    /// Find a collision-free spot for a label of the given footprint and
    /// record it. Returns the chosen top-left corner.
    pub fn place(
        &mut self,
        index: usize,
        text: &str,
        tier: usize,
        width: f32,
        height: f32,
    ) -> Result<(f32, f32)> {
        let start_angle = self.rng.random_range(0.2..6.28);
        let limit = self.options.max_iterations.unwrap_or(usize::MAX);

        let Self {
            options,
            spiral_radius,
            placed,
            rng,
        } = self;

        let direction = Direction::for_index(index);
        let walk = SpiralWalk::new(options, spiral_radius, start_angle, direction);
        let mut attempts = 0usize;

        for (x, y) in walk.take(limit) {
            attempts += 1;
            let candidate = BoundingBox::new(x, y, width, height);
            if overlaps(&candidate, placed) {
                continue;
            }

            let color = rng.random_range(0..options.palette_size);
            debug!(text, tier, x, y, attempts, "label placed");
            placed.push(PlacedLabel {
                text: text.to_string(),
                tier,
                x,
                y,
                width,
                height,
                color,
            });
            return Ok((x, y));
        }

        Err(Error::Placement {
            text: text.to_string(),
            attempts,
        })
    }

    /// Drop labels that leave the canvas and hand back the rest.
    pub fn finish(self) -> Vec<PlacedLabel> {
        let (width, height) = (self.options.width, self.options.height);
        let total = self.placed.len();
        let kept: Vec<_> = self
            .placed
            .into_iter()
            .filter(|label| in_boundary(label, width, height))
            .collect();

        if kept.len() < total {
            warn!(
                dropped = total - kept.len(),
                kept = kept.len(),
                "labels outside the canvas were dropped"
            );
        }
        kept
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Lay out a batch that is expected to be sorted by weight, heaviest first.
///
/// The first and last words serve as the max and min weight references. The
/// last word always gets the top tier. Only labels fully inside the canvas
/// are returned.
pub fn layout<M: TextMeasure + ?Sized>(
    words: &[WeightedWord],
    options: &LayoutOptions,
    measurer: &M,
    rng: ChaCha8Rng,
) -> Result<Vec<PlacedLabel>> {
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return Err(Error::EmptyBatch);
    };

    let mut session = LayoutSession::new(options.clone(), rng)?;
    let last_index = words.len() - 1;

    for (index, word) in words.iter().enumerate() {
        let tier = if index == last_index {
            options.top_tier()
        } else {
            bucket(word.weight, first.weight, last.weight, options.tier_count())
        };

        let font_size = options.font_sizes[tier];
        let (width, height) = measurer.measure(&word.text, font_size);
        session.place(index, &word.text, tier, width, height)?;
    }

    info!(
        words = words.len(),
        radius = session.spiral_radius(),
        "batch laid out"
    );
    Ok(session.finish())
}
