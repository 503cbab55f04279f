use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tagcloud::{
    in_boundary, layout, Error, LayoutOptions, LayoutSession, PlacedLabel, TagCloudBuilder,
    TextMeasure, WeightedWord,
};

/// Every glyph advances 3/5 em; lines are 6/5 em tall.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn measure(&self, text: &str, font_size: f32) -> (f32, f32) {
        let width = text.chars().count() as f32 * font_size * 3.0 / 5.0;
        (width.ceil(), (font_size * 6.0 / 5.0).ceil())
    }
}

fn words(pairs: &[(&str, i64)]) -> Vec<WeightedWord> {
    pairs
        .iter()
        .map(|(text, weight)| WeightedWord::new(*text, *weight))
        .collect()
}

fn descending_batch(count: usize) -> Vec<WeightedWord> {
    (0..count)
        .map(|i| WeightedWord::new(format!("word{i}"), (count - i) as i64 * 10))
        .collect()
}

fn run(batch: &[WeightedWord], seed: u64) -> Vec<PlacedLabel> {
    layout(
        batch,
        &LayoutOptions::default(),
        &FixedAdvance,
        ChaCha8Rng::seed_from_u64(seed),
    )
    .expect("layout failed")
}

fn assert_disjoint(labels: &[PlacedLabel]) {
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            let (a, b) = (a.bounds(), b.bounds());
            let separated =
                a.right() < b.x || b.right() < a.x || a.bottom() < b.y || b.bottom() < a.y;
            assert!(separated, "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn placed_labels_never_overlap() {
    let batch = descending_batch(60);
    let options = LayoutOptions::default();
    let mut session =
        LayoutSession::new(options.clone(), ChaCha8Rng::seed_from_u64(99)).unwrap();

    for (index, word) in batch.iter().enumerate() {
        let tier = tagcloud::bucket(word.weight, 600, 10, options.tier_count());
        let (w, h) = FixedAdvance.measure(&word.text, options.font_sizes[tier]);
        session.place(index, &word.text, tier, w, h).unwrap();
    }

    assert_eq!(session.placed().len(), batch.len());
    assert_disjoint(session.placed());
}

#[test]
fn output_is_disjoint_and_inside_the_canvas() {
    let labels = run(&descending_batch(80), 5);
    assert!(!labels.is_empty());
    assert!(labels.len() <= 80);
    assert_disjoint(&labels);
    for label in &labels {
        assert!(in_boundary(label, 800, 800), "{label:?} escaped the canvas");
    }
}

#[test]
fn same_seed_same_cloud() {
    let batch = descending_batch(30);
    assert_eq!(run(&batch, 1234), run(&batch, 1234));
}

#[test]
fn different_seeds_move_labels() {
    let batch = descending_batch(30);
    assert_ne!(run(&batch, 1), run(&batch, 2));
}

#[test]
fn last_word_is_forced_to_top_tier() {
    let labels = run(&words(&[("cat", 100), ("dog", 50), ("bird", 1)]), 3);
    let tiers: Vec<_> = labels.iter().map(|l| (l.text.as_str(), l.tier)).collect();
    assert_eq!(tiers, vec![("cat", 4), ("dog", 2), ("bird", 4)]);
}

#[test]
fn single_word_sits_at_the_center() {
    let labels = run(&words(&[("only", 42)]), 8);
    assert_eq!(labels.len(), 1);
    let only = &labels[0];
    assert_eq!(only.tier, 4);
    assert_eq!((only.x, only.y), (400.0, 400.0));
    assert_eq!((only.width, only.height), (120.0, 60.0));
}

#[test]
fn equal_weights_all_land_in_top_tier() {
    let labels = run(&words(&[("a", 7), ("b", 7), ("c", 7)]), 4);
    assert!(labels.iter().all(|l| l.tier == 4));
}

#[test]
fn empty_batch_fails_fast() {
    let err = layout(
        &[],
        &LayoutOptions::default(),
        &FixedAdvance,
        ChaCha8Rng::seed_from_u64(0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::EmptyBatch));
}

#[test]
fn capped_search_surfaces_placement_failure() {
    let options = LayoutOptions {
        max_iterations: Some(1),
        ..LayoutOptions::default()
    };
    let err = layout(
        &words(&[("first", 10), ("second", 5), ("third", 1)]),
        &options,
        &FixedAdvance,
        ChaCha8Rng::seed_from_u64(0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Placement { ref text, attempts: 1 } if text == "second"));
}

#[test]
fn builder_renders_svg_with_every_kept_label() {
    let batch = words(&[("rust", 90), ("cargo", 60), ("crate", 30), ("trait", 10)]);
    let cloud = TagCloudBuilder::new()
        .size(600, 400)
        .seed(42)
        .build_with(&batch, &FixedAdvance)
        .unwrap();

    let svg = cloud.to_svg();
    assert_eq!(svg.matches("<text").count(), cloud.labels.len());
    for label in &cloud.labels {
        assert!(svg.contains(&format!(">{}</text>", label.text)));
    }
}
