use std::path::PathBuf;

use tagcloud::{OutputFormat, TagCloudBuilder, WeightedWord};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn batch() -> Vec<WeightedWord> {
    vec![
        WeightedWord::new("spiral", 80),
        WeightedWord::new("cloud", 40),
        WeightedWord::new("tag", 5),
    ]
}

#[test]
fn font_backed_build_renders_jpeg() {
    let cloud = TagCloudBuilder::new()
        .seed(17)
        .font_file(fixture("Tuffy.ttf"))
        .unwrap()
        .build(&batch())
        .unwrap();

    assert_eq!(cloud.labels.len(), 3);
    for label in &cloud.labels {
        assert!(label.width > 0.0 && label.height > 0.0);
    }
    assert!(cloud.to_svg().contains("font-family:'Tuffy'"));

    let jpeg = cloud.to_jpeg(90).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn save_picks_format_from_extension() {
    let cloud = TagCloudBuilder::new()
        .seed(3)
        .font_file(fixture("Tuffy.ttf"))
        .unwrap()
        .build(&batch())
        .unwrap();

    let dir = std::env::temp_dir();
    let stem = format!("tagcloud-render-{}", std::process::id());
    let expected: [(&str, &[u8]); 3] = [
        ("png", b"\x89PNG"),
        ("svg", b"<svg"),
        ("jpg", b"\xFF\xD8"),
    ];
    for (ext, magic) in expected {
        let path = dir.join(format!("{stem}.{ext}"));
        let format = OutputFormat::from_path(&path);
        assert_eq!(format == OutputFormat::Jpeg, ext == "jpg");
        cloud.save(&path, 80).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(bytes.starts_with(magic), "{ext} output has the wrong header");
    }
}
