use super::*;
use crate::test_support::system_engine;

#[test]
fn invalid_font_bytes_are_rejected() {
    let font = MemeFont {
        bytes: std::sync::Arc::new(b"not a font".to_vec()),
        index: 0,
        family: "bogus".to_string(),
    };
    assert!(matches!(
        TextLayoutEngine::new(font),
        Err(MemeError::Font(_))
    ));
}

#[test]
fn shape_line_rejects_bad_sizes() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    assert!(engine.shape_line("HI", 0.0).is_err());
    assert!(engine.shape_line("HI", f32::NAN).is_err());
}

#[test]
fn longer_text_measures_wider_on_one_line() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    assert!(!engine.family_name().trim().is_empty());

    let short = engine.measure("I FITS", 48.0).unwrap();
    let long = engine.measure("I FITS I SITS I FITS I SITS I FITS I SITS", 48.0).unwrap();
    assert!(short.advance > 0.0);
    assert!(long.advance > short.advance * 3.0);
    assert!(short.ascent > 0.0);
    assert!(short.descent >= 0.0);

    let shaped = engine
        .shape_line("A VERY LONG CAPTION THAT WOULD NORMALLY WRAP AROUND", 48.0)
        .unwrap();
    assert_eq!(shaped.layout.lines().count(), 1);
}

#[test]
fn measurement_is_deterministic() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let a = engine.measure("NOT SURE IF HUNGRY", 48.0).unwrap();
    let b = engine.measure("NOT SURE IF HUNGRY", 48.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn single_line_flattens_every_whitespace_char() {
    assert_eq!(single_line("A\nB\r\nC\tD\u{2028}E"), "A B  C D E");
    assert_eq!(single_line("NO BREAKS"), "NO BREAKS");
}

#[test]
fn hard_line_breaks_still_shape_one_line() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let broken = engine.shape_line("I FITS\nI SITS", 48.0).unwrap();
    assert_eq!(broken.layout.lines().count(), 1);

    let spaced = engine.measure("I FITS I SITS", 48.0).unwrap();
    assert_eq!(broken.metrics, spaced);
}

#[test]
fn glyph_runs_use_the_resolved_face() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let want = engine.font().index;
    let shaped = engine.shape_line("CEILING CAT", 48.0).unwrap();

    let mut runs = 0;
    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            assert_eq!(run.run().font().index, want);
            runs += 1;
        }
    }
    assert!(runs > 0);

    assert_eq!(engine.face_data(want).index, want);
    assert_eq!(engine.face_data(want + 1).index, want + 1);
}
