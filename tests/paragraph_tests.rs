mod common;

use common::{document, glyph_text, GreedyBreaker, TestResult};
use quire::{
    debug_to_file, debug_to_string, sp, HorizontalAlignment, Hyperlink, NodeArena,
    ParagraphOptions, RichText, TypesettingSettings,
};
use tempfile::tempdir;

#[test]
fn test_paragraph_lines() -> TestResult {
    let (ts, _) = document()?;
    let mut arena = NodeArena::new();
    // 6pt per glyph at 12pt, 3pt spaces.
    let text = RichText::from_text("one two six ten");
    let options = ParagraphOptions::new().with_halign(HorizontalAlignment::Left);

    let (vlist, breaks) =
        ts.format_paragraph(&mut arena, &text, sp("45pt")?, &options, &GreedyBreaker)?;
    assert_eq!(breaks.len(), 2);

    let lines: Vec<_> = arena
        .iter(arena.get(vlist).as_vlist().ok_or("not a vlist")?.list)
        .filter_map(|r| arena.get(r).as_hlist().map(|h| (r, h.list)))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(glyph_text(&arena, lines[0].1), "onetwo");
    assert_eq!(glyph_text(&arena, lines[1].1), "sixten");

    for (line, _) in &lines {
        assert_eq!(arena.get(*line).as_hlist().ok_or("not a hlist")?.width, sp("45pt")?);
    }
    Ok(())
}

#[test]
fn test_paragraph_debug_dump() -> TestResult {
    let (ts, _) = document()?;
    let mut arena = NodeArena::new();
    let link = TypesettingSettings::new().with_hyperlink(Hyperlink::new("https://example.com"));
    let text = RichText::new()
        .with_item("see ")
        .with_item(RichText::from_text("here").with_settings(link));
    let (vlist, _) = ts.format_paragraph(
        &mut arena,
        &text,
        sp("100pt")?,
        &ParagraphOptions::new(),
        &GreedyBreaker,
    )?;

    let xml = debug_to_string(&arena, Some(vlist))?;
    assert!(xml.starts_with("<vlist "));
    assert!(xml.contains("<hlist "));
    assert_eq!(xml.matches("<glyph ").count(), 7);
    assert!(xml.contains(r#"action="hyperlink""#));
    assert!(xml.contains(r#"value="https://example.com""#));
    assert!(xml.contains(r#"subtype="lineend""#));
    assert!(xml.contains(r#"components="h""#));

    let dir = tempdir()?;
    let path = dir.path().join("paragraph.xml");
    debug_to_file(&arena, Some(vlist), &path)?;
    let written = std::fs::read_to_string(&path)?;
    assert_eq!(written, xml);
    Ok(())
}

#[test]
fn test_empty_paragraph() -> TestResult {
    let (ts, _) = document()?;
    let mut arena = NodeArena::new();
    let (vlist, breaks) = ts.format_paragraph(
        &mut arena,
        &RichText::new(),
        sp("100pt")?,
        &ParagraphOptions::new(),
        &GreedyBreaker,
    )?;
    assert!(breaks.is_empty());
    let xml = debug_to_string(&arena, Some(vlist))?;
    assert!(xml.contains(r#"origin="empty list in format_paragraph""#));
    Ok(())
}
