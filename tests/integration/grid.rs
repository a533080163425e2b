//! Wrapping, string mode, self-modification and loading.

use crate::common::*;
use befunge_plus::*;

/// Rows 0 through 24 with the given rows placed at their indices.
fn full_height(placed: &[(usize, &str)]) -> String {
    let mut lines = vec![""; GRID_HEIGHT];
    for &(y, row) in placed {
        lines[y] = row;
    }
    rows(&lines)
}

fn temp_source(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("befunge_plus_{}_{}.bf", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// Wrapping
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_wrap_left_edge() {
    assert_eq!(output_of("<@.1"), "1");
}

#[test]
fn test_wrap_right_edge() {
    let top = spanning_row("", "6v");
    let bottom = spanning_row(".@", ">");
    let source = rows(&[top.as_str(), bottom.as_str()]);
    assert_eq!(output_of(&source), "6");
}

#[test]
fn test_wrap_top_edge() {
    let source = full_height(&[(0, "8^"), (23, " @"), (24, " .")]);
    assert_eq!(output_of(&source), "8");
}

#[test]
fn test_wrap_bottom_edge() {
    let source = full_height(&[(0, "v7"), (1, " ."), (2, " @"), (24, ">v")]);
    assert_eq!(output_of(&source), "7");
}

// ═══════════════════════════════════════════════════════════════════════════
// String Mode
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_string_mode_pushes_instruction_bytes() {
    assert_eq!(output_of(r##""#",@"##), "#");
}

#[test]
fn test_string_mode_keeps_spaces() {
    assert_eq!(output_of(r#""a b",,,@"#), "b a");
}

// ═══════════════════════════════════════════════════════════════════════════
// Self-Modification
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_put_halt_ahead_of_cursor() {
    assert_eq!(output_of(r#""@"80p1.z"#), "1");
}

#[test]
fn test_put_instruction_then_execute_it() {
    assert_eq!(output_of(r#""9"60p .@"#), "9");
}

#[test]
fn test_put_then_get() {
    assert_eq!(output_of(r#""A"00p00g,@"#), "A");
}

#[test]
fn test_get_returns_signed_byte() {
    assert_eq!(output_of("01-00p00g.@"), "-1");
}

#[test]
fn test_get_outside_grid_is_zero() {
    assert_eq!(output_of("99*9g.@"), "0");
    assert_eq!(output_of("01-0g.@"), "0");
}

#[test]
fn test_put_outside_grid_is_ignored() {
    let mut vm = build("799*0p.@", "", test_config());
    vm.run().unwrap();
    assert_eq!(vm.output().to_string_lossy(), "0");
    assert_eq!(vm.grid().get(0, 0), Some(b'7'));
}

// ═══════════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_line_too_long_is_rejected() {
    let wide = "1".repeat(GRID_WIDTH + 1);
    let source = rows(&["@", wide.as_str()]);
    let err = Grid::from_source(source.as_bytes()).unwrap_err();
    assert_eq!(err, BefError::LineTooLong { line: 2, length: 81, max: 80 });
    assert_eq!(err.category(), ErrorCategory::Load);
}

#[test]
fn test_lines_past_the_grid_are_ignored() {
    let mut lines = vec!["1.@"; GRID_HEIGHT];
    let wide = "z".repeat(GRID_WIDTH + 10);
    lines.push(wide.as_str());
    assert_eq!(output_of(&rows(&lines)), "1");
}

#[test]
fn test_load_file_with_crlf() {
    let path = temp_source("crlf", b"64+.@\r\n\r\n");
    let grid = load_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut vm = Vm::with_config(grid, ReaderInput::new(&b""[..]), OutputBuffer::new(), test_config());
    vm.run().unwrap();
    assert_eq!(vm.output().to_string_lossy(), "10");
}

#[test]
fn test_load_missing_file() {
    let err = load_file("/nonexistent/befunge_plus/missing.bf").unwrap_err();
    assert!(matches!(err, BefError::SourceUnreadable { .. }));
    assert_eq!(err.category(), ErrorCategory::Load);
    assert_eq!(err.exit_status(), 1);
}
