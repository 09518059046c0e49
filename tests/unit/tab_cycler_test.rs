use aero_shell::managers::tab_cycler::{label_at_position, next_label, previous_label, LAST_TAB_POSITION};
use aero_shell::types::state::BrowserState;
use aero_shell::types::tab::TabRecord;
use rstest::rstest;

fn strip(n: usize, active: Option<usize>) -> BrowserState {
    let tabs: Vec<TabRecord> = (1..=n).map(|i| TabRecord::new(format!("t{}", i))).collect();
    let active_label = active.map(|i| format!("t{}", i));
    BrowserState::new(tabs, active_label)
}

#[rstest]
#[case(3, 1, "t2")]
#[case(3, 2, "t3")]
#[case(3, 3, "t1")]
#[case(2, 2, "t1")]
fn test_next_wraps(#[case] n: usize, #[case] active: usize, #[case] expected: &str) {
    assert_eq!(next_label(&strip(n, Some(active))), Some(expected));
}

#[rstest]
#[case(3, 1, "t3")]
#[case(3, 3, "t2")]
#[case(2, 1, "t2")]
fn test_previous_wraps(#[case] n: usize, #[case] active: usize, #[case] expected: &str) {
    assert_eq!(previous_label(&strip(n, Some(active))), Some(expected));
}

#[rstest]
#[case::empty(0, None)]
#[case::single_tab(1, Some(1))]
#[case::no_active_tab(4, None)]
fn test_cycling_selects_nothing(#[case] n: usize, #[case] active: Option<usize>) {
    let state = strip(n, active);
    assert_eq!(next_label(&state), None);
    assert_eq!(previous_label(&state), None);
}

#[rstest]
#[case(5, 1, Some("t1"))]
#[case(5, 5, Some("t5"))]
#[case(5, 9, Some("t5"))]
#[case(5, 7, None)]
#[case(5, 0, None)]
#[case(12, 9, Some("t12"))]
#[case(12, 8, Some("t8"))]
#[case(1, 9, Some("t1"))]
#[case(0, 9, None)]
fn test_label_at_position(#[case] n: usize, #[case] position: usize, #[case] expected: Option<&str>) {
    assert_eq!(label_at_position(&strip(n, Some(1).filter(|_| n > 0)), position), expected);
}

#[test]
fn test_position_shortcut_ignores_active_tab() {
    let state = strip(3, None);
    assert_eq!(label_at_position(&state, 2), Some("t2"));
    assert_eq!(label_at_position(&state, LAST_TAB_POSITION), Some("t3"));
}
