use pagestrip::event_source::{KeyCode, KeyModifiers, MouseEventKind};
use pagestrip::inputs::Focus;
use pagestrip::pdf::OutlineNode;
use pagestrip::settings::Settings;
use pagestrip::strip::StartPosition;
use pagestrip::test_utils::FakeDocument;
use pagestrip::test_utils::test_helpers::{
    TestScenarioBuilder, capture_terminal_state, create_test_terminal,
};
use pagestrip::{App, run_app_with_event_source};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

/// Ten 400x800 px pages in an 80x25 terminal: the strip is 640x384 px
fn setup(doc: FakeDocument) -> (App<FakeDocument>, Terminal<TestBackend>) {
    let app = App::new(doc, StartPosition::default(), Settings::default());
    (app, create_test_terminal(80, 25))
}

fn tall_pages() -> FakeDocument {
    FakeDocument::with_pixel_pages(10, 400, 800)
}

fn run(app: &mut App<FakeDocument>, terminal: &mut Terminal<TestBackend>, scenario: TestScenarioBuilder) {
    let mut events = scenario.quit().build();
    run_app_with_event_source(terminal, app, &mut events).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();
}

#[test]
fn scrolling_with_keys_moves_within_page() {
    let (mut app, mut terminal) = setup(tall_pages());

    run(&mut app, &mut terminal, TestScenarioBuilder::new().scroll_down(3));

    let state = app.viewer().state();
    assert_eq!(state.page(), 0);
    assert!((state.line() - 240.0 / 801.0).abs() < 1e-5);
}

#[test]
fn scrolling_up_at_top_stays_put() {
    let (mut app, mut terminal) = setup(tall_pages());

    run(&mut app, &mut terminal, TestScenarioBuilder::new().scroll_up(5));

    assert_eq!(app.viewer().state().page(), 0);
    assert_eq!(app.viewer().state().line(), 0.0);
}

#[test]
fn page_down_moves_most_of_a_screen() {
    let (mut app, mut terminal) = setup(tall_pages());

    run(&mut app, &mut terminal, TestScenarioBuilder::new().page_down());

    let expected = 0.95 * 384.0 / 801.0;
    assert!((app.viewer().state().line() - expected).abs() < 1e-5);
}

#[test]
fn typed_page_number_jumps_and_status_follows() {
    let (mut app, mut terminal) = setup(tall_pages());

    run(&mut app, &mut terminal, TestScenarioBuilder::new().goto_page(5));

    assert_eq!(app.viewer().state().page(), 4);
    let screen = capture_terminal_state(&terminal);
    let status = screen.lines().last().unwrap();
    assert!(status.ends_with("5 / 10  100%"), "status was {status:?}");
}

#[test]
fn wheel_scrolls_and_ctrl_wheel_zooms() {
    let (mut app, mut terminal) = setup(tall_pages());

    let scenario = TestScenarioBuilder::new()
        .wheel(MouseEventKind::ScrollDown, KeyModifiers::NONE)
        .wheel(MouseEventKind::ScrollUp, KeyModifiers::CONTROL);
    run(&mut app, &mut terminal, scenario);

    let state = app.viewer().state();
    assert!((state.scale() - 1.1).abs() < 1e-5);
    assert!(state.line() > 0.0);
    assert!(capture_terminal_state(&terminal).contains("110%"));
}

#[test]
fn horizontal_scroll_shifts_pages_left() {
    let (mut app, mut terminal) = setup(tall_pages());

    let scenario = TestScenarioBuilder::new()
        .press_char('l')
        .press_char('l')
        .press_char('l');
    run(&mut app, &mut terminal, scenario);

    assert_eq!(app.viewer().state().bias(), 240.0);
    // centred at x = 120, then moved 240 px
    assert_eq!(app.placements()[0].x, -120);
}

#[test]
fn last_page_end_is_a_hard_stop() {
    let (mut app, mut terminal) = setup(FakeDocument::with_pixel_pages(3, 400, 300));

    let scenario = TestScenarioBuilder::new()
        .press_char('G')
        .scroll_down(20);
    run(&mut app, &mut terminal, scenario);

    assert_eq!(app.viewer().state().page(), 2);
    assert_eq!(app.viewer().state().line(), 1.0);
}

#[test]
fn failed_page_is_drawn_as_placeholder() {
    let doc = FakeDocument::with_pixel_pages(3, 400, 200);
    doc.set_failing(1, true);
    let (mut app, mut terminal) = setup(doc);

    run(&mut app, &mut terminal, TestScenarioBuilder::new());

    let placements = app.placements();
    assert_eq!(placements.len(), 2);
    assert!(placements[0].rendered);
    assert!(!placements[1].rendered);
    assert_eq!(placements[1].y, 202);
}

#[test]
fn outline_panel_navigates_to_bookmarks() {
    let doc = tall_pages().with_outline(vec![
        OutlineNode::new("Introduction", Some(0)),
        OutlineNode::new("Methods", Some(6)),
    ]);
    let (mut app, mut terminal) = setup(doc);

    let scenario = TestScenarioBuilder::new()
        .press_char('b')
        .press_char('j')
        .press_enter();
    run(&mut app, &mut terminal, scenario);

    assert!(app.is_outline_visible());
    assert_eq!(app.focus(), Focus::Outline);
    assert_eq!(app.viewer().state().page(), 6);

    let screen = capture_terminal_state(&terminal);
    assert!(screen.contains("Introduction"));
    assert!(screen.contains("Methods"));
    assert!(app.viewer().viewport().width < 640);
}

#[test]
fn tab_returns_focus_to_the_strip() {
    let doc = tall_pages().with_outline(vec![OutlineNode::new("Only", Some(3))]);
    let (mut app, mut terminal) = setup(doc);

    let scenario = TestScenarioBuilder::new()
        .press_char('b')
        .press_tab()
        .scroll_down(1);
    run(&mut app, &mut terminal, scenario);

    assert_eq!(app.focus(), Focus::Strip);
    assert!(app.viewer().state().line() > 0.0);
}

#[test]
fn out_of_range_page_shows_message() {
    let (mut app, mut terminal) = setup(tall_pages());

    run(&mut app, &mut terminal, TestScenarioBuilder::new().goto_page(42));

    assert_eq!(app.viewer().state().page(), 0);
    assert!(capture_terminal_state(&terminal).contains("No page 42"));
}

#[test]
fn rotation_keys_reach_the_viewer() {
    let (mut app, mut terminal) = setup(FakeDocument::with_pixel_pages(2, 400, 300));

    let scenario = TestScenarioBuilder::new()
        .press_char('r')
        .press_key(KeyCode::End);
    run(&mut app, &mut terminal, scenario);

    assert_eq!(app.viewer().state().rotation(), 90.0);
    assert_eq!(app.viewer().state().page(), 1);
    let first = app.placements()[0];
    assert_eq!((first.width, first.height), (300, 400));
    assert!(capture_terminal_state(&terminal).contains("90°"));
}

#[test]
fn resize_event_is_handled() {
    let (mut app, mut terminal) = setup(tall_pages());

    run(
        &mut app,
        &mut terminal,
        TestScenarioBuilder::new().resize(100, 30).scroll_down(1),
    );

    assert!(app.viewer().state().line() > 0.0);
}
