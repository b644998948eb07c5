//! End-to-end behaviour of a mounted palette driven through key events.

use std::sync::{Arc, Mutex};

use cmdk_palette::{
    CommandAction, CommandItem, CommandPalette, EventOutcome, HotkeyRouter, PaletteConfig,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

type Log = Arc<Mutex<Vec<String>>>;

fn recording(id: &str, category: &str, log: &Log) -> CommandItem {
    let log = log.clone();
    let name = id.to_string();
    CommandItem::new(
        id,
        id.to_uppercase(),
        CommandAction::sync(move || {
            log.lock().unwrap().push(name.clone());
            Ok(())
        }),
    )
    .with_category(category)
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl_k() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)
}

/// Routes a key the way a host event loop does.
fn dispatch(router: &HotkeyRouter, palette: &mut CommandPalette, key: KeyEvent) -> EventOutcome {
    if router.route(&key).is_consumed() {
        palette.sync();
        return EventOutcome::Consumed;
    }
    palette.handle_key(key)
}

fn setup(log: &Log) -> (HotkeyRouter, CommandPalette) {
    let router = HotkeyRouter::new();
    let commands = vec![
        recording("a", "File", log),
        recording("b", "File", log),
        recording("c", "System", log),
    ];
    let palette = CommandPalette::mount(commands, PaletteConfig::default(), &router).unwrap();
    (router, palette)
}

#[test]
fn test_open_navigate_execute() {
    let log = Log::default();
    let (router, mut palette) = setup(&log);

    dispatch(&router, &mut palette, ctrl_k());
    assert!(palette.is_visible());
    assert_eq!(palette.state().selected_index(), 0);
    assert_eq!(palette.selected().map(|c| c.id.as_str()), Some("a"));

    dispatch(&router, &mut palette, press(KeyCode::Down));
    dispatch(&router, &mut palette, press(KeyCode::Down));
    assert_eq!(palette.state().selected_index(), 2);
    assert_eq!(palette.selected().map(|c| c.id.as_str()), Some("c"));

    dispatch(&router, &mut palette, press(KeyCode::Enter));
    assert_eq!(*log.lock().unwrap(), vec!["c".to_string()]);
    assert!(!palette.is_visible());
    assert_eq!(palette.state().selected_index(), 0);
    assert!(palette.state().query().is_empty());
}

#[test]
fn test_selection_stays_in_bounds() {
    let log = Log::default();
    let (router, mut palette) = setup(&log);
    dispatch(&router, &mut palette, ctrl_k());

    for _ in 0..10 {
        dispatch(&router, &mut palette, press(KeyCode::Down));
        assert!(palette.state().selected_index() <= 2);
    }
    assert_eq!(palette.state().selected_index(), 2);

    for _ in 0..10 {
        dispatch(&router, &mut palette, press(KeyCode::Up));
    }
    assert_eq!(palette.state().selected_index(), 0);
}

#[test]
fn test_reopen_starts_fresh() {
    let log = Log::default();
    let (router, mut palette) = setup(&log);

    dispatch(&router, &mut palette, ctrl_k());
    dispatch(&router, &mut palette, press(KeyCode::Char('s')));
    dispatch(&router, &mut palette, press(KeyCode::Down));
    dispatch(&router, &mut palette, press(KeyCode::Esc));

    dispatch(&router, &mut palette, ctrl_k());
    assert!(palette.is_visible());
    assert_eq!(palette.state().selected_index(), 0);
    assert!(palette.state().query().is_empty());
    assert_eq!(palette.groups().len(), 3);
}

#[test]
fn test_escape_is_idempotent() {
    let log = Log::default();
    let (router, mut palette) = setup(&log);

    dispatch(&router, &mut palette, ctrl_k());
    assert_eq!(
        dispatch(&router, &mut palette, press(KeyCode::Esc)),
        EventOutcome::Consumed
    );
    assert!(!palette.is_visible());

    assert_eq!(
        dispatch(&router, &mut palette, press(KeyCode::Esc)),
        EventOutcome::Ignored
    );
    assert!(!palette.is_visible());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_hotkey_twice_restores_visibility() {
    let log = Log::default();
    let (router, mut palette) = setup(&log);

    dispatch(&router, &mut palette, ctrl_k());
    dispatch(&router, &mut palette, ctrl_k());
    assert!(!palette.is_visible());

    palette.open_panel();
    dispatch(&router, &mut palette, ctrl_k());
    dispatch(&router, &mut palette, ctrl_k());
    assert!(palette.is_visible());
}

#[test]
fn test_keys_pass_through_when_closed() {
    let log = Log::default();
    let (router, mut palette) = setup(&log);

    assert_eq!(
        dispatch(&router, &mut palette, press(KeyCode::Char('x'))),
        EventOutcome::Ignored
    );
    assert_eq!(
        dispatch(&router, &mut palette, press(KeyCode::Enter)),
        EventOutcome::Ignored
    );
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_unmount_detaches_listener() {
    let log = Log::default();
    let (router, palette) = setup(&log);
    assert_eq!(router.listener_count(), 1);

    drop(palette);
    assert_eq!(router.listener_count(), 0);
    assert_eq!(router.route(&ctrl_k()), EventOutcome::Ignored);
}

#[test]
fn test_two_palettes_share_router() {
    let log = Log::default();
    let (router, mut first) = setup(&log);
    let mut second = CommandPalette::mount(
        vec![recording("z", "Misc", &log)],
        PaletteConfig::default(),
        &router,
    )
    .unwrap();

    assert!(router.route(&ctrl_k()).is_consumed());
    first.sync();
    second.sync();
    assert!(first.is_visible());
    assert!(second.is_visible());

    drop(second);
    assert_eq!(router.listener_count(), 1);
}

#[tokio::test]
async fn test_async_command_runs_in_background() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let router = HotkeyRouter::new();
    let commands = vec![CommandItem::new(
        "ping",
        "Ping",
        CommandAction::from_async(move || {
            let tx = tx.clone();
            async move {
                tx.send("pong")?;
                Ok(())
            }
        }),
    )];
    let mut palette = CommandPalette::mount(commands, PaletteConfig::default(), &router).unwrap();

    palette.open_panel();
    palette.handle_key(press(KeyCode::Enter));
    assert!(!palette.is_visible());
    assert_eq!(rx.recv().await, Some("pong"));
}
