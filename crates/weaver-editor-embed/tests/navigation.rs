// Integration tests for moving the cursor into and out of code blocks.

use weaver_editor_embed::{
    Document, EditorSession, EmbedConfig, InnerTransaction, Key, KeyCombo, KeydownResult, NodeId,
    NodeType, Selection, TextChange, Transaction,
};

/// <p>ab</p> 0..4, <code>xyz</code> 4..9, <p>c</p> 9..12
fn session() -> EditorSession {
    let doc = Document::builder()
        .paragraph("ab")
        .code_block("xyz")
        .paragraph("c")
        .build();
    EditorSession::new(doc, EmbedConfig::default())
}

fn put_cursor(session: &EditorSession, pos: usize) {
    let mut tr = Transaction::new();
    tr.set_selection(Selection::cursor(pos));
    session.dispatch(tr);
}

fn press(session: &EditorSession, key: Key) -> KeydownResult {
    session.handle_key(&KeyCombo::new(key))
}

#[test]
fn arrow_right_enters_code_block_at_start() {
    let session = session();
    put_cursor(&session, 3);

    assert_eq!(press(&session, Key::ArrowRight), KeydownResult::Handled);
    assert_eq!(session.state().selection, Selection::cursor(5));

    let view = session.focused_view().unwrap();
    assert_eq!(view.node().id(), NodeId(1));
    assert_eq!(view.selection(), Selection::cursor(0));
    assert!(!session.has_focus());
}

#[test]
fn arrow_left_enters_code_block_at_end() {
    let session = session();
    put_cursor(&session, 10);

    assert_eq!(press(&session, Key::ArrowLeft), KeydownResult::Handled);
    assert_eq!(session.state().selection, Selection::cursor(8));
    assert_eq!(session.focused_view().unwrap().selection(), Selection::cursor(3));
}

#[test]
fn arrow_down_enters_from_single_line_paragraph() {
    let session = session();
    put_cursor(&session, 1);
    assert_eq!(press(&session, Key::ArrowDown), KeydownResult::Handled);
    assert!(session.focused_view().is_some());
}

#[test]
fn arrow_away_from_edge_is_left_to_default() {
    let session = session();
    put_cursor(&session, 2);
    assert_eq!(press(&session, Key::ArrowRight), KeydownResult::NotHandled);
    assert_eq!(session.state().selection, Selection::cursor(2));

    // Range selections are never redirected.
    let mut tr = Transaction::new();
    tr.set_selection(Selection::new(1, 3));
    session.dispatch(tr);
    assert_eq!(press(&session, Key::ArrowRight), KeydownResult::NotHandled);
    assert!(session.focused_view().is_none());
}

#[test]
fn arrow_toward_plain_paragraph_is_left_to_default() {
    let doc = Document::builder().paragraph("a").paragraph("b").build();
    let session = EditorSession::new(doc, EmbedConfig::default());
    put_cursor(&session, 2);
    assert_eq!(press(&session, Key::ArrowRight), KeydownResult::NotHandled);
    assert_eq!(session.state().selection, Selection::cursor(2));
}

#[test]
fn arrow_right_at_buffer_end_exits_forward() {
    let session = session();
    put_cursor(&session, 8);
    assert_eq!(session.focused_view().unwrap().selection(), Selection::cursor(3));

    // The buffer's default movement has nothing left to do.
    assert_eq!(press(&session, Key::ArrowRight), KeydownResult::NotHandled);
    assert_eq!(session.state().selection, Selection::cursor(10));
    assert!(session.has_focus());
    assert!(session.focused_view().is_none());
}

#[test]
fn arrow_left_at_buffer_start_exits_backward() {
    let session = session();
    put_cursor(&session, 5);
    press(&session, Key::ArrowLeft);
    assert_eq!(session.state().selection, Selection::cursor(3));
    assert!(session.has_focus());
}

#[test]
fn arrow_inside_buffer_stays_inside() {
    let session = session();
    put_cursor(&session, 6);
    assert_eq!(press(&session, Key::ArrowRight), KeydownResult::NotHandled);
    assert_eq!(press(&session, Key::ArrowLeft), KeydownResult::NotHandled);
    assert!(session.focused_view().is_some());
    assert_eq!(session.state().selection, Selection::cursor(6));
}

#[test]
fn vertical_exit_needs_first_or_last_line() {
    // <p>ab</p> 0..4, <code>one\ntwo</code> 4..13, <p>c</p> 13..16
    let doc = Document::builder()
        .paragraph("ab")
        .code_block("one\ntwo")
        .paragraph("c")
        .build();
    let session = EditorSession::new(doc, EmbedConfig::default());

    put_cursor(&session, 6);
    press(&session, Key::ArrowDown);
    assert!(session.focused_view().is_some());

    // Anywhere on the last line leaves through the block's end.
    put_cursor_in_view(&session, 5);
    press(&session, Key::ArrowDown);
    assert_eq!(session.state().selection, Selection::cursor(14));
    assert!(session.has_focus());
}

fn put_cursor_in_view(session: &EditorSession, offset: usize) {
    let view = session.focused_view().unwrap();
    view.dispatch_inner(InnerTransaction::new().select(Selection::cursor(offset)))
        .unwrap();
}

#[test]
fn escape_into_adjacent_code_block_focuses_its_view() {
    // <code>a</code> 0..3, <code>b</code> 3..6
    let doc = Document::builder().code_block("a").code_block("b").build();
    let session = EditorSession::new(doc, EmbedConfig::default());
    assert_eq!(session.focused_view().unwrap().node().id(), NodeId(0));

    put_cursor_in_view(&session, 1);
    press(&session, Key::ArrowRight);

    let view = session.focused_view().unwrap();
    assert_eq!(view.node().id(), NodeId(1));
    assert_eq!(view.selection(), Selection::cursor(0));
    assert_eq!(session.state().selection, Selection::cursor(4));
}

#[test]
fn ctrl_enter_leaves_through_new_paragraph() {
    let doc = Document::builder().paragraph("ab").code_block("xyz").build();
    let session = EditorSession::new(doc, EmbedConfig::default());
    put_cursor(&session, 6);

    let result = session.handle_key(&KeyCombo::ctrl(Key::Enter));
    assert_eq!(result, KeydownResult::Handled);

    let state = session.state();
    assert_eq!(state.doc.blocks().len(), 3);
    assert_eq!(state.doc.blocks()[2].node_type(), NodeType::Paragraph);
    assert_eq!(state.selection, Selection::cursor(10));
    assert!(session.has_focus());
}

#[test]
fn history_keys_in_buffer_drive_outer_history() {
    let session = session();
    put_cursor(&session, 8);
    let view = session.focused_view().unwrap();
    view.dispatch_inner(InnerTransaction::new().change(TextChange::insert(3, "!")))
        .unwrap();
    assert_eq!(session.state().doc.blocks()[1].text_content(), "xyz!");

    let undo = KeyCombo::ctrl(Key::character("z"));
    assert_eq!(session.handle_key(&undo), KeydownResult::Handled);
    assert_eq!(view.text(), "xyz");
    assert!(view.has_focus());

    let redo = KeyCombo::ctrl(Key::character("y"));
    assert_eq!(session.handle_key(&redo), KeydownResult::Handled);
    assert_eq!(view.text(), "xyz!");
}

#[test]
fn mac_keymap_uses_cmd_for_history() {
    let config = EmbedConfig {
        mac_keys: true,
        ..Default::default()
    };
    let doc = Document::builder().code_block("q").build();
    let session = EditorSession::new(doc, config);
    let view = session.focused_view().unwrap();
    view.dispatch_inner(InnerTransaction::new().change(TextChange::insert(1, "r")))
        .unwrap();

    assert_eq!(
        session.handle_key(&KeyCombo::ctrl(Key::character("z"))),
        KeydownResult::NotHandled
    );
    assert_eq!(
        session.handle_key(&KeyCombo::meta(Key::character("z"))),
        KeydownResult::Handled
    );
    assert_eq!(view.text(), "q");
}
