// Integration tests for keeping code views and the outer document in sync.
//
// Every test drives an `EditorSession` the way a host would: edits made in a
// code buffer must show up in the outer document exactly once, and edits to
// the outer document must show up in the buffer without bouncing back.

use weaver_editor_embed::{
    Document, EditorSession, EmbedConfig, InnerTransaction, NodeId, NodeType, Selection,
    TextChange, Transaction,
};

/// <p>ab</p> 0..4, <code>let x</code> 4..11, <p>c</p> 11..14
fn session() -> EditorSession {
    let doc = Document::builder()
        .paragraph("ab")
        .code_block("let x")
        .paragraph("c")
        .build();
    EditorSession::new(doc, EmbedConfig::default())
}

fn code_text(session: &EditorSession) -> String {
    session.state().doc.blocks()[1].text_content().to_string()
}

#[test]
fn buffer_edit_reaches_outer_document_once() {
    let session = session();
    assert!(session.click_node(NodeId(1)));
    let view = session.view_for(NodeId(1)).unwrap();

    view.dispatch_inner(InnerTransaction::new().change(TextChange::insert(5, " = 1")))
        .unwrap();

    assert_eq!(code_text(&session), "let x = 1");
    // The echo did not re-apply the insertion to the buffer.
    assert_eq!(view.text(), "let x = 1");
    assert_eq!(session.state().selection, Selection::cursor(5));
    assert!(!view.is_updating());
}

#[test]
fn outer_edit_resyncs_buffer_without_echo() {
    let session = session();
    let mut tr = Transaction::new();
    tr.replace_with(5, 5, "// ");
    session.dispatch(tr);

    let view = session.view_for(NodeId(1)).unwrap();
    assert_eq!(view.text(), "// let x");
    assert_eq!(code_text(&session), "// let x");

    // One history entry: the resync did not dispatch anything of its own.
    assert!(session.undo());
    assert!(!session.can_undo());
    assert_eq!(view.text(), "let x");
}

#[test]
fn multi_span_buffer_edit_maps_with_running_offset() {
    let session = session();
    session.click_node(NodeId(1));
    let view = session.view_for(NodeId(1)).unwrap();

    view.dispatch_inner(
        InnerTransaction::new()
            .change(TextChange::insert(0, "A"))
            .change(TextChange::new(3..5, "Z")),
    )
    .unwrap();

    assert_eq!(view.text(), "AletZ");
    assert_eq!(code_text(&session), "AletZ");
}

#[test]
fn selection_only_buffer_update_moves_outer_selection() {
    let session = session();
    session.click_node(NodeId(1));
    let view = session.view_for(NodeId(1)).unwrap();

    view.dispatch_inner(InnerTransaction::new().select(Selection::new(4, 1)))
        .unwrap();

    assert_eq!(session.state().selection, Selection::new(9, 6));
    assert!(!session.can_undo());
}

#[test]
fn unfocused_buffer_edit_is_not_forwarded() {
    let session = session();
    let view = session.view_for(NodeId(1)).unwrap();
    view.dispatch_inner(InnerTransaction::new().change(TextChange::insert(0, "x")))
        .unwrap();
    assert_eq!(view.text(), "xlet x");
    assert_eq!(code_text(&session), "let x");
}

#[test]
fn type_change_recreates_view() {
    let session = session();
    let first = session.view_for(NodeId(1)).unwrap();

    let mut tr = Transaction::new();
    tr.set_block_type(4, NodeType::Paragraph);
    session.dispatch(tr);
    assert!(session.view_for(NodeId(1)).is_none());
    assert!(!first.has_focus());

    let mut tr = Transaction::new();
    tr.set_block_type(4, NodeType::CodeBlock);
    session.dispatch(tr);
    let second = session.view_for(NodeId(1)).unwrap();
    assert_eq!(second.text(), "let x");
}

#[test]
fn removing_block_drops_its_view() {
    let session = session();
    session.click_node(NodeId(1));

    let mut tr = Transaction::new();
    tr.remove_block(4).set_selection(Selection::cursor(1));
    session.dispatch(tr);

    assert!(session.views().is_empty());
    assert!(session.focused_view().is_none());
}

#[test]
fn undo_and_redo_flow_back_into_buffer() {
    let session = session();
    session.click_node(NodeId(1));
    let view = session.view_for(NodeId(1)).unwrap();

    view.dispatch_inner(InnerTransaction::new().change(TextChange::delete(3..5)))
        .unwrap();
    assert_eq!(code_text(&session), "let");

    assert!(session.undo());
    assert_eq!(view.text(), "let x");
    assert!(session.can_redo());

    assert!(session.redo());
    assert_eq!(view.text(), "let");
    assert!(!session.redo());
}

#[test]
fn buffer_edit_follows_block_after_preceding_text_grows() {
    let session = session();
    let mut tr = Transaction::new();
    tr.replace_with(1, 1, "HELLO ");
    session.dispatch(tr);

    session.click_node(NodeId(1));
    let view = session.view_for(NodeId(1)).unwrap();
    view.dispatch_inner(InnerTransaction::new().change(TextChange::insert(5, "!")))
        .unwrap();

    let state = session.state();
    assert_eq!(state.doc.blocks()[0].text_content(), "HELLO ab");
    assert_eq!(state.doc.blocks()[1].text_content(), "let x!");
    assert_eq!(state.doc.blocks()[2].text_content(), "c");
}

#[test]
fn mixed_edit_sequence_keeps_both_sides_equal() {
    let session = session();
    session.click_node(NodeId(1));
    let view = session.view_for(NodeId(1)).unwrap();

    let edits = [
        InnerTransaction::new().change(TextChange::insert(5, " = 'é';")),
        InnerTransaction::new()
            .change(TextChange::new(0..3, "const"))
            .change(TextChange::new(4..5, "🦀")),
        InnerTransaction::new()
            .change(TextChange::delete(0..6))
            .change(TextChange::insert(14, "\n"))
            .select(Selection::new(0, 3)),
        InnerTransaction::new().select(Selection::cursor(2)),
    ];

    for tr in edits {
        view.dispatch_inner(tr).unwrap();
        let state = session.state();
        let block = state.doc.blocks()[1].clone();
        assert_eq!(view.text(), block.text_content());

        // Feeding the same block back changes nothing on either side.
        let selection = view.selection();
        assert!(view.update(&block));
        assert_eq!(view.text(), block.text_content());
        assert_eq!(view.selection(), selection);
        assert_eq!(session.state(), state);
    }

    assert_eq!(view.text(), "🦀 = 'é';\n");
    assert_eq!(session.state().selection, Selection::cursor(7));
}
