//! Integration tests for the full traversal loop: scripted inbox in,
//! per-student directory tree out.

use assert_fs::prelude::*;
use predicates::prelude::*;

use algebraix_fetch::download::MemoryTransport;
use algebraix_fetch::error::FetchError;
use algebraix_fetch::model::identity::IdentityRecord;
use algebraix_fetch::page::memory::{MemoryPage, ScriptedMessage};
use algebraix_fetch::roster::Roster;
use algebraix_fetch::session::SessionController;

fn alice_roster() -> Roster {
    let mut roster = Roster::default();
    roster.students.insert(
        "Alice".to_string(),
        IdentityRecord {
            group: "10A".to_string(),
            aliases: vec!["Mrs. Smith".to_string()],
        },
    );
    roster
}

// ─── Test 1: Two messages, one attachment each ──────────────────────

#[test]
fn test_end_to_end_two_messages_with_attachments() {
    let root = assert_fs::TempDir::new().expect("temp dir");

    let page = MemoryPage::new(vec![
        ScriptedMessage::new("Mrs. Smith", "First message body")
            .with_link("Inbox", "https://inbox.example.com/")
            .with_link("att1.pdf (45K)", "https://inbox.example.com/att/1"),
        ScriptedMessage::new("Mrs. Smith", "Second message body")
            .with_link("att2.pdf (2M)", "https://inbox.example.com/att/2"),
    ]);
    let transport = MemoryTransport::default()
        .with_body("https://inbox.example.com/att/1", b"first attachment")
        .with_body("https://inbox.example.com/att/2", b"second attachment");

    let controller =
        SessionController::new(page, transport, alice_roster(), root.path().to_path_buf());
    let summary = controller.run(&|_| {}).expect("run succeeds");

    assert_eq!(summary.messages, 2);
    assert_eq!(summary.attachments, 2);

    let alice = root.child("AlgebraixInbox/10AAlice");
    alice.child("01.txt").assert("First message body");
    alice.child("01_att1.pdf").assert("first attachment");
    alice.child("02.txt").assert("Second message body");
    alice.child("02_att2.pdf").assert("second attachment");
}

// ─── Test 2: Re-run appends, never overwrites ───────────────────────

#[test]
fn test_rerun_continues_numbering() {
    let root = assert_fs::TempDir::new().expect("temp dir");

    let inbox = vec![ScriptedMessage::new("Mrs. Smith", "same message")];
    for expected in ["01.txt", "02.txt"] {
        let controller = SessionController::new(
            MemoryPage::new(inbox.clone()),
            MemoryTransport::default(),
            alice_roster(),
            root.path().to_path_buf(),
        );
        controller.run(&|_| {}).expect("run succeeds");
        root.child("AlgebraixInbox/10AAlice")
            .child(expected)
            .assert(predicate::path::exists());
    }

    // The first run's file is untouched.
    root.child("AlgebraixInbox/10AAlice/01.txt")
        .assert("same message");
}

// ─── Test 3: Unregistered sender files under raw name, no group ─────

#[test]
fn test_unknown_sender_directory() {
    let root = assert_fs::TempDir::new().expect("temp dir");

    let page = MemoryPage::new(vec![ScriptedMessage::new("Bob Unknown", "hi")]);
    let controller = SessionController::new(
        page,
        MemoryTransport::default(),
        alice_roster(),
        root.path().to_path_buf(),
    );
    controller.run(&|_| {}).expect("run succeeds");

    root.child("AlgebraixInbox/BobUnknown/01.txt").assert("hi");
}

// ─── Test 4: Decorative links are not downloaded ────────────────────

#[test]
fn test_non_attachment_links_ignored() {
    let root = assert_fs::TempDir::new().expect("temp dir");

    let page = MemoryPage::new(vec![ScriptedMessage::new("Mrs. Smith", "body")
        .with_link("Sign out", "https://inbox.example.com/logout")
        .with_link("Help", "https://inbox.example.com/help")]);
    let controller = SessionController::new(
        page,
        MemoryTransport::default(),
        alice_roster(),
        root.path().to_path_buf(),
    );
    let summary = controller.run(&|_| {}).expect("run succeeds");

    assert_eq!(summary.attachments, 0);
    let alice = root.child("AlgebraixInbox/10AAlice");
    alice.child("01.txt").assert(predicate::path::exists());
    // Only the body file exists.
    let entries: Vec<_> = std::fs::read_dir(alice.path())
        .expect("read dir")
        .collect();
    assert_eq!(entries.len(), 1);
}

// ─── Test 5: Failed download keeps the body file, aborts the run ────

#[test]
fn test_failed_download_leaves_body_file() {
    let root = assert_fs::TempDir::new().expect("temp dir");

    let page = MemoryPage::new(vec![
        ScriptedMessage::new("Mrs. Smith", "body before failure")
            .with_link("att1.pdf (45K)", "https://inbox.example.com/att/1"),
        ScriptedMessage::new("Mrs. Smith", "never reached"),
    ]);
    let transport =
        MemoryTransport::default().with_failure("https://inbox.example.com/att/1", 403);

    let controller =
        SessionController::new(page, transport, alice_roster(), root.path().to_path_buf());
    let err = controller.run(&|_| {}).unwrap_err();

    assert!(matches!(err, FetchError::Download { status: 403, .. }));
    let alice = root.child("AlgebraixInbox/10AAlice");
    alice.child("01.txt").assert("body before failure");
    alice
        .child("01_att1.pdf")
        .assert(predicate::path::missing());
    alice.child("02.txt").assert(predicate::path::missing());
}
