// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transactions and label listing through the client

use graphclient::driver::memory::{ExecutionKind, Journal, MemoryConnection};
use graphclient::{Client, DatabaseError, Error, Label, Parameters, TransactionStatus};
use parking_lot::Mutex;
use std::sync::Arc;

fn setup() -> (Client, MemoryConnection, MemoryConnection, Journal) {
    let journal = Journal::new();
    let a = MemoryConnection::with_journal("default", journal.clone());
    let b = MemoryConnection::with_journal("replica", journal.clone());

    let client = Client::builder()
        .add_connection(Arc::new(a.clone()))
        .add_connection(Arc::new(b.clone()))
        .set_master("default")
        .build()
        .expect("Failed to build client");
    (client, a, b, journal)
}

#[test]
fn test_transaction_on_default_connection() {
    let (client, _a, _b, journal) = setup();

    let mut tx = client.transaction(None).expect("Failed to open transaction");
    assert_eq!(tx.connection_alias(), "default");
    assert_eq!(tx.status(), TransactionStatus::Pending);

    tx.begin().expect("Failed to begin");
    tx.run("CREATE (n:Person)", Parameters::new(), None)
        .expect("Statement should succeed");
    assert!(journal.is_empty(), "Nothing is visible before commit");

    tx.commit().expect("Failed to commit");
    assert!(tx.is_committed());

    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].connection_alias, "default");
    assert_eq!(entries[0].kind, ExecutionKind::Transaction);
}

#[test]
fn test_transaction_on_aliased_connection() {
    let (client, _a, _b, journal) = setup();

    let mut tx = client
        .transaction(Some("replica"))
        .expect("Failed to open transaction");
    tx.run("MATCH (n) RETURN n", Parameters::new(), None)
        .expect("Statement should succeed");
    tx.commit().expect("Failed to commit");

    assert_eq!(journal.entries_for("replica").len(), 1);
    assert!(journal.entries_for("default").is_empty());
}

#[test]
fn test_transaction_unknown_alias() {
    let (client, _a, _b, _journal) = setup();
    assert!(matches!(
        client.transaction(Some("missing")),
        Err(Error::UnknownConnectionAlias(_))
    ));
}

#[test]
fn test_transaction_shares_client_events() {
    let (client, _a, _b, _journal) = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    client
        .events()
        .on_pre_run(move |e| s.lock().push(e.statements().len()));

    let mut tx = client.transaction(None).expect("Failed to open transaction");
    assert!(Arc::ptr_eq(tx.events(), client.events()));

    let mut stack = client.stack(None, None);
    stack
        .push("CREATE (a)", Parameters::new(), None)
        .push("CREATE (b)", Parameters::new(), None);
    tx.run("CREATE (c)", Parameters::new(), None)
        .expect("Statement should succeed");
    tx.run_stack(&stack).expect("Stack should succeed");
    tx.rollback().expect("Failed to roll back");

    assert_eq!(*seen.lock(), vec![1, 2]);
    assert!(tx.is_rolled_back());
}

#[test]
fn test_transaction_failure_propagates() {
    let (client, a, _b, _journal) = setup();
    a.fail_on("CREATE (x)", DatabaseError::new("locked"));

    let mut tx = client.transaction(None).expect("Failed to open transaction");
    let err = tx
        .run("CREATE (x)", Parameters::new(), None)
        .expect_err("Failure should propagate");
    assert_eq!(err.as_database_error().map(|e| e.message.as_str()), Some("locked"));
    assert_eq!(tx.status(), TransactionStatus::RolledBack);
}

#[test]
fn test_dropped_transaction_is_rolled_back() {
    let (client, _a, _b, journal) = setup();
    {
        let mut tx = client.transaction(None).expect("Failed to open transaction");
        tx.run("CREATE (n)", Parameters::new(), None)
            .expect("Statement should succeed");
    }
    assert!(journal.is_empty());
}

#[test]
fn test_get_labels() {
    let (client, a, b, _journal) = setup();
    a.set_labels(["Person", "Movie"]);
    b.set_labels(["Replica"]);

    let labels = client.get_labels(None).expect("Labels should load");
    assert_eq!(labels, vec![Label::new("Person"), Label::new("Movie")]);

    let replica_labels = client
        .get_labels(Some("replica"))
        .expect("Labels should load");
    assert_eq!(replica_labels, vec![Label::new("Replica")]);
}

#[test]
fn test_get_labels_propagates_driver_errors() {
    let (client, a, _b, _journal) = setup();
    a.fail_on(graphclient::labels::LABELS_QUERY, DatabaseError::new("forbidden"));

    assert!(client
        .get_labels(None)
        .expect_err("Failure should propagate")
        .is_database_error());
}
