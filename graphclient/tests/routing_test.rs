// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection routing for single statements, writes and stacks

use graphclient::driver::memory::{Journal, MemoryConnection};
use graphclient::{params, Client, Error, Parameters};
use std::sync::Arc;

/// "default" (A, master) and "replica" (B) sharing one journal
fn setup() -> (Client, Journal) {
    let journal = Journal::new();
    let a = MemoryConnection::with_journal("default", journal.clone());
    let b = MemoryConnection::with_journal("replica", journal.clone());

    let client = Client::builder()
        .add_connection(Arc::new(a))
        .add_connection(Arc::new(b))
        .set_master("default")
        .build()
        .expect("Failed to build client");
    (client, journal)
}

fn executed_on(journal: &Journal) -> Vec<String> {
    journal
        .entries()
        .into_iter()
        .map(|e| e.connection_alias)
        .collect()
}

#[test]
fn test_run_uses_alias_when_given() {
    let (client, journal) = setup();

    client
        .run("MATCH (n) RETURN n", Parameters::new(), None, Some("replica"))
        .expect("Query should succeed");

    assert_eq!(executed_on(&journal), vec!["replica"]);
}

#[test]
fn test_run_uses_default_without_alias() {
    let (client, journal) = setup();

    let result = client
        .run("MATCH (n) RETURN n", Parameters::new(), None, None)
        .expect("Query should succeed")
        .expect("Result should be present");

    assert_eq!(result.summary().connection_alias(), "default");
    assert_eq!(executed_on(&journal), vec!["default"]);
}

#[test]
fn test_run_unknown_alias_fails_before_execution() {
    let (client, journal) = setup();

    let err = client
        .run("MATCH (n) RETURN n", Parameters::new(), None, Some("analytics"))
        .unwrap_err();

    match err {
        Error::UnknownConnectionAlias(alias) => assert_eq!(alias, "analytics"),
        other => panic!("Unexpected error: {}", other),
    }
    assert!(journal.is_empty());
}

#[test]
fn test_run_write_targets_master() {
    let (client, journal) = setup();

    let result = client
        .run_write("CREATE (n:Person {name: $name})", params! { "name" => "Alice" }, None)
        .expect("Write should succeed");

    assert_eq!(result.summary().connection_alias(), "default");
    assert_eq!(executed_on(&journal), vec!["default"]);
    assert_eq!(
        journal.entries()[0].statement.parameters()["name"],
        serde_json::json!("Alice")
    );
}

#[test]
fn test_run_write_targets_master_even_if_not_default() {
    let journal = Journal::new();
    let client = Client::builder()
        .add_connection(Arc::new(MemoryConnection::with_journal("reader", journal.clone())))
        .add_connection(Arc::new(MemoryConnection::with_journal("writer", journal.clone())))
        .set_master("writer")
        .build()
        .expect("Failed to build client");

    client
        .run_write("CREATE (n)", Parameters::new(), None)
        .expect("Write should succeed");
    client
        .run("MATCH (n) RETURN n", Parameters::new(), None, None)
        .expect("Read should succeed");

    assert_eq!(executed_on(&journal), vec!["writer", "reader"]);
}

#[test]
fn test_stack_with_write_goes_to_master() {
    let (client, journal) = setup();

    let mut stack = client.stack(Some("import"), Some("replica"));
    stack
        .push("MATCH (n) RETURN count(n)", Parameters::new(), None)
        .push_write("CREATE (n:Movie)", Parameters::new(), None);

    let results = client
        .run_stack(&stack)
        .expect("Stack should succeed")
        .expect("Results should be present");

    assert_eq!(results.len(), 2);
    assert_eq!(executed_on(&journal), vec!["default", "default"]);
}

#[test]
fn test_read_stack_uses_its_alias() {
    let (client, journal) = setup();

    let mut stack = client.stack(None, Some("replica"));
    stack
        .push("MATCH (n) RETURN n", Parameters::new(), None)
        .push("MATCH ()-[r]->() RETURN r", Parameters::new(), None);
    client.run_stack(&stack).expect("Stack should succeed");

    let mut default_stack = client.stack(None, None);
    default_stack.push("RETURN 1", Parameters::new(), None);
    client
        .run_stack(&default_stack)
        .expect("Stack should succeed");

    assert_eq!(executed_on(&journal), vec!["replica", "replica", "default"]);
}

#[test]
fn test_read_stack_unknown_alias() {
    let (client, journal) = setup();

    let mut stack = client.stack(None, Some("nowhere"));
    stack.push("RETURN 1", Parameters::new(), None);

    assert!(matches!(
        client.run_stack(&stack),
        Err(Error::UnknownConnectionAlias(_))
    ));
    assert!(journal.is_empty());
}

#[test]
fn test_stack_preserves_statement_order() {
    let (client, _journal) = setup();

    let mut stack = client.stack(Some("ordered"), None);
    for i in 0..5 {
        stack.push(
            format!("RETURN {} AS i", i),
            params! { "i" => i },
            Some(format!("s{}", i)),
        );
    }

    let results = client
        .run_stack(&stack)
        .expect("Stack should succeed")
        .expect("Results should be present");

    assert_eq!(results.tag(), Some("ordered"));
    for (i, (result, statement)) in results.results().iter().zip(stack.statements()).enumerate() {
        assert_eq!(result.summary().statement(), statement);
        assert_eq!(result.summary().statement().tag(), Some(format!("s{}", i).as_str()));
    }
}

#[test]
fn test_empty_stack_yields_empty_collection() {
    let (client, journal) = setup();

    let stack = client.stack(None, None);
    let results = client
        .run_stack(&stack)
        .expect("Stack should succeed")
        .expect("Results should be present");

    assert!(results.is_empty());
    assert!(journal.is_empty());
}
