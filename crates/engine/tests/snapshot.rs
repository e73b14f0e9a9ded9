use engine::{Calculator, DisplayMode, Key, OperationKind, Operator, Session, Snapshot};

fn busy_session() -> Session {
    let mut session = Session::new();
    for key in [
        Key::ToggleCurrency,
        Key::Digit('1'),
        Key::Digit('2'),
        Key::Digit('5'),
        Key::Operator(Operator::Add),
        Key::Digit('7'),
        Key::Digit('5'),
        Key::Operator(Operator::Subtract),
        Key::Digit('2'),
    ] {
        session.press(key).unwrap();
    }
    session
}

#[test]
fn snapshot_round_trips_through_json() {
    let session = busy_session();
    let raw = session.to_json().unwrap();

    let restored = Session::from_json(&raw);

    assert_eq!(restored.calculator(), session.calculator());
}

#[test]
fn snapshot_uses_the_documented_field_names() {
    let raw = busy_session().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["currentEntry"], "2");
    assert_eq!(value["pendingOperator"], "Subtract");
    assert_eq!(value["awaitingNewEntry"], false);
    assert_eq!(value["displayMode"], "Currency");
    assert_eq!(value["lastAddedValue"], 0.75);
    let history = value["operationHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["kind"], "Add");
    assert_eq!(history[1]["runningTotal"], 2.0);
}

#[test]
fn restore_rederives_tampered_totals() {
    let mut snapshot = busy_session().snapshot();
    for op in &mut snapshot.operation_history {
        op.running_total = 1_000.0;
    }

    let calc = Calculator::from(snapshot);

    let totals: Vec<f64> = calc
        .ledger()
        .entries()
        .iter()
        .map(|op| op.running_total)
        .collect();
    assert_eq!(totals, vec![1.25, 2.0]);
    assert_eq!(calc.ledger().total(), 2.0);
}

#[test]
fn legacy_snapshot_starts_with_an_empty_ledger() {
    let raw = r#"{
        "currentValue": "42",
        "previousValue": 40,
        "operator": "add",
        "waitingForOperand": false,
        "runningTotal": 82,
        "addedNumbers": [40, 42]
    }"#;

    let session = Session::from_json(raw);
    let calc = session.calculator();

    assert!(calc.ledger().is_empty());
    assert_eq!(calc.ledger().total(), 0.0);
    assert_eq!(calc.current_entry(), "42");
    assert_eq!(calc.state().previous_value, None);
    assert_eq!(calc.state().pending_operator, None);
}

#[test]
fn malformed_fields_fall_back_individually() {
    let raw = r#"{
        "currentEntry": "12..3",
        "previousValue": "twelve",
        "pendingOperator": "Modulo",
        "awaitingNewEntry": "yes",
        "lastAddedValue": 3,
        "displayMode": "Currency",
        "operationHistory": []
    }"#;

    let calc = Calculator::from(Snapshot::from_json(raw));
    let state = calc.state();

    assert_eq!(state.current_entry, "0");
    assert_eq!(state.previous_value, None);
    assert_eq!(state.pending_operator, None);
    assert!(!state.awaiting_new_entry);
    assert_eq!(state.last_added_value, Some(3.0));
    assert_eq!(state.display_mode, DisplayMode::Currency);
}

#[test]
fn missing_fields_default_to_initial_state() {
    let calc = Calculator::from(Snapshot::from_json(r#"{"operationHistory": []}"#));

    assert_eq!(calc, Calculator::new());
}

#[test]
fn malformed_history_empties_the_ledger_only() {
    let raw = r#"{
        "currentEntry": "8",
        "operationHistory": [{"id": "op_1700000000_abc", "kind": "add", "value": 8}]
    }"#;

    let calc = Calculator::from(Snapshot::from_json(raw));

    assert!(calc.ledger().is_empty());
    assert_eq!(calc.current_entry(), "8");
}

#[test]
fn duplicated_history_ids_are_discarded() {
    let mut snapshot = busy_session().snapshot();
    let first = snapshot.operation_history[0].clone();
    snapshot.operation_history.push(first);

    let calc = Calculator::from(snapshot);

    assert!(calc.ledger().is_empty());
}

#[test]
fn restored_session_keeps_editing_history() {
    let raw = busy_session().to_json().unwrap();
    let mut session = Session::from_json(&raw);
    let seed = session.calculator().ledger().entries()[0].clone();
    assert_eq!(seed.kind, OperationKind::Add);

    session.edit_entry(seed.id, 2.25).unwrap();

    assert_eq!(session.calculator().ledger().total(), 3.0);
}
