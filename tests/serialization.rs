use dfa_minimize::{
    automaton::{
        dfa::{serialization::DfaSpec, DFA},
        Language,
    },
    validation::same_language::assert_same_language,
    DfaError,
};
use itertools::Itertools;

const PARITY: &str = r#"{
    "alphabet": ["a", "b"],
    "initial": "even",
    "states": [
        { "id": "even", "accepting": true, "transitions": { "a": "odd", "b": "even" } },
        { "id": "odd", "accepting": false, "transitions": { "a": "even", "b": "odd" } }
    ]
}"#;

fn word(input: &str) -> Vec<String> {
    input.chars().map(|c| c.to_string()).collect_vec()
}

#[test]
fn test_from_json() {
    let dfa = DFA::<String>::from_json(PARITY).unwrap();

    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.transition_count(), 4);
    assert!(dfa.is_complete());
    assert_eq!(dfa.initial(), dfa.state_by_label("even"));

    assert!(dfa.accepts(&word("abba")).unwrap());
    assert!(dfa.accepts(&word("bb")).unwrap());
    assert!(!dfa.accepts(&word("bab")).unwrap());
}

#[test]
fn test_json_field_names() {
    let dfa = DFA::<String>::from_json(PARITY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&dfa.to_json().unwrap()).unwrap();

    assert_eq!(value["alphabet"], serde_json::json!(["a", "b"]));
    assert_eq!(value["initial"], "even");
    assert_eq!(value["states"][0]["id"], "even");
    assert_eq!(value["states"][0]["accepting"], true);
    assert_eq!(value["states"][1]["transitions"]["a"], "even");
}

#[test]
fn test_json_round_trip() {
    let dfa = DFA::<String>::from_json(PARITY).unwrap();
    let json = dfa.to_json().unwrap();
    let restored = DFA::<String>::from_json(&json).unwrap();

    assert_eq!(dfa.to_spec(), restored.to_spec());
    assert_same_language(&dfa, &restored, 6);
}

#[test]
fn test_minimized_round_trip() {
    let json = r#"{
        "alphabet": ["0", "1"],
        "initial": "s0",
        "states": [
            { "id": "s0", "accepting": false, "transitions": { "0": "s1", "1": "s2" } },
            { "id": "s1", "accepting": true, "transitions": { "0": "s1", "1": "s1" } },
            { "id": "s2", "accepting": true, "transitions": { "0": "s2", "1": "s2" } }
        ]
    }"#;
    let dfa = DFA::<String>::from_json(json).unwrap();
    let minimized = dfa.minimized().unwrap();

    let restored = DFA::<String>::from_json(&minimized.to_json().unwrap()).unwrap();
    assert_eq!(restored.state_count(), 2);
    assert!(restored.state_by_label("s1_s2").is_some());
    assert_same_language(&dfa, &restored, 6);
}

#[test]
fn test_missing_initial_uses_first_state() {
    let json = r#"{
        "alphabet": ["a"],
        "initial": null,
        "states": [
            { "id": "p", "accepting": true, "transitions": { "a": "q" } },
            { "id": "q", "accepting": false }
        ]
    }"#;
    let dfa = DFA::<String>::from_json(json).unwrap();

    assert_eq!(dfa.initial(), dfa.state_by_label("p"));
    assert!(!dfa.is_complete());
    assert_eq!(dfa.transition_count(), 1);
}

#[test]
fn test_unknown_state_reference() {
    let bad_target = r#"{
        "alphabet": ["a"],
        "initial": "p",
        "states": [
            { "id": "p", "accepting": true, "transitions": { "a": "nowhere" } }
        ]
    }"#;
    assert!(matches!(
        DFA::<String>::from_json(bad_target),
        Err(DfaError::UnknownStateReference(label)) if label == "nowhere"
    ));

    let bad_initial = r#"{
        "alphabet": ["a"],
        "initial": "start",
        "states": [
            { "id": "p", "accepting": true, "transitions": { "a": "p" } }
        ]
    }"#;
    assert!(matches!(
        DFA::<String>::from_json(bad_initial),
        Err(DfaError::UnknownStateReference(label)) if label == "start"
    ));
}

#[test]
fn test_invalid_documents() {
    assert!(matches!(
        DFA::<String>::from_json("{ \"alphabet\": [\"a\"] "),
        Err(DfaError::Json(_))
    ));

    let duplicate = r#"{
        "alphabet": ["a"],
        "initial": "p",
        "states": [
            { "id": "p", "accepting": true },
            { "id": "p", "accepting": false }
        ]
    }"#;
    assert!(matches!(
        DFA::<String>::from_json(duplicate),
        Err(DfaError::DuplicateState(label)) if label == "p"
    ));

    let unknown_symbol = r#"{
        "alphabet": ["a"],
        "initial": "p",
        "states": [
            { "id": "p", "accepting": true, "transitions": { "c": "p" } }
        ]
    }"#;
    assert!(matches!(
        DFA::<String>::from_json(unknown_symbol),
        Err(DfaError::UnknownSymbol(symbol)) if symbol == "c"
    ));
}

#[test]
fn test_spec_conversion() {
    let mut dfa = DFA::new(vec![1u8, 2u8]);
    let q0 = dfa.add_state("q0", false).unwrap();
    let q1 = dfa.add_state("q1", true).unwrap();
    dfa.add_transition(q0, 1, q1).unwrap();
    dfa.add_transition(q1, 2, q0).unwrap();

    let spec: DfaSpec<u8> = dfa.to_spec();
    assert_eq!(spec.initial.as_deref(), Some("q0"));
    assert_eq!(spec.states.len(), 2);
    assert_eq!(spec.states[0].transitions.get(&1).map(String::as_str), Some("q1"));
    assert!(spec.states[0].transitions.get(&2).is_none());

    let restored = DFA::from_spec(spec).unwrap();
    assert!(restored.accepts(&[1, 2, 1]).unwrap());
    assert!(!restored.accepts(&[1, 2]).unwrap());
}

#[test]
fn test_graphviz() {
    let dfa = DFA::<String>::from_json(PARITY).unwrap();

    assert_eq!(
        dfa.to_graphviz(),
        "digraph {\n\
         \x20   s_0 [label=\"even\", shape=\"doublecircle\"];\n\
         \x20   s_1 [label=\"odd\", shape=\"circle\"];\n\
         \n\
         \x20   s_0 -> s_1 [label=\"a\"];\n\
         \x20   s_0 -> s_0 [label=\"b\"];\n\
         \x20   s_1 -> s_0 [label=\"a\"];\n\
         \x20   s_1 -> s_1 [label=\"b\"];\n\
         }"
    );
}

#[test]
fn test_graphviz_escapes_labels() {
    let mut dfa = DFA::new(vec!['"']);
    let q = dfa.add_state("say \"q\"", true).unwrap();
    dfa.add_transition(q, '"', q).unwrap();

    let dot = dfa.to_graphviz();
    assert!(dot.contains("s_0 [label=\"say \\\"q\\\"\", shape=\"doublecircle\"];"));
    assert!(dot.contains("s_0 -> s_0 [label=\"\\\"\"];"));
}

#[test]
fn test_json_file_round_trip() {
    let dfa = DFA::<String>::from_json(PARITY).unwrap();
    let path = std::env::temp_dir().join(format!("dfa_minimize_parity_{}.json", std::process::id()));

    dfa.to_json_file(&path).unwrap();
    let restored = DFA::<String>::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dfa.to_spec(), restored.to_spec());
    assert_same_language(&dfa, &restored, 6);
}

#[test]
fn test_missing_json_file() {
    let path = std::env::temp_dir().join("dfa_minimize_does_not_exist/automaton.json");

    assert!(matches!(
        DFA::<String>::from_json_file(&path),
        Err(DfaError::Io(_))
    ));
}

#[test]
fn test_generic_symbols_without_transitions() {
    let json = r#"{
        "alphabet": [0, 1],
        "initial": "only",
        "states": [
            { "id": "only", "accepting": true }
        ]
    }"#;
    let spec: DfaSpec<u8> = serde_json::from_str(json).unwrap();
    assert!(spec.states[0].transitions.is_empty());

    let mut dfa = DFA::from_spec(spec).unwrap();
    assert!(!dfa.is_complete());
    dfa.add_sink_state("sink").unwrap();
    assert!(dfa.accepts(std::iter::empty()).unwrap());
    assert!(!dfa.accepts(&[0]).unwrap());
}
