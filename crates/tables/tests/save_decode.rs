//! End-to-end decode of a realistic save stream through the shipped
//! tables: framing, nested piece chains, component states, diagnostics.

use decant_core::{decode_save, join_seq, Diagnostics, COMMAND_SEPARATOR, SAVE_BEGIN, SAVE_END};
use decant_tables::{component_registry, piece_links};
use serde_json::json;

/// Assemble a save stream the way the legacy encoder does: a nested
/// command stream for the piece block, then one state per component,
/// all joined (and therefore escaped) on the command separator.
fn save_text(piece_cmds: &[String], component_states: &[String]) -> String {
    let mut block = String::new();
    for cmd in piece_cmds {
        block.push(COMMAND_SEPARATOR);
        block.push_str(cmd);
    }
    let mut parts = vec![
        SAVE_BEGIN.to_owned(),
        String::new(), // version command carries no state
        block,
    ];
    parts.extend(component_states.iter().cloned());
    parts.push(SAVE_END.to_owned());
    join_seq(&parts, COMMAND_SEPARATOR)
}

#[test]
fn full_save_round_trips_through_the_shipped_tables() {
    let piece_cmds = vec![
        // prototype decorator wrapping a basic piece
        "+/null/prototype;Basic prototype\tpiece;;;ge-art-7;ge-art-7/\tnull;0;0;0".to_owned(),
        "+/1536513712000/stack/m1;200;300;10;11;12".to_owned(),
        "M/10/m2/300/400/0/m1/100/200/0/p1".to_owned(),
        "D/11/new-state/old-state".to_owned(),
        "-/12".to_owned(),
    ];
    let component_states = vec![
        "FlugplatzBoardPicker\tFlugplatz\t0\t0".to_owned(),
        format!(
            "NOTES\t{sep}PNOTE\trommel8\tGerman-Bill|Russian-Peter|Bid 24 RP",
            sep = COMMAND_SEPARATOR
        ),
        "TURNTurnTracker0\t0|1941;0;false;-1".to_owned(),
    ];
    let text = save_text(&piece_cmds, &component_states);

    let mut diag = Diagnostics::new();
    let body = decode_save(&piece_links(), &component_registry(), &text, &mut diag).unwrap();

    assert_eq!(body.pieces.len(), 5);

    // outermost decorator first, base piece last
    let add = &body.pieces[0]["add"];
    assert_eq!(add["id"], json!(null));
    assert_eq!(add["piece"][0]["kind"], json!("prototype"));
    assert_eq!(add["piece"][0]["name"], json!("Basic prototype"));
    assert_eq!(add["piece"][1]["kind"], json!("piece"));
    assert_eq!(add["piece"][1]["imageName"], json!("ge-art-7"));
    // "null" map id means the piece is not on any map
    assert_eq!(add["piece"][1]["mapId"], json!(null));

    let stack = &body.pieces[1]["add"]["piece"][0];
    assert_eq!(stack["kind"], json!("stack"));
    assert_eq!(stack["ids"], json!(["10", "11", "12"]));

    assert_eq!(body.pieces[2]["move"]["newX"], json!(300));
    assert_eq!(body.pieces[3]["change"]["oldstate"], json!("old-state"));
    assert_eq!(body.pieces[4]["remove"]["id"], json!("12"));

    assert_eq!(body.components.len(), 3);
    assert_eq!(body.components[0]["kind"], json!("BoardPicker"));
    assert_eq!(
        body.components[1]["PNOTE"]["text"],
        json!("German-Bill\nRussian-Peter\nBid 24 RP")
    );
    assert_eq!(
        body.components[2]["levels"],
        json!([{"turn": 0, "state": "1941;0;false;-1"}])
    );

    assert!(diag.is_clean());

    // idempotence: nothing stateful leaks between decodes
    let mut diag_again = Diagnostics::new();
    let again = decode_save(&piece_links(), &component_registry(), &text, &mut diag_again).unwrap();
    assert_eq!(body.to_value(), again.to_value());
}

#[test]
fn unknown_kinds_degrade_without_aborting_the_save() {
    let piece_cmds = vec![
        "+/1/zzz;whatever/state-text".to_owned(),
        "+/2/piece;;;inf;inf/m1;5;6;7".to_owned(),
    ];
    let component_states = vec!["Chatter\thello there".to_owned()];
    let text = save_text(&piece_cmds, &component_states);

    let mut diag = Diagnostics::new();
    let body = decode_save(&piece_links(), &component_registry(), &text, &mut diag).unwrap();

    let fallback = &body.pieces[0]["add"]["piece"][0];
    assert_eq!(fallback["kind"], json!("zzz"));
    assert_eq!(fallback["rawType"], json!("zzz;whatever"));
    assert_eq!(fallback["rawState"], json!("state-text"));
    // the well-formed sibling still decodes fully
    assert_eq!(body.pieces[1]["add"]["piece"][0]["x"], json!(5));

    assert_eq!(body.components[0]["kind"], json!("Chatter"));
    assert_eq!(diag.unknown_tags.get("zzz"), Some(&1));
    assert_eq!(diag.unknown_tags.get("Chatter"), Some(&1));
}

#[test]
fn deeply_escaped_component_state_unescapes_one_level_per_split() {
    // a turn tracker whose level state itself contains escaped
    // separators, exactly as multi-level turn counters serialize
    let component_states =
        vec!["TURNTurnTracker0\t0|1941;0;false;-1;1\\;0\\;0\\;true".to_owned()];
    let text = save_text(&["-/1".to_owned()], &component_states);

    let mut diag = Diagnostics::new();
    let body = decode_save(&piece_links(), &component_registry(), &text, &mut diag).unwrap();
    assert_eq!(
        body.components[0]["levels"],
        // the level state keeps its own escaping for the next layer down
        json!([{"turn": 0, "state": "1941;0;false;-1;1\\;0\\;0\\;true"}])
    );
}
