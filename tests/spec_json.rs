//! The JSON document boundary: closed-world deserialization of spec models
//! and the shape of the serialized encoding artifact.

use gpidl::{SpecModel, synthesize};
use serde_json::Value;

const DOC: &str = r#"{
  "gpidl_version": "1.0",
  "operand_width_bits": {"reg8": 8},
  "canonical_roles": ["gpr"],
  "global_oprnd_flag_defs": {"neg": {"enum": ["off", "on"]}},
  "global_modifier_defs": {"rnd": {"enum": {"rn": 0, "rp": 3}, "bits": 2, "default": "rn"}},
  "instructions": [
    {
      "name": "IADD",
      "inst_modifiers": ["rnd"],
      "forms": [
        {
          "key": "reg",
          "semantics": {"effect": "dst = dst + src", "SASS": "IADD", "notes": ["wraps"]},
          "operands": [
            {"name": "dst", "role": "gpr", "kind": "reg8"},
            {"name": "src", "role": "gpr", "kind": "reg8", "oprnd_flag": ["neg"]}
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn document_round_trips_into_an_encoding() {
    let model = SpecModel::from_json_str(DOC).expect("document parses");
    let out = synthesize(&model).expect("synthesis succeeds");
    let json: Value =
        serde_json::from_str(&out.to_json_string().expect("serialize")).expect("valid JSON");

    assert_eq!(json["meta"]["encoding_version"], 1);
    assert_eq!(json["meta"]["statistics"]["instruction_count"], 1);
    assert_eq!(json["meta"]["statistics"]["instruction_bits"], 0);

    let ranges = &json["encodings"]["IADD.reg"]["ranges"];
    assert_eq!(ranges[0]["type"], "operand");
    assert_eq!(ranges[0]["name"], "dst");
    assert_eq!(ranges[0]["start"], 0);
    assert_eq!(ranges[0]["length"], 8);
    assert_eq!(ranges[1]["name"], "src");

    assert_eq!(ranges[2]["type"], "oprnd_flag");
    assert_eq!(ranges[2]["name"], "neg");
    assert_eq!(ranges[2]["oprnd_idx"], 1);
    assert_eq!(ranges[2]["start"], 16);
    assert_eq!(ranges[2]["length"], 1);

    // Explicit 2-bit width holds the map-form enum's max value of 3.
    assert_eq!(ranges[3]["type"], "modifier");
    assert_eq!(ranges[3]["name"], "rnd");
    assert_eq!(ranges[3]["length"], 2);

    assert_eq!(ranges[4]["type"], "reserved");
    assert_eq!(ranges[4]["start"], 19);
    assert_eq!(ranges[4]["length"], 109);
    assert_eq!(ranges[4]["constant"], 0);

    assert_eq!(
        json["encodings"]["IADD.reg"]["form_path"],
        serde_json::json!(["reg"])
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let doc = DOC.replacen("\"gpidl_version\"", "\"bogus\": 1, \"gpidl_version\"", 1);
    assert!(
        SpecModel::from_json_str(&doc).is_err(),
        "closed-world schema must reject unlisted fields"
    );
}

#[test]
fn unknown_form_fields_are_rejected() {
    let doc = DOC.replacen("\"key\": \"reg\"", "\"key\": \"reg\", \"encoding_hint\": 7", 1);
    assert!(SpecModel::from_json_str(&doc).is_err());
}

#[test]
fn enum_accepts_both_spellings() {
    let model = SpecModel::from_json_str(DOC).expect("document parses");
    let rnd = &model.global_modifier_defs["rnd"];
    assert_eq!(rnd.options.max_value(), Some(3));
    let neg = &model.global_oprnd_flag_defs["neg"];
    assert_eq!(neg.options.canonical(), vec![("off", 0), ("on", 1)]);
}
