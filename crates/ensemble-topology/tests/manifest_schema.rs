//! Manifests validate against `schemas/TopologyManifest.schema.json`.

use ensemble_core::{EnsembleConfig, Stage};
use ensemble_topology::{Manifest, StaticParameters, TopologyAssembler};

fn validator() -> jsonschema::Validator {
    let schema: serde_json::Value =
        serde_json::from_str(include_str!("../../../schemas/TopologyManifest.schema.json"))
            .expect("schema must parse");

    jsonschema::draft202012::options()
        .build(&schema)
        .expect("schema must compile")
}

fn manifest(stage: Stage) -> serde_json::Value {
    let lookup = StaticParameters::default().with("/arn/notification/event-bus", "arn:bus");
    let topology = TopologyAssembler::new(EnsembleConfig::default(), lookup)
        .with_stage(stage)
        .assemble()
        .expect("composition must succeed");

    Manifest::new(topology)
        .to_json_value()
        .expect("manifest must serialize")
}

#[test]
fn manifest_validates_against_schema() {
    let validator = validator();

    for stage in Stage::ALL {
        let instance = manifest(stage);
        if !validator.is_valid(&instance) {
            let mut msgs = Vec::new();
            for (idx, err) in validator.iter_errors(&instance).take(20).enumerate() {
                msgs.push(format!("{}: {}", idx + 1, err));
            }
            panic!("{} manifest did not validate: {}", stage, msgs.join("; "));
        }
    }
}

#[test]
fn schema_rejects_unknown_stage() {
    let validator = validator();

    let mut instance = manifest(Stage::Dev);
    instance["topology"]["stage"] = serde_json::json!("staging");
    assert!(!validator.is_valid(&instance));
}
