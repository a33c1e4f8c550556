#![allow(unused_crate_dependencies)]

use ics07_tendermint_light_client::{ClientState, ConsensusState, Header, Misbehaviour};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
struct TendermintTypes {
    client_state: ClientState,
    consensus_state: ConsensusState,
    header: Header,
    misbehaviour: Misbehaviour,
}

fn main() {
    let schema = schemars::schema_for!(TendermintTypes);
    std::fs::write(
        "tendermint_types_schema.json",
        serde_json::to_string_pretty(&schema).expect("Failed to serialize schema"),
    )
    .expect("Failed to write schema to file");
}
