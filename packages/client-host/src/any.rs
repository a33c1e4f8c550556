//! Client messages and states of every client type the host can route, tagged by client type.

use ics07_tendermint_light_client as tendermint;
use light_client_interface::LightClient;
use mock_light_client::MockClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! any_enum {
    ($(#[$doc:meta])* $name:ident { $tendermint:ty, $mock:ty }) => {
        $(#[$doc])*
        #[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
        #[serde(tag = "client_type", content = "data")]
        #[allow(clippy::large_enum_variant, clippy::module_name_repetitions)]
        pub enum $name {
            /// Tendermint client
            #[serde(rename = "07-tendermint")]
            Tendermint($tendermint),
            /// Mock client
            #[serde(rename = "mock")]
            Mock($mock),
        }

        impl $name {
            /// Returns the client type tag.
            #[must_use]
            pub const fn client_type(&self) -> &'static str {
                match self {
                    Self::Tendermint(_) => <tendermint::TendermintClient as LightClient>::CLIENT_TYPE,
                    Self::Mock(_) => MockClient::CLIENT_TYPE,
                }
            }
        }

        impl From<$tendermint> for $name {
            fn from(value: $tendermint) -> Self {
                Self::Tendermint(value)
            }
        }

        impl From<$mock> for $name {
            fn from(value: $mock) -> Self {
                Self::Mock(value)
            }
        }
    };
}

any_enum!(
    /// A client state of any client type
    AnyClientState {
        tendermint::ClientState,
        mock_light_client::ClientState
    }
);

any_enum!(
    /// A consensus state of any client type
    AnyConsensusState {
        tendermint::ConsensusState,
        mock_light_client::ConsensusState
    }
);

any_enum!(
    /// A header of any client type
    AnyHeader {
        tendermint::Header,
        mock_light_client::Header
    }
);

any_enum!(
    /// Misbehaviour evidence of any client type
    AnyMisbehaviour {
        tendermint::Misbehaviour,
        mock_light_client::Misbehaviour
    }
);
