//! tally-client
//!
//! Client-side workflow for the on-chain counter demonstration program.
//!
//! It includes:
//! - signing identity secret decoding and encoding
//! - airdrop funding with finality confirmation
//! - request construction at three submission levels
//! - single-attempt submission and confirmation
//! - the linear demonstration flow (fund, create, increment)
//!
//! The crate reaches the cluster only through the [`ClusterRpc`] seam; the
//! blocking JSON-RPC adapter is [`RpcGateway`]. No module reads the
//! environment — callers supply endpoints, identities and stored secrets
//! explicitly.

pub mod constants;
pub mod counter_client;
pub mod error;
pub mod flow;
pub mod funding;
pub mod identity;
pub mod rpc;
pub mod submit;

pub use constants::*;
pub use counter_client::*;
pub use error::{TallyError, TallyResult};
pub use flow::*;
pub use rpc::{ClusterRpc, RpcGateway};
pub use submit::SubmitOptions;
