//! Constants shared between the client library and the CLI.

use solana_program::pubkey::Pubkey;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Devnet deployment of the counter program.
pub const COUNTER_PROGRAM_ID: &str = "3ycJzxn4Akd2A3G2EDAW5RrM5V5DeRWt84MWHJ1ctLUr";

/// Default devnet RPC endpoint.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Env entry holding the persisted signer secret (bracketed byte list).
pub const SIGNER_KEY_ENV: &str = "TALLY_SIGNER_KEY";

/// Airdrop amount for a fresh identity: one SOL, in lamports.
pub const FUND_LAMPORTS: u64 = LAMPORTS_PER_SOL;

pub fn counter_program_id() -> Pubkey {
    COUNTER_PROGRAM_ID.parse().unwrap_or_else(|_| Pubkey::default())
}
