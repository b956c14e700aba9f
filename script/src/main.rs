//! Deploys one `Catto` contract with the deploying account as its owner,
//! then verifies the collection metadata over RPC.
//!
//! The target network and credentials come from the `RPC_URL` and
//! `PRIVATE_KEY` environment variables; `RPC_URL` defaults to a local nitro
//! dev node.

use std::{env, process::Command, str::FromStr};

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
    sol,
};
use eyre::{bail, ensure, Context, ContextCompat};
use regex::Regex;

sol!(
    #[sol(rpc)]
    contract Catto {
        constructor(address initialOwner);

        function name() external view returns (string);
        function symbol() external view returns (string);
        function owner() external view returns (address);
    }
);

const DEFAULT_RPC_URL: &str = "http://localhost:8547";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let rpc_url =
        env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_owned());
    let private_key = env::var("PRIVATE_KEY")
        .context("set PRIVATE_KEY to the deployer's key")?;

    let signer = private_key
        .parse::<PrivateKeySigner>()
        .context("should parse the private key")?;
    let deployer = signer.address();

    let contract_address = deploy(&rpc_url, &private_key, deployer)?;

    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .on_http(rpc_url.parse().context("should parse the rpc url")?);
    let catto = Catto::new(contract_address, &provider);

    let name = catto.name().call().await?;
    ensure!(name == "Catto", "unexpected collection name: {name}");

    let symbol = catto.symbol().call().await?;
    ensure!(symbol == "CTT", "unexpected collection symbol: {symbol}");

    let owner = catto.owner().call().await?;
    ensure!(owner == deployer, "unexpected contract owner: {owner}");

    println!("Catto deployed at {contract_address}");
    Ok(())
}

/// Deploys and activates the `catto` crate's contract with `cargo-stylus`,
/// passing `initial_owner` to the constructor.
fn deploy(
    rpc_url: &str,
    private_key: &str,
    initial_owner: Address,
) -> eyre::Result<Address> {
    let output = Command::new("cargo")
        .args(["stylus", "deploy"])
        .args(["-e", rpc_url])
        .args(["--private-key", private_key])
        .args(["--no-verify"])
        .args(["--constructor-args", &initial_owner.to_string()])
        .current_dir("catto")
        .output()
        .context("failed to execute `cargo stylus deploy`")?;

    if !output.status.success() {
        bail!("deployment failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);

    // The address in the deployer output is wrapped in ANSI color codes.
    let contract_addr_regex = Regex::new(
        r"deployed code at address:\s*(?:\x1B\[[0-9;]*[a-zA-Z])*(0x[a-fA-F0-9]{40})",
    )
    .context("failed to create contract addr regex")?;

    let contract_addr = contract_addr_regex
        .captures(&stdout)
        .and_then(|cap| cap.get(1))
        .with_context(|| format!("no contract address found in {stdout}"))?
        .as_str();

    Address::from_str(contract_addr)
        .with_context(|| format!("failed to parse address {contract_addr}"))
}
