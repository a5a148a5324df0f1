//! Health command

use anyhow::Result;
use ragway_core::Gateway;

pub async fn run(gateway: &Gateway) -> Result<()> {
    println!("{}", gateway.health());
    Ok(())
}
