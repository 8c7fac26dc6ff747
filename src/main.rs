use anyhow::Context;

fn main() -> anyhow::Result<()> {
    api_portal::run().context("api portal exited with an error")?;
    Ok(())
}
