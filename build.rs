use anyhow::Result;
use vergen::EmitBuilder;

// Build metadata logged at startup.
fn main() -> Result<()> {
    EmitBuilder::builder()
        .build_timestamp()
        .rustc_semver()
        .cargo_target_triple()
        .emit()?;

    Ok(())
}
