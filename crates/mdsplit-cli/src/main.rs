use clap::Parser;
use mdsplit_cli::{CliArgs, MdsplitCli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let cli = MdsplitCli::from_args("mdsplit", &args)?;
    cli.run(args).await?;
    Ok(())
}
