#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Types { input, all_schemas } => ui::commands::list_types(&input, all_schemas, &colors).await?,
    },
    Commands::Resolve(command) => {
      let config = ui::commands::ResolveConfig::from_command(command);
      ui::commands::resolve_spec(config, &colors).await?;
    }
  }

  Ok(())
}
