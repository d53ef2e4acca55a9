use std::path::Path;

use oas3_resolve::generator::ResolverConfig;

use super::resolve::{named_types_table, print_errors, run_resolution, schema_scope};
use crate::ui::Colors;

pub async fn list_types(input: &Path, all_schemas: bool, colors: &Colors) -> anyhow::Result<()> {
  let config = ResolverConfig::builder().schema_scope(schema_scope(all_schemas)).build();
  let resolution = run_resolution(input, config).await?;

  match resolution.result {
    Ok(output) => {
      println!("{}", named_types_table(&output.model, colors));
      Ok(())
    }
    Err(errors) => {
      print_errors(&errors, colors);
      anyhow::bail!("{} resolution error(s) in {}", errors.len(), input.display())
    }
  }
}
