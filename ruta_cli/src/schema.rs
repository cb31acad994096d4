use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct SchemaArgs {
    /// Writes the schema to this file instead of stdout
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// Schema of the result instead of the request
    #[arg(long)]
    result: bool,
}

pub fn run(args: SchemaArgs) -> Result<(), anyhow::Error> {
    let schema = if args.result {
        ruta_optimizer::json::schema::generate_route_plan_schema()?
    } else {
        ruta_optimizer::json::schema::generate_json_schema()?
    };

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
        None => println!("{schema}"),
    }

    Ok(())
}
