//! List sampling methods command.

use anyhow::Result;
use mlprep_sampling::SamplingMethod;

use crate::cli::MethodsArgs;

pub async fn run(args: MethodsArgs) -> Result<()> {
    if args.json {
        let methods: Vec<_> = SamplingMethod::all()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.as_str(),
                    "family": format!("{:?}", m.family()).to_lowercase(),
                    "uses_ratio": m.uses_ratio(),
                    "description": m.description(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&methods)?);
        return Ok(());
    }

    println!("Sampling Methods");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for method in SamplingMethod::all() {
        let ratio = if method.uses_ratio() { " (uses ratio)" } else { "" };
        println!("  {:<22} {:?}{}", method.as_str(), method.family(), ratio);
        println!("  {}", method.description());
        println!();
    }

    println!("Set [sampling] method in the config to select one.");

    Ok(())
}
