//! Add-on defaults listing

use anyhow::Result;
use colored::*;
use tugboat_core::{Addon, AddonDefinition};

use crate::config::{Config, OutputFormat};

/// Print the catalogue, or one add-on of it
pub fn show_defaults(addon: Option<Addon>, config: &Config) -> Result<()> {
    let definitions: Vec<&AddonDefinition> = match addon {
        Some(addon) => vec![addon.definition()],
        None => Addon::ALL.iter().map(Addon::definition).collect(),
    };

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&definitions)?),
        OutputFormat::Text => {
            for definition in definitions {
                print_definition(definition);
            }
        }
    }

    Ok(())
}

fn print_definition(definition: &AddonDefinition) {
    println!("{} {}", "▸".cyan(), definition.name.bold());
    println!("  {}", definition.description.dimmed());

    for (position, (kind, defaults)) in definition.stages.iter().enumerate() {
        println!("  {}. {}", position + 1, kind.to_string().bold());
        if let Some(namespace) = defaults.namespace {
            println!("     namespace: {}", namespace);
        }
        for source in defaults.sources {
            println!("     - {}", source.dimmed());
        }
    }
    println!();
}
