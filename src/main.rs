use anyhow::Result;

// Use library instead of local modules
use taxonomy_seed::{generate_alias_seed, generate_taxonomy_seed, SeedConfig, WrittenFile};

fn main() -> Result<()> {
    // No flags, no environment: every path and identity is a constant
    let config = SeedConfig::default();

    println!("🌱 Seed SQL Generator v{}", taxonomy_seed::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Taxonomy
    println!("\n📂 Generating taxonomy seed SQL...");
    println!("   from {}", config.taxonomy_input.display());
    let taxonomy = generate_taxonomy_seed(&config)?;
    println!(
        "✓ {} level 1, {} level 2, {} leaves, {} rules",
        taxonomy.stats.level_1, taxonomy.stats.level_2, taxonomy.stats.leaves, taxonomy.stats.rules
    );
    print_written(&taxonomy.file);

    // 2. Aliases
    println!("\n📂 Generating alias seed SQL...");
    println!("   from {}", config.alias_input.display());
    let aliases = generate_alias_seed(&config)?;
    println!("✓ {} aliases", aliases.alias_count);
    print_written(&aliases.file);

    // 3. How to apply
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ All SQL migrations generated successfully!");
    println!("\nTo apply:");
    println!("1. Connect to the database SQL editor");
    println!("2. Run {}", taxonomy_seed::config::SCHEMA_MIGRATION);
    println!("3. Run {}", config.taxonomy_script_name());
    println!("4. Run {}", config.alias_script_name());

    Ok(())
}

fn print_written(file: &WrittenFile) {
    println!("✅ Created: {} ({} bytes)", file.path.display(), file.bytes);
    println!("   sha256 {}", file.sha256);
}
