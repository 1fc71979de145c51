use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use chiforest::reader::{ColumnStatus, ReaderError, RowSource};
use chiforest::schema::{ColumnSet, ConversionColumn, MuonColumn};

/// Display information about a forest
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    println!("chiforest Forest Information");
    println!("============================");
    println!("File: {}", file.display());
    println!();

    print_directory::<ConversionColumn>(&file)?;
    print_directory::<MuonColumn>(&file)?;
    Ok(())
}

fn print_directory<C: ColumnSet>(file: &Path) -> Result<()> {
    println!("Directory {}:", C::DIRECTORY);
    let source = match RowSource::<C>::open(file) {
        Ok(source) => source,
        Err(ReaderError::NoRowGroups { .. }) => {
            println!("  (not present)");
            println!();
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", C::DIRECTORY));
        }
    };

    let groups: Vec<String> = source
        .row_groups()
        .iter()
        .map(|g| C::table_path(*g))
        .collect();
    println!("  Tables: {}", groups.join(", "));
    println!("  Rows:   {}", source.row_count());
    println!("  Columns:");
    for &column in C::ALL {
        let def = column.def();
        let status = match source.column_status(column) {
            ColumnStatus::Missing => "missing",
            ColumnStatus::Inactive | ColumnStatus::Active => "present",
        };
        // Derived Debug ignores width, so pad the rendered name
        let kind = format!("{:?}", def.kind);
        println!(
            "    {:<34} {:<6} {:<12} {}",
            def.name,
            def.group.as_str(),
            kind,
            status
        );
    }
    println!();
    Ok(())
}
