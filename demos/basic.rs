/// Basic example demonstrating the archive-backed mapping
///
/// Run with: cargo run --example basic
use zhip_rs::{ArchiveMap, Compression, MapOptions, OpenMode};

fn main() -> anyhow::Result<()> {
    println!("=== Zhip-rs Basic Example ===\n");

    println!("1. Writing entries...");
    write_entries()?;

    println!("\n2. Reading entries back...");
    read_entries()?;

    println!("\n✓ Example complete!");
    Ok(())
}

fn write_entries() -> anyhow::Result<()> {
    let options = MapOptions::new(OpenMode::Write).with_compression(Compression::Deflated);
    let mut map = ArchiveMap::with_options("example_basic.zip", options);

    map.with_scope(|m| {
        m.set("readme.txt", b"This is a readme file for the basic example.")?;
        m.set("data.json", br#"{"name": "Basic Example", "version": "1.0.0"}"#)?;
        m.set("binary.dat", &[0u8; 1000])?;
        Ok(())
    })?;

    println!("   ✓ Archive written: example_basic.zip");
    Ok(())
}

fn read_entries() -> anyhow::Result<()> {
    let mut map = ArchiveMap::new("example_basic.zip", OpenMode::Read);

    println!("   {} entries:", map.len()?);
    for item in map.items()? {
        let (key, value) = item?;
        println!("     - {} ({} bytes)", key, value.len());
    }

    let readme = map.get("readme.txt")?;
    println!("\n   readme.txt: {}", String::from_utf8_lossy(&readme));

    if let Err(e) = map.remove("readme.txt") {
        println!("   remove: {}", e);
    }

    map.flush()?;
    Ok(())
}
