use anyhow::Result;

use touchicon::{IconRenderer, IconSpec};

fn main() -> Result<()> {
    env_logger::init();

    let output_path = IconRenderer::new(IconSpec::default()).render_to_file()?;
    println!("Apple touch icon created at {}", output_path.display());

    Ok(())
}
