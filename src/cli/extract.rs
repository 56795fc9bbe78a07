use crate::error::Result;
use crate::extract::extract;

pub fn run(file: &str) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    println!("{}", serde_json::to_string_pretty(&extract(&text))?);
    Ok(())
}
