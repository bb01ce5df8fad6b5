use std::path::Path;

use anyhow::Result;

use quotemill_core::ingest::{reader, BoilerplateStripper};

pub fn run(input: &str, keep_boilerplate: bool) -> Result<()> {
    let body = reader::read_body(Path::new(input))?;

    if keep_boilerplate {
        println!("{body}");
    } else {
        println!("{}", BoilerplateStripper::new()?.strip(&body));
    }

    Ok(())
}
