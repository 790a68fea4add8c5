//! Dump the full hypothesis set as JSON (audit/transparency surface)

use cee_impact::Hypotheses;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let hypotheses = Hypotheses::default_p5();
    println!("{}", hypotheses.to_json_pretty()?);
    Ok(())
}
