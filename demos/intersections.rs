use std::io::Read as _;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use sweepline::sweep::{sweep, DEFAULT_EPS};
use sweepline::Segments;

/// Reads segments as whitespace-separated numbers (a count `n`, then `n`
/// quadruples `x1 y1 x2 y2`) and prints every intersection point.
#[derive(Parser)]
struct Args {
    /// File to read segments from, stdin if omitted.
    input: Option<PathBuf>,
}

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut tokens = text.split_whitespace();
    let Some(count) = tokens.next() else {
        bail!("empty input");
    };
    let n: usize = count
        .parse()
        .with_context(|| format!("bad segment count {count:?}"))?;
    let coords: Vec<f64> = tokens
        .map(|tok| tok.parse().with_context(|| format!("bad number {tok:?}")))
        .collect::<anyhow::Result<_>>()?;
    if coords.len() < 4 * n {
        bail!("expected {} coordinates, got {}", 4 * n, coords.len());
    }

    let mut segs = Segments::default();
    for q in coords[..4 * n].chunks_exact(4) {
        segs.add_segment((q[0], q[1]), (q[2], q[3]))?;
    }

    sweep(&segs, DEFAULT_EPS, |p, _| {
        println!("Intersection: {} {}", p.x, p.y);
    });
    println!("Execution complete");

    Ok(())
}
