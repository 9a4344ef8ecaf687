use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use sweepline::sweep::{dump_svg, DEFAULT_EPS};
use sweepline::Segments;

/// Renders the segments in a file (same format as the `intersections`
/// example) to an SVG, with each intersection point marked in red.
#[derive(Parser)]
struct Args {
    input: PathBuf,
    output: PathBuf,

    #[arg(long)]
    epsilon: Option<f64>,
}

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.input)?;
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

    let eps = args.epsilon.unwrap_or(DEFAULT_EPS);
    svg::save(&args.output, &dump_svg(&segs, eps))?;

    Ok(())
}
