//! Load a map and print the sector planes the slope passes derive.
//!
//! ```bash
//! cargo run --release -- <map.wad> [map_idx] [--legacy-set-slope] [--all]
//! ```

use anyhow::{Context, bail};
use clap::Parser;
use glam::DVec2;
use log::info;
use std::path::PathBuf;

use sector_slopes::{
    defs::CompatFlags,
    slopes::build_slopes,
    wad::{Wad, load_level},
    world::{Level, PlaneSide},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// IWAD or PWAD holding the map
    #[arg(value_name = "WAD")]
    wad: PathBuf,

    /// Map index in directory order (0 = first marker)
    #[arg(value_name = "MAP_INDEX", default_value_t = 0)]
    map: usize,

    /// Emulate 32-bit fixed-point overflow in angle slopes
    #[arg(long)]
    legacy_set_slope: bool,

    /// Print flat sectors too
    #[arg(long)]
    all: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    // ─────────── load WAD & map ───────
    let wad = Wad::from_file(&opts.wad)
        .with_context(|| format!("opening {}", opts.wad.display()))?;
    let markers = wad.level_indices();
    let Some(&marker) = markers.get(opts.map) else {
        bail!("map index {} out of range ({} maps)", opts.map, markers.len());
    };
    let mut level = load_level(&wad, marker)?;

    // ─────────── slopes ────────────
    let mut compat = CompatFlags::empty();
    compat.set(CompatFlags::SET_SLOPE_OVERFLOW, opts.legacy_set_slope);
    let report = build_slopes(&mut level, compat);
    info!("{}: {report:?}", level.name);

    print_planes(&level, opts.all);
    Ok(())
}

fn print_planes(level: &Level, all: bool) {
    println!("{}", level.name);
    for (i, sector) in level.sectors.iter().enumerate() {
        let sloped = PlaneSide::BOTH
            .into_iter()
            .any(|side| sector.plane(side).is_sloped());
        if !sloped && !all {
            continue;
        }
        println!("sector {i:5} tag {:5}", sector.tag);
        for side in PlaneSide::BOTH {
            let p = sector.plane(side);
            println!(
                "  {:<7} n = ({:+.6}, {:+.6}, {:+.6})  d = {:+.3}  z(0,0) = {:.3}",
                format!("{side:?}"),
                p.normal.x,
                p.normal.y,
                p.normal.z,
                p.d,
                p.z_at(DVec2::ZERO),
            );
        }
    }
}
