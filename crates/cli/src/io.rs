//! JSON file plumbing and argument parsing shared by the subcommands.

use anyhow::{anyhow, Context, Result};
use maskcal::{EngineCfg, Point};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Pretty-print `value` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Defaults when no config file is given; partial files keep the rest.
pub fn load_cfg(path: Option<&Path>) -> Result<EngineCfg> {
    let cfg: EngineCfg = match path {
        Some(p) => read_json(p).context("loading engine config")?,
        None => EngineCfg::default(),
    };
    cfg.validate().context("checking engine config")?;
    Ok(cfg)
}

/// `"x,y"` in image pixels.
pub fn parse_point(s: &str) -> Result<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y, got {s:?}"))?;
    let x: f64 = x.trim().parse().with_context(|| format!("bad x in {s:?}"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("bad y in {s:?}"))?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("12.5, -3").unwrap(), Point::new(12.5, -3.0));
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn partial_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"brush_size_px": 20.0}"#).unwrap();
        let cfg = load_cfg(Some(&path)).unwrap();
        assert_eq!(cfg.brush_size_px, 20.0);
        assert_eq!(cfg.history_depth, EngineCfg::default().history_depth);
        assert_eq!(load_cfg(None).unwrap(), EngineCfg::default());
    }

    #[test]
    fn zero_band_height_config_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"default_band_height_m": 0}"#).unwrap();
        let err = load_cfg(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("default_band_height_m"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/value.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = read_json(&path).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
