use anyhow::{Context, Result, bail};
use fatura_finance::ParserConfig;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_fatura_home;

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_fatura_home()?.join("config.toml"))
}

/// Load `explicit` if given (must exist), else the home config, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ParserConfig> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = config_path()?;
            if !p.exists() {
                debug!("no config at {}, using defaults", p.display());
                return Ok(ParserConfig::default());
            }
            p
        }
    };
    debug!("loading config from {}", p.display());
    read_config(&p)
}

fn read_config(p: &Path) -> Result<ParserConfig> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: ParserConfig =
        toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    // Surface bad patterns at load time rather than mid-parse
    cfg.compile()
        .with_context(|| format!("invalid configuration in {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &ParserConfig) -> Result<PathBuf> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&ParserConfig::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}

pub fn show_config(explicit: Option<&Path>) -> Result<()> {
    let cfg = load_config(explicit)?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_config_rejects_bad_pattern() {
        let dir = std::env::temp_dir().join(format!("fatura-config-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join("bad.toml");
        fs::write(&p, "[scan]\nnoise_patterns = [\"(\"]\n").unwrap();

        let err = read_config(&p).unwrap_err();
        assert!(format!("{err:#}").contains("invalid configuration"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/no/such/fatura.toml"))).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }
}
