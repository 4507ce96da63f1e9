use std::{env, path::PathBuf, str::FromStr};
use tracing_subscriber::filter::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";
const HUMAN_LOGGING: &str = "HUMAN_LOGGING";

pub fn init_logging() -> anyhow::Result<()> {
    let filter = match env::var_os(RUST_LOG) {
        Some(_) => EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("Invalid `RUST_LOG` provided: {e}"))?,
        None => EnvFilter::new("info"),
    };

    let human_logging = human_logging(env::var(HUMAN_LOGGING).ok())?;

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let res = if human_logging {
        sub.with_ansi(true)
            .with_level(true)
            .with_line_number(true)
            .try_init()
    } else {
        sub.with_ansi(false)
            .with_level(true)
            .with_line_number(true)
            .json()
            .try_init()
    };

    res.map_err(|e| anyhow::anyhow!("Could not install tracing subscriber: {e}"))
}

fn human_logging(value: Option<String>) -> anyhow::Result<bool> {
    match value {
        Some(s) => bool::from_str(&s).map_err(|_| {
            anyhow::anyhow!(
                "Expected `true` or `false` to be provided for `HUMAN_LOGGING`, got {s:?}"
            )
        }),
        None => Ok(true),
    }
}

/// Expands a leading `~/` against `$HOME`. Other paths are returned as-is.
pub fn expand_home(p: &str) -> PathBuf {
    match (p.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_logging_values() {
        assert!(human_logging(None).unwrap());
        assert!(human_logging(Some("true".to_string())).unwrap());
        assert!(!human_logging(Some("false".to_string())).unwrap());

        let err = human_logging(Some("1".to_string())).unwrap_err();
        assert!(err.to_string().contains("HUMAN_LOGGING"));
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(
            expand_home("/etc/wireguard"),
            PathBuf::from("/etc/wireguard")
        );
    }

    #[test]
    fn test_expand_home_joins_home_dir() {
        if let Some(home) = env::var_os("HOME") {
            assert_eq!(
                expand_home("~/.config/wgstar"),
                PathBuf::from(home).join(".config/wgstar")
            );
        }
    }
}
