use crate::{ProtoError, ProtoResult};
use std::process::{Command, Output};
use tracing::{debug, error};

const WG: &str = "wg";

fn run(program: &str, args: &[&str]) -> ProtoResult<Output> {
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(ProtoError::CommandFailed {
            command: format!("{program} {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

fn installed(program: &str) -> bool {
    match run(program, &["--version"]) {
        Ok(output) => {
            debug!(
                "Found {program}: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
            true
        }
        Err(e) => {
            error!("WireGuard tools are not available ({program}): {e}");
            false
        }
    }
}

/// Whether the `wg` tool can be run. Checked once before any command.
pub fn ensure_installation() -> bool {
    installed(WG)
}

pub fn generate_preshared_key() -> ProtoResult<String> {
    let output = run(WG, &["genpsk"])?;
    let key = String::from_utf8(output.stdout)?.trim().to_string();
    Ok(key)
}
