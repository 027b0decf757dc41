//! Optional device-token diagnostic, shown in the info command output.
//!
//! Orthogonal to the whitelist logic: when the platform offers no stable
//! identifiers the capability is simply absent.

use sha2::{Digest, Sha256};

pub fn device_token() -> Option<String> {
    let identifiers = machine_identifiers()?;

    let mut hasher = Sha256::new();
    for id in &identifiers {
        hasher.update(id.as_bytes());
    }

    Some(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// CPU identity plus the machine id; only the hash ever leaves the process.
#[cfg(target_os = "linux")]
fn machine_identifiers() -> Option<Vec<String>> {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    let cpu = cpuinfo
        .lines()
        .find(|line| line.starts_with("model name") || line.starts_with("Processor"))?
        .trim()
        .to_string();

    let machine_id = std::fs::read_to_string("/etc/machine-id").ok()?.trim().to_string();

    Some(vec![cpu, machine_id])
}

#[cfg(not(target_os = "linux"))]
fn machine_identifiers() -> Option<Vec<String>> {
    None
}
