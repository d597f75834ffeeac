//! Reading the installed .NET Framework release code.

/// Registry key holding the .NET Framework 4.x `Release` value.
pub const NDP_V4_FULL_KEY: &str = r"HKLM\SOFTWARE\Microsoft\NET Framework Setup\NDP\v4\Full";

/// Read the `Release` value of the installed .NET Framework 4.x.
///
/// Queries the 64-bit registry view; returns `None` when the key is missing
/// or on platforms without a registry.
#[cfg(windows)]
pub fn read_installed_legacy_release_code() -> Option<u32> {
    let output = std::process::Command::new("reg")
        .args(["query", NDP_V4_FULL_KEY, "/v", "Release", "/reg:64"])
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!("reg query exited with {:?}", output.status.code());
        return None;
    }

    parse_reg_query_release(&String::from_utf8_lossy(&output.stdout))
}

/// Read the `Release` value of the installed .NET Framework 4.x.
///
/// There is no registry outside Windows.
#[cfg(not(windows))]
pub fn read_installed_legacy_release_code() -> Option<u32> {
    None
}

/// Extract the `Release` DWORD from `reg query` output.
///
/// The relevant line looks like `    Release    REG_DWORD    0x80ea8`.
pub fn parse_reg_query_release(output: &str) -> Option<u32> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next()? != "Release" || fields.next()? != "REG_DWORD" {
            return None;
        }
        let value = fields.next()?;
        let hex = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))?;
        u32::from_str_radix(hex, 16).ok()
    })
}
