pub mod fetch;
pub mod menu;
pub mod serve;

/// Get version string with build details
pub fn version(name: &str) -> String {
    let build_type = if cfg!(debug_assertions) { "debug" } else { "release" };
    let target_env = if cfg!(target_env = "gnu") { "gnu" }
        else if cfg!(target_env = "musl") { "musl" }
        else if cfg!(target_env = "msvc") { "msvc" }
        else { "unknown" };

    format!("{} {} {} {} {} {}",
        name,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH,
        std::env::consts::OS,
        target_env,
        build_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_starts_with_name_and_version() {
        let v = version("bobmenu");
        assert!(v.starts_with(&format!("bobmenu {}", env!("CARGO_PKG_VERSION"))));
    }
}
