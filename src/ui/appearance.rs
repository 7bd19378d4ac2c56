#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;

/// Preferred appearance used to choose a default theme when none is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

/// Best-effort OS-level dark-mode hint. Returns None when the platform
/// gives no usable signal.
pub fn detect_preferred_appearance() -> Option<Appearance> {
    #[cfg(target_os = "macos")]
    {
        // `defaults read -g AppleInterfaceStyle` prints "Dark" when dark
        // mode is on and exits non-zero otherwise.
        let output = Command::new("/usr/bin/defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .ok()?;
        if output.status.success()
            && String::from_utf8_lossy(&output.stdout)
                .to_ascii_lowercase()
                .contains("dark")
        {
            return Some(Appearance::Dark);
        }
        return Some(Appearance::Light);
    }

    #[cfg(target_os = "linux")]
    {
        // GNOME 42+: color-scheme is 'prefer-dark' or 'default'.
        let output = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
            .ok()?;
        if output.status.success() {
            let scheme = String::from_utf8_lossy(&output.stdout).to_ascii_lowercase();
            if scheme.contains("prefer-dark") {
                return Some(Appearance::Dark);
            }
            if scheme.contains("default") {
                return Some(Appearance::Light);
            }
        }
        None
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
