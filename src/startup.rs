#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::path::PathBuf;

#[cfg(target_os = "macos")]
const LAUNCH_AGENT_LABEL: &str = "com.tasklight.app";

#[cfg(target_os = "macos")]
fn launch_agent_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "home directory not found".to_string())?;
    Ok(home
        .join("Library")
        .join("LaunchAgents")
        .join(format!("{LAUNCH_AGENT_LABEL}.plist")))
}

#[cfg(target_os = "macos")]
fn render_plist(exec_path: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LAUNCH_AGENT_LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exec_path}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#
    )
}

#[cfg(target_os = "linux")]
fn autostart_path() -> Result<PathBuf, String> {
    let config = dirs::config_dir().ok_or_else(|| "config directory not found".to_string())?;
    Ok(config.join("autostart").join("tasklight.desktop"))
}

#[cfg(target_os = "linux")]
fn render_desktop_entry(exec_path: &str) -> String {
    format!(
        "[Desktop Entry]\nType=Application\nName=Tasklight\nExec={exec_path}\nX-GNOME-Autostart-enabled=true\n"
    )
}

pub fn set_launch_on_startup(enabled: bool) -> Result<(), String> {
    #[cfg(target_os = "macos")]
    {
        let path = launch_agent_path()?;
        if enabled {
            let exe = std::env::current_exe().map_err(|error| error.to_string())?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|error| error.to_string())?;
            }
            std::fs::write(&path, render_plist(&exe.to_string_lossy()))
                .map_err(|error| error.to_string())?;
        } else if path.exists() {
            std::fs::remove_file(&path).map_err(|error| error.to_string())?;
        }
        Ok(())
    }

    #[cfg(target_os = "linux")]
    {
        let path = autostart_path()?;
        if enabled {
            let exe = std::env::current_exe().map_err(|error| error.to_string())?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|error| error.to_string())?;
            }
            std::fs::write(&path, render_desktop_entry(&exe.to_string_lossy()))
                .map_err(|error| error.to_string())?;
        } else if path.exists() {
            std::fs::remove_file(&path).map_err(|error| error.to_string())?;
        }
        Ok(())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        log::warn!("launch on startup is not supported on this platform (requested: {enabled})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[cfg(target_os = "macos")]
    #[test]
    fn plist_embeds_the_executable_path_and_label() {
        let plist = super::render_plist("/Applications/Tasklight.app/Contents/MacOS/tasklight");
        assert!(plist.contains("<string>com.tasklight.app</string>"));
        assert!(plist.contains("/Applications/Tasklight.app/Contents/MacOS/tasklight"));
        assert!(plist.contains("<key>RunAtLoad</key>"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn desktop_entry_embeds_the_executable_path() {
        let entry = super::render_desktop_entry("/usr/bin/tasklight");
        assert!(entry.contains("Exec=/usr/bin/tasklight"));
        assert!(entry.contains("Name=Tasklight"));
    }
}
