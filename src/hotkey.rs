use tauri_plugin_global_shortcut::{Code, Modifiers, Shortcut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Ctrl,
    Cmd,
    Option,
    Shift,
}

impl Modifier {
    pub fn token(self) -> &'static str {
        match self {
            Modifier::Ctrl => "ctrl",
            Modifier::Cmd => "cmd",
            Modifier::Option => "option",
            Modifier::Shift => "shift",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "cmd" | "meta" | "super" => Some(Modifier::Cmd),
            "option" | "alt" => Some(Modifier::Option),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotkeyCombo {
    modifiers: Vec<Modifier>,
    keys: Vec<String>,
}

impl HotkeyCombo {
    fn push_modifier(&mut self, modifier: Modifier) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }

    fn push_key(&mut self, key: String) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn canonical(&self) -> String {
        let mut parts: Vec<&str> = self.modifiers.iter().map(|m| m.token()).collect();
        parts.extend(self.keys.iter().map(String::as_str));
        parts.join("+")
    }
}

pub fn parse_combo(input: &str) -> Result<HotkeyCombo, String> {
    let mut combo = HotkeyCombo::default();
    let mut key_found = false;

    for part in input.trim().to_lowercase().split('+') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(modifier) = Modifier::from_token(part) {
            combo.push_modifier(modifier);
        } else {
            combo.push_key(part.to_string());
            key_found = true;
        }
    }

    if !key_found {
        return Err(format!("no valid key in hotkey string: {input:?}"));
    }
    Ok(combo)
}

// Only the first non-modifier key counts; the shortcut layer has no chords.
pub fn to_shortcut(combo: &HotkeyCombo) -> Result<Shortcut, String> {
    let mut modifiers = Modifiers::empty();
    for modifier in &combo.modifiers {
        modifiers |= match modifier {
            Modifier::Ctrl => Modifiers::CONTROL,
            Modifier::Cmd => Modifiers::SUPER,
            Modifier::Option => Modifiers::ALT,
            Modifier::Shift => Modifiers::SHIFT,
        };
    }

    let key = combo
        .keys
        .first()
        .ok_or_else(|| "hotkey has no non-modifier key".to_string())?;
    let code = key_code(key)?;

    let mods = if modifiers.is_empty() {
        None
    } else {
        Some(modifiers)
    };
    Ok(Shortcut::new(mods, code))
}

// Raw KeyboardEvent.key values whose canonical token is not just the
// lowercased name.
fn normalize_key(raw: &str) -> String {
    match raw {
        " " | "Spacebar" => "space".to_string(),
        "ArrowUp" => "up".to_string(),
        "ArrowDown" => "down".to_string(),
        "ArrowLeft" => "left".to_string(),
        "ArrowRight" => "right".to_string(),
        "Return" => "enter".to_string(),
        other => other.to_lowercase(),
    }
}

fn key_code(token: &str) -> Result<Code, String> {
    let code = match token {
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "backspace" => Code::Backspace,
        "delete" => Code::Delete,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "left" => Code::ArrowLeft,
        "right" => Code::ArrowRight,
        "," => Code::Comma,
        "." => Code::Period,
        ";" => Code::Semicolon,
        "/" => Code::Slash,
        "-" => Code::Minus,
        "=" => Code::Equal,
        "`" => Code::Backquote,
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        other => return Err(format!("unknown hotkey part: {other}")),
    };
    Ok(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureUpdate {
    Ignored,
    Recorded,
    Committed(String),
    Cancelled,
}

// While recording, key-down events accumulate; the first key-up after at
// least one non-modifier key commits the combo. A key-up with nothing but
// modifiers accumulated stays in recording.
#[derive(Debug, Default)]
pub struct HotkeyCapture {
    combo: HotkeyCombo,
    recording: bool,
}

impl HotkeyCapture {
    pub fn state(&self) -> CaptureState {
        if self.recording {
            CaptureState::Recording
        } else {
            CaptureState::Idle
        }
    }

    pub fn begin(&mut self) {
        self.combo = HotkeyCombo::default();
        self.recording = true;
    }

    pub fn cancel(&mut self) {
        self.combo = HotkeyCombo::default();
        self.recording = false;
    }

    pub fn key_down(&mut self, raw_key: &str) -> CaptureUpdate {
        if !self.recording {
            return CaptureUpdate::Ignored;
        }

        match raw_key {
            "Escape" => {
                self.cancel();
                return CaptureUpdate::Cancelled;
            }
            "Control" => self.combo.push_modifier(Modifier::Ctrl),
            "Meta" => self.combo.push_modifier(Modifier::Cmd),
            "Alt" => self.combo.push_modifier(Modifier::Option),
            "Shift" => self.combo.push_modifier(Modifier::Shift),
            other => self.combo.push_key(normalize_key(other)),
        }
        CaptureUpdate::Recorded
    }

    pub fn key_up(&mut self) -> CaptureUpdate {
        if !self.recording {
            return CaptureUpdate::Ignored;
        }
        // Modifier-only accumulations cannot commit; recording continues
        // until a real key arrives or Escape cancels.
        if self.combo.keys.is_empty() {
            return CaptureUpdate::Ignored;
        }
        // A combo the OS layer cannot register must never reach the store.
        if to_shortcut(&self.combo).is_err() {
            self.cancel();
            return CaptureUpdate::Cancelled;
        }

        let canonical = self.combo.canonical();
        self.combo = HotkeyCombo::default();
        self.recording = false;
        CaptureUpdate::Committed(canonical)
    }
}
