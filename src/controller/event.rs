use crate::terminal::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Change,
    KeyDown,
    KeyPress,
    Paste,
}

/// The notification a surface hands the controller. Handlers may rewrite
/// `target_value` and suppress the default action; consumer callbacks see
/// the same object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    kind: EventKind,
    target_value: String,
    key: Option<KeyEvent>,
    clipboard_text: Option<String>,
    default_prevented: bool,
}

impl NativeEvent {
    fn new(kind: EventKind, target_value: &str) -> Self {
        Self {
            kind,
            target_value: target_value.to_string(),
            key: None,
            clipboard_text: None,
            default_prevented: false,
        }
    }

    pub fn change(target_value: &str) -> Self {
        Self::new(EventKind::Change, target_value)
    }

    pub fn key_down(key: KeyEvent, target_value: &str) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, target_value)
        }
    }

    pub fn key_press(key: KeyEvent, target_value: &str) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyPress, target_value)
        }
    }

    pub fn paste(text: &str, target_value: &str) -> Self {
        Self {
            clipboard_text: Some(text.to_string()),
            ..Self::new(EventKind::Paste, target_value)
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target_value(&self) -> &str {
        self.target_value.as_str()
    }

    pub fn set_target_value(&mut self, value: &str) {
        self.target_value = value.to_string();
    }

    pub fn key(&self) -> Option<KeyEvent> {
        self.key
    }

    pub fn clipboard_text(&self) -> Option<&str> {
        self.clipboard_text.as_deref()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
