//! Keyboard shortcut dispatcher.
//!
//! Bindings name the exact modifier state they require: a tracked modifier
//! is either in the required set (must be down) or not (must be up); there
//! is no don't-care state. The one carve-out is the save shortcut, where the
//! Ctrl and Cmd conventions both have to work: an `s` binding that requires
//! either primary modifier matches when either one is down.

pub use keyboard_types::{Key, Modifiers};

/// Modifier keys the dispatcher matches on; anything else (caps lock, fn,
/// ...) is ignored.
const TRACKED: Modifiers = Modifiers::CONTROL
    .union(Modifiers::META)
    .union(Modifiers::SHIFT)
    .union(Modifiers::ALT);

/// The two "primary" modifiers the save-shortcut rule treats as equivalent.
const PRIMARY: Modifiers = Modifiers::CONTROL.union(Modifiers::META);

/// A pressed key plus its modifier state, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A printable-character press.
    pub fn character(c: &str, modifiers: Modifiers) -> Self {
        Self::new(Key::Character(c.to_string()), modifiers)
    }
}

/// A registered key combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBinding {
    pub key: Key,
    /// Tracked modifiers that must be down; every other tracked modifier
    /// must be up.
    pub modifiers: Modifiers,
    /// When set, a match does not suppress the host's default handling.
    pub allow_default: bool,
}

impl ShortcutBinding {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            allow_default: false,
        }
    }

    /// A binding on a printable character.
    pub fn character(c: &str, modifiers: Modifiers) -> Self {
        Self::new(Key::Character(c.to_string()), modifiers)
    }

    /// Opts this binding out of suppressing default handling.
    pub fn allow_default(mut self) -> Self {
        self.allow_default = true;
        self
    }

    /// Whether this binding matches the pressed key and modifier state.
    pub fn matches(&self, press: &KeyPress) -> bool {
        if self.key != press.key {
            return false;
        }
        let required = self.modifiers & TRACKED;
        let pressed = press.modifiers & TRACKED;
        if self.is_save_combo() {
            // Either primary modifier satisfies the save shortcut; the
            // remaining modifiers still have to match exactly.
            pressed.intersects(PRIMARY) && (pressed - PRIMARY) == (required - PRIMARY)
        } else {
            pressed == required
        }
    }

    fn is_save_combo(&self) -> bool {
        matches!(&self.key, Key::Character(c) if c.eq_ignore_ascii_case("s"))
            && self.modifiers.intersects(PRIMARY)
    }
}

type ShortcutAction = Box<dyn FnMut()>;

struct ShortcutEntry {
    binding: ShortcutBinding,
    action: ShortcutAction,
}

/// Matches key events against registered bindings and fires their callbacks.
#[derive(Default)]
pub struct ShortcutRegistry {
    entries: Vec<ShortcutEntry>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, binding: ShortcutBinding, action: impl FnMut() + 'static) {
        self.entries.push(ShortcutEntry {
            binding,
            action: Box::new(action),
        });
    }

    /// Dispatches one key event. Every binding that matches fires
    /// independently. Returns whether the host's default handling should be
    /// suppressed.
    pub fn dispatch(&mut self, press: &KeyPress) -> bool {
        let mut suppress = false;
        for entry in &mut self.entries {
            if entry.binding.matches(press) {
                if !entry.binding.allow_default {
                    suppress = true;
                }
                (entry.action)();
            }
        }
        suppress
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ShortcutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRegistry")
            .field("bindings", &self.entries.len())
            .finish()
    }
}
