//! Editor integrations that insert the extension's form shortcodes.

use std::collections::BTreeMap;

use crate::catalog::list_pluck_by;

/// One entry in the editor's shortcode-insertion dropdown.
pub trait ShortcodeEditor {
    /// The tag inserted into the content, without brackets.
    fn tag(&self) -> &str;
    /// Title shown in the insertion dialog.
    fn title(&self) -> &str;
    /// Label shown in the editor dropdown.
    fn label(&self) -> &str;
}

/// Inserts the account page form.
pub struct AccountShortcode;

impl ShortcodeEditor for AccountShortcode {
    fn tag(&self) -> &str {
        "account"
    }

    fn title(&self) -> &str {
        "Account page"
    }

    fn label(&self) -> &str {
        "Account page"
    }
}

/// Registered shortcode editors, in registration order.
#[derive(Default)]
pub struct ShortcodeRegistry {
    editors: Vec<Box<dyn ShortcodeEditor>>,
}

impl ShortcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, editor: Box<dyn ShortcodeEditor>) {
        self.editors.push(editor);
    }

    pub fn editors(&self) -> &[Box<dyn ShortcodeEditor>] {
        &self.editors
    }

    /// Dialog titles keyed by shortcode tag, for the editor UI.
    pub fn titles_by_tag(&self) -> BTreeMap<String, String> {
        list_pluck_by(
            &self.editors,
            |e| e.tag().to_string(),
            |e| e.title().to_string(),
        )
    }
}

/// The registry with every shortcode editor this extension ships.
pub fn default_registry() -> ShortcodeRegistry {
    let mut registry = ShortcodeRegistry::new();
    registry.register(Box::new(AccountShortcode));
    registry
}
