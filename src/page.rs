//! The slice of the document the theme manager touches: root attributes,
//! translatable nodes, the sidebar and the theme toggle icon.

use crate::types::Language;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Anything whose visible text is its content.
    Text,
    /// A text input; translations go into its placeholder.
    TextInput,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub translate_key: Option<String>,
    pub text: String,
    pub placeholder: String,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            translate_key: None,
            text: text.into(),
            placeholder: String::new(),
        }
    }

    pub fn input(placeholder: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::TextInput,
            translate_key: None,
            text: String::new(),
            placeholder: placeholder.into(),
        }
    }

    pub fn translated(mut self, key: impl Into<String>) -> Self {
        self.translate_key = Some(key.into());
        self
    }

    /// What the user currently sees.
    pub fn rendered(&self) -> &str {
        match self.kind {
            NodeKind::Text => &self.text,
            NodeKind::TextInput => &self.placeholder,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSelector {
    pub options: Vec<Language>,
    pub selected: Language,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    LanguageSelector(LanguageSelector),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sidebar {
    pub items: Vec<Node>,
    pub controls: Vec<Control>,
}

impl Sidebar {
    pub fn language_selector(&self) -> Option<&LanguageSelector> {
        self.controls.iter().find_map(|control| match control {
            Control::LanguageSelector(selector) => Some(selector),
        })
    }

    fn language_selector_mut(&mut self) -> Option<&mut LanguageSelector> {
        self.controls.iter_mut().find_map(|control| match control {
            Control::LanguageSelector(selector) => Some(selector),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub attributes: BTreeMap<String, String>,
    pub nodes: Vec<Node>,
    pub sidebar: Option<Sidebar>,
    /// Icon class suffix of the theme toggle button, if the page has one.
    pub theme_icon: Option<String>,
}

impl Page {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Every translatable node, sidebar items included.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        let sidebar = self.sidebar.iter_mut().flat_map(|sidebar| sidebar.items.iter_mut());
        self.nodes.iter_mut().chain(sidebar)
    }

    /// Adds the selector once; later calls only update the selection.
    pub fn ensure_language_selector(&mut self, selected: Language) -> bool {
        let Some(sidebar) = self.sidebar.as_mut() else {
            return false;
        };
        match sidebar.language_selector_mut() {
            Some(selector) => selector.selected = selected,
            None => sidebar.controls.push(Control::LanguageSelector(LanguageSelector {
                options: Language::ALL.to_vec(),
                selected,
            })),
        }
        true
    }
}
